//! 読み取り軸の判定（OrientationResolver）

use crate::types::{Axis, Detection};

/// 中心座標の広がりが大きい方を読み取り軸とする
///
/// 同値の場合はX軸。空の入力もX軸を返す。
pub fn resolve_axis(detections: &[Detection]) -> Axis {
    let Some(first) = detections.first() else {
        return Axis::X;
    };

    let (mut min_x, mut max_x) = (first.center.x, first.center.x);
    let (mut min_y, mut max_y) = (first.center.y, first.center.y);
    for det in &detections[1..] {
        min_x = min_x.min(det.center.x);
        max_x = max_x.max(det.center.x);
        min_y = min_y.min(det.center.y);
        max_y = max_y.max(det.center.y);
    }

    let span_x = max_x - min_x;
    let span_y = max_y - min_y;
    if span_x >= span_y {
        Axis::X
    } else {
        Axis::Y
    }
}
