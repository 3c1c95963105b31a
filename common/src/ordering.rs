//! 読み取り方向の決定（SequenceOrderer）
//!
//! 軸方向に昇順ソートした後、最大間隔の位置で方向を決める:
//! - 先頭の間隔が最大 → 昇順の逆が読み取り方向
//! - 末尾の間隔が最大 → 昇順のまま
//! - 内側が最大 → 最大間隔の後ろから始まるように1回だけ回転し、警告を出す

use crate::error::Warning;
use crate::filter::consecutive_gaps;
use crate::types::{Axis, Detection, OrderedSequence};

/// 最大間隔に対してこの割合以上の間隔は「同程度」とみなす
const COMPARABLE_GAP_RATIO: f64 = 0.9;

/// 並べ替え結果
#[derive(Debug, Clone, PartialEq)]
pub struct OrderingOutcome {
    pub sequence: OrderedSequence,
    pub warning: Option<Warning>,
}

/// 最大値の位置（同値は最初の位置）
fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, max)) if v <= max => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// 検出を読み取り順に並べる
pub fn order_sequence(detections: &[Detection], axis: Axis) -> OrderingOutcome {
    let mut provisional = detections.to_vec();
    provisional.sort_by(|a, b| {
        axis.coordinate(&a.center)
            .total_cmp(&axis.coordinate(&b.center))
    });

    if provisional.len() <= 2 {
        return OrderingOutcome {
            sequence: OrderedSequence::new(provisional),
            warning: None,
        };
    }

    let gaps = consecutive_gaps(&provisional);
    let Some(max_idx) = argmax(&gaps) else {
        return OrderingOutcome {
            sequence: OrderedSequence::new(provisional),
            warning: None,
        };
    };
    let last_idx = gaps.len() - 1;

    if max_idx == 0 {
        provisional.reverse();
        OrderingOutcome {
            sequence: OrderedSequence::new(provisional),
            warning: None,
        }
    } else if max_idx == last_idx {
        OrderingOutcome {
            sequence: OrderedSequence::new(provisional),
            warning: None,
        }
    } else {
        let max_gap = gaps[max_idx];
        let comparable_gaps = gaps
            .iter()
            .enumerate()
            .filter(|&(i, &g)| i != max_idx && g >= max_gap * COMPARABLE_GAP_RATIO)
            .count();
        tracing::warn!(
            gap_index = max_idx,
            comparable_gaps,
            bands = provisional.len(),
            "irregular band layout, rotating sequence at largest gap"
        );

        provisional.rotate_left(max_idx + 1);
        OrderingOutcome {
            sequence: OrderedSequence::new(provisional),
            warning: Some(Warning::IrregularLayout {
                gap_index: max_idx,
                comparable_gaps,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorLabel;
    use crate::types::BoundingBox;

    fn det_x(cx: f64, color: ColorLabel) -> Detection {
        Detection::new(BoundingBox::from_center(cx, 30.0, 6.0, 30.0), color, 0.9)
    }

    fn det_y(cy: f64, color: ColorLabel) -> Detection {
        Detection::new(BoundingBox::from_center(30.0, cy, 30.0, 6.0), color, 0.9)
    }

    #[test]
    fn test_last_gap_largest_keeps_ascending() {
        let dets = vec![
            det_x(30.0, ColorLabel::Black),
            det_x(10.0, ColorLabel::Brown),
            det_x(80.0, ColorLabel::Gold),
            det_x(50.0, ColorLabel::Red),
        ];
        let ordering = order_sequence(&dets, Axis::X);
        assert_eq!(
            ordering.sequence.colors(),
            vec![ColorLabel::Brown, ColorLabel::Black, ColorLabel::Red, ColorLabel::Gold]
        );
        assert!(ordering.warning.is_none());
    }

    #[test]
    fn test_first_gap_largest_reverses() {
        let dets = vec![
            det_x(10.0, ColorLabel::Gold),
            det_x(40.0, ColorLabel::Red),
            det_x(60.0, ColorLabel::Black),
            det_x(80.0, ColorLabel::Brown),
        ];
        let ordering = order_sequence(&dets, Axis::X);
        assert_eq!(
            ordering.sequence.colors(),
            vec![ColorLabel::Brown, ColorLabel::Black, ColorLabel::Red, ColorLabel::Gold]
        );
        assert!(ordering.warning.is_none());
    }

    #[test]
    fn test_vertical_axis() {
        let dets = vec![
            det_y(100.0, ColorLabel::Gold),
            det_y(20.0, ColorLabel::Yellow),
            det_y(40.0, ColorLabel::Violet),
            det_y(60.0, ColorLabel::Orange),
        ];
        let ordering = order_sequence(&dets, Axis::Y);
        assert_eq!(
            ordering.sequence.colors(),
            vec![ColorLabel::Yellow, ColorLabel::Violet, ColorLabel::Orange, ColorLabel::Gold]
        );
    }

    #[test]
    fn test_two_or_fewer_keeps_provisional() {
        let dets = vec![det_x(50.0, ColorLabel::Red), det_x(10.0, ColorLabel::Brown)];
        let ordering = order_sequence(&dets, Axis::X);
        assert_eq!(ordering.sequence.colors(), vec![ColorLabel::Brown, ColorLabel::Red]);
        assert!(ordering.warning.is_none());
    }

    #[test]
    fn test_interior_gap_rotates_and_warns() {
        // 間隔: 10, 40, 10 → 最大は内側（index 1）
        let dets = vec![
            det_x(0.0, ColorLabel::Red),
            det_x(10.0, ColorLabel::Gold),
            det_x(50.0, ColorLabel::Brown),
            det_x(60.0, ColorLabel::Black),
        ];
        let ordering = order_sequence(&dets, Axis::X);
        assert_eq!(
            ordering.sequence.colors(),
            vec![ColorLabel::Brown, ColorLabel::Black, ColorLabel::Red, ColorLabel::Gold]
        );
        assert_eq!(
            ordering.warning,
            Some(Warning::IrregularLayout {
                gap_index: 1,
                comparable_gaps: 0,
            })
        );
    }

    #[test]
    fn test_tied_gaps_first_occurrence_wins() {
        // 全て同じ間隔 → 先頭が最大扱いで逆順
        let dets = vec![
            det_x(0.0, ColorLabel::Gold),
            det_x(20.0, ColorLabel::Red),
            det_x(40.0, ColorLabel::Black),
            det_x(60.0, ColorLabel::Brown),
        ];
        let ordering = order_sequence(&dets, Axis::X);
        assert_eq!(ordering.sequence.colors()[0], ColorLabel::Brown);
        assert!(ordering.warning.is_none());
    }

    #[test]
    fn test_comparable_gaps_counted() {
        // 間隔: 10, 40, 38, 10 → 内側最大、もう1つ同程度
        let dets = vec![
            det_x(0.0, ColorLabel::Red),
            det_x(10.0, ColorLabel::Gold),
            det_x(50.0, ColorLabel::Brown),
            det_x(88.0, ColorLabel::Black),
            det_x(98.0, ColorLabel::Green),
        ];
        let ordering = order_sequence(&dets, Axis::X);
        assert_eq!(
            ordering.warning,
            Some(Warning::IrregularLayout {
                gap_index: 1,
                comparable_gaps: 1,
            })
        );
    }

    #[test]
    fn test_argmax_first_occurrence() {
        assert_eq!(argmax(&[1.0, 3.0, 3.0, 2.0]), Some(1));
        assert_eq!(argmax(&[]), None);
    }
}
