//! 色環読み取りパイプライン
//!
//! Filter → Orient → Order → Decode の順に純粋関数を適用する。
//! 状態は持たないため、部品ごとに並列で呼び出してよい。

use crate::decoder::{decode_with_correction, BandMode, Decoded};
use crate::error::{Result, Warning};
use crate::filter::{filter_detections, DroppedDetection, GapStats};
use crate::orientation::resolve_axis;
use crate::ordering::order_sequence;
use crate::types::{Axis, Detection, EngineConfig, OrderedSequence};
use serde::Serialize;

/// 解読前までの結果（手動確認画面に渡す）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub axis: Axis,
    pub sequence: OrderedSequence,
    pub dropped: Vec<DroppedDetection>,
    pub gap_stats: Option<GapStats>,
    pub warnings: Vec<Warning>,
}

impl Resolution {
    /// 手動確認が必要か
    pub fn needs_review(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// 1部品分の読み取り結果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BandReading {
    pub mode: BandMode,
    pub resolution: Resolution,
    pub decoded: Decoded,
}

/// 検出から読み取り順の色環列を求める
pub fn resolve(detections: &[Detection], config: &EngineConfig) -> Result<Resolution> {
    let filtered = filter_detections(detections, config)?;
    let axis = resolve_axis(&filtered.kept);
    let ordering = order_sequence(&filtered.kept, axis);

    Ok(Resolution {
        axis,
        sequence: ordering.sequence,
        dropped: filtered.dropped,
        gap_stats: filtered.stats,
        warnings: ordering.warning.into_iter().collect(),
    })
}

/// 検出から抵抗値まで読み取る
///
/// モードは最初に検証するため、不正なモードではパイプラインを開始しない。
pub fn read_resistor(
    detections: &[Detection],
    mode: u8,
    config: &EngineConfig,
) -> Result<BandReading> {
    let mode = BandMode::try_from(mode)?;
    let resolution = resolve(detections, config)?;
    let decoded = decode_with_correction(&resolution.sequence.slots(), mode)?;

    Ok(BandReading {
        mode,
        resolution,
        decoded,
    })
}
