//! 異常検出の除去（DetectionFilter）
//!
//! 分類器のノイズは次の2種類として現れる:
//! - 同じ色環に重なった重複検出（間隔が平均より極端に狭い）
//! - 色環群から離れた孤立検出（両側の間隔が平均より極端に広い）
//!
//! どちらもサンプル自身の間隔分布から閾値を決めるため、画像の縮尺に依存しない。

use crate::error::{Error, Result};
use crate::orientation::resolve_axis;
use crate::types::{Detection, EngineConfig};
use serde::Serialize;

/// 除去理由
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DropReason {
    /// 信頼度が閾値未満
    LowConfidence,
    /// 隣接検出と重なっている（信頼度の低い方）
    Duplicate,
    /// 両側の間隔が広すぎる内側の検出
    Isolated,
}

impl std::fmt::Display for DropReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DropReason::LowConfidence => write!(f, "low confidence"),
            DropReason::Duplicate => write!(f, "duplicate"),
            DropReason::Isolated => write!(f, "isolated"),
        }
    }
}

/// 除去された検出
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DroppedDetection {
    pub detection: Detection,
    pub reason: DropReason,
}

/// 間隔の統計量
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GapStats {
    pub mean: f64,
    pub std_dev: f64,
    pub near_threshold: f64,
    pub far_threshold: f64,
}

/// フィルタ結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOutcome {
    /// 残った検出（暫定ソート順）
    pub kept: Vec<Detection>,
    pub dropped: Vec<DroppedDetection>,
    /// 2件未満の場合は None
    pub stats: Option<GapStats>,
}

/// 平均と標準偏差（母集団）
fn mean_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

/// 隣接する中心間距離
pub(crate) fn consecutive_gaps(detections: &[Detection]) -> Vec<f64> {
    detections
        .windows(2)
        .map(|pair| pair[0].center.distance_to(&pair[1].center))
        .collect()
}

/// 低信頼度・重複・孤立の検出を除去する
///
/// # Errors
/// * `NoDetections` - 入力が空
/// * `AllFiltered` - 全ての検出が除去された
pub fn filter_detections(detections: &[Detection], config: &EngineConfig) -> Result<FilterOutcome> {
    if detections.is_empty() {
        return Err(Error::NoDetections);
    }

    let mut kept = Vec::with_capacity(detections.len());
    let mut dropped = Vec::new();
    for det in detections {
        if det.confidence < config.confidence_threshold {
            tracing::debug!(
                color = %det.color,
                confidence = det.confidence,
                "dropping low-confidence detection"
            );
            dropped.push(DroppedDetection {
                detection: det.clone(),
                reason: DropReason::LowConfidence,
            });
        } else {
            kept.push(det.clone());
        }
    }

    if kept.is_empty() {
        return Err(Error::AllFiltered {
            total: detections.len(),
        });
    }

    if kept.len() < 2 {
        return Ok(FilterOutcome {
            kept,
            dropped,
            stats: None,
        });
    }

    // 広がりの大きい軸で暫定ソートしてから隣接間隔を計算
    let axis = resolve_axis(&kept);
    kept.sort_by(|a, b| {
        axis.coordinate(&a.center)
            .total_cmp(&axis.coordinate(&b.center))
    });

    let gaps = consecutive_gaps(&kept);
    let (mean, std_dev) = mean_std(&gaps);
    let stats = GapStats {
        mean,
        std_dev,
        near_threshold: mean * config.near_gap_ratio,
        far_threshold: mean * config.far_gap_ratio,
    };
    tracing::debug!(
        mean = stats.mean,
        std_dev = stats.std_dev,
        near = stats.near_threshold,
        far = stats.far_threshold,
        "gap statistics"
    );

    let mut removed: Vec<Option<DropReason>> = vec![None; kept.len()];

    for (i, &gap) in gaps.iter().enumerate() {
        if gap < stats.near_threshold {
            let loser = if kept[i].confidence > kept[i + 1].confidence {
                i + 1
            } else {
                i
            };
            removed[loser].get_or_insert(DropReason::Duplicate);
        }
    }

    for i in 1..kept.len() - 1 {
        if gaps[i - 1] > stats.far_threshold && gaps[i] > stats.far_threshold {
            removed[i].get_or_insert(DropReason::Isolated);
        }
    }

    let removed_count = removed.iter().filter(|r| r.is_some()).count();
    let mut survivors = Vec::with_capacity(kept.len() - removed_count);
    for (i, det) in kept.into_iter().enumerate() {
        match removed[i] {
            Some(reason) => {
                tracing::debug!(color = %det.color, %reason, "dropping detection");
                dropped.push(DroppedDetection {
                    detection: det,
                    reason,
                });
            }
            None => survivors.push(det),
        }
    }

    if survivors.is_empty() {
        return Err(Error::AllFiltered {
            total: detections.len(),
        });
    }

    Ok(FilterOutcome {
        kept: survivors,
        dropped,
        stats: Some(stats),
    })
}
