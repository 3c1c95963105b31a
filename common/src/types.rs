//! 検出結果とエンジン設定の型定義
//!
//! - Detection: 分類器が1枚の切り出し画像から出力した色環1本分の検出
//! - OrderedSequence: 読み取り軸・方向が確定した色環列
//! - EngineConfig: 呼び出し側が注入する閾値

use crate::color::ColorLabel;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// 画素座標
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// 軸平行な矩形 (x1, y1, x2, y2)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BoundingBox {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// 中心座標と幅・高さから生成（YOLOラベル形式）
    pub fn from_center(cx: f64, cy: f64, width: f64, height: f64) -> Self {
        Self {
            x1: cx - width / 2.0,
            y1: cy - height / 2.0,
            x2: cx + width / 2.0,
            y2: cy + height / 2.0,
        }
    }

    pub fn center(&self) -> Point {
        Point::new((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }
}

impl From<[f64; 4]> for BoundingBox {
    fn from(v: [f64; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.x1, b.y1, b.x2, b.y2]
    }
}

/// 色環1本分の検出
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    #[serde(rename = "box")]
    pub bbox: BoundingBox,
    pub center: Point,
    pub color: ColorLabel,
    pub confidence: f64,
}

impl Detection {
    /// 中心は矩形から計算する
    pub fn new(bbox: BoundingBox, color: ColorLabel, confidence: f64) -> Self {
        Self {
            center: bbox.center(),
            bbox,
            color,
            confidence,
        }
    }
}

/// 読み取り軸
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// 横向き（X座標で読む）
    X,
    /// 縦向き（Y座標で読む）
    Y,
}

impl Axis {
    /// 軸方向の座標
    pub fn coordinate(&self, point: &Point) -> f64 {
        match self {
            Axis::X => point.x,
            Axis::Y => point.y,
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => write!(f, "horizontal"),
            Axis::Y => write!(f, "vertical"),
        }
    }
}

/// 読み取り順に並んだ色環列
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderedSequence {
    bands: Vec<Detection>,
}

impl OrderedSequence {
    pub fn new(bands: Vec<Detection>) -> Self {
        Self { bands }
    }

    pub fn bands(&self) -> &[Detection] {
        &self.bands
    }

    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    pub fn colors(&self) -> Vec<ColorLabel> {
        self.bands.iter().map(|d| d.color).collect()
    }

    /// 手動確認用の位置ごとの選択値（全て設定済み）
    pub fn slots(&self) -> Vec<Option<ColorLabel>> {
        self.bands.iter().map(|d| Some(d.color)).collect()
    }

    pub fn into_inner(self) -> Vec<Detection> {
        self.bands
    }
}

/// エンジン設定（呼び出し側が上書き可能）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// この値未満の信頼度の検出は捨てる
    pub confidence_threshold: f64,
    /// 平均間隔 × この値 未満の隣接ペアは重複検出とみなす
    pub near_gap_ratio: f64,
    /// 平均間隔 × この値 を両側とも超える内側の検出は外れ値とみなす
    pub far_gap_ratio: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.5,
            near_gap_ratio: 0.3,
            far_gap_ratio: 2.0,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        let values = [
            ("confidenceThreshold", self.confidence_threshold),
            ("nearGapRatio", self.near_gap_ratio),
            ("farGapRatio", self.far_gap_ratio),
        ];
        for (name, value) in values {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Config(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        if self.confidence_threshold > 1.0 {
            return Err(Error::Config(format!(
                "confidenceThreshold must be within [0, 1], got {}",
                self.confidence_threshold
            )));
        }
        if self.near_gap_ratio >= self.far_gap_ratio {
            return Err(Error::Config(format!(
                "nearGapRatio ({}) must be below farGapRatio ({})",
                self.near_gap_ratio, self.far_gap_ratio
            )));
        }
        Ok(())
    }
}
