//! 色環の色ラベルと分類器クラスIDの対応表

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 色環の色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorLabel {
    Black,
    Brown,
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    #[serde(alias = "purple")]
    Violet,
    #[serde(alias = "grey")]
    Gray,
    White,
    Gold,
    Silver,
}

impl ColorLabel {
    pub const ALL: [ColorLabel; 12] = [
        ColorLabel::Black,
        ColorLabel::Brown,
        ColorLabel::Red,
        ColorLabel::Orange,
        ColorLabel::Yellow,
        ColorLabel::Green,
        ColorLabel::Blue,
        ColorLabel::Violet,
        ColorLabel::Gray,
        ColorLabel::White,
        ColorLabel::Gold,
        ColorLabel::Silver,
    ];

    /// 英語名
    pub fn name(&self) -> &'static str {
        match self {
            ColorLabel::Black => "black",
            ColorLabel::Brown => "brown",
            ColorLabel::Red => "red",
            ColorLabel::Orange => "orange",
            ColorLabel::Yellow => "yellow",
            ColorLabel::Green => "green",
            ColorLabel::Blue => "blue",
            ColorLabel::Violet => "violet",
            ColorLabel::Gray => "gray",
            ColorLabel::White => "white",
            ColorLabel::Gold => "gold",
            ColorLabel::Silver => "silver",
        }
    }

    /// 注釈画面で使われる一文字の中国語名
    pub fn short_name(&self) -> &'static str {
        match self {
            ColorLabel::Black => "黑",
            ColorLabel::Brown => "棕",
            ColorLabel::Red => "红",
            ColorLabel::Orange => "橙",
            ColorLabel::Yellow => "黄",
            ColorLabel::Green => "绿",
            ColorLabel::Blue => "蓝",
            ColorLabel::Violet => "紫",
            ColorLabel::Gray => "灰",
            ColorLabel::White => "白",
            ColorLabel::Gold => "金",
            ColorLabel::Silver => "银",
        }
    }
}

impl std::fmt::Display for ColorLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ColorLabel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let lower = trimmed.to_lowercase();
        let label = match lower.as_str() {
            "purple" => Some(ColorLabel::Violet),
            "grey" => Some(ColorLabel::Gray),
            _ => ColorLabel::ALL
                .iter()
                .copied()
                .find(|c| c.name() == lower || c.short_name() == trimmed),
        };
        label.ok_or_else(|| Error::Parse(format!("unknown color: {}", trimmed)))
    }
}

/// 分類器のクラスID → 色ラベルの対応表
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassMap {
    classes: BTreeMap<u32, ColorLabel>,
}

impl Default for ClassMap {
    /// 色環モデルの学習時のクラス順
    fn default() -> Self {
        let order = [
            ColorLabel::Red,
            ColorLabel::Yellow,
            ColorLabel::Black,
            ColorLabel::Gold,
            ColorLabel::Orange,
            ColorLabel::Blue,
            ColorLabel::Brown,
            ColorLabel::Green,
            ColorLabel::Violet,
            ColorLabel::White,
            ColorLabel::Gray,
        ];
        Self {
            classes: order
                .iter()
                .enumerate()
                .map(|(id, &color)| (id as u32, color))
                .collect(),
        }
    }
}

impl ClassMap {
    /// JSON文字列から読み込み（`{"0": "red", ...}`）
    pub fn from_json(json: &str) -> Result<Self> {
        let map: Self = serde_json::from_str(json)?;
        if map.classes.is_empty() {
            return Err(Error::Config("class map is empty".into()));
        }
        Ok(map)
    }

    /// JSONファイルから読み込み
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn color_of(&self, class_id: u32) -> Result<ColorLabel> {
        self.classes
            .get(&class_id)
            .copied()
            .ok_or_else(|| Error::Parse(format!("class id {} has no color mapping", class_id)))
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
