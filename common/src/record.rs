//! 部品ごとの出力レコード（1部品 = 1行）
//!
//! 列: 編号(id), 中心座標, 部品クラス, 検出信頼度, 抵抗値

use crate::error::Error;
use crate::parser::ComponentInfo;
use crate::pipeline::BandReading;
use crate::types::Point;
use serde::{Deserialize, Serialize};

/// 表形式出力の列見出し
pub const RECORD_HEADERS: [&str; 5] = ["id", "centroid", "class", "confidence", "resistance"];

/// 1部品分の行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRecord {
    pub id: String,
    pub centroid: Option<Point>,
    pub class_name: String,
    pub confidence: Option<f64>,
    /// 解読結果の文字列、失敗時はエラー内容
    pub resistance: String,
    #[serde(default)]
    pub decoded: bool,
    #[serde(default)]
    pub needs_review: bool,
}

impl ComponentRecord {
    /// 読み取り結果から行を作る
    ///
    /// 部品の中心座標がない場合は色環検出の平均中心を使う。
    pub fn from_outcome(
        id: impl Into<String>,
        component: &ComponentInfo,
        outcome: &std::result::Result<BandReading, Error>,
    ) -> Self {
        let id = component.id.clone().unwrap_or_else(|| id.into());
        match outcome {
            Ok(reading) => {
                let centroid = component
                    .centroid()
                    .or_else(|| mean_center(reading.resolution.sequence.bands().iter().map(|d| d.center)));
                Self {
                    id,
                    centroid,
                    class_name: component.class_name.clone(),
                    confidence: component.confidence,
                    resistance: reading.decoded.result.formatted.clone(),
                    decoded: true,
                    needs_review: reading.resolution.needs_review(),
                }
            }
            Err(e) => Self::failed(id, component, format!("error ({}): {}", e.stage(), e)),
        }
    }

    /// 読み取れなかった部品の行（抵抗値の列にエラー内容を入れる）
    pub fn failed(id: impl Into<String>, component: &ComponentInfo, message: impl Into<String>) -> Self {
        Self {
            id: component.id.clone().unwrap_or_else(|| id.into()),
            centroid: component.centroid(),
            class_name: component.class_name.clone(),
            confidence: component.confidence,
            resistance: message.into(),
            decoded: false,
            needs_review: true,
        }
    }

    /// 表示用の列値（RECORD_HEADERS と同じ順）
    pub fn fields(&self) -> [String; 5] {
        [
            self.id.clone(),
            self.centroid
                .map(|p| format!("({:.1}, {:.1})", p.x, p.y))
                .unwrap_or_else(|| "-".to_string()),
            self.class_name.clone(),
            self.confidence
                .map(|c| format!("{:.2}", c))
                .unwrap_or_else(|| "-".to_string()),
            self.resistance.clone(),
        ]
    }
}

fn mean_center(points: impl Iterator<Item = Point>) -> Option<Point> {
    let (mut sx, mut sy, mut n) = (0.0, 0.0, 0usize);
    for p in points {
        sx += p.x;
        sy += p.y;
        n += 1;
    }
    if n == 0 {
        None
    } else {
        Some(Point::new(sx / n as f64, sy / n as f64))
    }
}

/// CSVフィールドのエスケープ（カンマ・引用符・改行を含む場合のみ引用）
fn escape_csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// レコードをCSV文字列にする（見出し行付き）
pub fn records_to_csv(records: &[ComponentRecord]) -> String {
    let mut out = String::new();
    out.push_str(&RECORD_HEADERS.join(","));
    out.push('\n');
    for record in records {
        let line: Vec<String> = record.fields().iter().map(|f| escape_csv_field(f)).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }
    out
}
