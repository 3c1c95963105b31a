//! 分類器出力パーサー
//!
//! 1枚の切り出し画像（= 1部品）に対する色環検出を読み込む。
//!
//! 対応形式:
//! 1. JSON: 検出の配列、または `{ component, bandMode, detections }` オブジェクト
//! 2. YOLOテキストラベル: 1行1検出 `class cx cy w h [conf]`

use crate::color::{ClassMap, ColorLabel};
use crate::error::{Error, Result};
use crate::types::{BoundingBox, Detection, Point};
use serde::{Deserialize, Serialize};

/// 部品（抵抗器）レベルの検出情報
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentInfo {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "box", default)]
    pub bbox: Option<BoundingBox>,
    #[serde(default = "default_class_name", alias = "class")]
    pub class_name: String,
    #[serde(default, alias = "conf")]
    pub confidence: Option<f64>,
}

fn default_class_name() -> String {
    "resistor".to_string()
}

impl Default for ComponentInfo {
    fn default() -> Self {
        Self {
            id: None,
            bbox: None,
            class_name: default_class_name(),
            confidence: None,
        }
    }
}

impl ComponentInfo {
    pub fn centroid(&self) -> Option<Point> {
        self.bbox.map(|b| b.center())
    }
}

/// 1部品分の入力
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DetectionFile {
    pub component: ComponentInfo,
    /// ファイル内で指定された本数モード（未指定ならNone）
    pub band_mode: Option<u8>,
    pub detections: Vec<Detection>,
}

/// JSON上の検出（色名またはクラスIDのどちらか）
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDetection {
    #[serde(rename = "box")]
    bbox: BoundingBox,
    #[serde(default)]
    color: Option<String>,
    #[serde(default, alias = "class")]
    class_id: Option<u32>,
    #[serde(alias = "conf")]
    confidence: f64,
}

impl RawDetection {
    fn into_detection(self, class_map: &ClassMap) -> Result<Detection> {
        let color = match (&self.color, self.class_id) {
            (Some(name), _) => name.parse::<ColorLabel>()?,
            (None, Some(id)) => class_map.color_of(id)?,
            (None, None) => {
                return Err(Error::Parse(
                    "detection needs either `color` or `classId`".into(),
                ))
            }
        };
        let confidence = check_confidence(self.confidence).map_err(Error::Parse)?;
        Ok(Detection::new(self.bbox, color, confidence))
    }
}

/// 信頼度は [0, 1] の有限値
fn check_confidence(confidence: f64) -> std::result::Result<f64, String> {
    if confidence.is_finite() && (0.0..=1.0).contains(&confidence) {
        Ok(confidence)
    } else {
        Err(format!("confidence must be within [0, 1], got {}", confidence))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument {
    #[serde(default)]
    component: Option<ComponentInfo>,
    #[serde(default)]
    band_mode: Option<u8>,
    detections: Vec<RawDetection>,
}

/// JSON形式の分類器出力をパース
///
/// # Examples
/// ```
/// use ohm_reader_common::{parse_detection_json, ClassMap};
///
/// let json = r#"[{"box": [0, 0, 4, 20], "color": "brown", "confidence": 0.9}]"#;
/// let file = parse_detection_json(json, &ClassMap::default()).unwrap();
/// assert_eq!(file.detections.len(), 1);
/// ```
pub fn parse_detection_json(json: &str, class_map: &ClassMap) -> Result<DetectionFile> {
    let parse_err = |e: serde_json::Error| Error::Parse(format!("detection JSON: {}", e));
    let value: serde_json::Value = serde_json::from_str(json.trim()).map_err(parse_err)?;

    // 配列は検出の並び、オブジェクトは部品情報付きの文書として読む
    let (component, band_mode, raw_detections) = match value {
        serde_json::Value::Array(_) => {
            let list: Vec<RawDetection> = serde_json::from_value(value).map_err(parse_err)?;
            (ComponentInfo::default(), None, list)
        }
        serde_json::Value::Object(_) => {
            let doc: RawDocument = serde_json::from_value(value).map_err(parse_err)?;
            (doc.component.unwrap_or_default(), doc.band_mode, doc.detections)
        }
        _ => {
            return Err(Error::Parse(
                "detection JSON: expected an array of detections or an object with `detections`".into(),
            ))
        }
    };

    let detections = raw_detections
        .into_iter()
        .map(|d| d.into_detection(class_map))
        .collect::<Result<Vec<_>>>()?;

    Ok(DetectionFile {
        component,
        band_mode,
        detections,
    })
}

/// YOLOテキストラベルをパース
///
/// `image_size` を指定すると正規化座標（0〜1）を画素座標に戻す。
/// 信頼度の列がない行は 1.0 とする。
pub fn parse_yolo_labels(
    text: &str,
    class_map: &ClassMap,
    image_size: Option<(f64, f64)>,
) -> Result<Vec<Detection>> {
    let (scale_x, scale_y) = image_size.unwrap_or((1.0, 1.0));
    let mut detections = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 5 && fields.len() != 6 {
            return Err(Error::Parse(format!(
                "line {}: expected `class cx cy w h [conf]`, got {} fields",
                line_no + 1,
                fields.len()
            )));
        }

        let class_id: u32 = fields[0]
            .parse()
            .map_err(|_| Error::Parse(format!("line {}: invalid class id `{}`", line_no + 1, fields[0])))?;

        let mut values = [0.0f64; 5];
        for (slot, field) in values.iter_mut().zip(&fields[1..]) {
            *slot = field
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| Error::Parse(format!("line {}: invalid number `{}`", line_no + 1, field)))?;
        }
        let confidence = if fields.len() == 6 {
            check_confidence(values[4])
                .map_err(|e| Error::Parse(format!("line {}: {}", line_no + 1, e)))?
        } else {
            1.0
        };

        let color = class_map
            .color_of(class_id)
            .map_err(|e| Error::Parse(format!("line {}: {}", line_no + 1, e)))?;
        let bbox = BoundingBox::from_center(
            values[0] * scale_x,
            values[1] * scale_y,
            values[2] * scale_x,
            values[3] * scale_y,
        );
        detections.push(Detection::new(bbox, color, confidence));
    }

    Ok(detections)
}
