//! 入力ファイルの読み込み

use super::{InputFormat, InputInfo};
use crate::error::Result;
use ohm_reader_common::{parse_detection_json, parse_yolo_labels, ClassMap, DetectionFile};

/// 1部品分の検出を読み込む
///
/// YOLOテキストには部品情報がないため既定値になる。
pub fn load_component(input: &InputInfo, class_map: &ClassMap) -> Result<DetectionFile> {
    let content = std::fs::read_to_string(&input.path)?;

    let file = match input.format {
        InputFormat::Json => parse_detection_json(&content, class_map)?,
        InputFormat::YoloText => DetectionFile {
            detections: parse_yolo_labels(&content, class_map, None)?,
            ..Default::default()
        },
    };

    tracing::debug!(
        file = %input.file_name,
        detections = file.detections.len(),
        "loaded component"
    );

    Ok(file)
}
