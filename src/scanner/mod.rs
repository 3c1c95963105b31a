mod loader;

pub use loader::load_component;

use crate::error::{OhmReaderError, Result};
use crate::export::DEFAULT_STEM;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 入力ファイルの形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// 検出JSON
    Json,
    /// YOLOテキストラベル
    YoloText,
}

#[derive(Debug, Clone)]
pub struct InputInfo {
    pub path: PathBuf,
    pub file_name: String,
    pub format: InputFormat,
}

impl InputInfo {
    /// 拡張子を除いたファイル名（部品IDの既定値）
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| self.file_name.clone())
    }
}

fn input_format(path: &Path) -> Option<InputFormat> {
    let ext = path.extension()?.to_string_lossy().to_lowercase();
    match ext.as_str() {
        "json" => Some(InputFormat::Json),
        "txt" => Some(InputFormat::YoloText),
        _ => None,
    }
}

fn is_previous_output(path: &Path) -> bool {
    path.file_stem()
        .map(|stem| stem.to_string_lossy() == DEFAULT_STEM)
        .unwrap_or(false)
}

fn input_info(path: &Path, format: InputFormat) -> InputInfo {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    InputInfo {
        path: path.to_path_buf(),
        file_name,
        format,
    }
}

/// ファイルまたはフォルダから入力を集める
///
/// フォルダは直下のみ（再帰しない）。1ファイル = 1部品。
/// 前回の出力（`resistors.*`）は入力として扱わない。
pub fn scan_inputs(path: &Path) -> Result<Vec<InputInfo>> {
    if !path.exists() {
        return Err(OhmReaderError::FolderNotFound(path.display().to_string()));
    }

    if path.is_file() {
        let format = input_format(path)
            .ok_or_else(|| OhmReaderError::NoInputFound(path.display().to_string()))?;
        return Ok(vec![input_info(path, format)]);
    }

    let mut inputs = Vec::new();

    for entry in WalkDir::new(path)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let entry_path = entry.path();

        if !entry_path.is_file() {
            continue;
        }

        if is_previous_output(entry_path) {
            tracing::debug!(file = %entry_path.display(), "skipping previous output");
            continue;
        }

        if let Some(format) = input_format(entry_path) {
            inputs.push(input_info(entry_path, format));
        }
    }

    // ファイル名でソート
    inputs.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    Ok(inputs)
}
