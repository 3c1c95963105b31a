//! JSONレポート出力
//!
//! 表の行に加えて、部品ごとの読み取り詳細（軸・並び・除外検出・警告）を残す。

use crate::batch::{BatchSummary, ComponentOutcome};
use crate::error::Result;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Report<'a> {
    generated_at: String,
    summary: &'a BatchSummary,
    components: &'a [ComponentOutcome],
}

pub fn write_report(
    outcomes: &[ComponentOutcome],
    summary: &BatchSummary,
    output_path: &Path,
) -> Result<()> {
    let report = Report {
        generated_at: chrono::Utc::now().to_rfc3339(),
        summary,
        components: outcomes,
    };

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(&report)?;
    std::fs::write(output_path, json)?;
    Ok(())
}
