pub mod csv;
pub mod excel;
pub mod json;

use crate::batch::{BatchSummary, ComponentOutcome};
use crate::cli::OutputFormat;
use crate::error::Result;
use ohm_reader_common::ComponentRecord;
use std::path::{Path, PathBuf};

/// 既定の出力ファイル名（拡張子なし）
pub const DEFAULT_STEM: &str = "resistors";

/// 形式ごとの出力パスを決める
///
/// ディレクトリ（または拡張子なし）なら `<dir>/<stem>.<ext>`、
/// ファイル指定なら同じ場所・同じ名前で拡張子だけ差し替える。
pub fn output_path_for_format(output: &Path, extension: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(format!("{}.{}", DEFAULT_STEM, extension))
    } else {
        output.with_extension(extension)
    }
}

pub fn export_outcomes(
    outcomes: &[ComponentOutcome],
    summary: &BatchSummary,
    format: OutputFormat,
    output: &Path,
) -> Result<Vec<PathBuf>> {
    let records: Vec<ComponentRecord> = outcomes.iter().map(|o| o.record.clone()).collect();
    let mut written = Vec::new();

    if format.includes_csv() {
        let path = output_path_for_format(output, "csv");
        println!("- CSVを生成中...");
        csv::write_csv(&records, &path)?;
        println!("✔ CSV出力: {}", path.display());
        written.push(path);
    }

    if format.includes_excel() {
        let path = output_path_for_format(output, "xlsx");
        println!("- Excelを生成中...");
        excel::generate_excel(&records, &path)?;
        println!("✔ Excel出力: {}", path.display());
        written.push(path);
    }

    if format.includes_json() {
        let path = output_path_for_format(output, "json");
        println!("- JSONを生成中...");
        json::write_report(outcomes, summary, &path)?;
        println!("✔ JSON出力: {}", path.display());
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_output_path_for_directory() {
        let dir = tempdir().unwrap();
        assert_eq!(
            output_path_for_format(dir.path(), "csv"),
            dir.path().join("resistors.csv")
        );
    }

    #[test]
    fn test_output_path_for_file() {
        let path = Path::new("/tmp/out/board7.csv");
        assert_eq!(
            output_path_for_format(path, "xlsx"),
            PathBuf::from("/tmp/out/board7.xlsx")
        );
    }
}
