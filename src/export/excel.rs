//! Excel生成（CLI版）
//!
//! 共通ライブラリの excel_core でバッファを作り、ファイルに書き出す

use crate::error::{OhmReaderError, Result};
use ohm_reader_common::export::excel_core::generate_excel_buffer;
use ohm_reader_common::ComponentRecord;
use std::path::Path;

pub fn generate_excel(records: &[ComponentRecord], output_path: &Path) -> Result<()> {
    let buffer = generate_excel_buffer(records).map_err(OhmReaderError::ExcelGeneration)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(output_path, buffer)?;
    Ok(())
}
