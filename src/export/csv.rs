//! CSV出力（CLI版）

use crate::error::Result;
use ohm_reader_common::{records_to_csv, ComponentRecord};
use std::path::Path;

pub fn write_csv(records: &[ComponentRecord], output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(output_path, records_to_csv(records))?;
    Ok(())
}
