//! Excel生成（共通ライブラリ）
//!
//! 部品レコードを1シートの表として書き出す

use crate::record::{ComponentRecord, RECORD_HEADERS};
use rust_xlsxwriter::*;

/// 列幅（文字数単位）
const COLUMN_WIDTHS: [f64; 5] = [10.0, 18.0, 12.0, 12.0, 36.0];

const SHEET_NAME: &str = "Components";

/// Excelをバッファに生成
///
/// 確認が必要な行（警告付き・解読失敗）は背景色で区別する。
pub fn generate_excel_buffer(records: &[ComponentRecord]) -> Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_font_size(10.0)
        .set_font_color(Color::RGB(0x555555))
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xAAAAAA));

    let value_format = Format::new()
        .set_font_size(11.0)
        .set_align(FormatAlign::Left)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xCCCCCC));

    let review_format = value_format
        .clone()
        .set_background_color(Color::RGB(0xFFF2CC));

    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(SHEET_NAME)
        .map_err(|e| format!("シート名設定エラー: {}", e))?;

    for (col, width) in COLUMN_WIDTHS.iter().enumerate() {
        worksheet
            .set_column_width(col as u16, *width)
            .map_err(|e| format!("列幅設定エラー: {}", e))?;
    }

    for (col, header) in RECORD_HEADERS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(|e| format!("見出し書き込みエラー: {}", e))?;
    }
    worksheet
        .set_freeze_panes(1, 0)
        .map_err(|e| format!("ウィンドウ枠固定エラー: {}", e))?;

    for (i, record) in records.iter().enumerate() {
        let row = i as u32 + 1;
        let format = if record.needs_review {
            &review_format
        } else {
            &value_format
        };

        for (col, value) in record.fields().iter().enumerate() {
            // 信頼度は数値セルとして書く
            if col == 3 {
                if let Some(confidence) = record.confidence {
                    worksheet
                        .write_number_with_format(row, col as u16, confidence, format)
                        .map_err(|e| format!("値書き込みエラー: {}", e))?;
                    continue;
                }
            }
            worksheet
                .write_string_with_format(row, col as u16, value, format)
                .map_err(|e| format!("値書き込みエラー: {}", e))?;
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| format!("Excel保存エラー: {}", e))
}
