//! 手入力された色の並びの解釈
//!
//! 区切り: 空白・カンマ（全角含む）・読点・ハイフン。
//! `-` または `?` だけの項目は未確定の色環。
//! 区切りのない漢字列（棕黑红金）は1文字ずつ分ける。

use lazy_static::lazy_static;
use ohm_reader_common::{ColorLabel, Error, Result};
use regex::Regex;

lazy_static! {
    static ref SEPARATOR_RE: Regex = Regex::new(r"[\s,，、]+").unwrap();
}

fn is_unset(token: &str) -> bool {
    token == "-" || token == "?" || token == "？"
}

fn parse_token(token: &str, slots: &mut Vec<Option<ColorLabel>>) -> Result<()> {
    if is_unset(token) {
        slots.push(None);
        return Ok(());
    }

    match token.parse::<ColorLabel>() {
        Ok(color) => slots.push(Some(color)),
        Err(e) => {
            // 漢字の連続表記
            let chars: Vec<String> = token.chars().map(|c| c.to_string()).collect();
            if chars.len() < 2 {
                return Err(e);
            }
            for ch in &chars {
                if is_unset(ch) {
                    slots.push(None);
                } else {
                    let color = ch.parse::<ColorLabel>().map_err(|_| {
                        Error::Parse(format!("unknown color: {}", token))
                    })?;
                    slots.push(Some(color));
                }
            }
        }
    }
    Ok(())
}

/// 引数の並びを色環スロットに変換
pub fn parse_sequence<S: AsRef<str>>(args: &[S]) -> Result<Vec<Option<ColorLabel>>> {
    let mut slots = Vec::new();

    for arg in args {
        for part in SEPARATOR_RE.split(arg.as_ref().trim()) {
            if part.is_empty() {
                continue;
            }
            if is_unset(part) {
                slots.push(None);
                continue;
            }
            for token in part.split('-').filter(|t| !t.is_empty()) {
                parse_token(token, &mut slots)?;
            }
        }
    }

    if slots.is_empty() {
        return Err(Error::Parse("no colors given".into()));
    }
    Ok(slots)
}
