//! 対話式の色環確認モジュール
//!
//! 自動で並べた色環列を1本ずつ表示し、その位置の役割で取りうる色だけを候補に出す。
//! 確認後の列を解読する（読み直しは1回まで）。

use crate::error::{OhmReaderError, Result};
use dialoguer::Select;
use ohm_reader_common::{
    decode_with_correction, resolve, BandMode, BandRole, ColorLabel, Decoded, EngineConfig,
    Resolution,
};

const UNSET_LABEL: &str = "(未確定)";

/// 自動読み取り結果から確認前の列を作る（本数に合わせて切り詰め・補完）
pub fn initial_slots(resolution: Option<&Resolution>, mode: BandMode) -> Vec<Option<ColorLabel>> {
    let mut slots: Vec<Option<ColorLabel>> = resolution
        .map(|r| r.sequence.slots())
        .unwrap_or_default();
    slots.resize(mode.band_count(), None);
    slots
}

/// 選択肢（役割で取りうる色 + 未確定）
pub fn choices_for(role: BandRole) -> Vec<String> {
    role.allowed_colors()
        .iter()
        .map(|c| format!("{} ({})", c.name(), c.short_name()))
        .chain(std::iter::once(UNSET_LABEL.to_string()))
        .collect()
}

/// 初期選択位置。検出色が候補にない場合は未確定
pub fn default_choice(role: BandRole, detected: Option<ColorLabel>) -> usize {
    let allowed = role.allowed_colors();
    detected
        .and_then(|color| allowed.iter().position(|&c| c == color))
        .unwrap_or(allowed.len())
}

/// 選択位置 → 色
pub fn choice_to_color(role: BandRole, index: usize) -> Option<ColorLabel> {
    role.allowed_colors().get(index).copied()
}

fn print_resolution(resolution: &Resolution) {
    println!("  軸: {}", resolution.axis);
    let detected: Vec<String> = resolution
        .sequence
        .colors()
        .iter()
        .map(|c| c.name().to_string())
        .collect();
    println!("  検出順: {}", detected.join(" → "));
    for dropped in &resolution.dropped {
        println!(
            "  除外: {} ({:.2}) - {}",
            dropped.detection.color, dropped.detection.confidence, dropped.reason
        );
    }
    for warning in &resolution.warnings {
        println!("  ⚠ {}", warning);
    }
}

/// 1部品の対話確認
pub fn run_interactive_confirm(
    detections: &[ohm_reader_common::Detection],
    mode: BandMode,
    engine: &EngineConfig,
) -> Result<Option<Decoded>> {
    let resolution = match resolve(detections, engine) {
        Ok(resolution) => {
            print_resolution(&resolution);
            if resolution.sequence.len() > mode.band_count() {
                println!(
                    "  ⚠ {}本検出されましたが{}として確認します",
                    resolution.sequence.len(),
                    mode
                );
            }
            Some(resolution)
        }
        Err(e) => {
            println!("  自動読み取り失敗 ({}): {}", e.stage(), e);
            None
        }
    };

    let mut slots = initial_slots(resolution.as_ref(), mode);
    println!("---");

    for (position, slot) in slots.iter_mut().enumerate() {
        let Some(role) = BandRole::for_position(mode, position) else {
            continue;
        };

        let choices = choices_for(role);
        let selected = Select::new()
            .with_prompt(format!("[{}/{}] {}", position + 1, mode.band_count(), role))
            .items(&choices)
            .default(default_choice(role, *slot))
            .interact()
            .map_err(|e| OhmReaderError::CliExecution(e.to_string()))?;

        *slot = choice_to_color(role, selected);
    }

    println!("---");
    match decode_with_correction(&slots, mode) {
        Ok(decoded) => {
            println!("✔ {}", decoded.result.formatted);
            if decoded.reversed {
                println!("  (逆方向で読み直しました)");
            }
            Ok(Some(decoded))
        }
        Err(e) => {
            println!("✗ 解読できません ({}): {}", e.stage(), e);
            Ok(None)
        }
    }
}
