//! 部品単位の一括読み取り
//!
//! 部品ごとにエンジンは独立しているため、rayonで並列に処理する。
//! 1部品の失敗はエラー行として残し、バッチは止めない。

use crate::scanner::{load_component, InputInfo};
use indicatif::{ProgressBar, ProgressStyle};
use ohm_reader_common::{read_resistor, BandReading, ClassMap, ComponentInfo, ComponentRecord, EngineConfig};
use rayon::prelude::*;
use serde::Serialize;

/// バッチ全体で共有する読み取り設定
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// コマンドラインで指定された本数（ファイルの指定より優先）
    pub mode: Option<u8>,
    /// どちらも指定がない場合の本数
    pub default_mode: u8,
    pub engine: EngineConfig,
    pub class_map: ClassMap,
}

/// 1部品分の結果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentOutcome {
    pub file_name: String,
    pub record: ComponentRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading: Option<BandReading>,
}

impl ComponentOutcome {
    pub fn is_decoded(&self) -> bool {
        self.record.decoded
    }
}

/// 集計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub total: usize,
    pub decoded: usize,
    pub failed: usize,
    pub needs_review: usize,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[ComponentOutcome]) -> Self {
        let decoded = outcomes.iter().filter(|o| o.is_decoded()).count();
        Self {
            total: outcomes.len(),
            decoded,
            failed: outcomes.len() - decoded,
            needs_review: outcomes.iter().filter(|o| o.record.needs_review).count(),
        }
    }
}

/// 1部品を読み取る
pub fn read_component(input: &InputInfo, options: &BatchOptions) -> ComponentOutcome {
    let id = input.stem();

    let file = match load_component(input, &options.class_map) {
        Ok(file) => file,
        Err(e) => {
            tracing::warn!(file = %input.file_name, error = %e, "failed to load component");
            return ComponentOutcome {
                file_name: input.file_name.clone(),
                record: ComponentRecord::failed(id, &ComponentInfo::default(), format!("error (input): {}", e)),
                reading: None,
            };
        }
    };

    let mode = options
        .mode
        .or(file.band_mode)
        .unwrap_or(options.default_mode);
    let outcome = read_resistor(&file.detections, mode, &options.engine);
    if let Err(e) = &outcome {
        tracing::debug!(file = %input.file_name, stage = %e.stage(), error = %e, "component not decoded");
    }

    let record = ComponentRecord::from_outcome(id, &file.component, &outcome);
    ComponentOutcome {
        file_name: input.file_name.clone(),
        record,
        reading: outcome.ok(),
    }
}

/// 全入力を並列に読み取る（結果は入力順）
pub fn read_batch(inputs: &[InputInfo], options: &BatchOptions, show_progress: bool) -> Vec<ComponentOutcome> {
    let progress = if show_progress {
        let bar = ProgressBar::new(inputs.len() as u64);
        if let Ok(style) = ProgressStyle::with_template("  {bar:40.cyan/blue} {pos}/{len} {msg}") {
            bar.set_style(style.progress_chars("##-"));
        }
        bar
    } else {
        ProgressBar::hidden()
    };

    let outcomes: Vec<ComponentOutcome> = inputs
        .par_iter()
        .map(|input| {
            let outcome = read_component(input, options);
            progress.inc(1);
            outcome
        })
        .collect();

    progress.finish_and_clear();
    outcomes
}
