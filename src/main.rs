use clap::Parser;
use ohm_reader::{batch, cli, config, confirm, error, export, scanner, sequence};
use cli::{Cli, Commands};
use config::{Config, Overrides};
use error::Result;
use ohm_reader_common::{decode_with_correction, BandMode, BandRole};
use std::time::Instant;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    // --reset は壊れた設定ファイルからも復旧できるよう読み込まない
    let config = match cli.command {
        Commands::Config { reset: true, .. } => Config::default(),
        _ => Config::load()?,
    };

    match cli.command {
        Commands::Read { path, mode, format, output, confidence, near_gap, far_gap, class_map } => {
            println!("🔍 ohm-reader - 一括読み取り\n");
            let started = Instant::now();

            let overrides = Overrides { confidence, near_gap, far_gap, class_map };
            let engine = config.engine_with(&overrides)?;
            let class_map = config.class_map_with(&overrides)?;
            if let Some(m) = mode {
                BandMode::try_from(m)?;
            }

            // 1. 入力スキャン
            println!("[1/3] 入力をスキャン中...");
            let inputs = scanner::scan_inputs(&path)?;
            if inputs.is_empty() {
                return Err(error::OhmReaderError::NoInputFound(path.display().to_string()));
            }
            println!("✔ {}件の部品を検出\n", inputs.len());

            if cli.verbose {
                println!(
                    "  信頼度閾値: {} / 重複比: {} / 外れ値比: {}",
                    engine.confidence_threshold, engine.near_gap_ratio, engine.far_gap_ratio
                );
            }

            // 2. 読み取り
            println!("[2/3] 色環を読み取り中...");
            let options = batch::BatchOptions {
                mode,
                default_mode: config.default_band_mode,
                engine,
                class_map,
            };
            let outcomes = batch::read_batch(&inputs, &options, true);
            let summary = batch::BatchSummary::from_outcomes(&outcomes);
            println!("✔ 読み取り完了\n");

            // 3. 出力
            println!("[3/3] 結果を保存中...");
            let output_target = output.unwrap_or_else(|| {
                if path.is_dir() {
                    path.clone()
                } else {
                    path.parent()
                        .map(|p| p.to_path_buf())
                        .unwrap_or_else(|| std::path::PathBuf::from("."))
                }
            });
            export::export_outcomes(&outcomes, &summary, format, &output_target)?;

            println!("\n========================================");
            println!("  部品数:   {}", summary.total);
            println!("  読み取り: {}", summary.decoded);
            println!("  失敗:     {}", summary.failed);
            println!("  要確認:   {}", summary.needs_review);
            println!("  処理時間: {:.2}s", started.elapsed().as_secs_f64());

            let failures: Vec<_> = outcomes.iter().filter(|o| !o.is_decoded()).collect();
            if !failures.is_empty() {
                println!("\n失敗:");
                for outcome in failures {
                    println!("  {}: {}", outcome.file_name, outcome.record.resistance);
                }
            }

            println!("\n✅ 完了");
        }

        Commands::Decode { colors, mode } => {
            let mode = BandMode::try_from(mode.unwrap_or(config.default_band_mode))?;
            let slots = sequence::parse_sequence(&colors)?;

            let shown: Vec<String> = slots
                .iter()
                .map(|s| s.map(|c| c.name().to_string()).unwrap_or_else(|| "?".to_string()))
                .collect();
            println!("{} ({})", shown.join(" "), mode);

            match decode_with_correction(&slots, mode) {
                Ok(decoded) => {
                    println!("✔ {}", decoded.result.formatted);
                    if decoded.reversed {
                        println!("  (逆方向で読み直しました)");
                    }
                }
                Err(e) => {
                    println!("✗ 解読できません");
                    println!("  段階: {}", e.stage());
                    if let Some(position) = e.position() {
                        if let Some(role) = BandRole::for_position(mode, position) {
                            println!("  位置: {} ({})", position + 1, role);
                        }
                    }
                    println!("  理由: {}", e);
                }
            }
        }

        Commands::Confirm { input, mode } => {
            println!("🎨 ohm-reader - 色環確認\n");

            if !input.is_file() {
                return Err(error::OhmReaderError::FileNotFound(input.display().to_string()));
            }
            let class_map = config.class_map_with(&Overrides::default())?;
            let inputs = scanner::scan_inputs(&input)?;
            let Some(info) = inputs.first() else {
                return Err(error::OhmReaderError::NoInputFound(input.display().to_string()));
            };
            let file = scanner::load_component(info, &class_map)?;

            let mode = BandMode::try_from(
                mode.or(file.band_mode).unwrap_or(config.default_band_mode),
            )?;
            println!("{} ({}件の検出, {})", info.file_name, file.detections.len(), mode);

            confirm::run_interactive_confirm(&file.detections, mode, &config.engine)?;
        }

        Commands::Config { show, confidence, near_gap, far_gap, mode, reset } => {
            let mut config = config;
            let changed = reset
                || confidence.is_some()
                || near_gap.is_some()
                || far_gap.is_some()
                || mode.is_some();

            if let Some(v) = confidence {
                config.engine.confidence_threshold = v;
            }
            if let Some(v) = near_gap {
                config.engine.near_gap_ratio = v;
            }
            if let Some(v) = far_gap {
                config.engine.far_gap_ratio = v;
            }
            if let Some(m) = mode {
                config.default_band_mode = m;
            }

            if changed {
                config.save()?;
                println!("✔ 設定を保存しました: {}", Config::config_path()?.display());
            }

            if show || !changed {
                println!("設定:");
                println!("  信頼度閾値: {}", config.engine.confidence_threshold);
                println!("  重複比:     {}", config.engine.near_gap_ratio);
                println!("  外れ値比:   {}", config.engine.far_gap_ratio);
                println!("  色環本数:   {}", config.default_band_mode);
                println!(
                    "  クラス対応: {}",
                    config
                        .class_map
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "既定".to_string())
                );
            }
        }
    }

    Ok(())
}
