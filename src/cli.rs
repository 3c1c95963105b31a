use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ohm-reader")]
#[command(about = "抵抗器の色環検出から抵抗値を読み取るツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 分類器出力（ファイルまたはフォルダ）を読み取って表を出力
    Read {
        /// 入力ファイルまたはフォルダ（フォルダは直下の .json/.txt）
        #[arg(required = true)]
        path: PathBuf,

        /// 色環の本数 (4/5)。省略時は設定値
        #[arg(short, long)]
        mode: Option<u8>,

        /// 出力形式 (csv/excel/json/all)
        #[arg(short, long, default_value = "csv")]
        format: OutputFormat,

        /// 出力ファイル/ディレクトリ（省略時は入力と同じ場所）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 信頼度の閾値
        #[arg(long)]
        confidence: Option<f64>,

        /// 重複判定の間隔比
        #[arg(long)]
        near_gap: Option<f64>,

        /// 外れ値判定の間隔比
        #[arg(long)]
        far_gap: Option<f64>,

        /// クラスID→色の対応表（JSON）
        #[arg(long)]
        class_map: Option<PathBuf>,
    },

    /// 手入力した色の並びを解読（例: brown black red gold / 棕,黑,红,金）
    Decode {
        /// 色の並び。`-` または `?` は未確定
        #[arg(required = true, num_args = 1..)]
        colors: Vec<String>,

        /// 色環の本数 (4/5)。省略時は設定値
        #[arg(short, long)]
        mode: Option<u8>,
    },

    /// 1部品の読み取り結果を対話的に確認・修正
    Confirm {
        /// 入力ファイル（.json/.txt）
        #[arg(required = true)]
        input: PathBuf,

        /// 色環の本数 (4/5)。省略時はファイルの指定または設定値
        #[arg(short, long)]
        mode: Option<u8>,
    },

    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 信頼度の閾値を設定
        #[arg(long)]
        confidence: Option<f64>,

        /// 重複判定の間隔比を設定
        #[arg(long)]
        near_gap: Option<f64>,

        /// 外れ値判定の間隔比を設定
        #[arg(long)]
        far_gap: Option<f64>,

        /// 既定の色環本数を設定 (4/5)
        #[arg(long)]
        mode: Option<u8>,

        /// 既定値に戻す
        #[arg(long)]
        reset: bool,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Csv,
    Excel,
    Json,
    All,
}

impl OutputFormat {
    pub fn includes_csv(&self) -> bool {
        matches!(self, OutputFormat::Csv | OutputFormat::All)
    }

    pub fn includes_excel(&self) -> bool {
        matches!(self, OutputFormat::Excel | OutputFormat::All)
    }

    pub fn includes_json(&self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::All)
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "excel" | "xlsx" => Ok(OutputFormat::Excel),
            "json" => Ok(OutputFormat::Json),
            "all" => Ok(OutputFormat::All),
            _ => Err(format!("Unknown format: {}. Use csv, excel, json, or all", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("CSV".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert_eq!("xlsx".parse::<OutputFormat>().unwrap(), OutputFormat::Excel);
        assert_eq!("all".parse::<OutputFormat>().unwrap(), OutputFormat::All);
        assert!("pdf".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_output_format_selection() {
        assert!(OutputFormat::All.includes_csv());
        assert!(OutputFormat::All.includes_excel());
        assert!(OutputFormat::All.includes_json());
        assert!(!OutputFormat::Csv.includes_excel());
    }

    #[test]
    fn test_parse_decode_arguments() {
        let cli = Cli::parse_from(["ohm-reader", "decode", "brown", "black", "red", "gold", "-m", "4"]);
        match cli.command {
            Commands::Decode { colors, mode } => {
                assert_eq!(colors.len(), 4);
                assert_eq!(mode, Some(4));
            }
            _ => panic!("expected decode"),
        }
    }
}
