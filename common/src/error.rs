//! エラー型定義
//!
//! 各エラーは失敗したステージ（[`Stage`]）と、該当する場合は
//! 色環の位置（0始まり）を保持する。

use crate::color::ColorLabel;
use crate::decoder::BandRole;
use thiserror::Error;

/// パイプラインのステージ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// 入力の読み込み（分類器出力のパース）
    Input,
    /// DetectionFilter
    Filter,
    /// OrientationResolver
    Orient,
    /// SequenceOrderer
    Order,
    /// BandDecoder
    Decode,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Input => write!(f, "input"),
            Stage::Filter => write!(f, "filter"),
            Stage::Orient => write!(f, "orient"),
            Stage::Order => write!(f, "order"),
            Stage::Decode => write!(f, "decode"),
        }
    }
}

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("no detections supplied")]
    NoDetections,

    #[error("all {total} detections were filtered out")]
    AllFiltered { total: usize },

    #[error("band {} ({role}): {color} is not a valid {role} color", .position + 1)]
    UnknownColor {
        position: usize,
        role: BandRole,
        color: ColorLabel,
    },

    #[error("band {} ({role}) is not set", .position + 1)]
    IncompleteBands { position: usize, role: BandRole },

    #[error("expected {expected} bands, found {found}")]
    BandCountMismatch { expected: usize, found: usize },

    #[error("invalid band count mode: {0} (use 4 or 5)")]
    InvalidMode(u8),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// エラーが発生したステージ
    pub fn stage(&self) -> Stage {
        match self {
            Error::NoDetections | Error::AllFiltered { .. } => Stage::Filter,
            Error::UnknownColor { .. }
            | Error::IncompleteBands { .. }
            | Error::BandCountMismatch { .. }
            | Error::InvalidMode(_) => Stage::Decode,
            Error::Io(_) | Error::Json(_) | Error::Parse(_) | Error::Config(_) => Stage::Input,
        }
    }

    /// 問題のある色環の位置（該当する場合）
    pub fn position(&self) -> Option<usize> {
        match self {
            Error::UnknownColor { position, .. } | Error::IncompleteBands { position, .. } => {
                Some(*position)
            }
            _ => None,
        }
    }
}

/// 処理を止めない警告
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Warning {
    /// 最大間隔が列の内側にあり、1回の回転で並べ替えた
    ///
    /// `comparable_gaps` は最大間隔の9割以上ある他の間隔の数。
    /// どちらの場合も手動確認の対象とする。
    #[serde(rename_all = "camelCase")]
    IrregularLayout {
        gap_index: usize,
        comparable_gaps: usize,
    },
}

impl Warning {
    pub fn stage(&self) -> Stage {
        match self {
            Warning::IrregularLayout { .. } => Stage::Order,
        }
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::IrregularLayout {
                gap_index,
                comparable_gaps,
            } => {
                write!(f, "irregular layout: largest gap after band {}", gap_index + 1)?;
                if *comparable_gaps > 0 {
                    write!(f, " ({} comparable gaps)", comparable_gaps)?;
                }
                Ok(())
            }
        }
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_incomplete_is_one_based() {
        let error = Error::IncompleteBands {
            position: 2,
            role: BandRole::Multiplier,
        };
        assert_eq!(format!("{}", error), "band 3 (multiplier) is not set");
    }

    #[test]
    fn test_error_display_unknown_color() {
        let error = Error::UnknownColor {
            position: 0,
            role: BandRole::Digit1,
            color: ColorLabel::Gold,
        };
        let display = format!("{}", error);
        assert!(display.contains("band 1"));
        assert!(display.contains("gold"));
    }

    #[test]
    fn test_error_stage() {
        assert_eq!(Error::NoDetections.stage(), Stage::Filter);
        assert_eq!(Error::AllFiltered { total: 3 }.stage(), Stage::Filter);
        assert_eq!(Error::InvalidMode(6).stage(), Stage::Decode);
        assert_eq!(Error::Parse("x".into()).stage(), Stage::Input);
    }

    #[test]
    fn test_error_position() {
        let error = Error::IncompleteBands {
            position: 3,
            role: BandRole::Tolerance,
        };
        assert_eq!(error.position(), Some(3));
        assert_eq!(Error::NoDetections.position(), None);
    }

    #[test]
    fn test_warning_display() {
        let warning = Warning::IrregularLayout {
            gap_index: 1,
            comparable_gaps: 0,
        };
        assert_eq!(format!("{}", warning), "irregular layout: largest gap after band 2");
        assert_eq!(warning.stage(), Stage::Order);
    }

    #[test]
    fn test_error_from_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let error: Error = io_error.into();
        assert!(matches!(error, Error::Io(_)));
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Json(_)));
    }

    #[test]
    fn test_error_display_config() {
        let error = Error::Config("nearGapRatio must be below farGapRatio".to_string());
        assert_eq!(
            format!("{}", error),
            "Config error: nearGapRatio must be below farGapRatio"
        );
    }
}
