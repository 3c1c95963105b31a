//! 色環列から抵抗値を求める（BandDecoder）
//!
//! 4本帯: 数字, 数字, 倍率, 許容差
//! 5本帯: 数字, 数字, 数字, 倍率, 許容差

use crate::color::ColorLabel;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// 数字帯の色（位置 = 数値）
pub const DIGIT_TABLE: [ColorLabel; 10] = [
    ColorLabel::Black,
    ColorLabel::Brown,
    ColorLabel::Red,
    ColorLabel::Orange,
    ColorLabel::Yellow,
    ColorLabel::Green,
    ColorLabel::Blue,
    ColorLabel::Violet,
    ColorLabel::Gray,
    ColorLabel::White,
];

/// 倍率帯の色
pub const MULTIPLIER_TABLE: [ColorLabel; 9] = [
    ColorLabel::Black,
    ColorLabel::Brown,
    ColorLabel::Red,
    ColorLabel::Orange,
    ColorLabel::Yellow,
    ColorLabel::Green,
    ColorLabel::Blue,
    ColorLabel::Gold,
    ColorLabel::Silver,
];

const MULTIPLIER_VALUES: [f64; 9] = [1.0, 10.0, 100.0, 1e3, 1e4, 1e5, 1e6, 0.1, 0.01];

/// 許容差帯の色
pub const TOLERANCE_TABLE: [ColorLabel; 5] = [
    ColorLabel::Brown,
    ColorLabel::Red,
    ColorLabel::Green,
    ColorLabel::Gold,
    ColorLabel::Silver,
];

const TOLERANCE_LABELS: [&str; 5] = ["±1%", "±2%", "±0.5%", "±5%", "±10%"];

/// 色環の本数モード（呼び出し側が指定する）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum BandMode {
    Four,
    Five,
}

impl BandMode {
    pub fn band_count(&self) -> usize {
        match self {
            BandMode::Four => 4,
            BandMode::Five => 5,
        }
    }

    pub fn roles(&self) -> &'static [BandRole] {
        match self {
            BandMode::Four => &[
                BandRole::Digit1,
                BandRole::Digit2,
                BandRole::Multiplier,
                BandRole::Tolerance,
            ],
            BandMode::Five => &[
                BandRole::Digit1,
                BandRole::Digit2,
                BandRole::Digit3,
                BandRole::Multiplier,
                BandRole::Tolerance,
            ],
        }
    }
}

impl TryFrom<u8> for BandMode {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            4 => Ok(BandMode::Four),
            5 => Ok(BandMode::Five),
            other => Err(Error::InvalidMode(other)),
        }
    }
}

impl From<BandMode> for u8 {
    fn from(mode: BandMode) -> Self {
        mode.band_count() as u8
    }
}

impl std::fmt::Display for BandMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-band", self.band_count())
    }
}

/// 位置によって決まる色環の役割
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BandRole {
    Digit1,
    Digit2,
    Digit3,
    Multiplier,
    Tolerance,
}

impl BandRole {
    /// モードと位置（0始まり）から役割を求める
    pub fn for_position(mode: BandMode, index: usize) -> Option<BandRole> {
        mode.roles().get(index).copied()
    }

    /// この役割で選べる色
    pub fn allowed_colors(&self) -> &'static [ColorLabel] {
        match self {
            BandRole::Digit1 | BandRole::Digit2 | BandRole::Digit3 => &DIGIT_TABLE,
            BandRole::Multiplier => &MULTIPLIER_TABLE,
            BandRole::Tolerance => &TOLERANCE_TABLE,
        }
    }

    fn table_index(&self, color: ColorLabel) -> Option<usize> {
        self.allowed_colors().iter().position(|&c| c == color)
    }
}

impl std::fmt::Display for BandRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BandRole::Digit1 => write!(f, "digit 1"),
            BandRole::Digit2 => write!(f, "digit 2"),
            BandRole::Digit3 => write!(f, "digit 3"),
            BandRole::Multiplier => write!(f, "multiplier"),
            BandRole::Tolerance => write!(f, "tolerance"),
        }
    }
}

/// 許容差帯にしか現れない色（金・銀など）
pub fn is_tolerance_only(color: ColorLabel) -> bool {
    TOLERANCE_TABLE.contains(&color) && !DIGIT_TABLE.contains(&color)
}

/// 抵抗値の解読結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResistanceResult {
    pub ohms: f64,
    pub tolerance_label: String,
    pub formatted: String,
}

/// 逆読み補正込みの解読結果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Decoded {
    pub result: ResistanceResult,
    /// 列を反転して読み直した場合 true
    pub reversed: bool,
}

/// 抵抗値の表示用文字列（単位付き、小数1桁）
pub fn format_ohms(ohms: f64) -> String {
    if ohms >= 1e6 {
        format!("{:.1}M", ohms / 1e6)
    } else if ohms >= 1e3 {
        format!("{:.1}K", ohms / 1e3)
    } else {
        format!("{:.1}", ohms)
    }
}

/// 位置ごとの色から抵抗値を解読する
///
/// `None` の位置は未設定（手動確認が終わっていない）として扱う。
///
/// # Errors
/// * `IncompleteBands` - 未設定の位置がある、または本数が足りない
/// * `UnknownColor` - 役割の表にない色
/// * `BandCountMismatch` - 本数が多すぎる
pub fn decode(slots: &[Option<ColorLabel>], mode: BandMode) -> Result<ResistanceResult> {
    let roles = mode.roles();
    if slots.len() > roles.len() {
        return Err(Error::BandCountMismatch {
            expected: roles.len(),
            found: slots.len(),
        });
    }

    let mut base: u64 = 0;
    let mut multiplier = 1.0;
    let mut tolerance = "";

    for (position, &role) in roles.iter().enumerate() {
        let color = slots
            .get(position)
            .copied()
            .flatten()
            .ok_or(Error::IncompleteBands { position, role })?;
        let index = role
            .table_index(color)
            .ok_or(Error::UnknownColor {
                position,
                role,
                color,
            })?;

        match role {
            BandRole::Digit1 | BandRole::Digit2 | BandRole::Digit3 => {
                base = base * 10 + index as u64;
            }
            BandRole::Multiplier => multiplier = MULTIPLIER_VALUES[index],
            BandRole::Tolerance => tolerance = TOLERANCE_LABELS[index],
        }
    }

    let ohms = base as f64 * multiplier;
    Ok(ResistanceResult {
        ohms,
        tolerance_label: tolerance.to_string(),
        formatted: format!("{}Ω {}", format_ohms(ohms), tolerance),
    })
}

/// 逆読み補正付きの解読
///
/// 先頭の色が許容差帯専用の色（金・銀）で解読に失敗した場合に限り、
/// 列を反転して1回だけ読み直す。読み直しも失敗した場合は元の読みのエラーを返す。
pub fn decode_with_correction(slots: &[Option<ColorLabel>], mode: BandMode) -> Result<Decoded> {
    let forward_err = match decode(slots, mode) {
        Ok(result) => {
            return Ok(Decoded {
                result,
                reversed: false,
            })
        }
        Err(e) => e,
    };

    let leading_tolerance_only = matches!(slots.first(), Some(Some(c)) if is_tolerance_only(*c));
    if !leading_tolerance_only {
        return Err(forward_err);
    }

    let reversed: Vec<Option<ColorLabel>> = slots.iter().rev().copied().collect();
    match decode(&reversed, mode) {
        Ok(result) => {
            tracing::debug!(formatted = %result.formatted, "decoded with reversed band order");
            Ok(Decoded {
                result,
                reversed: true,
            })
        }
        Err(retry_err) => {
            tracing::debug!(%retry_err, "reversed reading also failed");
            Err(forward_err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ColorLabel::*;

    fn slots(colors: &[ColorLabel]) -> Vec<Option<ColorLabel>> {
        colors.iter().map(|&c| Some(c)).collect()
    }

    #[test]
    fn test_canonical_four_band() {
        let result = decode(&slots(&[Brown, Black, Red, Gold]), BandMode::Four).unwrap();
        assert_eq!(result.ohms, 1000.0);
        assert_eq!(result.tolerance_label, "±5%");
        assert_eq!(result.formatted, "1.0KΩ ±5%");
    }

    #[test]
    fn test_reversed_read_corrected() {
        let decoded =
            decode_with_correction(&slots(&[Gold, Red, Black, Brown]), BandMode::Four).unwrap();
        assert!(decoded.reversed);
        assert_eq!(decoded.result.formatted, "1.0KΩ ±5%");
    }

    #[test]
    fn test_forward_read_not_reversed() {
        let decoded =
            decode_with_correction(&slots(&[Brown, Black, Red, Gold]), BandMode::Four).unwrap();
        assert!(!decoded.reversed);
    }

    #[test]
    fn test_five_band() {
        // 4 7 0 × 100 = 47kΩ ±1%
        let result =
            decode(&slots(&[Yellow, Violet, Black, Red, Brown]), BandMode::Five).unwrap();
        assert_eq!(result.ohms, 47000.0);
        assert_eq!(result.formatted, "47.0KΩ ±1%");
    }

    #[test]
    fn test_fractional_multiplier() {
        let result = decode(&slots(&[Yellow, Violet, Gold, Gold]), BandMode::Four).unwrap();
        assert!((result.ohms - 4.7).abs() < 1e-9);
        assert_eq!(result.formatted, "4.7Ω ±5%");
    }

    #[test]
    fn test_mega_ohm_formatting() {
        let result = decode(&slots(&[Brown, Black, Green, Silver]), BandMode::Four).unwrap();
        assert_eq!(result.ohms, 1_000_000.0);
        assert_eq!(result.formatted, "1.0MΩ ±10%");
    }

    #[test]
    fn test_format_ohms_boundaries() {
        assert_eq!(format_ohms(999.0), "999.0");
        assert_eq!(format_ohms(1000.0), "1.0K");
        assert_eq!(format_ohms(220_000.0), "220.0K");
        assert_eq!(format_ohms(4_700_000.0), "4.7M");
    }

    #[test]
    fn test_decode_is_idempotent() {
        let input = slots(&[Orange, Orange, Brown, Gold]);
        let first = decode(&input, BandMode::Four).unwrap();
        let second = decode(&input, BandMode::Four).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.ohms.to_bits(), second.ohms.to_bits());
    }

    #[test]
    fn test_unset_role_is_incomplete() {
        let input = vec![Some(Brown), Some(Black), None, Some(Gold)];
        let err = decode_with_correction(&input, BandMode::Four).unwrap_err();
        assert!(matches!(
            err,
            Error::IncompleteBands {
                position: 2,
                role: BandRole::Multiplier
            }
        ));
    }

    #[test]
    fn test_too_few_bands_is_incomplete() {
        let err = decode(&slots(&[Brown, Black, Red]), BandMode::Four).unwrap_err();
        assert!(matches!(
            err,
            Error::IncompleteBands {
                position: 3,
                role: BandRole::Tolerance
            }
        ));
    }

    #[test]
    fn test_too_many_bands() {
        let err = decode(&slots(&[Brown, Black, Black, Red, Gold]), BandMode::Four).unwrap_err();
        assert!(matches!(
            err,
            Error::BandCountMismatch {
                expected: 4,
                found: 5
            }
        ));
    }

    #[test]
    fn test_unknown_color_for_role() {
        // 白は倍率帯にない
        let err = decode(&slots(&[Brown, Black, White, Gold]), BandMode::Four).unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownColor {
                position: 2,
                role: BandRole::Multiplier,
                color: White
            }
        ));
    }

    #[test]
    fn test_retry_happens_once_and_surfaces_forward_error() {
        // 反転しても先頭が銀 → 読み直しも失敗、元のエラーを返す
        let err = decode_with_correction(&slots(&[Silver, Red, Black, Silver]), BandMode::Four)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownColor {
                position: 0,
                color: Silver,
                ..
            }
        ));
    }

    #[test]
    fn test_no_retry_without_leading_tolerance_color() {
        // 先頭が数字色なら反転しない
        let err = decode_with_correction(&slots(&[Brown, Black, White, Red]), BandMode::Four)
            .unwrap_err();
        assert!(matches!(err, Error::UnknownColor { position: 2, .. }));
    }

    #[test]
    fn test_band_mode_from_u8() {
        assert_eq!(BandMode::try_from(4).unwrap(), BandMode::Four);
        assert_eq!(BandMode::try_from(5).unwrap(), BandMode::Five);
        assert!(matches!(BandMode::try_from(6), Err(Error::InvalidMode(6))));
        assert!(matches!(BandMode::try_from(3), Err(Error::InvalidMode(3))));
    }

    #[test]
    fn test_roles_by_position() {
        assert_eq!(BandRole::for_position(BandMode::Four, 2), Some(BandRole::Multiplier));
        assert_eq!(BandRole::for_position(BandMode::Five, 2), Some(BandRole::Digit3));
        assert_eq!(BandRole::for_position(BandMode::Four, 4), None);
    }

    #[test]
    fn test_tolerance_only_colors() {
        assert!(is_tolerance_only(Gold));
        assert!(is_tolerance_only(Silver));
        assert!(!is_tolerance_only(Brown));
        assert!(!is_tolerance_only(White));
    }

    #[test]
    fn test_allowed_colors() {
        assert_eq!(BandRole::Digit1.allowed_colors().len(), 10);
        assert_eq!(BandRole::Multiplier.allowed_colors().len(), 9);
        assert_eq!(BandRole::Tolerance.allowed_colors().len(), 5);
    }
}
