use crate::error::{OhmReaderError, Result};
use ohm_reader_common::{BandMode, ClassMap, EngineConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub engine: EngineConfig,
    pub default_band_mode: u8,
    /// クラスID→色の対応表（JSON）。未指定なら学習時の既定値
    pub class_map: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            default_band_mode: 4,
            class_map: None,
        }
    }
}

/// 1回の実行だけに効く上書き値
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub confidence: Option<f64>,
    pub near_gap: Option<f64>,
    pub far_gap: Option<f64>,
    pub class_map: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| OhmReaderError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("ohm-reader").join("config.json"))
    }

    pub fn validate(&self) -> Result<()> {
        self.engine.validate()?;
        BandMode::try_from(self.default_band_mode)?;
        Ok(())
    }

    /// 上書き値を適用したエンジン設定
    pub fn engine_with(&self, overrides: &Overrides) -> Result<EngineConfig> {
        let engine = EngineConfig {
            confidence_threshold: overrides
                .confidence
                .unwrap_or(self.engine.confidence_threshold),
            near_gap_ratio: overrides.near_gap.unwrap_or(self.engine.near_gap_ratio),
            far_gap_ratio: overrides.far_gap.unwrap_or(self.engine.far_gap_ratio),
        };
        engine.validate()?;
        Ok(engine)
    }

    /// 上書き値 → 設定ファイル → 既定値の順でクラス対応表を決める
    pub fn class_map_with(&self, overrides: &Overrides) -> Result<ClassMap> {
        match overrides.class_map.as_ref().or(self.class_map.as_ref()) {
            Some(path) => {
                if !path.exists() {
                    return Err(OhmReaderError::FileNotFound(path.display().to_string()));
                }
                Ok(ClassMap::from_file(path)?)
            }
            None => Ok(ClassMap::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.default_band_mode, 4);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let mut config = Config::default();
        config.engine.confidence_threshold = 0.6;
        config.default_band_mode = 5;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"defaultBandMode": 5}"#).unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.default_band_mode, 5);
        assert_eq!(config.engine, EngineConfig::default());
    }

    #[test]
    fn test_invalid_mode_rejected() {
        let config = Config {
            default_band_mode: 3,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides_applied_and_validated() {
        let config = Config::default();
        let engine = config
            .engine_with(&Overrides {
                confidence: Some(0.7),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(engine.confidence_threshold, 0.7);
        assert_eq!(engine.far_gap_ratio, 2.0);

        let err = config.engine_with(&Overrides {
            near_gap: Some(3.0),
            ..Default::default()
        });
        assert!(err.is_err());
    }

    #[test]
    fn test_class_map_loaded_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("classes.json");
        std::fs::write(&path, r#"{"0": "brown", "1": "gold"}"#).unwrap();
        let config = Config {
            class_map: Some(path),
            ..Default::default()
        };
        let map = config.class_map_with(&Overrides::default()).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.color_of(1).unwrap(), ohm_reader_common::ColorLabel::Gold);
    }

    #[test]
    fn test_class_map_override_missing_file() {
        let config = Config::default();
        let err = config
            .class_map_with(&Overrides {
                class_map: Some(PathBuf::from("/nonexistent/map.json")),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, OhmReaderError::FileNotFound(_)));
    }
}
