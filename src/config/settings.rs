//! User settings for costshare
//!
//! Manages display preferences and the defaults new drafts start with.

use serde::{Deserialize, Serialize};

use super::paths::CostsharePaths;
use crate::allocation::RoundingPolicy;
use crate::error::CostshareError;
use crate::models::MAX_PERIOD_DAYS;
use crate::wizard::DraftOptions;

/// User settings for costshare
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Vacancy policy for new drafts
    #[serde(default = "default_vacancy_costs_to_landlord")]
    pub vacancy_costs_to_landlord: bool,

    #[serde(default)]
    pub rounding: RoundingPolicy,

    /// Longest accepted billing period, in days between start and end
    #[serde(default = "default_max_period_days")]
    pub max_period_days: i64,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "€".to_string()
}

fn default_date_format() -> String {
    "%d.%m.%Y".to_string()
}

fn default_vacancy_costs_to_landlord() -> bool {
    true
}

fn default_max_period_days() -> i64 {
    MAX_PERIOD_DAYS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            vacancy_costs_to_landlord: default_vacancy_costs_to_landlord(),
            rounding: RoundingPolicy::default(),
            max_period_days: default_max_period_days(),
        }
    }
}

impl Settings {
    /// Options a freshly created draft gets
    pub fn draft_options(&self) -> DraftOptions {
        DraftOptions {
            rounding: self.rounding,
            max_period_days: self.max_period_days,
            default_vacancy_costs_to_landlord: self.vacancy_costs_to_landlord,
        }
    }

    /// Load settings from disk, or defaults if the file doesn't exist
    pub fn load_or_create(paths: &CostsharePaths) -> Result<Self, CostshareError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Don't save yet - let caller decide when to persist
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| CostshareError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
            CostshareError::Config(format!("Failed to parse settings file: {}", e))
        })?;

        if settings.max_period_days < 1 {
            return Err(CostshareError::Config(format!(
                "max_period_days must be positive, got {}",
                settings.max_period_days
            )));
        }

        Ok(settings)
    }

    pub fn save(&self, paths: &CostsharePaths) -> Result<(), CostshareError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| CostshareError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| CostshareError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.currency_symbol, "€");
        assert!(settings.vacancy_costs_to_landlord);
        assert_eq!(settings.rounding, RoundingPolicy::PerUnit);
        assert_eq!(settings.max_period_days, 366);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = CostsharePaths::with_base_dir(temp_dir.path().to_path_buf());

        let settings = Settings {
            rounding: RoundingPolicy::LargestRemainder,
            vacancy_costs_to_landlord: false,
            ..Settings::default()
        };
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded, settings);
        assert!(paths.is_initialized());
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"currency_symbol": "EUR"}"#).unwrap();
        assert_eq!(settings.currency_symbol, "EUR");
        assert_eq!(settings.max_period_days, 366);
        assert!(settings.vacancy_costs_to_landlord);
    }

    #[test]
    fn test_draft_options() {
        let settings = Settings {
            vacancy_costs_to_landlord: false,
            max_period_days: 400,
            ..Settings::default()
        };
        let options = settings.draft_options();

        assert!(!options.default_vacancy_costs_to_landlord);
        assert_eq!(options.max_period_days, 400);
    }

    #[test]
    fn test_rejects_non_positive_period_limit() {
        let temp_dir = TempDir::new().unwrap();
        let paths = CostsharePaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"max_period_days": 0}"#).unwrap();

        assert!(Settings::load_or_create(&paths).is_err());
    }
}
