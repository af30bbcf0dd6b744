//! Tunables for summaries and statements.
//!
//! Values come from, in increasing priority: built-in defaults, an optional
//! TOML file, and `NJANGI__*` environment variables (for example
//! `NJANGI__STATEMENT__HISTORY_LIMIT=50`).
//!
//! `eligibility_factor` is best written as a quoted decimal
//! (`eligibility_factor = "1.1"`). Bare TOML numbers are accepted and read
//! back through their shortest decimal form, so `1.1` stays exactly 1.1.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use config::{Config, Environment, File};
use serde::{Deserialize, Deserializer, Serialize};

use crate::types::NjangiResult;

/// Row limits applied while assembling a member statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatementSettings {
    /// Most recent repayments listed per loan
    pub repayments_per_loan: usize,
    /// Length of the merged contribution/repayment history
    pub history_limit: usize,
    /// Optional cap on entries taken from each membership's contributions
    /// and from each loan's repayments before merging
    pub history_per_source_limit: Option<usize>,
}

impl Default for StatementSettings {
    fn default() -> Self {
        Self {
            repayments_per_loan: 20,
            history_limit: 100,
            history_per_source_limit: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NjangiSettings {
    /// Multiple of savings offered as a loan suggestion
    #[serde(deserialize_with = "exact_decimal")]
    pub eligibility_factor: BigDecimal,
    /// Directive handed to the tracing filter
    pub log_filter: String,
    pub statement: StatementSettings,
}

impl Default for NjangiSettings {
    fn default() -> Self {
        Self {
            eligibility_factor: BigDecimal::from(15) / BigDecimal::from(10),
            log_filter: "njangi_core=info".to_string(),
            statement: StatementSettings::default(),
        }
    }
}

/// Decimal from a string, an integer or a float. Floats go through their
/// shortest round-trip text so no binary noise reaches money arithmetic.
fn exact_decimal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigDecimal, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    let text = match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Integer(value) => return Ok(BigDecimal::from(value)),
        Raw::Float(value) => value.to_string(),
    };
    BigDecimal::from_str(text.trim()).map_err(serde::de::Error::custom)
}

impl NjangiSettings {
    /// Load settings, layering `path` (if given and present) and the
    /// environment over the defaults
    pub fn load(path: Option<&str>) -> NjangiResult<Self> {
        Self::load_with_prefix(path, "NJANGI")
    }

    fn load_with_prefix(path: Option<&str>, prefix: &str) -> NjangiResult<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path).required(false));
        }
        let settings = builder
            .add_source(Environment::with_prefix(prefix).separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_toml(contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("njangi-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let settings = NjangiSettings::default();
        assert_eq!(
            settings.eligibility_factor,
            BigDecimal::from_str("1.5").unwrap()
        );
        assert_eq!(settings.statement.repayments_per_loan, 20);
        assert_eq!(settings.statement.history_limit, 100);
        assert_eq!(settings.statement.history_per_source_limit, None);
    }

    #[test]
    fn test_load_from_toml_file() {
        let path = write_toml("eligibility_factor = \"2.25\"\n\n[statement]\nhistory_limit = 10\n");

        let settings = NjangiSettings::load(path.to_str()).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(
            settings.eligibility_factor,
            BigDecimal::from_str("2.25").unwrap()
        );
        assert_eq!(settings.statement.history_limit, 10);
        // untouched keys keep their defaults
        assert_eq!(settings.statement.repayments_per_loan, 20);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let settings = NjangiSettings::load(Some("/nonexistent/njangi-settings")).unwrap();
        assert_eq!(settings.statement.history_limit, 100);
    }

    #[test]
    fn test_bare_float_factor_is_exact() {
        let path = write_toml("eligibility_factor = 1.1\n");
        let settings = NjangiSettings::load(path.to_str()).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(settings.eligibility_factor.to_string(), "1.1");
    }

    #[test]
    fn test_integer_factor() {
        let path = write_toml("eligibility_factor = 2\n");
        let settings = NjangiSettings::load(path.to_str()).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(settings.eligibility_factor, BigDecimal::from(2));
    }

    #[test]
    fn test_environment_overrides_file() {
        let path = write_toml("eligibility_factor = \"2.25\"\n");
        std::env::set_var("NJANGIENVTEST__ELIGIBILITY_FACTOR", "1.75");
        std::env::set_var("NJANGIENVTEST__LOG_FILTER", "njangi_core=debug");

        let settings = NjangiSettings::load_with_prefix(path.to_str(), "NJANGIENVTEST").unwrap();
        std::env::remove_var("NJANGIENVTEST__ELIGIBILITY_FACTOR");
        std::env::remove_var("NJANGIENVTEST__LOG_FILTER");
        std::fs::remove_file(&path).unwrap();

        assert_eq!(
            settings.eligibility_factor,
            BigDecimal::from_str("1.75").unwrap()
        );
        assert_eq!(settings.log_filter, "njangi_core=debug");
    }
}
