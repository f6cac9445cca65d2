//! Configuration access port trait.

use crate::domain::error::BandtraderError;
use chrono::NaiveDate;

/// Read-only access to sectioned key/value configuration.
///
/// Numeric getters return `default` only when the key is absent. A present
/// value that does not parse is `ConfigInvalid`.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> Result<i64, BandtraderError>;
    fn get_double(&self, section: &str, key: &str, default: f64)
    -> Result<f64, BandtraderError>;

    /// Required `YYYY-MM-DD` date.
    fn get_date(&self, section: &str, key: &str) -> Result<NaiveDate, BandtraderError> {
        let raw = self
            .get_string(section, key)
            .ok_or_else(|| BandtraderError::ConfigMissing {
                section: section.to_string(),
                key: key.to_string(),
            })?;
        NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
            BandtraderError::ConfigInvalid {
                section: section.to_string(),
                key: key.to_string(),
                reason: format!("invalid {key} format, expected YYYY-MM-DD"),
            }
        })
    }
}
