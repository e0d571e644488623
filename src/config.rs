use serde::{Deserialize, Serialize};

use crate::excel::ClockZone;

/// Settings for the ingestion pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Extensions offered for selection, without the leading dot
    pub accepted_extensions: Vec<String>,
    pub clock_zone: ClockZone,
    /// When false the hash field is always empty
    pub hash_contents: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            accepted_extensions: vec!["xlsx".to_string(), "xls".to_string()],
            clock_zone: ClockZone::Local,
            hash_contents: true,
        }
    }
}

impl IngestConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Whether a file with this extension (no leading dot) passes the filter
    pub fn accepts_extension(&self, extension: &str) -> bool {
        self.accepted_extensions
            .iter()
            .any(|accepted| accepted.trim_start_matches('.').eq_ignore_ascii_case(extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = IngestConfig::default();
        assert_eq!(config.accepted_extensions, vec!["xlsx", "xls"]);
        assert_eq!(config.clock_zone, ClockZone::Local);
        assert!(config.hash_contents);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = IngestConfig::from_json(r#"{ "clock_zone": "utc" }"#).unwrap();
        assert_eq!(config.clock_zone, ClockZone::Utc);
        assert_eq!(config.accepted_extensions, vec!["xlsx", "xls"]);
        assert!(config.hash_contents);

        assert!(IngestConfig::from_json(r#"{ "clock_zone": "mars" }"#).is_err());
    }

    #[test]
    fn test_extension_filter() {
        let config = IngestConfig::default();
        assert!(config.accepts_extension("xlsx"));
        assert!(config.accepts_extension("XLS"));
        assert!(!config.accepts_extension("csv"));
        assert!(!config.accepts_extension(""));

        let config = IngestConfig {
            accepted_extensions: vec![".ods".to_string()],
            ..IngestConfig::default()
        };
        assert!(config.accepts_extension("ods"));
        assert!(!config.accepts_extension("xlsx"));
    }
}
