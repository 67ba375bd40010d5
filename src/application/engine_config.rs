//! # Engine Configuration
//!
//! Tunables for the quotation engine. Loaded from the `engine` section of the
//! application settings, or built in code for tests.
//!
//! # Examples
//!
//! ```
//! use procurement_rfq::application::EngineConfig;
//!
//! let config = EngineConfig::default()
//!     .with_number_prefix("RFQ")
//!     .with_max_line_items(50);
//! assert_eq!(config.format_number(7), "RFQ-000007");
//! ```

use serde::{Deserialize, Serialize};

/// Default quotation number prefix.
pub const DEFAULT_NUMBER_PREFIX: &str = "QT";

/// Default maximum number of line items per quotation.
pub const DEFAULT_MAX_LINE_ITEMS: usize = 500;

/// Default maximum number of priced items per response.
pub const DEFAULT_MAX_RESPONSE_ITEMS: usize = 500;

/// Configuration for the quotation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Prefix of generated quotation numbers.
    pub quotation_number_prefix: String,
    /// Maximum number of line items a quotation may carry.
    pub max_line_items: usize,
    /// Maximum number of priced items in one response.
    pub max_response_items: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            quotation_number_prefix: DEFAULT_NUMBER_PREFIX.to_string(),
            max_line_items: DEFAULT_MAX_LINE_ITEMS,
            max_response_items: DEFAULT_MAX_RESPONSE_ITEMS,
        }
    }
}

impl EngineConfig {
    /// Sets the quotation number prefix.
    #[must_use]
    pub fn with_number_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.quotation_number_prefix = prefix.into();
        self
    }

    /// Sets the maximum number of line items.
    #[must_use]
    pub fn with_max_line_items(mut self, max: usize) -> Self {
        self.max_line_items = max;
        self
    }

    /// Sets the maximum number of items per response.
    #[must_use]
    pub fn with_max_response_items(mut self, max: usize) -> Self {
        self.max_response_items = max;
        self
    }

    /// Renders a sequence number as `{prefix}-{sequence:06}`.
    #[must_use]
    pub fn format_number(&self, sequence: u64) -> String {
        format!("{}-{:06}", self.quotation_number_prefix, sequence)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_numbers_are_zero_padded() {
        let config = EngineConfig::default();
        assert_eq!(config.format_number(1), "QT-000001");
        assert_eq!(config.format_number(1_234_567), "QT-1234567");
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"max_line_items": 3}"#).unwrap();
        assert_eq!(config.max_line_items, 3);
        assert_eq!(config.quotation_number_prefix, DEFAULT_NUMBER_PREFIX);
        assert_eq!(config.max_response_items, DEFAULT_MAX_RESPONSE_ITEMS);
    }
}
