use crate::error::{BatcherError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for batch packing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackerConfig {
    /// Maximum summed token cost per batch (hard limit, except for a single
    /// record that alone exceeds it)
    pub capacity: usize,
}

impl Default for PackerConfig {
    fn default() -> Self {
        Self { capacity: 8000 }
    }
}

impl PackerConfig {
    /// Create config with an explicit capacity
    #[must_use]
    pub const fn with_capacity(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Create config sized for a small 4k-token context window
    pub fn for_small_context() -> Self {
        Self { capacity: 3000 }
    }

    /// Create config sized for a 32k-token context window
    pub fn for_large_context() -> Self {
        Self { capacity: 24_000 }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(BatcherError::invalid_config(
                "batch capacity must be > 0 tokens",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = PackerConfig::default();
        assert_eq!(config.capacity, 8000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_preset_configs_valid() {
        assert!(PackerConfig::for_small_context().validate().is_ok());
        assert!(PackerConfig::for_large_context().validate().is_ok());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = PackerConfig::with_capacity(0).validate().unwrap_err();
        assert!(matches!(err, BatcherError::InvalidConfig(_)));
    }

    #[test]
    fn test_config_deserializes_from_json() {
        let config: PackerConfig = serde_json::from_str(r#"{"capacity": 1200}"#).unwrap();
        assert_eq!(config, PackerConfig::with_capacity(1200));
    }
}
