//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (collector capacity > 0, known log level)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: PoolConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;
use crate::config::schema::PoolConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("idle.collector_capacity must be greater than 0")]
    ZeroCollectorCapacity,

    #[error("observability.log_level '{0}' is not one of trace, debug, info, warn, error")]
    UnknownLogLevel(String),
}

/// Check a parsed configuration.
pub fn validate_config(config: &PoolConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.idle.collector_capacity == 0 {
        errors.push(ValidationError::ZeroCollectorCapacity);
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(validate_config(&PoolConfig::default()), Ok(()));
    }

    #[test]
    fn collects_every_error() {
        let mut config = PoolConfig::default();
        config.idle.collector_capacity = 0;
        config.observability.log_level = "loud".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::ZeroCollectorCapacity,
                ValidationError::UnknownLogLevel("loud".into()),
            ]
        );
    }

    #[test]
    fn log_level_is_case_insensitive() {
        let mut config = PoolConfig::default();
        config.observability.log_level = "DEBUG".into();
        assert!(validate_config(&config).is_ok());
    }
}
