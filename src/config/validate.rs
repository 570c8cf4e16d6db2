// src/config/validate.rs

use crate::config::model::ConfigFile;
use crate::errors::{CommitgenError, Result};

/// Semantic checks on a deserialized config.
pub fn validate(cfg: &ConfigFile) -> Result<()> {
    validate_tool(cfg)?;
    validate_limits(cfg)?;
    Ok(())
}

fn validate_tool(cfg: &ConfigFile) -> Result<()> {
    if cfg.tool.bin.trim().is_empty() {
        return Err(CommitgenError::ConfigError(
            "[tool].bin must be a non-empty binary name or path".to_string(),
        ));
    }
    Ok(())
}

fn validate_limits(cfg: &ConfigFile) -> Result<()> {
    if cfg.limits.budget_ms == 0 {
        return Err(CommitgenError::ConfigError(
            "[limits].budget_ms must be >= 1 (got 0)".to_string(),
        ));
    }
    if cfg.limits.grace_ms == 0 {
        return Err(CommitgenError::ConfigError(
            "[limits].grace_ms must be >= 1 (got 0)".to_string(),
        ));
    }
    if cfg.limits.supersede_wait_ms == 0 {
        return Err(CommitgenError::ConfigError(
            "[limits].supersede_wait_ms must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}
