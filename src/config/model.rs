// src/config/model.rs

use serde::Deserialize;

use crate::supervise::Limits;
use std::time::Duration;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [tool]
/// bin = "gemini"
/// args = ["-p", "...", "-m", "gemini-2.5-flash", "-y"]
///
/// [limits]
/// budget_ms = 40000
/// grace_ms = 200
/// supersede_wait_ms = 1500
/// ```
///
/// `[limits]` is optional and defaults to the values above.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    /// The external tool from `[tool]`.
    pub tool: ToolSection,

    /// Supervision timing from `[limits]`.
    #[serde(default)]
    pub limits: LimitsSection,
}

/// `[tool]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolSection {
    /// Binary name searched on PATH, or a path used as given.
    pub bin: String,

    /// Arguments passed verbatim, argv style; no shell is involved.
    #[serde(default)]
    pub args: Vec<String>,
}

/// `[limits]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsSection {
    /// Watchdog budget, measured from host start.
    #[serde(default = "default_budget_ms")]
    pub budget_ms: u64,

    /// Grace window before a kill escalates to forceful.
    #[serde(default = "default_grace_ms")]
    pub grace_ms: u64,

    /// Bounded wait for a superseded run to terminate.
    #[serde(default = "default_supersede_wait_ms")]
    pub supersede_wait_ms: u64,
}

fn default_budget_ms() -> u64 {
    40_000
}

fn default_grace_ms() -> u64 {
    200
}

fn default_supersede_wait_ms() -> u64 {
    1_500
}

impl Default for LimitsSection {
    fn default() -> Self {
        Self {
            budget_ms: default_budget_ms(),
            grace_ms: default_grace_ms(),
            supersede_wait_ms: default_supersede_wait_ms(),
        }
    }
}

impl LimitsSection {
    /// Convert into the supervision layer's [`Limits`].
    pub fn to_limits(&self) -> Limits {
        Limits {
            budget: Duration::from_millis(self.budget_ms),
            grace: Duration::from_millis(self.grace_ms),
            supersede_wait: Duration::from_millis(self.supersede_wait_ms),
        }
    }
}
