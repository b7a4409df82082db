//! # Config - shell defaults from the environment
//!
//! ```text
//! KEYSORT_DIRECTION  default direction        (default: "asc")
//! KEYSORT_MISSING    default missing policy   (default: "last")
//! KEYSORT_TRANSFORM  default named transform  (default: "identity")
//! KEYSORT_PRETTY     pretty-print JSON output (default: "false")
//! ```
//!
//! Unset variables fall back to their defaults. Set but invalid variables are
//! rejected so a typo fails at startup instead of silently sorting wrong.

use std::str::FromStr;

use keysort::{Direction, MissingPolicy, NamedTransform, SortError};
use thiserror::Error;

pub const ENV_DIRECTION: &str = "KEYSORT_DIRECTION";
pub const ENV_MISSING: &str = "KEYSORT_MISSING";
pub const ENV_TRANSFORM: &str = "KEYSORT_TRANSFORM";
pub const ENV_PRETTY: &str = "KEYSORT_PRETTY";

/// Errors raised while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A sort option variable held an unrecognised value.
    #[error("{var}: {source}")]
    Invalid {
        var: &'static str,
        #[source]
        source: SortError,
    },

    #[error("{var}: expected \"true\" or \"false\", got {value:?}")]
    InvalidBool { var: &'static str, value: String },
}

/// Defaults applied to every `SORT` in the shell unless overridden inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShellConfig {
    pub direction: Direction,
    pub missing: MissingPolicy,
    pub transform: NamedTransform,
    pub pretty: bool,
}

impl ShellConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Reads the configuration through `lookup`, which returns the value of a
    /// variable or `None` when it is unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            direction: parse_var(&lookup, ENV_DIRECTION, defaults.direction)?,
            missing: parse_var(&lookup, ENV_MISSING, defaults.missing)?,
            transform: parse_var(&lookup, ENV_TRANSFORM, defaults.transform)?,
            pretty: parse_bool(&lookup, ENV_PRETTY, defaults.pretty)?,
        })
    }
}

fn parse_var<T, F>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr<Err = SortError>,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map_err(|source| ConfigError::Invalid { var, source }),
        _ => Ok(default),
    }
}

fn parse_bool<F>(lookup: &F, var: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(var) else {
        return Ok(default);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "" => Ok(default),
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool { var, value }),
    }
}
