//! Run configuration, read from the environment

use std::env;

pub const URL_BASE_DIR_VAR: &str = "URL_BASE_DIR";
pub const DRY_RUN_VAR: &str = "DRY_RUN";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Prepended to every rewritten font URL, for stylesheets served from somewhere other than
    /// the parent of the font directories.
    pub url_base_dir: String,
    /// Rewrite the stylesheet without downloading any fonts.
    pub dry_run: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any variable source; unset variables take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            url_base_dir: lookup(URL_BASE_DIR_VAR).unwrap_or_default(),
            dry_run: lookup(DRY_RUN_VAR).map_or(false, |value| parse_truthy(&value)),
        }
    }
}

/// `true` and `t` in any case; everything else is false.
pub fn parse_truthy(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("t")
}
