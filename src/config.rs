use std::env;
use std::str::FromStr;

use crate::errors::AppError;

pub const DEFAULT_NUMBER_PREFIX: &str = "INV-";
pub const DEFAULT_NUMBER_START: u64 = 2023001;
pub const DEFAULT_PAGE_LIMIT_MAX: i64 = 100;

/// Settings for the invoice repository, read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Prefix of numbers assigned to invoices submitted without one.
    pub number_prefix: String,
    /// First sequence value used for assigned numbers.
    pub number_start: u64,
    /// Upper bound for the page size accepted by `list`.
    pub page_limit_max: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            number_prefix: DEFAULT_NUMBER_PREFIX.to_string(),
            number_start: DEFAULT_NUMBER_START,
            page_limit_max: DEFAULT_PAGE_LIMIT_MAX,
        }
    }
}

impl Config {
    /// Reads `INVOICE_NUMBER_PREFIX`, `INVOICE_NUMBER_START` and
    /// `INVOICE_PAGE_LIMIT_MAX`, falling back to the defaults for unset
    /// variables. Call `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = Self::default();
        let page_limit_max = parse_var(&lookup, "INVOICE_PAGE_LIMIT_MAX", defaults.page_limit_max)?;
        if page_limit_max < 1 {
            return Err(AppError::Config(format!(
                "INVOICE_PAGE_LIMIT_MAX must be at least 1, got {}",
                page_limit_max
            )));
        }

        Ok(Self {
            number_prefix: lookup("INVOICE_NUMBER_PREFIX").unwrap_or(defaults.number_prefix),
            number_start: parse_var(&lookup, "INVOICE_NUMBER_START", defaults.number_start)?,
            page_limit_max,
        })
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{} must be a valid number ('{}'): {}", key, raw, e))),
    }
}
