//! Command implementations and the argument parsers they share.

pub mod catalog;
pub mod commission;
pub mod delivery;
pub mod price;
pub mod quote;

use std::path::Path;

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use wyshkit_core::Money;
use wyshkit_db::{Database, DbConfig};

use crate::config::QuoteConfig;
use crate::error::{CliError, CliResult};

/// Opens the catalog named by the config.
pub async fn open_database(config: &QuoteConfig) -> CliResult<Database> {
    if let Some(parent) = config.database_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|source| CliError::ReadFile {
                path: parent.display().to_string(),
                source,
            })?;
        }
    }
    Ok(Database::new(DbConfig::new(&config.database_path)).await?)
}

/// Reads a JSON file into `T`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> CliResult<T> {
    debug!(path = %path.display(), "Reading JSON input");
    let contents = std::fs::read_to_string(path).map_err(|source| CliError::ReadFile {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_str(&contents)?)
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Parses a rupee amount such as `2499`, `2499.5` or `₹2499.50` into paise.
pub fn parse_rupees(input: &str) -> Result<Money, String> {
    let trimmed = input.trim().trim_start_matches('₹');
    let (whole, frac) = match trimmed.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (trimmed, ""),
    };

    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("'{input}' is not a rupee amount"));
    }
    if frac.len() > 2 || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("'{input}' has more than two decimal places"));
    }

    let rupees: i64 = whole.parse().map_err(|_| format!("'{input}' is too large"))?;
    let paise = match frac.len() {
        0 => 0,
        1 => frac.parse::<i64>().map_err(|e| e.to_string())? * 10,
        _ => frac.parse::<i64>().map_err(|e| e.to_string())?,
    };

    rupees
        .checked_mul(100)
        .and_then(|p| p.checked_add(paise))
        .map(Money::from_paise)
        .ok_or_else(|| format!("'{input}' is too large"))
}

/// Parses a local order time, `YYYY-MM-DDTHH:MM` or `YYYY-MM-DD HH:MM`.
pub fn parse_local_time(input: &str) -> Result<NaiveDateTime, String> {
    ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input.trim(), format).ok())
        .ok_or_else(|| format!("'{input}' is not a time like 2024-05-13T19:30"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rupees() {
        assert_eq!(parse_rupees("2499").unwrap(), Money::from_paise(249900));
        assert_eq!(parse_rupees("2499.5").unwrap(), Money::from_paise(249950));
        assert_eq!(parse_rupees("₹0.05").unwrap(), Money::from_paise(5));
        assert_eq!(parse_rupees(" 10.00 ").unwrap(), Money::from_paise(1000));

        assert!(parse_rupees("").is_err());
        assert!(parse_rupees("-5").is_err());
        assert!(parse_rupees("1.234").is_err());
        assert!(parse_rupees("2,499").is_err());
        assert!(parse_rupees("99999999999999999999").is_err());
    }

    #[test]
    fn test_parse_local_time() {
        let at = parse_local_time("2024-05-13T19:30").unwrap();
        assert_eq!(at.to_string(), "2024-05-13 19:30:00");
        assert!(parse_local_time("2024-05-13 19:30").is_ok());
        assert!(parse_local_time("yesterday").is_err());
    }

    #[test]
    fn test_read_json_reports_path() {
        let err = read_json::<Vec<u32>>(Path::new("/nonexistent/tiers.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/tiers.json"));
    }
}
