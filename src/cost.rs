use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::util::non_empty_env;

const APP_DIR: &str = "cfor";
const COST_FILE: &str = "cost.json";

/// Accumulated spend per calendar day.
pub type Costs = BTreeMap<NaiveDate, f64>;

#[derive(Debug, Error)]
#[error("cost file not found at {}", path.display())]
pub struct CostFileNotFound {
    pub path: PathBuf,
}

/// JSON file mapping `YYYY-MM-DD` to the dollars spent that day.
#[derive(Debug, Clone)]
pub struct CostLedger {
    path: PathBuf,
}

impl CostLedger {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$XDG_DATA_HOME/cfor/cost.json`, else the platform data directory.
    pub fn default_location() -> Result<Self> {
        let base = non_empty_env("XDG_DATA_HOME")
            .map(PathBuf::from)
            .or_else(dirs::data_dir)
            .context("could not determine the user data directory")?;
        Ok(Self::at(base.join(APP_DIR).join(COST_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record_cost(&self, date: NaiveDate, amount: f64) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let mut costs = self.load_for_update();
        *costs.entry(date).or_insert(0.0) += amount;

        let data = serde_json::to_string_pretty(&costs).context("failed to serialize costs")?;
        fs::write(&self.path, data)
            .with_context(|| format!("failed to write cost file {}", self.path.display()))?;
        tracing::debug!(%date, amount, path = %self.path.display(), "cost recorded");
        Ok(())
    }

    pub fn read_costs(&self) -> Result<Costs> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                return Err(CostFileNotFound {
                    path: self.path.clone(),
                }
                .into());
            }
            Err(error) => {
                return Err(error)
                    .with_context(|| format!("failed to read cost file {}", self.path.display()));
            }
        };

        serde_json::from_str(&data)
            .with_context(|| format!("failed to parse cost file {}", self.path.display()))
    }

    // An unreadable or corrupt ledger restarts from empty rather than
    // blocking the record.
    fn load_for_update(&self) -> Costs {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) if !data.trim().is_empty() => data,
            _ => return Costs::new(),
        };
        serde_json::from_str(&data).unwrap_or_else(|error| {
            tracing::warn!(%error, path = %self.path.display(), "discarding unparsable cost file");
            Costs::new()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).expect("valid date")
    }

    #[test]
    fn test_record_accumulates_per_day() {
        let temp = TempDir::new().expect("temp dir");
        let ledger = CostLedger::at(temp.path().join("nested").join("cost.json"));

        ledger.record_cost(day(15), 0.25).expect("record");
        ledger.record_cost(day(15), 0.5).expect("record");
        ledger.record_cost(day(16), 1.0).expect("record");

        let costs = ledger.read_costs().expect("read");
        assert_eq!(costs.len(), 2);
        assert_eq!(costs[&day(15)], 0.75);
        assert_eq!(costs[&day(16)], 1.0);
    }

    #[test]
    fn test_file_uses_iso_date_keys() {
        let temp = TempDir::new().expect("temp dir");
        let ledger = CostLedger::at(temp.path().join("cost.json"));

        ledger.record_cost(day(5), 0.125).expect("record");

        let raw = fs::read_to_string(ledger.path()).expect("raw file");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("json");
        assert_eq!(value["2026-10-05"], serde_json::json!(0.125));
    }

    #[test]
    fn test_missing_file_is_distinguishable() {
        let temp = TempDir::new().expect("temp dir");
        let ledger = CostLedger::at(temp.path().join("absent.json"));

        let err = ledger.read_costs().expect_err("no file yet");
        assert!(err.downcast_ref::<CostFileNotFound>().is_some());
    }

    #[test]
    fn test_corrupt_file_fails_read_but_not_record() {
        let temp = TempDir::new().expect("temp dir");
        let ledger = CostLedger::at(temp.path().join("cost.json"));
        fs::write(ledger.path(), "{not json").expect("seed");

        let err = ledger.read_costs().expect_err("corrupt file");
        assert!(err.downcast_ref::<CostFileNotFound>().is_none());

        ledger.record_cost(day(1), 0.5).expect("record over corrupt file");
        assert_eq!(ledger.read_costs().expect("read")[&day(1)], 0.5);
    }

    #[test]
    fn test_default_location_honours_xdg_data_home() {
        let _env_lock = crate::test_support::ENV_LOCK.blocking_lock();
        let temp = TempDir::new().expect("temp dir");
        std::env::set_var("XDG_DATA_HOME", temp.path());

        let ledger = CostLedger::default_location().expect("location");
        assert_eq!(ledger.path(), temp.path().join("cfor").join("cost.json"));
        std::env::remove_var("XDG_DATA_HOME");
    }
}
