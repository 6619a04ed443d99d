//! Output directories and on-disk artifacts of a run

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;

use crate::pmf::PmfHistory;
use crate::walk::{walk_times, WalkParams};
use crate::DemoError;

/// One row of the random walk CSV
#[derive(Debug, Clone, Serialize)]
pub struct WalkRecord {
    pub step: usize,
    pub t: f64,
    pub value: f64,
}

/// Create `<base>/<UTC timestamp>`, adding a counter suffix if it already exists
pub fn create_timestamped_output_dir(base: &Path) -> Result<PathBuf, DemoError> {
    fs::create_dir_all(base)?;

    let timestamp = Utc::now().format("%Y%m%d-%H%M%S").to_string();
    let mut output_dir = base.join(&timestamp);
    let mut counter = 1_u32;

    while output_dir.exists() {
        output_dir = base.join(format!("{timestamp}-{counter:02}"));
        counter += 1;
    }

    fs::create_dir_all(&output_dir)?;
    Ok(output_dir)
}

pub fn write_walk_csv(path: &Path, params: &WalkParams, walk: &[f64]) -> Result<(), DemoError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    for (step, (t, &value)) in walk_times(params).into_iter().zip(walk).enumerate() {
        writer.serialize(WalkRecord { step, t, value })?;
    }

    writer.flush()?;
    Ok(())
}

pub fn write_history_json(path: &Path, history: &PmfHistory) -> Result<(), DemoError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let data = serde_json::to_string_pretty(history)?;
    fs::write(path, data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pmf::Pmf;

    #[test]
    fn test_timestamped_dirs_are_unique() {
        let base = tempfile::tempdir().unwrap();
        let first = create_timestamped_output_dir(base.path()).unwrap();
        let second = create_timestamped_output_dir(base.path()).unwrap();
        assert!(first.is_dir());
        assert!(second.is_dir());
        assert_ne!(first, second);
    }

    #[test]
    fn test_walk_csv_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("walk.csv");
        let params = WalkParams::new(1.0, 1.0, 0.25);
        write_walk_csv(&path, &params, &[0.5, 0.25, -1.0, 0.0]).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), vec!["step", "t", "value"]);
        let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
        assert_eq!(rows.len(), 4);
        assert_eq!(&rows[2][0], "2");
        assert_eq!(&rows[2][1], "0.75");
        assert_eq!(&rows[2][2], "-1.0");
    }

    #[test]
    fn test_history_json_is_nested_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("history.json");
        let mut history = PmfHistory::new(Pmf::new(vec![0.5, 0.5]).unwrap());
        history.advance();
        write_history_json(&path, &history).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let parsed: Vec<Vec<f64>> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, vec![vec![0.5, 0.5], vec![0.25, 0.5, 0.25]]);
    }
}
