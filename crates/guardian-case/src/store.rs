// store.rs — CaseStore: persistence for generated care-cases.
//
// Each care-case is stored as a JSON file: `<dir>/carecase.<signal_id>.json`.
// The location is derived from the triggering signal, so re-running intake
// on the same signal lands on the same path — the store is naturally
// content-addressed and never produces duplicate records for one signal.
//
// Writes go through a temp file in the same directory followed by a rename,
// so a reader never observes a partially written record.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::CaseError;
use crate::model::CareCase;

/// Persistent store for care-case records.
pub struct CaseStore {
    dir: PathBuf,
}

impl CaseStore {
    /// Create a store backed by the given directory.
    /// Creates the directory if it doesn't exist.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, CaseError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|source| CaseError::IoError {
            path: dir.display().to_string(),
            source,
        })?;
        Ok(Self { dir })
    }

    /// Persist a care-case and return its record location.
    ///
    /// The store does not special-case an existing record: the same signal
    /// always maps to the same path, and whoever needs "already handled"
    /// semantics (the proposal controller) checks external state instead.
    pub fn persist(&self, case: &CareCase) -> Result<PathBuf, CaseError> {
        let path = self.record_path(case)?;

        let mut json = serde_json::to_string_pretty(case)?;
        json.push('\n');

        let tmp = NamedTempFile::new_in(&self.dir).map_err(|source| CaseError::IoError {
            path: self.dir.display().to_string(),
            source,
        })?;
        fs::write(tmp.path(), json).map_err(|source| CaseError::IoError {
            path: tmp.path().display().to_string(),
            source,
        })?;
        tmp.persist(&path).map_err(|e| CaseError::IoError {
            path: path.display().to_string(),
            source: e.error,
        })?;

        Ok(path)
    }

    /// List all persisted care-cases as `(location, case)` pairs, sorted
    /// lexicographically by location so enumeration order is stable.
    ///
    /// Files without a `.json` extension are ignored; a `.json` file that
    /// does not parse as a care-case is an error — only this pipeline
    /// writes here, so garbage indicates corruption.
    pub fn list(&self) -> Result<Vec<(PathBuf, CareCase)>, CaseError> {
        let entries = fs::read_dir(&self.dir).map_err(|source| CaseError::IoError {
            path: self.dir.display().to_string(),
            source,
        })?;

        let mut records = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| CaseError::IoError {
                path: self.dir.display().to_string(),
                source,
            })?;
            let path = entry.path();
            if !path.extension().is_some_and(|ext| ext == "json") {
                continue;
            }

            let json = fs::read_to_string(&path).map_err(|source| CaseError::IoError {
                path: path.display().to_string(),
                source,
            })?;
            let case: CareCase =
                serde_json::from_str(&json).map_err(|e| CaseError::CorruptRecord {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?;
            records.push((path, case));
        }

        records.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(records)
    }

    /// Record location for a care-case, derived from its first signal
    /// back-reference.
    fn record_path(&self, case: &CareCase) -> Result<PathBuf, CaseError> {
        let signal_id = case
            .signals
            .first()
            .map(|s| s.signal_id.as_str())
            .ok_or(CaseError::MissingSignalRef(case.id))?;
        Ok(self.dir.join(format!("carecase.{signal_id}.json")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Severity, Signal, SystemRef};
    use crate::synthesize::synthesize;
    use tempfile::tempdir;

    fn make_case(signal_id: &str, tension: f64) -> CareCase {
        synthesize(&Signal {
            id: signal_id.to_string(),
            system: SystemRef {
                name: "shop-frontend".to_string(),
                env: "prod".to_string(),
                version: "2.4.1".to_string(),
            },
            kind: "web-perf".to_string(),
            severity: Severity::Warn,
            tension,
            summary: "slow LCP".to_string(),
            trace_ref: None,
        })
    }

    #[test]
    fn persist_and_list_round_trip() {
        let dir = tempdir().unwrap();
        let store = CaseStore::new(dir.path().join("generated")).unwrap();

        let case = make_case("s1", 0.2);
        let path = store.persist(&case).unwrap();
        assert!(path.ends_with("carecase.s1.json"));

        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].0, path);
        assert_eq!(listed[0].1.id, case.id);
    }

    #[test]
    fn same_signal_lands_on_same_path() {
        let dir = tempdir().unwrap();
        let store = CaseStore::new(dir.path()).unwrap();

        let first = store.persist(&make_case("s1", 0.2)).unwrap();
        let second = store.persist(&make_case("s1", 0.2)).unwrap();
        assert_eq!(first, second);
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn list_is_sorted_by_location() {
        let dir = tempdir().unwrap();
        let store = CaseStore::new(dir.path()).unwrap();

        store.persist(&make_case("zeta", 0.2)).unwrap();
        store.persist(&make_case("alpha", 0.5)).unwrap();
        store.persist(&make_case("mid", 0.9)).unwrap();

        let names: Vec<String> = store
            .list()
            .unwrap()
            .iter()
            .map(|(p, _)| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "carecase.alpha.json",
                "carecase.mid.json",
                "carecase.zeta.json"
            ]
        );
    }

    #[test]
    fn non_json_files_are_ignored() {
        let dir = tempdir().unwrap();
        let store = CaseStore::new(dir.path()).unwrap();

        fs::write(dir.path().join("README.md"), "notes\n").unwrap();
        store.persist(&make_case("s1", 0.2)).unwrap();

        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn corrupt_record_is_an_error() {
        let dir = tempdir().unwrap();
        let store = CaseStore::new(dir.path()).unwrap();

        fs::write(dir.path().join("carecase.bad.json"), "{ not json").unwrap();

        assert!(matches!(
            store.list(),
            Err(CaseError::CorruptRecord { .. })
        ));
    }

    #[test]
    fn records_end_with_newline() {
        let dir = tempdir().unwrap();
        let store = CaseStore::new(dir.path()).unwrap();

        let path = store.persist(&make_case("s1", 0.2)).unwrap();
        let content = fs::read_to_string(path).unwrap();
        assert!(content.ends_with('\n'));
    }

    #[test]
    fn case_without_signals_is_rejected() {
        let dir = tempdir().unwrap();
        let store = CaseStore::new(dir.path()).unwrap();

        let mut case = make_case("s1", 0.2);
        case.signals.clear();

        assert!(matches!(
            store.persist(&case),
            Err(CaseError::MissingSignalRef(_))
        ));
    }
}
