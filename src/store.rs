//! Check-in, experiment and consent persistence
//!
//! The analytics never touch storage; callers load a history through a
//! [`Repository`], run the models, and write back what changed.

use crate::error::ComputeError;
use crate::types::{CheckIn, Experiment};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

const CHECK_INS_FILE: &str = "checkins.json";
const EXPERIMENTS_FILE: &str = "experiments.json";
const CONSENT_FILE: &str = "consent";

/// Storage for the user's records
pub trait Repository {
    /// All check-ins in insertion order
    fn check_ins(&self) -> Result<Vec<CheckIn>, ComputeError>;

    fn append_check_in(&mut self, check_in: CheckIn) -> Result<(), ComputeError>;

    fn experiments(&self) -> Result<Vec<Experiment>, ComputeError>;

    /// Replace the stored experiment records
    fn save_experiments(&mut self, experiments: &[Experiment]) -> Result<(), ComputeError>;

    fn consent(&self) -> Result<bool, ComputeError>;

    fn set_consent(&mut self, granted: bool) -> Result<(), ComputeError>;

    /// Remove every stored record
    fn clear(&mut self) -> Result<(), ComputeError>;
}

/// In-process repository
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    check_ins: Vec<CheckIn>,
    experiments: Vec<Experiment>,
    consent: bool,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_check_ins(check_ins: Vec<CheckIn>) -> Self {
        Self {
            check_ins,
            ..Self::default()
        }
    }
}

impl Repository for MemoryRepository {
    fn check_ins(&self) -> Result<Vec<CheckIn>, ComputeError> {
        Ok(self.check_ins.clone())
    }

    fn append_check_in(&mut self, check_in: CheckIn) -> Result<(), ComputeError> {
        self.check_ins.push(check_in);
        Ok(())
    }

    fn experiments(&self) -> Result<Vec<Experiment>, ComputeError> {
        Ok(self.experiments.clone())
    }

    fn save_experiments(&mut self, experiments: &[Experiment]) -> Result<(), ComputeError> {
        self.experiments = experiments.to_vec();
        Ok(())
    }

    fn consent(&self) -> Result<bool, ComputeError> {
        Ok(self.consent)
    }

    fn set_consent(&mut self, granted: bool) -> Result<(), ComputeError> {
        self.consent = granted;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), ComputeError> {
        *self = Self::default();
        Ok(())
    }
}

/// Repository backed by JSON files in a directory.
///
/// Layout: `checkins.json` and `experiments.json` hold JSON arrays;
/// `consent` holds `true` or `false`. Missing files read as empty, and
/// malformed files read as empty with a warning. Writes refuse to replace a
/// malformed file.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    dir: PathBuf,
}

impl JsonFileRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    /// Strict read: a file that fails to parse is an error
    fn load_list<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>, ComputeError> {
        let path = self.path(file);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&path)?;
        serde_json::from_str(&content)
            .map_err(|e| ComputeError::ParseError(format!("{}: {}", path.display(), e)))
    }

    fn read_list<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>, ComputeError> {
        match self.load_list(file) {
            Err(ComputeError::ParseError(msg)) => {
                tracing::warn!("Ignoring malformed records at {}", msg);
                Ok(Vec::new())
            }
            other => other,
        }
    }

    /// Writes never replace a file that fails to parse
    fn write_list<T: Serialize>(&self, file: &str, items: &[T]) -> Result<(), ComputeError> {
        self.load_list::<serde_json::Value>(file)?;

        std::fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(items)?;
        std::fs::write(self.path(file), json)?;
        Ok(())
    }
}

impl Repository for JsonFileRepository {
    fn check_ins(&self) -> Result<Vec<CheckIn>, ComputeError> {
        self.read_list(CHECK_INS_FILE)
    }

    fn append_check_in(&mut self, check_in: CheckIn) -> Result<(), ComputeError> {
        let mut check_ins = self.check_ins()?;
        check_ins.push(check_in);
        self.write_list(CHECK_INS_FILE, &check_ins)
    }

    fn experiments(&self) -> Result<Vec<Experiment>, ComputeError> {
        self.read_list(EXPERIMENTS_FILE)
    }

    fn save_experiments(&mut self, experiments: &[Experiment]) -> Result<(), ComputeError> {
        self.write_list(EXPERIMENTS_FILE, experiments)
    }

    fn consent(&self) -> Result<bool, ComputeError> {
        let path = self.path(CONSENT_FILE);
        if !path.exists() {
            return Ok(false);
        }
        let content = std::fs::read_to_string(&path)?;
        match content.trim() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => {
                tracing::warn!("Ignoring malformed consent flag at {:?}: {:?}", path, other);
                Ok(false)
            }
        }
    }

    fn set_consent(&mut self, granted: bool) -> Result<(), ComputeError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path(CONSENT_FILE), granted.to_string())?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), ComputeError> {
        for file in [CHECK_INS_FILE, EXPERIMENTS_FILE, CONSENT_FILE] {
            let path = self.path(file);
            if path.exists() {
                std::fs::remove_file(&path)?;
            }
        }
        tracing::info!("Cleared stored records in {:?}", self.dir);
        Ok(())
    }
}
