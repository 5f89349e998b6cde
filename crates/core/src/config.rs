//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services. Core
//! code never reads environment variables while handling a request; binaries read them and hand
//! the raw values to the `*_from_env_value` helpers below.

use crate::constants::{APPOINTMENTS_DIR_NAME, DEFAULT_DATA_DIR, DOCTORS_DIR_NAME, PATIENTS_DIR_NAME};
use crate::matcher::MatchMode;
use crate::{IntakeError, IntakeResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
    match_mode: MatchMode,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::InvalidInput`] if `data_dir` is empty.
    pub fn new(data_dir: PathBuf, match_mode: MatchMode) -> IntakeResult<Self> {
        if data_dir.as_os_str().is_empty() {
            return Err(IntakeError::InvalidInput("data_dir cannot be empty".into()));
        }

        Ok(Self {
            data_dir,
            match_mode,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn patients_dir(&self) -> PathBuf {
        self.data_dir.join(PATIENTS_DIR_NAME)
    }

    pub fn doctors_dir(&self) -> PathBuf {
        self.data_dir.join(DOCTORS_DIR_NAME)
    }

    pub fn appointments_dir(&self) -> PathBuf {
        self.data_dir.join(APPOINTMENTS_DIR_NAME)
    }

    pub fn match_mode(&self) -> MatchMode {
        self.match_mode
    }
}

/// Resolve the record store root from an optional raw value.
///
/// `None` or whitespace falls back to [`DEFAULT_DATA_DIR`].
pub fn data_dir_from_env_value(value: Option<String>) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

/// Parse the match mode from an optional raw value.
///
/// If `value` is `None` or empty/whitespace, returns [`MatchMode::Substring`].
///
/// # Errors
///
/// Returns [`IntakeError::InvalidInput`] for an unrecognised mode name.
pub fn match_mode_from_env_value(value: Option<String>) -> IntakeResult<MatchMode> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    let parsed = value.map(|v| v.parse::<MatchMode>()).transpose()?;

    Ok(parsed.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_empty_data_dir() {
        let err = CoreConfig::new(PathBuf::new(), MatchMode::Substring)
            .expect_err("empty data dir should be rejected");
        assert!(matches!(err, IntakeError::InvalidInput(msg) if msg.contains("data_dir")));
    }

    #[test]
    fn test_record_dirs_are_under_data_dir() {
        let cfg = CoreConfig::new(PathBuf::from("/srv/intake"), MatchMode::Substring).unwrap();

        assert_eq!(cfg.patients_dir(), PathBuf::from("/srv/intake/patients"));
        assert_eq!(cfg.doctors_dir(), PathBuf::from("/srv/intake/doctors"));
        assert_eq!(
            cfg.appointments_dir(),
            PathBuf::from("/srv/intake/appointments")
        );
    }

    #[test]
    fn test_data_dir_from_env_value_defaults() {
        assert_eq!(data_dir_from_env_value(None), PathBuf::from(DEFAULT_DATA_DIR));
        assert_eq!(
            data_dir_from_env_value(Some("   ".into())),
            PathBuf::from(DEFAULT_DATA_DIR)
        );
        assert_eq!(
            data_dir_from_env_value(Some(" /data ".into())),
            PathBuf::from("/data")
        );
    }

    #[test]
    fn test_match_mode_from_env_value() {
        assert_eq!(match_mode_from_env_value(None).unwrap(), MatchMode::Substring);
        assert_eq!(
            match_mode_from_env_value(Some("".into())).unwrap(),
            MatchMode::Substring
        );
        assert_eq!(
            match_mode_from_env_value(Some(" word ".into())).unwrap(),
            MatchMode::WordBoundary
        );
        assert!(match_mode_from_env_value(Some("regex".into())).is_err());
    }
}
