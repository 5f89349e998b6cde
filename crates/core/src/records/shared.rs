//! Storage primitives shared by the record stores.
//!
//! Every record is one YAML file inside its own sharded directory:
//!
//! ```text
//! <base_dir>/<s1>/<s2>/<uuid>/<filename>
//! ```
//!
//! Records are written once. Listing walks the three shard levels and parses each file.

use crate::error::{IntakeError, IntakeResult};
use intake_uuid::ShardableUuid;
use serde::{de::DeserializeOwned, Serialize};
use std::{
    fs,
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};

/// Allocates a fresh sharded directory under `base_dir`.
///
/// Retries up to 5 times if the candidate directory already exists.
///
/// # Errors
///
/// Returns [`IntakeError::RecordDirCreation`] if no directory could be created.
pub(crate) fn create_unique_record_dir(
    base_dir: &Path,
    mut uuid_source: impl FnMut() -> ShardableUuid,
) -> IntakeResult<(ShardableUuid, PathBuf)> {
    for _attempt in 0..5 {
        let uuid = uuid_source();
        let candidate = uuid.sharded_dir(base_dir);

        if candidate.exists() {
            continue;
        }

        if let Some(parent) = candidate.parent() {
            fs::create_dir_all(parent).map_err(IntakeError::StorageDirCreation)?;
        }

        match fs::create_dir(&candidate) {
            Ok(()) => return Ok((uuid, candidate)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(IntakeError::RecordDirCreation(e)),
        }
    }

    Err(IntakeError::RecordDirCreation(io::Error::new(
        ErrorKind::AlreadyExists,
        "failed to allocate a unique record directory after 5 attempts",
    )))
}

/// Creates a new record: allocates its directory, builds it from the new id, writes it.
///
/// If writing fails the partially-created directory is removed. When removal fails too,
/// [`IntakeError::CleanupAfterCreateFailed`] reports both errors.
pub(crate) fn create_record<T, F>(base_dir: &Path, filename: &str, build: F) -> IntakeResult<T>
where
    T: Serialize,
    F: FnOnce(ShardableUuid) -> T,
{
    let (uuid, record_dir) = create_unique_record_dir(base_dir, ShardableUuid::new)?;
    let record = build(uuid);

    let written = serde_yaml::to_string(&record)
        .map_err(IntakeError::YamlSerialization)
        .and_then(|yaml| {
            fs::write(record_dir.join(filename), yaml).map_err(IntakeError::FileWrite)
        });

    match written {
        Ok(()) => Ok(record),
        Err(create_error) => match fs::remove_dir_all(&record_dir) {
            Ok(()) => Err(create_error),
            Err(cleanup_error) => Err(IntakeError::CleanupAfterCreateFailed {
                path: record_dir,
                create_error: Box::new(create_error),
                cleanup_error,
            }),
        },
    }
}

/// Reads one record by id.
///
/// Returns `Ok(None)` if no record directory exists for `id`.
pub(crate) fn read_record<T: DeserializeOwned>(
    base_dir: &Path,
    filename: &str,
    id: &ShardableUuid,
) -> IntakeResult<Option<T>> {
    let path = id.sharded_dir(base_dir).join(filename);
    let contents = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(IntakeError::FileRead(e)),
    };
    serde_yaml::from_str(&contents)
        .map(Some)
        .map_err(IntakeError::YamlDeserialization)
}

/// Opens one level of the shard tree.
fn open_dir(path: &Path) -> IntakeResult<fs::ReadDir> {
    fs::read_dir(path).map_err(|source| IntakeError::StoreUnavailable {
        path: path.to_path_buf(),
        source,
    })
}

/// Returns the subdirectories of `dir`; stray files are ignored.
fn shard_dirs(dir: &Path) -> IntakeResult<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in open_dir(dir)? {
        let entry = entry.map_err(|source| IntakeError::StoreUnavailable {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    Ok(dirs)
}

/// Lists every record under `base_dir`.
///
/// A missing `base_dir` means nothing has been stored yet and yields an empty list. Failure to
/// open `base_dir` or any shard directory below it is [`IntakeError::StoreUnavailable`], so a
/// listing is never silently partial. Record files that cannot be read or parsed are logged and
/// skipped.
pub(crate) fn list_records<T: DeserializeOwned>(
    base_dir: &Path,
    filename: &str,
) -> IntakeResult<Vec<T>> {
    let mut records = Vec::new();

    let s1_dirs = match fs::metadata(base_dir) {
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(records),
        _ => shard_dirs(base_dir)?,
    };

    for s1_path in s1_dirs {
        for s2_path in shard_dirs(&s1_path)? {
            for record_dir in shard_dirs(&s2_path)? {
                let record_path = record_dir.join(filename);
                if !record_path.is_file() {
                    continue;
                }

                let contents = match fs::read_to_string(&record_path) {
                    Ok(contents) => contents,
                    Err(e) => {
                        tracing::warn!("failed to read {}: {}", record_path.display(), e);
                        continue;
                    }
                };

                match serde_yaml::from_str::<T>(&contents) {
                    Ok(record) => records.push(record),
                    Err(e) => {
                        tracing::warn!("failed to parse {}: {}", record_path.display(), e);
                    }
                }
            }
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: ShardableUuid,
        text: String,
    }

    #[test]
    fn test_create_unique_record_dir_retries_on_collision() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let taken = ShardableUuid::new();
        fs::create_dir_all(taken.sharded_dir(temp_dir.path())).unwrap();

        let fresh = ShardableUuid::new();
        let mut sequence = vec![fresh.clone(), taken.clone()];
        let (uuid, dir) =
            create_unique_record_dir(temp_dir.path(), || sequence.pop().unwrap()).unwrap();

        assert_eq!(uuid, fresh);
        assert!(dir.is_dir());
    }

    #[test]
    fn test_create_unique_record_dir_gives_up_after_five_attempts() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let taken = ShardableUuid::new();
        fs::create_dir_all(taken.sharded_dir(temp_dir.path())).unwrap();

        let err = create_unique_record_dir(temp_dir.path(), || taken.clone())
            .expect_err("should give up");
        assert!(matches!(err, IntakeError::RecordDirCreation(_)));
    }

    #[test]
    fn test_create_then_read_record() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        let note: Note = create_record(temp_dir.path(), "note.yaml", |id| Note {
            id,
            text: "hello".into(),
        })
        .unwrap();

        let read: Option<Note> = read_record(temp_dir.path(), "note.yaml", &note.id).unwrap();
        assert_eq!(read, Some(note));
    }

    #[test]
    fn test_read_record_missing_is_none() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let read: Option<Note> =
            read_record(temp_dir.path(), "note.yaml", &ShardableUuid::new()).unwrap();
        assert!(read.is_none());
    }

    #[test]
    fn test_list_records_missing_base_dir_is_empty() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let notes: Vec<Note> =
            list_records(&temp_dir.path().join("nothing-here"), "note.yaml").unwrap();
        assert!(notes.is_empty());
    }

    #[test]
    fn test_list_records_base_dir_is_a_file_is_unavailable() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let base = temp_dir.path().join("notes");
        fs::write(&base, "not a directory").unwrap();

        let err = list_records::<Note>(&base, "note.yaml").expect_err("should be unavailable");
        assert!(matches!(err, IntakeError::StoreUnavailable { .. }));
    }

    #[test]
    fn test_open_dir_failure_is_unavailable() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let not_a_dir = temp_dir.path().join("ab");
        fs::write(&not_a_dir, "stray").unwrap();

        let err = open_dir(&not_a_dir).expect_err("a file cannot be listed");
        assert!(matches!(err, IntakeError::StoreUnavailable { path, .. } if path == not_a_dir));
    }

    #[test]
    fn test_list_records_ignores_stray_files_between_shards() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        create_record(temp_dir.path(), "note.yaml", |id| Note {
            id,
            text: "kept".into(),
        })
        .unwrap();
        fs::write(temp_dir.path().join("README"), "not a shard").unwrap();

        let notes: Vec<Note> = list_records(temp_dir.path(), "note.yaml").unwrap();
        assert_eq!(notes.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_list_records_unreadable_shard_is_unavailable() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let note: Note = create_record(temp_dir.path(), "note.yaml", |id| Note {
            id,
            text: "hidden".into(),
        })
        .unwrap();
        let s1 = note
            .id
            .sharded_dir(temp_dir.path())
            .parent()
            .and_then(Path::parent)
            .unwrap()
            .to_path_buf();
        fs::set_permissions(&s1, fs::Permissions::from_mode(0o000)).unwrap();

        // permission bits do not restrict a privileged user
        if fs::read_dir(&s1).is_ok() {
            fs::set_permissions(&s1, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result = list_records::<Note>(temp_dir.path(), "note.yaml");
        fs::set_permissions(&s1, fs::Permissions::from_mode(0o755)).unwrap();

        let err = result.expect_err("an unreadable shard must fail the listing");
        assert!(matches!(err, IntakeError::StoreUnavailable { path, .. } if path == s1));
    }

    #[test]
    fn test_list_records_skips_unparseable_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        create_record(temp_dir.path(), "note.yaml", |id| Note {
            id,
            text: "valid".into(),
        })
        .unwrap();

        let broken_dir = ShardableUuid::new().sharded_dir(temp_dir.path());
        fs::create_dir_all(&broken_dir).unwrap();
        fs::write(broken_dir.join("note.yaml"), "invalid: yaml: content: [[[").unwrap();

        let notes: Vec<Note> = list_records(temp_dir.path(), "note.yaml").unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].text, "valid");
    }
}
