#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to create record directory: {0}")]
    RecordDirCreation(std::io::Error),
    #[error(
        "create failed and cleanup also failed (path: {path}): create={create_error}; cleanup={cleanup_error}",
        path = path.display()
    )]
    CleanupAfterCreateFailed {
        path: std::path::PathBuf,
        #[source]
        create_error: Box<IntakeError>,
        cleanup_error: std::io::Error,
    },
    #[error("failed to write record file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to read record file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to serialize YAML: {0}")]
    YamlSerialization(serde_yaml::Error),
    #[error("failed to deserialize YAML: {0}")]
    YamlDeserialization(serde_yaml::Error),
    #[error(
        "record store unavailable (path: {path}): {source}",
        path = path.display()
    )]
    StoreUnavailable {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("doctor not found: {0}")]
    DoctorNotFound(String),
}

pub type IntakeResult<T> = std::result::Result<T, IntakeError>;

/// Errors raised while building an alternate knowledge base.
///
/// The built-in table never produces these; they guard tables supplied from YAML or assembled
/// with [`KnowledgeBaseBuilder`](crate::knowledge::KnowledgeBaseBuilder).
#[derive(Debug, thiserror::Error)]
pub enum KnowledgeError {
    #[error("duplicate condition: {0}")]
    DuplicateCondition(String),
    #[error("duplicate symptom phrase: {0}")]
    DuplicateSymptom(String),
    #[error("condition name cannot be empty")]
    EmptyCondition,
    #[error("symptom phrase cannot be empty")]
    EmptySymptom,
    #[error("invalid knowledge base YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),
}

pub type KnowledgeResult<T> = std::result::Result<T, KnowledgeError>;
