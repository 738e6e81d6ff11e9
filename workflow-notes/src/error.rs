use thiserror::Error;

/// Failures reported by a document store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Note already exists: {0}")]
    AlreadyExists(String),
    #[error("Note not found: {0}")]
    NotFound(String),
    #[error("Path {0} is not a folder")]
    NotAFolder(String),
    #[error("Path {0} is not a file")]
    NotAFile(String),
    #[error("Parent folder of {0} does not exist")]
    MissingParent(String),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum WorkflowError {
    /// Rejected user input; the message is already localized
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Settings error: {0}")]
    Settings(String),
}

pub type WorkflowResult<T> = std::result::Result<T, WorkflowError>;
