pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("Invalid dataset: {0}")]
    Seed(#[from] serde_json::Error),

    #[error("Dataset IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Duplicate record id in dataset: {0}")]
    DuplicateId(String),
}
