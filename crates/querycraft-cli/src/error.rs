#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Translate(#[from] querycraft_mongo::Error),

    #[error("invalid value for {name}: {value:?}")]
    InvalidSetting { name: &'static str, value: String },
}
