/// Errors from level configuration and validation.
///
/// Generation itself never fails once a [`crate::LevelGenerator`] has been
/// built; these cover bad parameters, unreadable config files and levels that
/// violate the layout invariants.
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("invalid range for {field}: [{min}, {max}]")]
    InvalidRange {
        field: &'static str,
        min: f64,
        max: f64,
    },
    #[error("{field} must be {expected}, got {value}")]
    InvalidValue {
        field: &'static str,
        expected: &'static str,
        value: f64,
    },
    #[error("level invariant violated: {0}")]
    Invariant(String),
    #[error("unknown room style: {0}")]
    UnknownStyle(String),
    #[error("unknown enemy kind: {0}")]
    UnknownEnemyKind(String),
    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
