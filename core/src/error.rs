use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown puzzle mode '{0}'")]
    UnknownMode(String),
    #[error("puzzle grid must have at least one row and one column (got {rows}x{cols})")]
    EmptyGrid { rows: u32, cols: u32 },
    #[error("puzzle grid {rows}x{cols} exceeds the {max}x{max} limit")]
    GridTooLarge { rows: u32, cols: u32, max: u32 },
    #[error("invalid rule {name}: {reason}")]
    InvalidRule {
        name: &'static str,
        reason: String,
    },
    #[error("failed to parse rules: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("puzzle image failed to load")]
    Failed,
    #[error("puzzle image did not load within {0} ms")]
    TimedOut(u32),
    #[error("puzzle image reported unusable dimensions {width}x{height}")]
    Dimensions { width: u32, height: u32 },
}
