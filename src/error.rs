use thiserror::Error;

/// Errors reported by the settings registry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptionsError {
    #[error("invalid option '{0}'")]
    InvalidOption(String),

    #[error("invalid play mode '{0}', expected 'manual', 'linear' or 'random'")]
    InvalidPlayMode(String),

    #[error("invalid scroll mode '{0}', expected 'normal', 'centered' or 'relative'")]
    InvalidScrollMode(String),

    #[error("invalid boolean value '{0}'")]
    InvalidBoolean(String),

    #[error("invalid column name '{0}'")]
    InvalidColumn(String),

    #[error("expected one or more column names")]
    EmptyColumns,

    #[error("invalid topbar line '{0}', expected range is 1-99")]
    InvalidTopbarIndex(String),

    #[error("expected placement after topbar index")]
    MissingTopbarPosition,

    #[error("invalid topbar position '{0}', expected one of: left center right")]
    InvalidTopbarPosition(String),

    #[error("not a boolean option '{0}'")]
    NotBoolean(String),

    #[error("option '{0}' already exists with a different type")]
    TypeConflict(String),
}

/// Coarse error classification exposed through the last-error slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidOption,
    InvalidValue,
    InvalidTopbarIndex,
    InvalidTopbarPosition,
}

impl OptionsError {
    /// Map this error onto its taxonomy code
    pub fn code(&self) -> ErrorCode {
        match self {
            OptionsError::InvalidOption(_) => ErrorCode::InvalidOption,
            OptionsError::InvalidPlayMode(_)
            | OptionsError::InvalidScrollMode(_)
            | OptionsError::InvalidBoolean(_)
            | OptionsError::InvalidColumn(_)
            | OptionsError::EmptyColumns
            | OptionsError::NotBoolean(_)
            | OptionsError::TypeConflict(_) => ErrorCode::InvalidValue,
            OptionsError::InvalidTopbarIndex(_) => ErrorCode::InvalidTopbarIndex,
            OptionsError::MissingTopbarPosition | OptionsError::InvalidTopbarPosition(_) => {
                ErrorCode::InvalidTopbarPosition
            }
        }
    }
}

/// Result type for registry operations
pub type OptionsResult<T> = Result<T, OptionsError>;
