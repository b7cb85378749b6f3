//! Error types for math-callout operations.

/// Errors raised by configuration, profile and indexing operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A profile id was empty.
    #[error("profile id must not be empty")]
    EmptyProfileId,

    /// A profile with this id already exists.
    #[error("profile '{0}' already exists")]
    ProfileExists(String),

    /// No profile with this id exists.
    #[error("profile '{0}' not found")]
    ProfileNotFound(String),

    /// A profile tag failed validation.
    #[error("invalid tag '{0}': {msg}", msg = crate::constants::ERROR_TAG_SYNTAX)]
    InvalidTag(String),

    /// The only remaining profile cannot be deleted.
    #[error("profile '{0}' is the last profile and cannot be deleted")]
    LastProfile(String),

    /// Deleting a profile that locations still reference.
    #[error("profile '{id}' is used by {} location(s); choose a replacement or unset", .locations.len())]
    ReplacementRequired { id: String, locations: Vec<String> },

    /// An option name that is not part of the configuration schema.
    #[error("unknown configuration key '{0}'")]
    UnknownKey(String),

    /// An option value that does not fit the option's type.
    #[error("invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    /// Inline callout settings could not be parsed.
    #[error("malformed math callout at line {line}: {reason}")]
    MalformedBlock { line: usize, reason: String },

    /// A collaborator the feature relies on is absent.
    #[error("{0} is not available")]
    MissingDependency(String),

    /// A verified edit found different content than expected.
    #[error("document changed during write-back: {0}")]
    Edit(#[from] crate::edit::ValidationError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error is malformed user input (reported as a transient notice).
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::EmptyProfileId
                | Error::ProfileExists(_)
                | Error::ProfileNotFound(_)
                | Error::InvalidTag(_)
                | Error::LastProfile(_)
                | Error::UnknownKey(_)
                | Error::InvalidValue { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
