use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}.")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse JSON settings. Original error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to parse YAML settings. Original error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to render. Original error: {0}")]
    MinijinjaError(#[from] minijinja::Error),

    /// Missing or malformed view settings. Fatal to view construction.
    #[error("Configuration error: {0}.")]
    ConfigurationError(String),

    /// A helper needs a collaborator that was not supplied.
    #[error("Service not found: {0}.")]
    ServiceNotFound(String),

    #[error("The current request has no '{0}' attribute.")]
    MissingRequestAttribute(String),

    #[error("No settings file found in '{dir}'. Tried: {files}.")]
    SettingsNotFound { dir: String, files: String },

    /// Failures reported by router or translator implementations.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience type alias for Results with vista's Error as the error type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the helper error that caused a render failure, if any.
    ///
    /// Helpers run inside the template engine, so their failures reach the
    /// caller wrapped in a [`Error::MinijinjaError`]. The helper's error is
    /// kept in the source chain and can be inspected here.
    pub fn helper_error(&self) -> Option<&Error> {
        let Error::MinijinjaError(err) = self else {
            return None;
        };
        let mut source = std::error::Error::source(err);
        while let Some(cause) = source {
            if let Some(found) = cause.downcast_ref::<Error>() {
                return Some(found);
            }
            source = cause.source();
        }
        None
    }
}

impl From<Error> for minijinja::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::MinijinjaError(inner) => inner,
            other => minijinja::Error::new(
                minijinja::ErrorKind::InvalidOperation,
                other.to_string(),
            )
            .with_source(other),
        }
    }
}
