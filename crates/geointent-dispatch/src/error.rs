use thiserror::Error;

/// Per-request failures returned by [`crate::Dispatcher::dispatch`].
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Unknown intent: {0}")]
    UnknownIntent(String),

    #[error("Malformed classifier response: {0}")]
    Format(String),

    #[error("Slot filling failed: {0}")]
    SlotFill(String),

    #[error("Prompt rendering failed: {0}")]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Completion(#[from] CompletionError),

    /// Raised by the executor itself and passed through untouched.
    #[error(transparent)]
    Executor(anyhow::Error),
}

pub type Result<T> = std::result::Result<T, DispatchError>;

/// Load-time registry failures. Any of these aborts startup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryValidationError {
    #[error("Intent name cannot be empty")]
    EmptyName,

    #[error("Intent declared more than once: {0}")]
    DuplicateIntent(String),

    #[error("Executor registered more than once: {0}")]
    DuplicateExecutor(String),

    #[error("No executor named '{0}'")]
    MissingExecutor(String),

    #[error("Executor '{0}' declares no context parameter")]
    MissingContextParameter(String),

    #[error("Executor '{intent}' also declares its context parameter '{parameter}' as a domain argument")]
    ContextParameterCollision { intent: String, parameter: String },

    #[error("Intent '{intent}' uses unknown parser '{parser}' (expected '-' or 'llm_slot_fill')")]
    UnknownParseStrategy { intent: String, parser: String },

    #[error("Intent '{intent}' needs at least 2 examples, found {count}")]
    TooFewExamples { intent: String, count: usize },

    #[error("Raw intent '{0}' must accept a 'search_term' argument")]
    MissingSearchTerm(String),
}

/// Failures talking to the hosted completion service.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompletionError {
    #[error("Authentication failed")]
    AuthError,

    #[error("Rate limited by completion service")]
    RateLimited,

    #[error("Completion request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Completion service error: {0}")]
    ServiceError(String),

    #[error("Completion service returned no content")]
    EmptyResponse,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for CompletionError {
    fn from(err: serde_json::Error) -> Self {
        CompletionError::SerializationError(err.to_string())
    }
}

impl From<reqwest::Error> for CompletionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CompletionError::Timeout
        } else if err.is_connect() {
            CompletionError::NetworkError(err.to_string())
        } else if err.is_decode() {
            CompletionError::SerializationError(err.to_string())
        } else {
            CompletionError::ServiceError(err.to_string())
        }
    }
}

/// Prompt template could not be rendered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Missing variable: {0}")]
    MissingVariable(String),
}

/// Catalogue or configuration file could not be read.
#[derive(Error, Debug)]
pub enum CatalogueError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Unsupported file format: {0}. Use .yaml, .yml, or .json")]
    UnsupportedFormat(String),
}
