//! Intent registry and dispatch for spatial search requests.
//!
//! A declarative [`IntentCatalogue`] is bound to [`IntentExecutor`]s into an
//! immutable [`IntentRegistry`] at startup. The [`Dispatcher`] then routes each
//! request: it picks an intent (explicitly, or via [`LlmClassifier`]), extracts
//! arguments (raw text, or via [`LlmSlotFiller`]) and runs the executor with a
//! caller-supplied context.
//!
//! # Example
//!
//! ```ignore
//! let catalogue = IntentCatalogue::load_from_file("intents.yaml")?;
//! let registry = Arc::new(IntentRegistry::from_catalogue(catalogue, executors)?);
//! let client = Arc::new(OpenAiCompatibleClient::new(CompletionConfig::default())?);
//! let dispatcher = Dispatcher::new(registry, client);
//! let result = dispatcher.dispatch("cafes near Oakland", None, &connection).await?;
//! ```

pub mod catalogue;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod executor;
pub mod llm;
pub mod registry;
pub mod template;
pub mod types;

pub use catalogue::{CatalogueEntry, IntentCatalogue, MIN_EXAMPLES};
pub use config::CompletionConfig;
pub use dispatcher::Dispatcher;
pub use error::{
    CatalogueError, CompletionError, DispatchError, RegistryValidationError, Result,
    TemplateError,
};
pub use executor::IntentExecutor;
pub use llm::{
    CompletionClient, LlmClassifier, LlmSlotFiller, OpenAiCompatibleClient, CANDIDATE_COUNT,
    SLOT_DELIMITER,
};
pub use registry::{IntentRegistry, SEARCH_TERM};
pub use template::TemplateProcessor;
pub use types::{
    ExecutionResult, ExecutorSignature, Intent, ParameterSpec, ParseStrategy, SlotExample,
};
