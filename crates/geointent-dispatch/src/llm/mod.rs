//! Model-backed adapters: the completion client seam, the intent classifier
//! and the slot filler.

mod classifier;
mod openai;
mod slot_filler;

pub use classifier::{LlmClassifier, CANDIDATE_COUNT};
pub use openai::OpenAiCompatibleClient;
pub use slot_filler::{LlmSlotFiller, SLOT_DELIMITER};

use async_trait::async_trait;

use crate::error::CompletionError;

/// A text-completion backend.
///
/// Implementations must be shareable across tasks; the dispatcher holds one
/// behind an `Arc` and may call it concurrently.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}

/// Prompt used to rank intents for a request.
pub const CLASSIFIER_PROMPT: &str = "\
You route spatial search requests to tasks.

Available tasks:
{{intents}}

Request: {{text}}

Reply with exactly three task names from the list above, most likely first, \
one per line, with no other text.";

/// Prompt used to extract executor arguments from a request.
pub const SLOT_FILL_PROMPT: &str = "\
Extract the arguments for a task from a request.

Arguments:
{{schema}}

Examples:
{{examples:(none)}}

Request: {{text}}

Reply with one `name || value` row per argument found in the request, \
and nothing else.";
