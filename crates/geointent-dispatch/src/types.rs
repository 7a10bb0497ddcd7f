use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::executor::IntentExecutor;

/// How arguments are extracted for an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseStrategy {
    /// The raw text is passed as `search_term`.
    Raw,
    /// Arguments are extracted by the slot-filling model.
    LlmSlotFill,
}

impl ParseStrategy {
    /// Parse the catalogue's `parser` field.
    pub fn from_parser(parser: &str) -> Option<Self> {
        match parser.trim() {
            "-" => Some(ParseStrategy::Raw),
            "llm_slot_fill" => Some(ParseStrategy::LlmSlotFill),
            _ => None,
        }
    }

    pub fn as_parser(&self) -> &'static str {
        match self {
            ParseStrategy::Raw => "-",
            ParseStrategy::LlmSlotFill => "llm_slot_fill",
        }
    }
}

/// A domain argument accepted by an executor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    pub description: String,
}

impl ParameterSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// A worked slot-filling example: request text and the expected rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotExample {
    pub text: String,
    pub slots: Vec<(String, String)>,
}

impl SlotExample {
    pub fn new<I, K, V>(text: impl Into<String>, slots: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            text: text.into(),
            slots: slots
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Static description of an executor's call signature.
///
/// `parameters` lists domain arguments only; the context parameter is named
/// separately and is never shown to the slot filler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutorSignature {
    pub name: String,
    pub context_parameter: String,
    pub parameters: Vec<ParameterSpec>,
    pub examples: Vec<SlotExample>,
}

impl ExecutorSignature {
    pub fn new(name: impl Into<String>, context_parameter: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            context_parameter: context_parameter.into(),
            parameters: Vec::new(),
            examples: Vec::new(),
        }
    }

    pub fn with_parameter(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.parameters.push(ParameterSpec::new(name, description));
        self
    }

    pub fn with_example(mut self, example: SlotExample) -> Self {
        self.examples.push(example);
        self
    }

    pub fn accepts(&self, parameter: &str) -> bool {
        self.parameters.iter().any(|p| p.name == parameter)
    }
}

/// A validated task intent bound to its executor
pub struct Intent<C> {
    pub name: String,
    pub parse_strategy: ParseStrategy,
    pub description: String,
    pub examples: Vec<String>,
    pub signature: ExecutorSignature,
    pub executor: Arc<dyn IntentExecutor<C>>,
}

impl<C> fmt::Debug for Intent<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Intent")
            .field("name", &self.name)
            .field("parse_strategy", &self.parse_strategy)
            .field("description", &self.description)
            .field("examples", &self.examples)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// Outcome of a dispatched intent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Intent that was executed
    pub intent: String,
    /// Arguments handed to the executor
    pub arguments: HashMap<String, String>,
    /// Executor output
    pub output: serde_json::Value,
    /// Executor wall time in milliseconds
    pub execution_time_ms: u64,
    /// Timestamp of execution
    pub executed_at: chrono::DateTime<chrono::Utc>,
}
