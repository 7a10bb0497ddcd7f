use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::{CompletionClient, SLOT_FILL_PROMPT};
use crate::error::{DispatchError, Result};
use crate::template::TemplateProcessor;
use crate::types::{ParameterSpec, SlotExample};

/// Separator between argument name and value in slot-filler rows.
pub const SLOT_DELIMITER: &str = "||";

/// Extracts executor arguments from free text using a completion model.
#[derive(Clone)]
pub struct LlmSlotFiller {
    client: Arc<dyn CompletionClient>,
}

impl LlmSlotFiller {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Fill the given parameter schema from `text`.
    ///
    /// Returns whatever keys the model produced; filtering against the
    /// executor's declared parameters is the caller's job.
    pub async fn fill(
        &self,
        text: &str,
        schema: &[ParameterSpec],
        examples: &[SlotExample],
    ) -> Result<HashMap<String, String>> {
        let prompt = Self::render_prompt(text, schema, examples)?;
        let response = self.client.complete(&prompt).await?;
        let slots = Self::parse_response(&response)?;
        debug!("Slot filler produced {} arguments", slots.len());
        Ok(slots)
    }

    pub fn render_prompt(
        text: &str,
        schema: &[ParameterSpec],
        examples: &[SlotExample],
    ) -> Result<String> {
        let schema = schema
            .iter()
            .map(|parameter| format!("- {}: {}", parameter.name, parameter.description))
            .collect::<Vec<_>>()
            .join("\n");

        let mut variables = HashMap::new();
        variables.insert("schema".to_string(), schema);
        variables.insert("text".to_string(), text.to_string());
        if !examples.is_empty() {
            let rendered = examples
                .iter()
                .map(|example| {
                    let rows = example
                        .slots
                        .iter()
                        .map(|(name, value)| format!("{} {} {}", name, SLOT_DELIMITER, value))
                        .collect::<Vec<_>>()
                        .join("\n");
                    format!("Request: {}\n{}", example.text, rows)
                })
                .collect::<Vec<_>>()
                .join("\n\n");
            variables.insert("examples".to_string(), rendered);
        }

        Ok(TemplateProcessor::process(SLOT_FILL_PROMPT, &variables)?)
    }

    /// Parse `name || value` rows.
    ///
    /// Rows without the delimiter or with an empty name are dropped; a repeated
    /// name keeps its last value. Fails when no row survives.
    pub fn parse_response(response: &str) -> Result<HashMap<String, String>> {
        let mut slots = HashMap::new();
        for line in response.lines() {
            let Some((name, value)) = line.split_once(SLOT_DELIMITER) else {
                continue;
            };
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            slots.insert(name.to_string(), value.trim().to_string());
        }

        if slots.is_empty() {
            return Err(DispatchError::SlotFill(
                "no `name || value` rows in response".to_string(),
            ));
        }
        Ok(slots)
    }
}
