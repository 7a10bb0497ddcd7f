use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::{CompletionClient, CLASSIFIER_PROMPT};
use crate::error::{DispatchError, Result};
use crate::registry::IntentRegistry;
use crate::template::TemplateProcessor;

/// Number of ranked candidates the classifier must return.
pub const CANDIDATE_COUNT: usize = 3;

/// Examples per intent shown in the classifier prompt
const PROMPT_EXAMPLES: usize = 2;

/// Ranks registry intents for a free-text request using a completion model.
#[derive(Clone)]
pub struct LlmClassifier {
    client: Arc<dyn CompletionClient>,
}

impl LlmClassifier {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Return exactly three ranked intent names, most likely first.
    pub async fn classify<C>(
        &self,
        text: &str,
        registry: &IntentRegistry<C>,
    ) -> Result<[String; CANDIDATE_COUNT]> {
        let prompt = Self::render_prompt(text, registry)?;
        let response = self.client.complete(&prompt).await?;
        let candidates = Self::parse_response(&response, registry)?;
        debug!("Classifier candidates for '{}': {:?}", text, candidates);
        Ok(candidates)
    }

    /// Render the classifier prompt listing every intent with its
    /// description and first two examples.
    pub fn render_prompt<C>(text: &str, registry: &IntentRegistry<C>) -> Result<String> {
        let intents = registry
            .iter()
            .map(|intent| {
                let examples = intent
                    .examples
                    .iter()
                    .take(PROMPT_EXAMPLES)
                    .map(|example| format!("    e.g. \"{}\"", example))
                    .collect::<Vec<_>>()
                    .join("\n");
                format!("- {}: {}\n{}", intent.name, intent.description, examples)
            })
            .collect::<Vec<_>>()
            .join("\n");

        let mut variables = HashMap::new();
        variables.insert("intents".to_string(), intents);
        variables.insert("text".to_string(), text.to_string());
        Ok(TemplateProcessor::process(CLASSIFIER_PROMPT, &variables)?)
    }

    /// Validate a raw model response.
    ///
    /// Lines are trimmed and blank lines ignored; what remains must be exactly
    /// three registry keys.
    pub fn parse_response<C>(
        response: &str,
        registry: &IntentRegistry<C>,
    ) -> Result<[String; CANDIDATE_COUNT]> {
        let lines: Vec<&str> = response
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        if lines.len() != CANDIDATE_COUNT {
            return Err(DispatchError::Format(format!(
                "expected {} intent names, got {}",
                CANDIDATE_COUNT,
                lines.len()
            )));
        }
        if let Some(unknown) = lines.iter().find(|line| !registry.contains(line)) {
            return Err(DispatchError::Format(format!(
                "'{}' is not a registered intent",
                unknown
            )));
        }

        Ok([
            lines[0].to_string(),
            lines[1].to_string(),
            lines[2].to_string(),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::{CatalogueEntry, IntentCatalogue};
    use crate::executor::IntentExecutor;
    use crate::types::ExecutorSignature;
    use async_trait::async_trait;

    struct Noop(&'static str);

    #[async_trait]
    impl IntentExecutor<()> for Noop {
        fn signature(&self) -> ExecutorSignature {
            ExecutorSignature::new(self.0, "conn").with_parameter("search_term", "query")
        }

        async fn execute(
            &self,
            _arguments: HashMap<String, String>,
            _context: &(),
        ) -> anyhow::Result<serde_json::Value> {
            Ok(serde_json::Value::Null)
        }
    }

    fn registry() -> IntentRegistry<()> {
        let names: [&'static str; 3] = ["search", "route", "buffer"];
        let catalogue = IntentCatalogue::new(
            names
                .iter()
                .map(|name| {
                    CatalogueEntry::new(*name, "-", format!("{name} places"))
                        .with_example(format!("{name} one"))
                        .with_example(format!("{name} two"))
                        .with_example(format!("{name} three"))
                })
                .collect(),
        );
        let executors: Vec<Arc<dyn IntentExecutor<()>>> =
            names
                .iter()
                .map(|name| Arc::new(Noop(*name)) as Arc<dyn IntentExecutor<()>>)
                .collect();
        IntentRegistry::from_catalogue(catalogue, executors).unwrap()
    }

    #[test]
    fn test_prompt_lists_first_two_examples() {
        let prompt = LlmClassifier::render_prompt("cafes near Oakland", &registry()).unwrap();
        assert!(prompt.contains("- route: route places"));
        assert!(prompt.contains("route two"));
        assert!(!prompt.contains("route three"));
        assert!(prompt.contains("Request: cafes near Oakland"));
    }

    #[test]
    fn test_parse_three_lines() {
        let candidates =
            LlmClassifier::parse_response(" route\nsearch \n\nbuffer\n", &registry()).unwrap();
        assert_eq!(candidates, ["route", "search", "buffer"]);
    }

    #[test]
    fn test_wrong_line_count_is_format_error() {
        let registry = registry();
        assert!(matches!(
            LlmClassifier::parse_response("route\nsearch", &registry),
            Err(DispatchError::Format(_))
        ));
        assert!(matches!(
            LlmClassifier::parse_response("route\nsearch\nbuffer\nroute", &registry),
            Err(DispatchError::Format(_))
        ));
    }

    #[test]
    fn test_unknown_name_is_format_error() {
        assert!(matches!(
            LlmClassifier::parse_response("route\nsearch\nisochrone", &registry()),
            Err(DispatchError::Format(message)) if message.contains("isochrone")
        ));
    }
}
