//! Property-based tests for prompt rendering and response parsing

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use geointent_dispatch::*;
use proptest::prelude::*;

struct UnreachableClient;

#[async_trait]
impl CompletionClient for UnreachableClient {
    async fn complete(&self, _prompt: &str) -> std::result::Result<String, CompletionError> {
        Err(CompletionError::NetworkError("offline".to_string()))
    }
}

struct EchoExecutor;

#[async_trait]
impl IntentExecutor<()> for EchoExecutor {
    fn signature(&self) -> ExecutorSignature {
        ExecutorSignature::new("search", "conn").with_parameter(SEARCH_TERM, "query")
    }

    async fn execute(
        &self,
        arguments: HashMap<String, String>,
        _context: &(),
    ) -> anyhow::Result<serde_json::Value> {
        Ok(serde_json::Value::String(arguments[SEARCH_TERM].clone()))
    }
}

fn echo_dispatcher() -> Dispatcher<()> {
    let catalogue = IntentCatalogue::new(vec![CatalogueEntry::new("search", "-", "Search")
        .with_example("cafes near Oakland")
        .with_example("parks in Berkeley")]);
    let executors: Vec<Arc<dyn IntentExecutor<()>>> = vec![Arc::new(EchoExecutor)];
    let registry = IntentRegistry::from_catalogue(catalogue, executors).unwrap();
    Dispatcher::new(Arc::new(registry), Arc::new(UnreachableClient))
}

fn slot_name() -> impl Strategy<Value = String> {
    "[a-z][a-z_]{0,11}"
}

fn slot_value() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 ,.]{1,24}".prop_map(|value| value.trim().to_string())
}

proptest! {
    // Property 1: substituted values appear verbatim and are never re-expanded
    #[test]
    fn prop_template_substitutes_verbatim(value in "[{}a-z :]{0,30}") {
        let mut variables = HashMap::new();
        variables.insert("text".to_string(), value.clone());
        let rendered = TemplateProcessor::process("Request: {{text}}.", &variables).unwrap();
        prop_assert_eq!(rendered, format!("Request: {}.", value));
    }

    // Property 2: every rendered row parses back to its key and trimmed value
    #[test]
    fn prop_slot_rows_parse(rows in prop::collection::hash_map(slot_name(), slot_value(), 1..6)) {
        let response = rows
            .iter()
            .map(|(name, value)| format!("{} {} {}", name, SLOT_DELIMITER, value))
            .collect::<Vec<_>>()
            .join("\n");
        let parsed = LlmSlotFiller::parse_response(&response).unwrap();
        prop_assert_eq!(parsed, rows);
    }

    // Property 3: lines without the delimiter never produce slots
    #[test]
    fn prop_rows_without_delimiter_are_dropped(
        lines in prop::collection::vec("[^|\n]{0,40}", 0..6)
    ) {
        let response = lines.join("\n");
        let is_slot_fill_error = matches!(
            LlmSlotFiller::parse_response(&response),
            Err(DispatchError::SlotFill(_))
        );
        prop_assert!(is_slot_fill_error);
    }

    // Property 4: extract_variables finds every placeholder name once
    #[test]
    fn prop_extract_variables(names in prop::collection::vec("[a-z]{1,8}", 1..5)) {
        let template = names
            .iter()
            .map(|name| format!("{{{{{}}}}}", name))
            .collect::<Vec<_>>()
            .join(" ");
        let extracted = TemplateProcessor::extract_variables(&template);
        for name in &names {
            prop_assert!(extracted.contains(name));
        }
        prop_assert!(extracted.len() <= names.len());
    }

    // Property 5: a raw intent receives the request text unchanged as search_term
    #[test]
    fn prop_raw_dispatch_passes_text_through(text in ".{0,60}") {
        let dispatcher = echo_dispatcher();
        let result = tokio_test::block_on(dispatcher.dispatch(&text, Some("search"), &())).unwrap();
        prop_assert_eq!(&result.arguments[SEARCH_TERM], &text);
        prop_assert_eq!(result.output, serde_json::Value::String(text.clone()));
    }
}

#[test]
fn test_template_error_converts_into_dispatch_error() {
    let err: DispatchError = TemplateProcessor::process("{{missing}}", &HashMap::new())
        .unwrap_err()
        .into();
    assert_eq!(err.to_string(), "Prompt rendering failed: Missing variable: missing");
}
