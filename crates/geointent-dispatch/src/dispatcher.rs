//! Top-level request dispatch

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::error::{DispatchError, Result};
use crate::llm::{CompletionClient, LlmClassifier, LlmSlotFiller};
use crate::registry::{IntentRegistry, SEARCH_TERM};
use crate::types::{ExecutionResult, Intent, ParseStrategy};

/// Routes free-text requests to registered executors.
///
/// Holds no per-request state; a single dispatcher can serve concurrent
/// requests.
pub struct Dispatcher<C> {
    registry: Arc<IntentRegistry<C>>,
    classifier: LlmClassifier,
    slot_filler: LlmSlotFiller,
}

impl<C> Dispatcher<C> {
    /// Create a dispatcher whose classifier and slot filler share one client.
    pub fn new(registry: Arc<IntentRegistry<C>>, client: Arc<dyn CompletionClient>) -> Self {
        Self {
            registry,
            classifier: LlmClassifier::new(client.clone()),
            slot_filler: LlmSlotFiller::new(client),
        }
    }

    pub fn with_adapters(
        registry: Arc<IntentRegistry<C>>,
        classifier: LlmClassifier,
        slot_filler: LlmSlotFiller,
    ) -> Self {
        Self {
            registry,
            classifier,
            slot_filler,
        }
    }

    pub fn registry(&self) -> &IntentRegistry<C> {
        &self.registry
    }

    /// Classify (unless `intent_name` is given), extract arguments and run
    /// the bound executor with `context`.
    pub async fn dispatch(
        &self,
        text: &str,
        intent_name: Option<&str>,
        context: &C,
    ) -> Result<ExecutionResult> {
        let name = match intent_name {
            Some(name) => name.to_string(),
            None => {
                let [first, ..] = self.classifier.classify(text, self.registry()).await?;
                first
            }
        };

        let intent = self.registry.resolve(&name)?;
        let arguments = self.extract_arguments(text, intent).await?;

        info!(
            "Dispatching '{}' with {} argument(s)",
            intent.name,
            arguments.len()
        );

        let start_time = Instant::now();
        let output = intent
            .executor
            .execute(arguments.clone(), context)
            .await
            .map_err(DispatchError::Executor)?;

        Ok(ExecutionResult {
            intent: intent.name.clone(),
            arguments,
            output,
            execution_time_ms: start_time.elapsed().as_millis() as u64,
            executed_at: chrono::Utc::now(),
        })
    }

    async fn extract_arguments(
        &self,
        text: &str,
        intent: &Intent<C>,
    ) -> Result<HashMap<String, String>> {
        match intent.parse_strategy {
            ParseStrategy::Raw => {
                let mut arguments = HashMap::new();
                arguments.insert(SEARCH_TERM.to_string(), text.to_string());
                Ok(arguments)
            }
            ParseStrategy::LlmSlotFill => {
                let signature = &intent.signature;
                let mut slots = self
                    .slot_filler
                    .fill(text, &signature.parameters, &signature.examples)
                    .await?;
                // Unrecognized keys are dropped, not reported.
                slots.retain(|key, _| {
                    let declared = signature.accepts(key);
                    if !declared {
                        debug!(
                            "Dropping undeclared argument '{}' for intent '{}'",
                            key, intent.name
                        );
                    }
                    declared
                });
                Ok(slots)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::{CatalogueEntry, IntentCatalogue};
    use crate::error::CompletionError;
    use crate::executor::IntentExecutor;
    use crate::types::ExecutorSignature;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Scripted {
        response: String,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn new(response: &str) -> Arc<Self> {
            Arc::new(Self {
                response: response.to_string(),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl CompletionClient for Scripted {
        async fn complete(&self, _prompt: &str) -> std::result::Result<String, CompletionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.response.clone())
        }
    }

    struct Echo;

    #[async_trait]
    impl IntentExecutor<String> for Echo {
        fn signature(&self) -> ExecutorSignature {
            ExecutorSignature::new("search", "conn").with_parameter(SEARCH_TERM, "query")
        }

        async fn execute(
            &self,
            arguments: HashMap<String, String>,
            context: &String,
        ) -> anyhow::Result<serde_json::Value> {
            Ok(serde_json::json!({ "conn": context, "term": arguments[SEARCH_TERM] }))
        }
    }

    fn registry() -> Arc<IntentRegistry<String>> {
        let catalogue = IntentCatalogue::new(vec![CatalogueEntry::new("search", "-", "Search")
            .with_example("cafes near Oakland")
            .with_example("parks in Berkeley")]);
        let executors: Vec<Arc<dyn IntentExecutor<String>>> = vec![Arc::new(Echo)];
        Arc::new(IntentRegistry::from_catalogue(catalogue, executors).unwrap())
    }

    #[tokio::test]
    async fn test_named_dispatch_skips_classifier() {
        let client = Scripted::new("unused");
        let dispatcher = Dispatcher::new(registry(), client.clone());

        let result = dispatcher
            .dispatch("cafes near Oakland", Some("search"), &"db".to_string())
            .await
            .unwrap();

        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
        assert_eq!(result.intent, "search");
        assert_eq!(result.output["conn"], "db");
        assert_eq!(result.output["term"], "cafes near Oakland");
    }

    #[tokio::test]
    async fn test_unknown_named_intent() {
        let dispatcher = Dispatcher::new(registry(), Scripted::new("unused"));
        let result = dispatcher.dispatch("x", Some("route"), &String::new()).await;
        assert!(matches!(result, Err(DispatchError::UnknownIntent(name)) if name == "route"));
    }
}
