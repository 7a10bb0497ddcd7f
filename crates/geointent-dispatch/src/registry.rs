use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{info, warn};

use crate::catalogue::IntentCatalogue;
use crate::error::{DispatchError, RegistryValidationError, Result};
use crate::executor::IntentExecutor;
use crate::types::{Intent, ParseStrategy};

/// Argument every raw-strategy executor receives.
pub const SEARCH_TERM: &str = "search_term";

/// Validated, immutable catalogue of task intents.
///
/// Built once at startup; there are no mutating methods, so a registry can be
/// shared behind an `Arc` and read from any number of tasks.
pub struct IntentRegistry<C> {
    intents: Vec<Intent<C>>,
    index: HashMap<String, usize>,
}

impl<C> IntentRegistry<C> {
    /// Bind every catalogue entry to the executor of the same name.
    ///
    /// Fails if any entry is malformed, has no executor, or is bound to an
    /// executor without a context parameter.
    pub fn from_catalogue(
        catalogue: IntentCatalogue,
        executors: Vec<Arc<dyn IntentExecutor<C>>>,
    ) -> std::result::Result<Self, RegistryValidationError> {
        catalogue.validate_shape()?;

        let mut by_name = HashMap::new();
        for executor in executors {
            let signature = executor.signature();
            if by_name.contains_key(&signature.name) {
                return Err(RegistryValidationError::DuplicateExecutor(signature.name));
            }
            by_name.insert(signature.name.clone(), (signature, executor));
        }

        let mut intents = Vec::with_capacity(catalogue.len());
        let mut index = HashMap::with_capacity(catalogue.len());
        for entry in catalogue.intents {
            let parse_strategy = entry.parse_strategy()?;
            let (signature, executor) = by_name
                .remove(&entry.name)
                .ok_or_else(|| RegistryValidationError::MissingExecutor(entry.name.clone()))?;

            if signature.context_parameter.trim().is_empty() {
                return Err(RegistryValidationError::MissingContextParameter(entry.name));
            }
            if signature.accepts(&signature.context_parameter) {
                return Err(RegistryValidationError::ContextParameterCollision {
                    intent: entry.name,
                    parameter: signature.context_parameter,
                });
            }
            if parse_strategy == ParseStrategy::Raw && !signature.accepts(SEARCH_TERM) {
                return Err(RegistryValidationError::MissingSearchTerm(entry.name));
            }

            index.insert(entry.name.clone(), intents.len());
            intents.push(Intent {
                name: entry.name,
                parse_strategy,
                description: entry.description,
                examples: entry.examples,
                signature,
                executor,
            });
        }

        for orphan in by_name.keys() {
            warn!("Executor '{}' has no catalogue entry and will never run", orphan);
        }
        info!("Intent registry loaded with {} intents", intents.len());

        Ok(Self { intents, index })
    }

    pub fn get(&self, name: &str) -> Option<&Intent<C>> {
        self.index.get(name).map(|&i| &self.intents[i])
    }

    /// Look up an intent, failing with [`DispatchError::UnknownIntent`].
    pub fn resolve(&self, name: &str) -> Result<&Intent<C>> {
        self.get(name)
            .ok_or_else(|| DispatchError::UnknownIntent(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Intents in catalogue order
    pub fn iter(&self) -> impl Iterator<Item = &Intent<C>> {
        self.intents.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.intents.iter().map(|intent| intent.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }
}

impl<C> fmt::Debug for IntentRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntentRegistry")
            .field("intents", &self.intents)
            .finish()
    }
}
