use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CatalogueError, RegistryValidationError};
use crate::types::ParseStrategy;

/// Minimum number of examples each intent must carry.
pub const MIN_EXAMPLES: usize = 2;

/// One declarative intent entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogueEntry {
    /// Intent name; must match an executor name
    pub name: String,

    /// `-` for raw text, `llm_slot_fill` for model-extracted arguments
    #[serde(default = "default_parser")]
    pub parser: String,

    /// What the intent does, shown to the classifier
    #[serde(default)]
    pub description: String,

    /// Example requests, the first two are shown to the classifier
    #[serde(default)]
    pub examples: Vec<String>,
}

fn default_parser() -> String {
    ParseStrategy::Raw.as_parser().to_string()
}

impl CatalogueEntry {
    pub fn new(
        name: impl Into<String>,
        parser: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            parser: parser.into(),
            description: description.into(),
            examples: Vec::new(),
        }
    }

    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.examples.push(example.into());
        self
    }

    /// Resolve the `parser` field into a strategy.
    pub fn parse_strategy(&self) -> Result<ParseStrategy, RegistryValidationError> {
        ParseStrategy::from_parser(&self.parser).ok_or_else(|| {
            RegistryValidationError::UnknownParseStrategy {
                intent: self.name.clone(),
                parser: self.parser.clone(),
            }
        })
    }
}

/// The intent catalogue, loaded once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentCatalogue {
    pub intents: Vec<CatalogueEntry>,
}

impl IntentCatalogue {
    pub fn new(intents: Vec<CatalogueEntry>) -> Self {
        Self { intents }
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, CatalogueError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self, CatalogueError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a catalogue from a YAML file
    pub fn load_from_yaml<P: AsRef<Path>>(path: P) -> Result<Self, CatalogueError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load a catalogue from a JSON file
    pub fn load_from_json<P: AsRef<Path>>(path: P) -> Result<Self, CatalogueError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Load a catalogue from a file (auto-detect format)
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogueError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("");

        match extension {
            "yaml" | "yml" => Self::load_from_yaml(path),
            "json" => Self::load_from_json(path),
            other => Err(CatalogueError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Check everything that does not need executors: names, parsers and
    /// example counts.
    pub fn validate_shape(&self) -> Result<(), RegistryValidationError> {
        let mut seen = HashSet::new();
        for entry in &self.intents {
            if entry.name.trim().is_empty() {
                return Err(RegistryValidationError::EmptyName);
            }
            if !seen.insert(entry.name.as_str()) {
                return Err(RegistryValidationError::DuplicateIntent(entry.name.clone()));
            }
            entry.parse_strategy()?;
            if entry.examples.len() < MIN_EXAMPLES {
                return Err(RegistryValidationError::TooFewExamples {
                    intent: entry.name.clone(),
                    count: entry.examples.len(),
                });
            }
        }
        Ok(())
    }

    pub fn names(&self) -> Vec<&str> {
        self.intents.iter().map(|entry| entry.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }
}
