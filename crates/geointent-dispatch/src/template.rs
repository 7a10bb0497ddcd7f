use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::error::TemplateError;

lazy_static! {
    // {{variable}} or {{variable:default}}
    static ref PLACEHOLDER_REGEX: Regex =
        Regex::new(r"\{\{([a-zA-Z_][a-zA-Z0-9_]*)(?::([^}]*))?\}\}").unwrap();
}

/// Template processor for prompt rendering
pub struct TemplateProcessor;

impl TemplateProcessor {
    /// Substitute `{{variable}}` and `{{variable:default}}` placeholders.
    ///
    /// Substitution is a single pass over the template, so placeholder-like
    /// text inside a substituted value is left as is.
    pub fn process(
        template: &str,
        variables: &HashMap<String, String>,
    ) -> Result<String, TemplateError> {
        if let Some(missing) = PLACEHOLDER_REGEX.captures_iter(template).find(|cap| {
            cap.get(2).is_none() && !variables.contains_key(&cap[1])
        }) {
            return Err(TemplateError::MissingVariable(missing[1].to_string()));
        }

        let rendered = PLACEHOLDER_REGEX.replace_all(template, |cap: &Captures<'_>| {
            variables
                .get(&cap[1])
                .map(String::as_str)
                .or_else(|| cap.get(2).map(|default| default.as_str()))
                .unwrap_or_default()
                .to_string()
        });
        Ok(rendered.into_owned())
    }

    /// Extract all variable names from a template, in first-use order
    pub fn extract_variables(template: &str) -> Vec<String> {
        let mut variables: Vec<String> = Vec::new();
        for cap in PLACEHOLDER_REGEX.captures_iter(template) {
            let name = &cap[1];
            if !variables.iter().any(|v| v == name) {
                variables.push(name.to_string());
            }
        }
        variables
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_simple_substitution() {
        let result = TemplateProcessor::process(
            "Request: {{text}}\nIntents: {{intents}}",
            &vars(&[("text", "cafes near Oakland"), ("intents", "search")]),
        )
        .unwrap();
        assert_eq!(result, "Request: cafes near Oakland\nIntents: search");
    }

    #[test]
    fn test_substitution_with_default() {
        let result =
            TemplateProcessor::process("Examples: {{examples:none}}", &HashMap::new()).unwrap();
        assert_eq!(result, "Examples: none");
    }

    #[test]
    fn test_missing_variable_error() {
        let result = TemplateProcessor::process("Request: {{text}}", &HashMap::new());
        assert_eq!(result, Err(TemplateError::MissingVariable("text".into())));
    }

    #[test]
    fn test_values_are_not_re_expanded() {
        let result = TemplateProcessor::process(
            "{{text}} / {{schema}}",
            &vars(&[("text", "{{schema}}"), ("schema", "place")]),
        )
        .unwrap();
        assert_eq!(result, "{{schema}} / place");
    }

    #[test]
    fn test_extract_variables() {
        let names = TemplateProcessor::extract_variables("{{a}} {{b:x}} {{a}}");
        assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
    }
}
