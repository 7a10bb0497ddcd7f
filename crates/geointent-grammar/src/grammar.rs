//! Precedence-ordered clause grammar for spatial queries.
//!
//! Clauses are tried in a fixed order against the whole query and the first
//! match wins. Leaf spans are handed to an [`EntityClassifier`] and are never
//! fed back into the grammar, so a compiled tree is at most one relation deep.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use tracing::debug;

use crate::{
    entity::{clean_span, CapitalizationClassifier, EntityClassifier},
    error::CompileError,
    models::{Leaf, ParsedQuery, QueryIntent},
    units::{parse_distance, parse_duration},
};

lazy_static! {
    static ref ROUTE_REGEX: Regex =
        Regex::new(r"(?i)^route\s+from\s+(?P<start>.+?)\s+to\s+(?P<rest>.+)$").unwrap();
    static ref ALONG_ROUTE_REGEX: Regex =
        Regex::new(r"(?i)^(?P<head>.+?)\s+along\s+the\s+route$").unwrap();
    static ref ROUTE_SEPARATOR_REGEX: Regex =
        Regex::new(r"(?i)^(?P<end>.+?)\s*(?:,|\swith\s)\s*(?P<along>.+)$").unwrap();
    static ref BUFFER_REGEX: Regex =
        Regex::new(r"(?i)^buffer\s+of\s+(?P<quantity>.+?)\s+around\s+(?P<object>.+)$").unwrap();
    static ref NOT_WITHIN_REGEX: Regex = Regex::new(
        r"(?i)^(?P<subject>.+?)\s+not\s+within\s+(?P<quantity>.+?)\s+of\s+(?P<object>.+)$"
    )
    .unwrap();
    static ref WITHIN_REGEX: Regex =
        Regex::new(r"(?i)^(?P<subject>.+?)\s+within\s+(?P<quantity>.+?)\s+of\s+(?P<object>.+)$")
            .unwrap();
    static ref NOT_NEAR_REGEX: Regex =
        Regex::new(r"(?i)^(?P<subject>.+?)\s+not\s+near(?:\s+to)?\s+(?P<object>.+)$").unwrap();
    static ref NEAR_REGEX: Regex =
        Regex::new(r"(?i)^(?P<subject>.+?)\s+near(?:\s+to)?\s+(?P<object>.+)$").unwrap();
    static ref NOT_IN_REGEX: Regex =
        Regex::new(r"(?i)^(?P<subject>.+?)\s+not\s+(?:in(?:side)?|within)\s+(?P<object>.+)$").unwrap();
    static ref IN_REGEX: Regex =
        Regex::new(r"(?i)^(?P<subject>.+?)\s+(?:in(?:side)?|within)\s+(?P<object>.+)$").unwrap();
    static ref DEFAULT_GRAMMAR: RelationGrammar = RelationGrammar::new();
}

/// Compile `text` with the default capitalization classifier.
pub fn compile(text: &str) -> Result<QueryIntent, CompileError> {
    DEFAULT_GRAMMAR.compile(text)
}

/// Compile `text` and keep it alongside the resulting intent.
pub fn parse_query(text: &str) -> Result<ParsedQuery, CompileError> {
    DEFAULT_GRAMMAR.parse(text)
}

pub struct RelationGrammar<C = CapitalizationClassifier> {
    classifier: C,
}

impl RelationGrammar<CapitalizationClassifier> {
    pub fn new() -> Self {
        Self::with_classifier(CapitalizationClassifier::new())
    }
}

impl Default for RelationGrammar<CapitalizationClassifier> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: EntityClassifier> RelationGrammar<C> {
    pub fn with_classifier(classifier: C) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    pub fn parse(&self, text: &str) -> Result<ParsedQuery, CompileError> {
        let intent = self.compile(text)?;
        Ok(ParsedQuery {
            text: text.to_string(),
            intent,
        })
    }

    pub fn compile(&self, text: &str) -> Result<QueryIntent, CompileError> {
        let normalized = clean_span(text).split_whitespace().collect::<Vec<_>>().join(" ");
        if normalized.is_empty() {
            return Err(CompileError::Empty);
        }
        let text = normalized.as_str();

        if let Some(caps) = ROUTE_REGEX.captures(text) {
            debug!(rule = "route", "matched relation clause");
            return Ok(self.route(&caps));
        }

        if let Some(caps) = BUFFER_REGEX.captures(text) {
            debug!(rule = "buffer", "matched relation clause");
            let object = self.leaf(&caps["object"]);
            let quantity = &caps["quantity"];
            if let Some(distance) = distance_before_keyword(quantity) {
                return Ok(QueryIntent::Buffer { object, distance });
            }
            if let Ok(duration) = parse_duration(quantity) {
                return Ok(QueryIntent::Isochrone { object, duration });
            }
            return Err(CompileError::quantity("buffer of", quantity));
        }

        if let Some(caps) = NOT_WITHIN_REGEX.captures(text) {
            debug!(rule = "not within", "matched relation clause");
            return self.bounded(&caps, true);
        }

        if let Some(caps) = WITHIN_REGEX.captures(text) {
            debug!(rule = "within", "matched relation clause");
            return self.bounded(&caps, false);
        }

        if let Some(caps) = NOT_NEAR_REGEX.captures(text) {
            debug!(rule = "not near", "matched relation clause");
            let (subject, object) = self.pair(&caps);
            return Ok(QueryIntent::SpRelNotNear { subject, object });
        }

        if let Some(caps) = NEAR_REGEX.captures(text) {
            debug!(rule = "near", "matched relation clause");
            let (subject, object) = self.pair(&caps);
            return Ok(QueryIntent::SpRelNear { subject, object });
        }

        if let Some(caps) = NOT_IN_REGEX.captures(text) {
            debug!(rule = "not in", "matched relation clause");
            let (subject, object) = self.pair(&caps);
            return Ok(QueryIntent::SpRelDisjoint { subject, object });
        }

        if let Some(caps) = IN_REGEX.captures(text) {
            debug!(rule = "in", "matched relation clause");
            let (subject, object) = self.pair(&caps);
            return Ok(QueryIntent::SpRelCoveredBy { subject, object });
        }

        if let Some((object, subject)) = self.split_juxtaposed(text) {
            debug!(rule = "juxtaposition", "matched relation clause");
            return Ok(QueryIntent::SpRelCoveredBy { subject, object });
        }

        debug!(rule = "leaf", "no relation clause matched");
        Ok(self.leaf(text).into())
    }

    fn leaf(&self, span: &str) -> Leaf {
        self.classifier.classify(span)
    }

    fn pair(&self, caps: &Captures<'_>) -> (Leaf, Leaf) {
        (self.leaf(&caps["subject"]), self.leaf(&caps["object"]))
    }

    /// `within`/`not within` clauses: duration first, then distance.
    fn bounded(&self, caps: &Captures<'_>, negated: bool) -> Result<QueryIntent, CompileError> {
        let (subject, object) = self.pair(caps);
        let quantity = &caps["quantity"];

        if let Ok(duration) = parse_duration(quantity) {
            return Ok(if negated {
                QueryIntent::SpRelOutsideTimeOf {
                    subject,
                    object,
                    duration,
                }
            } else {
                QueryIntent::SpRelWithinTimeOf {
                    subject,
                    object,
                    duration,
                }
            });
        }

        if let Some(distance) = distance_before_keyword(quantity) {
            return Ok(if negated {
                QueryIntent::SpRelOutsideDistOf {
                    subject,
                    object,
                    distance,
                }
            } else {
                QueryIntent::SpRelWithinDistOf {
                    subject,
                    object,
                    distance,
                }
            });
        }

        let relation = if negated { "not within" } else { "within" };
        Err(CompileError::quantity(relation, quantity))
    }

    fn route(&self, caps: &Captures<'_>) -> QueryIntent {
        let start = self.leaf(&caps["start"]);
        let rest = &caps["rest"];

        let Some(along_caps) = ALONG_ROUTE_REGEX.captures(rest) else {
            return QueryIntent::Route {
                start,
                end: self.leaf(rest),
                along: None,
            };
        };
        let head = &along_caps["head"];

        if let Some(parts) = ROUTE_SEPARATOR_REGEX.captures(head) {
            return QueryIntent::Route {
                start,
                end: self.leaf(&parts["end"]),
                along: Some(self.leaf(&parts["along"])),
            };
        }

        match self.split_juxtaposed(head) {
            Some((end, along)) => QueryIntent::Route {
                start,
                end,
                along: Some(along),
            },
            None => {
                debug!(span = head, "route destination has no separable along-route feature");
                QueryIntent::Route {
                    start,
                    end: self.leaf(head),
                    along: None,
                }
            }
        }
    }

    /// Split "<named place> <feature>" into `(named place, feature)`.
    ///
    /// The longest leading run that classifies as a named place wins, as long
    /// as the remainder classifies as a feature.
    fn split_juxtaposed(&self, text: &str) -> Option<(Leaf, Leaf)> {
        if self.leaf(text).is_named() {
            return None;
        }
        let tokens: Vec<&str> = text.split_whitespace().collect();
        (1..tokens.len()).rev().find_map(|split| {
            let named = self.leaf(&tokens[..split].join(" "));
            if !named.is_named() {
                return None;
            }
            let feature = self.leaf(&tokens[split..].join(" "));
            (!feature.is_named()).then_some((named, feature))
        })
    }
}

/// The distance immediately preceding the relation keyword.
fn distance_before_keyword(quantity: &str) -> Option<f64> {
    parse_distance(quantity)
        .ok()
        .and_then(|distances| distances.last().copied())
}
