use serde::{Deserialize, Serialize};

/// A leaf reference inside a spatial relation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Leaf {
    /// Feature or category reference ("shops", "gas stations").
    Place { terms: Vec<String> },
    /// Proper-noun location ("San Francisco").
    NamedPlace { terms: Vec<String> },
}

impl Leaf {
    pub fn place<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Leaf::Place {
            terms: terms.into_iter().map(Into::into).collect(),
        }
    }

    pub fn named_place<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Leaf::NamedPlace {
            terms: terms.into_iter().map(Into::into).collect(),
        }
    }

    pub fn terms(&self) -> &[String] {
        match self {
            Leaf::Place { terms } | Leaf::NamedPlace { terms } => terms,
        }
    }

    pub fn is_named(&self) -> bool {
        matches!(self, Leaf::NamedPlace { .. })
    }
}

/// Typed tree produced by compiling a spatial query.
///
/// Relation variants only ever hold [`Leaf`] values, so a tree is at most
/// one level deep. Distances are meters and durations are seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum QueryIntent {
    Place {
        terms: Vec<String>,
    },
    NamedPlace {
        terms: Vec<String>,
    },
    SpRelCoveredBy {
        subject: Leaf,
        object: Leaf,
    },
    SpRelDisjoint {
        subject: Leaf,
        object: Leaf,
    },
    SpRelNear {
        subject: Leaf,
        object: Leaf,
    },
    SpRelNotNear {
        subject: Leaf,
        object: Leaf,
    },
    SpRelWithinTimeOf {
        subject: Leaf,
        object: Leaf,
        duration: f64,
    },
    SpRelOutsideTimeOf {
        subject: Leaf,
        object: Leaf,
        duration: f64,
    },
    SpRelWithinDistOf {
        subject: Leaf,
        object: Leaf,
        distance: f64,
    },
    SpRelOutsideDistOf {
        subject: Leaf,
        object: Leaf,
        distance: f64,
    },
    Buffer {
        object: Leaf,
        distance: f64,
    },
    Isochrone {
        object: Leaf,
        duration: f64,
    },
    Route {
        start: Leaf,
        end: Leaf,
        along: Option<Leaf>,
    },
}

impl QueryIntent {
    /// Variant name, matching the serialized `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            QueryIntent::Place { .. } => "Place",
            QueryIntent::NamedPlace { .. } => "NamedPlace",
            QueryIntent::SpRelCoveredBy { .. } => "SpRelCoveredBy",
            QueryIntent::SpRelDisjoint { .. } => "SpRelDisjoint",
            QueryIntent::SpRelNear { .. } => "SpRelNear",
            QueryIntent::SpRelNotNear { .. } => "SpRelNotNear",
            QueryIntent::SpRelWithinTimeOf { .. } => "SpRelWithinTimeOf",
            QueryIntent::SpRelOutsideTimeOf { .. } => "SpRelOutsideTimeOf",
            QueryIntent::SpRelWithinDistOf { .. } => "SpRelWithinDistOf",
            QueryIntent::SpRelOutsideDistOf { .. } => "SpRelOutsideDistOf",
            QueryIntent::Buffer { .. } => "Buffer",
            QueryIntent::Isochrone { .. } => "Isochrone",
            QueryIntent::Route { .. } => "Route",
        }
    }

    /// All leaves of the tree, in field declaration order.
    pub fn leaves(&self) -> Vec<Leaf> {
        match self {
            QueryIntent::Place { terms } => vec![Leaf::Place {
                terms: terms.clone(),
            }],
            QueryIntent::NamedPlace { terms } => vec![Leaf::NamedPlace {
                terms: terms.clone(),
            }],
            QueryIntent::SpRelCoveredBy { subject, object }
            | QueryIntent::SpRelDisjoint { subject, object }
            | QueryIntent::SpRelNear { subject, object }
            | QueryIntent::SpRelNotNear { subject, object }
            | QueryIntent::SpRelWithinTimeOf {
                subject, object, ..
            }
            | QueryIntent::SpRelOutsideTimeOf {
                subject, object, ..
            }
            | QueryIntent::SpRelWithinDistOf {
                subject, object, ..
            }
            | QueryIntent::SpRelOutsideDistOf {
                subject, object, ..
            } => vec![subject.clone(), object.clone()],
            QueryIntent::Buffer { object, .. } | QueryIntent::Isochrone { object, .. } => {
                vec![object.clone()]
            }
            QueryIntent::Route { start, end, along } => {
                let mut leaves = vec![start.clone(), end.clone()];
                leaves.extend(along.clone());
                leaves
            }
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, QueryIntent::Place { .. } | QueryIntent::NamedPlace { .. })
    }
}

impl From<Leaf> for QueryIntent {
    fn from(leaf: Leaf) -> Self {
        match leaf {
            Leaf::Place { terms } => QueryIntent::Place { terms },
            Leaf::NamedPlace { terms } => QueryIntent::NamedPlace { terms },
        }
    }
}

/// A compiled query, scoped to a single request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedQuery {
    pub text: String,
    pub intent: QueryIntent,
}
