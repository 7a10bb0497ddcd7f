use thiserror::Error;

/// No distance literal could be found in the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no distance found in '{input}'")]
pub struct UnitParseError {
    pub input: String,
}

/// No duration could be read from the input by any strategy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no duration found in '{input}'")]
pub struct DurationParseError {
    pub input: String,
}

/// A relation keyword matched but its embedded quantity did not parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("'{relation}' clause has no usable quantity in '{quantity}'")]
    Quantity {
        relation: &'static str,
        quantity: String,
    },
    #[error("query is empty")]
    Empty,
}

impl CompileError {
    pub(crate) fn quantity(relation: &'static str, quantity: &str) -> Self {
        CompileError::Quantity {
            relation,
            quantity: quantity.trim().to_string(),
        }
    }
}
