//! GeoIntent spatial query grammar
//!
//! Compiles free-form English describing spatial relationships into a typed
//! [`QueryIntent`] tree. Everything in this crate is pure and synchronous:
//! no I/O, no shared mutable state, safe to call from any thread.
//!
//! # Examples
//!
//! ```
//! use geointent_grammar::{compile, Leaf, QueryIntent};
//!
//! let intent = compile("Shops within 10 minutes of San Francisco").unwrap();
//! assert_eq!(
//!     intent,
//!     QueryIntent::SpRelWithinTimeOf {
//!         subject: Leaf::place(["Shops"]),
//!         object: Leaf::named_place(["San Francisco"]),
//!         duration: 600.0,
//!     }
//! );
//! ```

pub mod entity;
pub mod error;
pub mod grammar;
pub mod models;
pub mod units;

pub use entity::{CapitalizationClassifier, EntityClassifier};
pub use error::{CompileError, DurationParseError, UnitParseError};
pub use grammar::{compile, parse_query, RelationGrammar};
pub use models::{Leaf, ParsedQuery, QueryIntent};
pub use units::{parse_distance, parse_duration, DistanceUnit, DurationUnit};
