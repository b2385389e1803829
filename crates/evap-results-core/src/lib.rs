//! evap-results-core: Visibility, redaction, and grouping of evaluation results.
//!
//! This crate defines the result model, the rules deciding which answers and
//! grades a viewer may see, and the pipeline that turns raw questionnaire
//! sections into the grouped payload shown on a course's results page.

pub mod config;
pub mod distribution;
pub mod engine;
pub mod error;
pub mod grouping;
pub mod headings;
pub mod index;
pub mod model;
pub mod policy;
pub mod redaction;
pub mod results;
pub mod snapshot;
pub mod traits;
pub mod visibility;

pub use engine::ResultsEngine;
pub use error::ResultsError;
