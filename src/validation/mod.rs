//! Graph validation
//!
//! Two validation passes over the stored object graph:
//!
//! - [`references`] — breadth-first reference-closure validation reporting
//!   dangling references as data-quality findings.
//! - [`styles`] — deploy-time resolution of text/paragraph style chains
//!   cross-checked against the composition engine's style catalog.

pub mod references;
pub mod styles;

pub use references::{ReferenceValidator, ValidationResult};
pub use styles::{
    CompositionEngine, DeployList, StyleValidationError, StyleValidationReport, StylesValidator,
};
