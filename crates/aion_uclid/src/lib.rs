//! Translation of a synchronous, ground-typed hardware intermediate
//! representation into a symbolic model checker's transition-system
//! language.
//!
//! This crate classifies a flat module body into registers, memories,
//! combinational nodes, and assignments ([`classify`]), serializes typed
//! expressions under a primed/unprimed rendering flag ([`serialize`]),
//! synthesizes per-memory write-arbitration procedures ([`memwrite`]), and
//! emits the resulting transition system as text ([`emit`]). [`translate`]
//! ties the pipeline together behind a single entry point.

#![warn(missing_docs)]

pub mod circuit;
pub mod classify;
pub mod config;
pub mod emit;
pub mod error;
pub mod expr;
pub mod memwrite;
pub mod serialize;
pub mod stmt;
pub mod translate;
pub mod types;

pub use circuit::{Annotation, Circuit};
pub use config::{ConfigError, TranslatorConfig};
pub use error::TranslateError;
pub use translate::{translate, TranslationOutput};
