//! The in-memory circuit value consumed by the translator, and the
//! side-channel annotations that accompany it.

use serde::{Deserialize, Serialize};

use crate::stmt::Module;

/// A side-channel annotation attached to a circuit.
///
/// Annotations name references rather than embedding themselves in the
/// module body, mirroring how the upstream toolchain keeps verification
/// intent (what to assume, what to check, how deep to unroll) separate from
/// the circuit description proper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Annotation {
    /// Requests a bounded-model-checking control block unrolling `steps`
    /// times. At most one may be present on a circuit.
    Bmc {
        /// The unroll depth.
        steps: u32,
    },
    /// Marks `reference` as an `assume` in the emitted module.
    Assumption {
        /// The name of the referenced node, register, or port.
        reference: String,
    },
    /// Marks `reference` as an `invariant` in the emitted module.
    Property {
        /// The name of the referenced node, register, or port.
        reference: String,
    },
    /// Requests emission; on success the translator appends an
    /// [`Annotation::EmittedCircuit`] carrying the rendered text.
    EmitCircuit,
    /// Produced by the translator: carries the rendered module text.
    EmittedCircuit {
        /// The rendered transition-system text.
        text: String,
    },
}

/// A single-module circuit plus its annotations.
///
/// The translator accepts exactly one module of ordinary kind; a circuit
/// with more than one module, or with a module that cannot be classified
/// into the supported shape, is rejected with
/// [`crate::error::TranslateError::UnsupportedModuleShape`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// The single module to translate.
    pub module: Module,
    /// Side-channel annotations accompanying the circuit.
    pub annotations: Vec<Annotation>,
}

impl Circuit {
    /// Creates a circuit with no annotations.
    pub fn new(module: Module) -> Self {
        Self {
            module,
            annotations: Vec::new(),
        }
    }

    /// Returns the single `Bmc` annotation, if present.
    ///
    /// Does not itself enforce "at most one" — that is a translation-time
    /// check performed by the annotation sink, since a second `Bmc`
    /// annotation is malformed input rather than something this accessor
    /// should silently resolve by picking the first or last one.
    pub fn bmc_annotations(&self) -> impl Iterator<Item = u32> + '_ {
        self.annotations.iter().filter_map(|a| match a {
            Annotation::Bmc { steps } => Some(*steps),
            _ => None,
        })
    }

    /// Returns every `Assumption` reference name, in annotation order.
    pub fn assumption_refs(&self) -> impl Iterator<Item = &str> {
        self.annotations.iter().filter_map(|a| match a {
            Annotation::Assumption { reference } => Some(reference.as_str()),
            _ => None,
        })
    }

    /// Returns every `Property` reference name, in annotation order.
    pub fn property_refs(&self) -> impl Iterator<Item = &str> {
        self.annotations.iter().filter_map(|a| match a {
            Annotation::Property { reference } => Some(reference.as_str()),
            _ => None,
        })
    }

    /// Returns `true` if an `EmitCircuit` annotation is present.
    pub fn wants_emit(&self) -> bool {
        self.annotations
            .iter()
            .any(|a| matches!(a, Annotation::EmitCircuit))
    }
}
