//! The translation driver: ties the classifier, serializer, and emitter
//! together and resolves a circuit's side-channel annotations.

use std::collections::HashSet;

use aion_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use aion_source::Span;

use crate::circuit::{Annotation, Circuit};
use crate::classify::{classify, ClassifiedModule};
use crate::config::TranslatorConfig;
use crate::emit::emit_module;
use crate::error::TranslateError;

/// The result of translating one circuit.
#[derive(Debug, Clone)]
pub struct TranslationOutput {
    /// The rendered transition-system text.
    pub text: String,
    /// Non-fatal diagnostics accumulated during translation.
    pub diagnostics: Vec<Diagnostic>,
    /// The synthesized `EmittedCircuit` annotation carrying `text`, ready
    /// for a caller to append to the circuit's annotation list.
    pub emitted_annotation: Annotation,
}

/// Names a caller may legally reference from an `Assumption`/`Property`
/// annotation: declared ports, registers, and nodes.
fn known_reference_names(classified: &ClassifiedModule) -> HashSet<&str> {
    classified
        .ports
        .iter()
        .map(|p| p.name.as_str())
        .chain(classified.register_decls.iter().map(|r| r.name.as_str()))
        .chain(classified.nodes.iter().map(|n| n.name.as_str()))
        .collect()
}

/// Filters `refs` down to names present in `known`, emitting a diagnostic
/// for each dropped reference.
fn resolve_refs(refs: &[String], known: &HashSet<&str>, sink: &DiagnosticSink) -> Vec<String> {
    refs.iter()
        .filter(|r| {
            let found = known.contains(r.as_str());
            if !found {
                sink.emit(Diagnostic::warning(
                    DiagnosticCode::new(Category::Warning, 1),
                    format!("annotation references unknown name '{r}'"),
                    Span::DUMMY,
                ));
            }
            found
        })
        .cloned()
        .collect()
}

/// Translates a circuit to transition-system text.
///
/// Fails fast on the first [`TranslateError`]; diagnostics emitted before
/// the failing statement are discarded along with everything else, since
/// no partial output is ever returned.
pub fn translate(
    circuit: &Circuit,
    config: &TranslatorConfig,
) -> Result<TranslationOutput, TranslateError> {
    let sink = DiagnosticSink::new();

    let bmc_steps: Vec<u32> = circuit.bmc_annotations().collect();
    if bmc_steps.len() > 1 {
        return Err(TranslateError::unsupported_module_shape(format!(
            "circuit carries {} Bmc annotations, at most one is supported",
            bmc_steps.len()
        )));
    }
    let bmc_steps = bmc_steps.first().copied();
    if config.require_bmc_block && bmc_steps.is_none() {
        return Err(TranslateError::unsupported_module_shape(
            "configuration requires a Bmc annotation but none was present".to_string(),
        ));
    }

    let raw_assumption_refs: Vec<String> = circuit.assumption_refs().map(String::from).collect();
    let raw_property_refs: Vec<String> = circuit.property_refs().map(String::from).collect();

    let classified = classify(&circuit.module, &sink)?;

    let known = known_reference_names(&classified);
    let assumption_refs = resolve_refs(&raw_assumption_refs, &known, &sink);
    let property_refs = resolve_refs(&raw_property_refs, &known, &sink);

    let text = emit_module(
        &classified,
        config,
        bmc_steps,
        &assumption_refs,
        &property_refs,
    )?;

    Ok(TranslationOutput {
        emitted_annotation: Annotation::EmittedCircuit { text: text.clone() },
        text,
        diagnostics: sink.take_all(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Expr;
    use crate::stmt::{Module, Port, PortDirection, Statement};
    use crate::types::Type;

    fn gcd_module() -> Module {
        Module {
            name: "Gcd".to_string(),
            ports: vec![
                Port {
                    name: "clock".to_string(),
                    direction: PortDirection::Input,
                    ty: Type::Clock,
                },
                Port {
                    name: "io_out".to_string(),
                    direction: PortDirection::Output,
                    ty: Type::UInt(16),
                },
            ],
            body: vec![
                Statement::Register {
                    name: "x".to_string(),
                    ty: Type::UInt(16),
                    clock: Expr::reference("clock", Type::Clock),
                    reset: None,
                },
                Statement::Connect {
                    lhs: Expr::reference("x", Type::UInt(16)),
                    rhs: Expr::reference("x", Type::UInt(16)),
                },
                Statement::Connect {
                    lhs: Expr::reference("io_out", Type::UInt(16)),
                    rhs: Expr::reference("x", Type::UInt(16)),
                },
            ],
        }
    }

    #[test]
    fn translates_minimal_module() {
        let circuit = Circuit::new(gcd_module());
        let out = translate(&circuit, &TranslatorConfig::default()).unwrap();
        assert!(out.text.contains("module Gcd {"));
        assert!(out.text.contains("var x : bv16;"));
        assert!(out.diagnostics.is_empty());
        match out.emitted_annotation {
            Annotation::EmittedCircuit { text } => assert_eq!(text, out.text),
            _ => panic!("expected EmittedCircuit"),
        }
    }

    #[test]
    fn bmc_annotation_drives_control_block() {
        let mut circuit = Circuit::new(gcd_module());
        circuit.annotations.push(Annotation::Bmc { steps: 10 });
        let out = translate(&circuit, &TranslatorConfig::default()).unwrap();
        assert!(out.text.contains("vobj = unroll(10);"));
    }

    #[test]
    fn multiple_bmc_annotations_rejected() {
        let mut circuit = Circuit::new(gcd_module());
        circuit.annotations.push(Annotation::Bmc { steps: 10 });
        circuit.annotations.push(Annotation::Bmc { steps: 20 });
        let err = translate(&circuit, &TranslatorConfig::default()).unwrap_err();
        assert!(matches!(err, TranslateError::UnsupportedModuleShape(_)));
    }

    #[test]
    fn require_bmc_block_config_rejects_missing_annotation() {
        let circuit = Circuit::new(gcd_module());
        let config = TranslatorConfig {
            indent_width: 2,
            require_bmc_block: true,
        };
        let err = translate(&circuit, &config).unwrap_err();
        assert!(matches!(err, TranslateError::UnsupportedModuleShape(_)));
    }

    #[test]
    fn assumption_and_property_annotations_are_emitted() {
        let mut circuit = Circuit::new(gcd_module());
        circuit.annotations.push(Annotation::Assumption {
            reference: "x".to_string(),
        });
        circuit.annotations.push(Annotation::Property {
            reference: "io_out".to_string(),
        });
        let out = translate(&circuit, &TranslatorConfig::default()).unwrap();
        assert!(out.text.contains("assume assert_x : x;"));
        assert!(out.text.contains("invariant assert_io_out : io_out;"));
    }

    #[test]
    fn unknown_annotation_reference_is_dropped_with_diagnostic() {
        let mut circuit = Circuit::new(gcd_module());
        circuit.annotations.push(Annotation::Assumption {
            reference: "nonexistent".to_string(),
        });
        let out = translate(&circuit, &TranslatorConfig::default()).unwrap();
        assert!(!out.text.contains("assert_nonexistent"));
        assert_eq!(out.diagnostics.len(), 1);
    }

    #[test]
    fn translation_error_propagates_from_classifier() {
        let mut module = gcd_module();
        module.body.push(Statement::Register {
            name: "bad".to_string(),
            ty: Type::UInt(1),
            clock: Expr::reference("other_clock", Type::Clock),
            reset: None,
        });
        let circuit = Circuit::new(module);
        let err = translate(&circuit, &TranslatorConfig::default()).unwrap_err();
        assert!(matches!(err, TranslateError::UnsupportedModuleShape(_)));
    }
}
