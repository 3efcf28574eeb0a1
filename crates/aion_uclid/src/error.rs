//! Fatal translation errors.
//!
//! Every failure mode the translator can hit is a `TranslateError` variant.
//! There is no recovery path: the first error aborts the module's
//! translation and no partial output is produced. This is a distinct
//! failure domain from [`crate::config::ConfigError`] — a caller never
//! needs to guess which one a `?` might have propagated.

use crate::expr::PrimOp;

/// A fatal error encountered while translating a circuit.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TranslateError {
    /// Multiple clocks, a non-trivial reset, a non-ordinary module kind, or
    /// a multi-module circuit.
    #[error("unsupported module shape: {0}")]
    UnsupportedModuleShape(String),

    /// A raw wire definition, an instance, or a `Connect` whose lhs kind is
    /// not register / output port / memory port field.
    #[error("illegal statement: {0}")]
    IllegalStatement(String),

    /// A memory with disallowed latency, non-zero readwriters, or a
    /// non-ground data type.
    #[error("invariant violated: {0}")]
    InvariantViolated(String),

    /// An operator/arity combination outside the serializer's dispatch
    /// table.
    #[error("malformed primitive {op:?} with {num_args} operand(s) and {num_consts} constant(s)")]
    MalformedPrimitive {
        /// The operator tag.
        op: PrimOp,
        /// The number of operand expressions supplied.
        num_args: usize,
        /// The number of constants supplied.
        num_consts: usize,
    },

    /// A dynamic shift where the shift amount is wider than the shifted
    /// operand.
    #[error("shift width mismatch: operand width {operand_width}, shift amount width {shamt_width}")]
    ShiftWidthMismatch {
        /// The width of the value being shifted.
        operand_width: u32,
        /// The width of the shift-amount expression.
        shamt_width: u32,
    },

    /// A register reset is neither absent/zero nor a reference to a
    /// well-known reset signal name.
    #[error("illegal reset on register '{0}'")]
    IllegalReset(String),

    /// An expression outside the variants the serializer understands.
    #[error("unsupported expression: {0}")]
    UnsupportedExpression(String),
}

impl TranslateError {
    /// Builds an [`TranslateError::UnsupportedModuleShape`] with a message.
    pub fn unsupported_module_shape(message: impl Into<String>) -> Self {
        TranslateError::UnsupportedModuleShape(message.into())
    }

    /// Builds an [`TranslateError::IllegalStatement`] with a message.
    pub fn illegal_statement(message: impl Into<String>) -> Self {
        TranslateError::IllegalStatement(message.into())
    }

    /// Builds an [`TranslateError::InvariantViolated`] with a message.
    pub fn invariant_violated(message: impl Into<String>) -> Self {
        TranslateError::InvariantViolated(message.into())
    }

    /// Builds an [`TranslateError::IllegalReset`] naming the offending
    /// register.
    pub fn illegal_reset(register_name: impl Into<String>) -> Self {
        TranslateError::IllegalReset(register_name.into())
    }

    /// Builds an [`TranslateError::UnsupportedExpression`] with a message.
    pub fn unsupported_expression(message: impl Into<String>) -> Self {
        TranslateError::UnsupportedExpression(message.into())
    }
}
