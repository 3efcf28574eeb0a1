//! Ground types: unsigned/signed bit-vectors and the clock sentinel.

use serde::{Deserialize, Serialize};

/// The bit width of a ground type. Always positive for `UInt`/`SInt`.
pub type Width = u32;

/// A ground type in the source IR.
///
/// There is no aggregate (bundle/vector) variant: the translator's input is
/// assumed already lowered to ground-typed form, so every reference, field,
/// and operator result can be represented by one of these three shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    /// An unsigned bit-vector of the given width.
    UInt(Width),
    /// A signed bit-vector of the given width.
    SInt(Width),
    /// The clock sentinel. Never serialized; a clock-typed value reaching
    /// the serializer indicates a classifier bug or malformed input.
    Clock,
}

impl Type {
    /// Returns the bit width, or `None` for `Clock`.
    pub fn width(&self) -> Option<Width> {
        match self {
            Type::UInt(w) | Type::SInt(w) => Some(*w),
            Type::Clock => None,
        }
    }

    /// Returns `true` for `SInt`.
    pub fn is_signed(&self) -> bool {
        matches!(self, Type::SInt(_))
    }

    /// Returns `true` for `Clock`.
    pub fn is_clock(&self) -> bool {
        matches!(self, Type::Clock)
    }

    /// Returns `true` when this type is boolean-coerced at the target level,
    /// i.e. an unsigned bit-vector of width 1.
    pub fn is_boolean_coerced(&self) -> bool {
        matches!(self, Type::UInt(1))
    }
}
