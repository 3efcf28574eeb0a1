//! The expression algebra: references, sub-fields, literals, muxes, and
//! primitive operators.

use serde::{Deserialize, Serialize};

use crate::types::{Type, Width};

/// A primitive operator tag, selected together with operand/constant arity
/// by the serializer (see the cardinality table in the expression serializer
/// module doc).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimOp {
    /// Width-extending addition.
    Add,
    /// Truncating (wrapping) addition.
    AddWrap,
    /// Width-extending subtraction.
    Sub,
    /// Truncating (wrapping) subtraction.
    SubWrap,
    /// `<`
    Less,
    /// `<=`
    LessEq,
    /// `>`
    Greater,
    /// `>=`
    GreaterEq,
    /// `==`
    Eq,
    /// `!=`
    NotEq,
    /// `*`
    Mul,
    /// Bitwise or logical AND depending on result width.
    And,
    /// Bitwise or logical OR depending on result width.
    Or,
    /// `^`
    Xor,
    /// Single bit extraction `a[k]`.
    BitSelect,
    /// Static left shift by a constant amount.
    Shl,
    /// Dynamic left shift by an expression amount.
    DynShl,
    /// Static right shift by a constant amount (arithmetic or logical
    /// depending on operand signedness).
    Shr,
    /// Dynamic right shift by an expression amount.
    DynShr,
    /// Concatenation `a ++ b`.
    Cat,
    /// Pad to a constant target width.
    Pad,
    /// Drop the top constant number of bits.
    Tail,
    /// Arithmetic negation.
    Neg,
    /// Reinterpret as unsigned (no-op at the bit level).
    AsUnsigned,
    /// Reinterpret as signed (no-op at the bit level).
    AsSigned,
    /// Logical/bitwise complement depending on result width.
    Not,
    /// Bit-slice extraction `a[hi:lo]`.
    BitSlice,
}

/// An expression node.
///
/// `Reference` and `SubField` carry their resolved [`Type`] directly rather
/// than requiring a symbol-table lookup during serialization: the input IR
/// is already fully typed by the time it reaches this translator, so the
/// serializer can stay a pure function of the expression tree and the
/// primed-mode flag (see module docs on [`crate::serialize`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// A bare name reference.
    Reference {
        /// The referenced name.
        name: String,
        /// The resolved type of the reference.
        ty: Type,
    },
    /// A sub-field access, e.g. a bundle field or a memory port field.
    SubField {
        /// The parent expression being indexed.
        parent: Box<Expr>,
        /// The field name.
        field: String,
        /// The resolved type of the field.
        ty: Type,
    },
    /// A literal constant.
    Literal {
        /// The constant value.
        value: i64,
        /// The bit width.
        width: Width,
        /// Whether the literal is signed.
        signed: bool,
    },
    /// A conditional expression.
    Mux {
        /// The condition (must be boolean-coerced, i.e. width 1).
        cond: Box<Expr>,
        /// The value when `cond` is true.
        tval: Box<Expr>,
        /// The value when `cond` is false.
        fval: Box<Expr>,
        /// The resolved result type.
        ty: Type,
    },
    /// A primitive operator application.
    Prim {
        /// The operator tag.
        op: PrimOp,
        /// Ordered operand expressions.
        args: Vec<Expr>,
        /// Ordered integer constants.
        consts: Vec<i64>,
        /// The resolved result type.
        ty: Type,
    },
}

impl Expr {
    /// Convenience constructor for a [`Expr::Reference`].
    pub fn reference(name: impl Into<String>, ty: Type) -> Self {
        Expr::Reference {
            name: name.into(),
            ty,
        }
    }

    /// Convenience constructor for an unsigned literal.
    pub fn uint_literal(value: i64, width: Width) -> Self {
        Expr::Literal {
            value,
            width,
            signed: false,
        }
    }

    /// Convenience constructor for a signed literal.
    pub fn sint_literal(value: i64, width: Width) -> Self {
        Expr::Literal {
            value,
            width,
            signed: true,
        }
    }

    /// The resolved type of this expression.
    pub fn ty(&self) -> Type {
        match self {
            Expr::Reference { ty, .. } => *ty,
            Expr::SubField { ty, .. } => *ty,
            Expr::Literal { width, signed, .. } => {
                if *signed {
                    Type::SInt(*width)
                } else {
                    Type::UInt(*width)
                }
            }
            Expr::Mux { ty, .. } => *ty,
            Expr::Prim { ty, .. } => *ty,
        }
    }

    /// The bit width of this expression's type, or `None` if clock-typed.
    pub fn width(&self) -> Option<Width> {
        self.ty().width()
    }

    /// `true` when this expression is exactly a zero-valued literal,
    /// regardless of signedness — the only form of "trivial reset" the
    /// classifier accepts as an explicit reset value.
    pub fn is_zero_literal(&self) -> bool {
        matches!(self, Expr::Literal { value: 0, .. })
    }

    /// Returns the innermost [`Expr::Reference`] name if this expression is
    /// a reference or a chain of sub-field accesses rooted at one, `None`
    /// otherwise (e.g. for literals, muxes, and primitive applications).
    pub fn root_reference_name(&self) -> Option<&str> {
        match self {
            Expr::Reference { name, .. } => Some(name),
            Expr::SubField { parent, .. } => parent.root_reference_name(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_ty() {
        let e = Expr::reference("x", Type::UInt(16));
        assert_eq!(e.ty(), Type::UInt(16));
        assert_eq!(e.width(), Some(16));
    }

    #[test]
    fn literal_ty_signed_unsigned() {
        let u = Expr::uint_literal(5, 8);
        assert_eq!(u.ty(), Type::UInt(8));
        let s = Expr::sint_literal(-5, 8);
        assert_eq!(s.ty(), Type::SInt(8));
    }

    #[test]
    fn is_zero_literal() {
        assert!(Expr::uint_literal(0, 4).is_zero_literal());
        assert!(!Expr::uint_literal(1, 4).is_zero_literal());
        assert!(!Expr::reference("x", Type::UInt(1)).is_zero_literal());
    }

    #[test]
    fn subfield_ty_independent_of_parent() {
        let parent = Expr::reference("io", Type::UInt(1));
        let field = Expr::SubField {
            parent: Box::new(parent),
            field: "value1".to_string(),
            ty: Type::UInt(16),
        };
        assert_eq!(field.ty(), Type::UInt(16));
    }

    #[test]
    fn mux_ty() {
        let m = Expr::Mux {
            cond: Box::new(Expr::reference("c", Type::UInt(1))),
            tval: Box::new(Expr::uint_literal(1, 8)),
            fval: Box::new(Expr::uint_literal(0, 8)),
            ty: Type::UInt(8),
        };
        assert_eq!(m.ty(), Type::UInt(8));
    }

    #[test]
    fn prim_ty() {
        let p = Expr::Prim {
            op: PrimOp::Add,
            args: vec![
                Expr::reference("a", Type::UInt(8)),
                Expr::reference("b", Type::UInt(8)),
            ],
            consts: vec![],
            ty: Type::UInt(9),
        };
        assert_eq!(p.ty(), Type::UInt(9));
    }

    #[test]
    fn root_reference_name_through_subfields() {
        let e = Expr::SubField {
            parent: Box::new(Expr::SubField {
                parent: Box::new(Expr::reference("w", Type::UInt(1))),
                field: "addr".to_string(),
                ty: Type::UInt(4),
            }),
            field: "extra".to_string(),
            ty: Type::UInt(4),
        };
        assert_eq!(e.root_reference_name(), Some("w"));
    }

    #[test]
    fn root_reference_name_none_for_literal() {
        assert_eq!(Expr::uint_literal(0, 1).root_reference_name(), None);
    }
}
