//! Type and expression serialization to the target transition-system syntax.
//!
//! The serializer is a pure function of an expression and a `primed` flag —
//! see the design note on threading the primed-mode flag by value rather
//! than as mutable state. It never consults a symbol table: every
//! expression already carries its resolved [`crate::types::Type`].

use crate::error::TranslateError;
use crate::expr::{Expr, PrimOp};
use crate::types::{Type, Width};

/// Serializes a type to its target-syntax spelling.
///
/// Width-1 unsigned values are boolean-coerced; `Clock` never reaches this
/// function in well-formed output (its presence elsewhere is a classifier
/// bug), so it is rejected as an unsupported module shape rather than
/// silently rendered.
pub fn serialize_type(ty: &Type) -> Result<String, TranslateError> {
    match ty {
        Type::UInt(1) => Ok("boolean".to_string()),
        Type::UInt(w) | Type::SInt(w) => Ok(format!("bv{w}")),
        Type::Clock => Err(TranslateError::unsupported_module_shape(
            "clock-typed value reached type serialization".to_string(),
        )),
    }
}

/// Serializes the address type for a memory of the given address width.
pub fn serialize_addr_type(addr_width: Width) -> String {
    format!("bv{addr_width}")
}

/// Serializes the full memory type `[addr_t]data_t`.
pub fn serialize_memory_type(addr_width: Width, data_type: &Type) -> Result<String, TranslateError> {
    Ok(format!(
        "[{}]{}",
        serialize_addr_type(addr_width),
        serialize_type(data_type)?
    ))
}

/// Serializes a reference name under the given primed-mode flag: `name`
/// when unprimed, `name'` when primed.
pub fn serialize_reference(name: &str, primed: bool) -> String {
    if primed {
        format!("{name}'")
    } else {
        name.to_string()
    }
}

/// Serializes an expression under the given primed-mode flag.
pub fn serialize_expr(expr: &Expr, primed: bool) -> Result<String, TranslateError> {
    match expr {
        Expr::Reference { name, .. } => Ok(serialize_reference(name, primed)),
        Expr::SubField { parent, field, .. } => {
            let Some(root) = parent.root_reference_name() else {
                return Err(TranslateError::unsupported_expression(
                    "sub-field parent has no root reference".to_string(),
                ));
            };
            Ok(serialize_reference(&format!("{root}_{field}"), primed))
        }
        Expr::Literal {
            value,
            width,
            signed,
        } => serialize_literal(*value, *width, *signed),
        Expr::Mux {
            cond,
            tval,
            fval,
            ..
        } => {
            let c = serialize_expr(cond, primed)?;
            let t = serialize_expr(tval, primed)?;
            let f = serialize_expr(fval, primed)?;
            Ok(format!("if ({c}) then ({t}) else ({f})"))
        }
        Expr::Prim {
            op,
            args,
            consts,
            ty,
        } => serialize_prim(*op, args, consts, ty, primed),
    }
}

/// Serializes a literal per §4.3: a width-1 unsigned literal renders as
/// `true`/`false`; everything else renders as `<value>bv<width>`.
fn serialize_literal(value: i64, width: Width, signed: bool) -> Result<String, TranslateError> {
    if !signed && width == 1 {
        return Ok(if value != 0 { "true" } else { "false" }.to_string());
    }
    Ok(format!("{value}bv{width}"))
}

/// One rendered operand: either a serialized sub-expression, or a constant
/// rendered directly as a decimal literal in the target position (the `0`
/// operand/`1`-`2` constants cardinality shapes).
enum Operand<'a> {
    Expr(&'a Expr),
    Const(i64),
}

impl Operand<'_> {
    fn render(&self, primed: bool) -> Result<String, TranslateError> {
        match self {
            Operand::Expr(e) => serialize_expr(e, primed),
            Operand::Const(c) => Ok(c.to_string()),
        }
    }

    fn width(&self) -> Option<Width> {
        match self {
            Operand::Expr(e) => e.width(),
            Operand::Const(_) => None,
        }
    }

    fn is_signed(&self) -> bool {
        match self {
            Operand::Expr(e) => e.ty().is_signed(),
            Operand::Const(_) => false,
        }
    }
}

fn serialize_prim(
    op: PrimOp,
    args: &[Expr],
    consts: &[i64],
    result_ty: &Type,
    primed: bool,
) -> Result<String, TranslateError> {
    let operands: Vec<Operand> = args
        .iter()
        .map(Operand::Expr)
        .chain(consts.iter().map(|c| Operand::Const(*c)))
        .collect();

    match (args.len(), consts.len()) {
        (2, 0) => render_binary(op, &operands[0], &operands[1], result_ty, primed),
        (1, 0) => render_unary(op, &operands[0], result_ty, primed),
        (1, 1) => render_binary(op, &operands[0], &operands[1], result_ty, primed),
        (1, 2) => render_bit_slice(&operands[0], consts[0], consts[1], primed),
        (0, 1) => render_unary(op, &operands[0], result_ty, primed),
        (0, 2) => render_binary(op, &operands[0], &operands[1], result_ty, primed),
        (num_args, num_consts) => Err(TranslateError::MalformedPrimitive {
            op,
            num_args,
            num_consts,
        }),
    }
}

fn render_unary(
    op: PrimOp,
    a: &Operand,
    result_ty: &Type,
    primed: bool,
) -> Result<String, TranslateError> {
    let rendered = a.render(primed)?;
    match op {
        PrimOp::Neg => Ok(format!("-{rendered}")),
        PrimOp::AsUnsigned | PrimOp::AsSigned => Ok(rendered),
        PrimOp::Not => {
            if result_ty.is_boolean_coerced() {
                Ok(format!("!{rendered}"))
            } else {
                Ok(format!("~{rendered}"))
            }
        }
        _ => Err(TranslateError::MalformedPrimitive {
            op,
            num_args: 1,
            num_consts: 0,
        }),
    }
}

fn render_binary(
    op: PrimOp,
    a: &Operand,
    b: &Operand,
    result_ty: &Type,
    primed: bool,
) -> Result<String, TranslateError> {
    let ra = a.render(primed)?;
    let rb = b.render(primed)?;
    match op {
        PrimOp::Add => render_extending_add_sub("+", a, b, &ra, &rb, result_ty),
        PrimOp::Sub => render_extending_add_sub("-", a, b, &ra, &rb, result_ty),
        PrimOp::AddWrap => Ok(format!("{ra} + {rb}")),
        PrimOp::SubWrap => Ok(format!("{ra} - {rb}")),
        PrimOp::Less => Ok(format!("{ra} < {rb}")),
        PrimOp::LessEq => Ok(format!("{ra} <= {rb}")),
        PrimOp::Greater => Ok(format!("{ra} > {rb}")),
        PrimOp::GreaterEq => Ok(format!("{ra} >= {rb}")),
        PrimOp::Eq => Ok(format!("{ra} == {rb}")),
        PrimOp::NotEq => Ok(format!("{ra} != {rb}")),
        PrimOp::Mul => Ok(format!("{ra} * {rb}")),
        PrimOp::And => {
            if result_ty.is_boolean_coerced() {
                Ok(format!("{ra} && {rb}"))
            } else {
                Ok(format!("{ra} & {rb}"))
            }
        }
        PrimOp::Or => {
            if result_ty.is_boolean_coerced() {
                Ok(format!("{ra} || {rb}"))
            } else {
                Ok(format!("{ra} | {rb}"))
            }
        }
        PrimOp::Xor => Ok(format!("{ra} ^ {rb}")),
        PrimOp::BitSelect => {
            let Operand::Const(k) = b else {
                return Err(TranslateError::MalformedPrimitive {
                    op,
                    num_args: 1,
                    num_consts: 1,
                });
            };
            Ok(format!("{ra}[{k}]"))
        }
        PrimOp::Shl => render_shift("bv_left_shift", a, b, &ra, &rb),
        PrimOp::DynShl => render_shift("bv_left_shift", a, b, &ra, &rb),
        PrimOp::Shr => {
            let func = if a.is_signed() {
                "bv_a_right_shift"
            } else {
                "bv_l_right_shift"
            };
            render_shift(func, a, b, &ra, &rb)
        }
        PrimOp::DynShr => {
            let func = if a.is_signed() {
                "bv_a_right_shift"
            } else {
                "bv_l_right_shift"
            };
            render_shift(func, a, b, &ra, &rb)
        }
        PrimOp::Cat => Ok(format!("{ra} ++ {rb}")),
        PrimOp::Pad => render_pad(a, b, &ra, result_ty),
        PrimOp::Tail => render_tail(a, b, &ra),
        _ => Err(TranslateError::MalformedPrimitive {
            op,
            num_args: 2,
            num_consts: 0,
        }),
    }
}

fn render_extending_add_sub(
    symbol: &str,
    a: &Operand,
    b: &Operand,
    ra: &str,
    rb: &str,
    result_ty: &Type,
) -> Result<String, TranslateError> {
    let extend_fn = if result_ty.is_signed() {
        "bv_sign_extend"
    } else {
        "bv_zero_extend"
    };
    let wa = a.width().unwrap_or(0);
    let wb = b.width().unwrap_or(0);
    let result_width = result_ty.width().unwrap_or(wa.max(wb) + 1);
    let extend_a = result_width.saturating_sub(wa);
    let extend_b = result_width.saturating_sub(wb);
    Ok(format!(
        "{extend_fn}({extend_a}, {ra}) {symbol} {extend_fn}({extend_b}, {rb})"
    ))
}

fn render_shift(func: &str, a: &Operand, shamt: &Operand, ra: &str, rshamt: &str) -> Result<String, TranslateError> {
    let wa = a.width().unwrap_or(0);
    let wshamt = shamt.width();
    let reconciled_shamt = match wshamt {
        None => rshamt.to_string(),
        Some(ws) if ws == wa => rshamt.to_string(),
        Some(ws) if wa > ws => format!("bv_zero_extend({}, {rshamt})", wa - ws),
        Some(ws) => {
            return Err(TranslateError::ShiftWidthMismatch {
                operand_width: wa,
                shamt_width: ws,
            })
        }
    };
    Ok(format!("{func}({reconciled_shamt}, {ra})"))
}

fn render_pad(a: &Operand, target: &Operand, ra: &str, result_ty: &Type) -> Result<String, TranslateError> {
    let Operand::Const(t) = target else {
        return Err(TranslateError::MalformedPrimitive {
            op: PrimOp::Pad,
            num_args: 1,
            num_consts: 1,
        });
    };
    let wa = a.width().unwrap_or(0) as i64;
    let extra = t - wa;
    if extra <= 0 {
        return Ok(ra.to_string());
    }
    let extend_fn = if result_ty.is_signed() {
        "bv_sign_extend"
    } else {
        "bv_zero_extend"
    };
    Ok(format!("{extend_fn}({extra}, {ra})"))
}

fn render_tail(a: &Operand, k: &Operand, ra: &str) -> Result<String, TranslateError> {
    let Operand::Const(k) = k else {
        return Err(TranslateError::MalformedPrimitive {
            op: PrimOp::Tail,
            num_args: 1,
            num_consts: 1,
        });
    };
    let wa = a.width().unwrap_or(0) as i64;
    let top = wa - k - 1;
    Ok(format!("{ra}[{top}:0]"))
}

fn render_bit_slice(
    a: &Operand,
    hi: i64,
    lo: i64,
    primed: bool,
) -> Result<String, TranslateError> {
    let ra = a.render(primed)?;
    Ok(format!("{ra}[{hi}:{lo}]"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(name: &str, ty: Type) -> Expr {
        Expr::reference(name, ty)
    }

    #[test]
    fn serialize_type_boolean_coercion() {
        assert_eq!(serialize_type(&Type::UInt(1)).unwrap(), "boolean");
        assert_eq!(serialize_type(&Type::UInt(16)).unwrap(), "bv16");
        assert_eq!(serialize_type(&Type::SInt(8)).unwrap(), "bv8");
    }

    #[test]
    fn serialize_type_clock_fails() {
        assert!(serialize_type(&Type::Clock).is_err());
    }

    #[test]
    fn serialize_memory_type_shape() {
        assert_eq!(
            serialize_memory_type(4, &Type::UInt(8)).unwrap(),
            "[bv4]bv8"
        );
    }

    #[test]
    fn reference_primed_and_unprimed() {
        let e = r("x", Type::UInt(16));
        assert_eq!(serialize_expr(&e, false).unwrap(), "x");
        assert_eq!(serialize_expr(&e, true).unwrap(), "x'");
    }

    #[test]
    fn literal_boolean_coercion() {
        assert_eq!(
            serialize_expr(&Expr::uint_literal(1, 1), false).unwrap(),
            "true"
        );
        assert_eq!(
            serialize_expr(&Expr::uint_literal(0, 1), false).unwrap(),
            "false"
        );
    }

    #[test]
    fn literal_wide_unsigned_and_signed() {
        assert_eq!(
            serialize_expr(&Expr::uint_literal(5, 16), false).unwrap(),
            "5bv16"
        );
        assert_eq!(
            serialize_expr(&Expr::sint_literal(-5, 8), false).unwrap(),
            "-5bv8"
        );
    }

    #[test]
    fn mux_renders_if_then_else() {
        let m = Expr::Mux {
            cond: Box::new(r("c", Type::UInt(1))),
            tval: Box::new(r("t", Type::UInt(8))),
            fval: Box::new(r("f", Type::UInt(8))),
            ty: Type::UInt(8),
        };
        assert_eq!(
            serialize_expr(&m, false).unwrap(),
            "if (c) then (t) else (f)"
        );
    }

    #[test]
    fn extending_add_unsigned() {
        let p = Expr::Prim {
            op: PrimOp::Add,
            args: vec![r("a", Type::UInt(8)), r("b", Type::UInt(8))],
            consts: vec![],
            ty: Type::UInt(9),
        };
        assert_eq!(
            serialize_expr(&p, false).unwrap(),
            "bv_zero_extend(1, a) + bv_zero_extend(1, b)"
        );
    }

    #[test]
    fn extending_add_signed() {
        let p = Expr::Prim {
            op: PrimOp::Add,
            args: vec![r("a", Type::SInt(8)), r("b", Type::SInt(8))],
            consts: vec![],
            ty: Type::SInt(9),
        };
        assert_eq!(
            serialize_expr(&p, false).unwrap(),
            "bv_sign_extend(1, a) + bv_sign_extend(1, b)"
        );
    }

    #[test]
    fn wrapping_sub() {
        let p = Expr::Prim {
            op: PrimOp::SubWrap,
            args: vec![r("x", Type::UInt(16)), r("y", Type::UInt(16))],
            consts: vec![],
            ty: Type::UInt(16),
        };
        assert_eq!(serialize_expr(&p, false).unwrap(), "x - y");
    }

    #[test]
    fn one_bit_and_renders_logical() {
        let p = Expr::Prim {
            op: PrimOp::And,
            args: vec![r("x", Type::UInt(1)), r("y", Type::UInt(1))],
            consts: vec![],
            ty: Type::UInt(1),
        };
        assert_eq!(serialize_expr(&p, false).unwrap(), "x && y");
    }

    #[test]
    fn wide_and_renders_bitwise() {
        let p = Expr::Prim {
            op: PrimOp::And,
            args: vec![r("x", Type::UInt(8)), r("y", Type::UInt(8))],
            consts: vec![],
            ty: Type::UInt(8),
        };
        assert_eq!(serialize_expr(&p, false).unwrap(), "x & y");
    }

    #[test]
    fn not_boolean_vs_wide() {
        let bool_not = Expr::Prim {
            op: PrimOp::Not,
            args: vec![r("x", Type::UInt(1))],
            consts: vec![],
            ty: Type::UInt(1),
        };
        assert_eq!(serialize_expr(&bool_not, false).unwrap(), "!x");
        let wide_not = Expr::Prim {
            op: PrimOp::Not,
            args: vec![r("x", Type::UInt(8))],
            consts: vec![],
            ty: Type::UInt(8),
        };
        assert_eq!(serialize_expr(&wide_not, false).unwrap(), "~x");
    }

    #[test]
    fn bit_select() {
        let p = Expr::Prim {
            op: PrimOp::BitSelect,
            args: vec![r("x", Type::UInt(8))],
            consts: vec![3],
            ty: Type::UInt(1),
        };
        assert_eq!(serialize_expr(&p, false).unwrap(), "x[3]");
    }

    #[test]
    fn bit_slice() {
        let p = Expr::Prim {
            op: PrimOp::BitSlice,
            args: vec![r("x", Type::UInt(8))],
            consts: vec![7, 2],
            ty: Type::UInt(6),
        };
        assert_eq!(serialize_expr(&p, false).unwrap(), "x[7:2]");
    }

    #[test]
    fn static_shift_left_width_equal() {
        let p = Expr::Prim {
            op: PrimOp::Shl,
            args: vec![r("x", Type::UInt(8))],
            consts: vec![3],
            ty: Type::UInt(11),
        };
        // shamt is a constant operand with no width, so reconciliation is a no-op
        assert_eq!(serialize_expr(&p, false).unwrap(), "bv_left_shift(3, x)");
    }

    #[test]
    fn dynamic_shift_left_zero_extends_narrow_shamt() {
        let p = Expr::Prim {
            op: PrimOp::DynShl,
            args: vec![r("x", Type::UInt(8)), r("amt", Type::UInt(3))],
            consts: vec![],
            ty: Type::UInt(8),
        };
        assert_eq!(
            serialize_expr(&p, false).unwrap(),
            "bv_left_shift(bv_zero_extend(5, amt), x)"
        );
    }

    #[test]
    fn dynamic_shift_equal_width_no_reconciliation() {
        let p = Expr::Prim {
            op: PrimOp::DynShl,
            args: vec![r("x", Type::UInt(8)), r("amt", Type::UInt(8))],
            consts: vec![],
            ty: Type::UInt(8),
        };
        assert_eq!(serialize_expr(&p, false).unwrap(), "bv_left_shift(amt, x)");
    }

    #[test]
    fn dynamic_shift_wider_shamt_is_error() {
        let p = Expr::Prim {
            op: PrimOp::DynShl,
            args: vec![r("x", Type::UInt(4)), r("amt", Type::UInt(8))],
            consts: vec![],
            ty: Type::UInt(4),
        };
        let err = serialize_expr(&p, false).unwrap_err();
        assert!(matches!(err, TranslateError::ShiftWidthMismatch { .. }));
    }

    #[test]
    fn unsigned_vs_signed_right_shift_function() {
        let unsigned = Expr::Prim {
            op: PrimOp::Shr,
            args: vec![r("x", Type::UInt(8))],
            consts: vec![2],
            ty: Type::UInt(8),
        };
        assert!(serialize_expr(&unsigned, false)
            .unwrap()
            .starts_with("bv_l_right_shift"));

        let signed = Expr::Prim {
            op: PrimOp::Shr,
            args: vec![r("x", Type::SInt(8))],
            consts: vec![2],
            ty: Type::SInt(8),
        };
        assert!(serialize_expr(&signed, false)
            .unwrap()
            .starts_with("bv_a_right_shift"));
    }

    #[test]
    fn cat_renders_concat_operator() {
        let p = Expr::Prim {
            op: PrimOp::Cat,
            args: vec![r("a", Type::UInt(4)), r("b", Type::UInt(4))],
            consts: vec![],
            ty: Type::UInt(8),
        };
        assert_eq!(serialize_expr(&p, false).unwrap(), "a ++ b");
    }

    #[test]
    fn pad_extends_when_needed() {
        let p = Expr::Prim {
            op: PrimOp::Pad,
            args: vec![r("a", Type::UInt(4))],
            consts: vec![8],
            ty: Type::UInt(8),
        };
        assert_eq!(
            serialize_expr(&p, false).unwrap(),
            "bv_zero_extend(4, a)"
        );
    }

    #[test]
    fn pad_is_identity_when_already_wide_enough() {
        let p = Expr::Prim {
            op: PrimOp::Pad,
            args: vec![r("a", Type::UInt(8))],
            consts: vec![4],
            ty: Type::UInt(8),
        };
        assert_eq!(serialize_expr(&p, false).unwrap(), "a");
    }

    #[test]
    fn tail_drops_top_bits() {
        let p = Expr::Prim {
            op: PrimOp::Tail,
            args: vec![r("a", Type::UInt(9))],
            consts: vec![1],
            ty: Type::UInt(8),
        };
        assert_eq!(serialize_expr(&p, false).unwrap(), "a[7:0]");
    }

    #[test]
    fn neg_prefixes_minus() {
        let p = Expr::Prim {
            op: PrimOp::Neg,
            args: vec![r("a", Type::SInt(8))],
            consts: vec![],
            ty: Type::SInt(9),
        };
        assert_eq!(serialize_expr(&p, false).unwrap(), "-a");
    }

    #[test]
    fn as_unsigned_as_signed_are_identity() {
        let u = Expr::Prim {
            op: PrimOp::AsUnsigned,
            args: vec![r("a", Type::SInt(8))],
            consts: vec![],
            ty: Type::UInt(8),
        };
        assert_eq!(serialize_expr(&u, false).unwrap(), "a");
    }

    #[test]
    fn primed_mode_threads_through_nested_prim() {
        let p = Expr::Prim {
            op: PrimOp::AddWrap,
            args: vec![r("a", Type::UInt(8)), r("b", Type::UInt(8))],
            consts: vec![],
            ty: Type::UInt(8),
        };
        assert_eq!(serialize_expr(&p, true).unwrap(), "a' + b'");
    }

    #[test]
    fn malformed_arity_is_rejected() {
        let p = Expr::Prim {
            op: PrimOp::Add,
            args: vec![r("a", Type::UInt(8)), r("b", Type::UInt(8)), r("c", Type::UInt(8))],
            consts: vec![],
            ty: Type::UInt(8),
        };
        let err = serialize_expr(&p, false).unwrap_err();
        assert!(matches!(err, TranslateError::MalformedPrimitive { .. }));
    }

    #[test]
    fn subfield_flattens_and_threads_primed() {
        let e = Expr::SubField {
            parent: Box::new(r("io", Type::UInt(1))),
            field: "value1".to_string(),
            ty: Type::UInt(16),
        };
        assert_eq!(serialize_expr(&e, false).unwrap(), "io_value1");
        assert_eq!(serialize_expr(&e, true).unwrap(), "io_value1'");
    }
}
