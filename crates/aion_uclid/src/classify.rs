//! The statement classifier: a single post-order walk that sorts a module's
//! body into disjoint, role-specific collections.

use std::collections::HashMap;

use aion_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Severity};
use aion_source::Span;

use crate::error::TranslateError;
use crate::expr::Expr;
use crate::stmt::{MemoryDecl, Module, Port, PortDirection, Statement};
use crate::types::{Type, Width};

/// Register reference names accepted as a trivial ("disallowed from being a
/// real reset") reset source, equivalent to an explicit literal-zero reset.
///
/// This is the resolution of an open question the distilled specification
/// leaves implicit: it names a register reset either with a literal zero or
/// with a reference to one of these well-known signals, both of which the
/// classifier treats identically to "no reset".
pub const RESET_SIGNAL_NAMES: &[&str] = &["reset", "rst"];

/// A combinational node declaration, frozen after classification.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDecl {
    /// The node's name.
    pub name: String,
    /// The node's value expression.
    pub value: Expr,
    /// The node's type.
    pub ty: Type,
}

/// A register declaration, frozen after classification.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterDecl {
    /// The register's name.
    pub name: String,
    /// The register's type.
    pub ty: Type,
    /// The register's initial value: the reset expression if present and
    /// non-trivial-zero-equivalent, otherwise a zero literal of the same
    /// type (a register with no reset still needs some `init` value; this
    /// translator initializes it to zero, matching the common convention
    /// that a reset-less register backing a `Reg()` without an explicit
    /// `init` is zero-initialized by the simulator/model-checker).
    pub init_value: Expr,
}

/// A synthesized auxiliary wire: per-memory `havoc_<m>` and per-port
/// flattened `addr`/`data`/`en`/`mask` signals.
#[derive(Debug, Clone, PartialEq)]
pub struct WireDecl {
    /// The wire's name.
    pub name: String,
    /// The wire's type.
    pub ty: Type,
}

/// An assignment with an already-flattened target name, produced by
/// classifying a `Connect` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Assign {
    /// The flattened assignment target name.
    pub target: String,
    /// The assigned value expression.
    pub rhs: Expr,
}

/// A single memory read port's synthesized wire names, used by the module
/// emitter to drive the clock-low memory-read statements.
#[derive(Debug, Clone, PartialEq)]
pub struct ReaderWires {
    /// The memory this port reads.
    pub memory: String,
    /// The reader port name.
    pub port: String,
    /// The flattened `addr` wire name.
    pub addr: String,
    /// The flattened `data` wire name.
    pub data: String,
}

/// The output of the statement classifier: module declarations partitioned
/// by role, ready for the emitter to drive the serializer per role.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedModule {
    /// The module's name.
    pub name: String,
    /// The module's declared ports, in declaration order.
    pub ports: Vec<Port>,
    /// Combinational nodes, in source order.
    pub nodes: Vec<NodeDecl>,
    /// Register declarations, insertion-ordered by name.
    pub register_decls: Vec<RegisterDecl>,
    /// Memory declarations, in source order.
    pub memory_decls: Vec<MemoryDecl>,
    /// Synthesized auxiliary wires, in synthesis order.
    pub wire_decls: Vec<WireDecl>,
    /// Connects whose lhs is a register.
    pub register_assigns: Vec<Assign>,
    /// Connects whose lhs is an output port or a non-clock memory port
    /// field.
    pub port_or_memfield_assigns: Vec<Assign>,
    /// Per-memory reader wire bundles, for the emitter's clock-low memory
    /// read statements.
    pub reader_wires: Vec<ReaderWires>,
}

/// Synthesizes the auxiliary wires for one memory: `havoc_<m>`, and
/// per-port flattened `addr`/`data`/`en` for every reader, plus `mask` for
/// every writer.
fn synthesize_memory_wires(mem: &MemoryDecl) -> Vec<WireDecl> {
    let addr_width = addr_width_for_depth(mem.depth);
    let addr_ty = Type::UInt(addr_width);
    let mut wires = Vec::new();
    wires.push(WireDecl {
        name: format!("havoc_{}", mem.name),
        ty: mem.data_type,
    });
    for port in &mem.readers {
        wires.push(WireDecl {
            name: format!("{port}_addr"),
            ty: addr_ty,
        });
        wires.push(WireDecl {
            name: format!("{port}_data"),
            ty: mem.data_type,
        });
        wires.push(WireDecl {
            name: format!("{port}_en"),
            ty: Type::UInt(1),
        });
    }
    for port in &mem.writers {
        wires.push(WireDecl {
            name: format!("{port}_addr"),
            ty: addr_ty,
        });
        wires.push(WireDecl {
            name: format!("{port}_data"),
            ty: mem.data_type,
        });
        wires.push(WireDecl {
            name: format!("{port}_en"),
            ty: Type::UInt(1),
        });
        wires.push(WireDecl {
            name: format!("{port}_mask"),
            ty: Type::UInt(1),
        });
    }
    wires
}

/// The address bit width for a memory of the given depth:
/// `max(1, ceil(log2(depth)))`.
pub fn addr_width_for_depth(depth: u64) -> Width {
    if depth <= 1 {
        return 1;
    }
    let bits = (u64::BITS - (depth - 1).leading_zeros()) as Width;
    bits.max(1)
}

struct ClockTracker {
    clocks: Vec<Expr>,
}

impl ClockTracker {
    fn new() -> Self {
        Self { clocks: Vec::new() }
    }

    fn observe(&mut self, clock: &Expr) {
        if !self.clocks.contains(clock) {
            self.clocks.push(clock.clone());
        }
    }
}

/// Classifies a module's body into the six role-specific collections
/// described by the statement classifier's responsibility.
pub fn classify(module: &Module, sink: &DiagnosticSink) -> Result<ClassifiedModule, TranslateError> {
    let mut nodes = Vec::new();
    let mut register_order: Vec<String> = Vec::new();
    let mut register_by_name: HashMap<String, RegisterDecl> = HashMap::new();
    let mut memory_decls: Vec<MemoryDecl> = Vec::new();
    let mut memory_ports: HashMap<String, String> = HashMap::new(); // port name -> memory name
    let mut wire_decls = Vec::new();
    let mut register_assigns = Vec::new();
    let mut port_or_memfield_assigns = Vec::new();
    let mut reader_wires = Vec::new();
    let mut clocks = ClockTracker::new();

    let output_port_names: std::collections::HashSet<&str> = module
        .ports
        .iter()
        .filter(|p| p.direction == PortDirection::Output)
        .map(|p| p.name.as_str())
        .collect();

    for stmt in &module.body {
        match stmt {
            Statement::Node { name, value, ty } => {
                nodes.push(NodeDecl {
                    name: name.clone(),
                    value: value.clone(),
                    ty: *ty,
                });
            }
            Statement::Register {
                name,
                ty,
                clock,
                reset,
            } => {
                clocks.observe(clock);
                let init_value = match reset {
                    None => Expr::uint_literal(0, ty.width().unwrap_or(1)),
                    Some(expr) if expr.is_zero_literal() => expr.clone(),
                    Some(Expr::Reference { name: rname, .. })
                        if RESET_SIGNAL_NAMES.contains(&rname.as_str()) =>
                    {
                        Expr::uint_literal(0, ty.width().unwrap_or(1))
                    }
                    Some(_) => return Err(TranslateError::illegal_reset(name.clone())),
                };
                if register_by_name
                    .insert(
                        name.clone(),
                        RegisterDecl {
                            name: name.clone(),
                            ty: *ty,
                            init_value,
                        },
                    )
                    .is_none()
                {
                    register_order.push(name.clone());
                }
            }
            Statement::Memory(mem) => {
                if mem.write_latency != 1 || mem.read_latency != 0 || !mem.readwriters.is_empty() {
                    return Err(TranslateError::invariant_violated(format!(
                        "memory '{}' must have write-latency 1, read-latency 0, and no readwrite ports",
                        mem.name
                    )));
                }
                for port in mem.all_port_names() {
                    memory_ports.insert(port.to_string(), mem.name.clone());
                }
                wire_decls.extend(synthesize_memory_wires(mem));
                for port in &mem.readers {
                    reader_wires.push(ReaderWires {
                        memory: mem.name.clone(),
                        port: port.clone(),
                        addr: format!("{port}_addr"),
                        data: format!("{port}_data"),
                    });
                }
                memory_decls.push(mem.clone());
            }
            Statement::Connect { lhs, rhs } => {
                classify_connect(
                    lhs,
                    rhs,
                    &output_port_names,
                    &register_by_name,
                    &memory_ports,
                    &mut register_assigns,
                    &mut port_or_memfield_assigns,
                    &mut clocks,
                    sink,
                )?;
            }
        }
    }

    if clocks.clocks.len() > 1 {
        return Err(TranslateError::unsupported_module_shape(format!(
            "module '{}' uses {} distinct clock expressions, at most one is supported",
            module.name,
            clocks.clocks.len()
        )));
    }

    let register_decls = register_order
        .into_iter()
        .map(|name| register_by_name.remove(&name).expect("just inserted"))
        .collect();

    Ok(ClassifiedModule {
        name: module.name.clone(),
        ports: module.ports.clone(),
        nodes,
        register_decls,
        memory_decls,
        wire_decls,
        register_assigns,
        port_or_memfield_assigns,
        reader_wires,
    })
}

#[allow(clippy::too_many_arguments)]
fn classify_connect(
    lhs: &Expr,
    rhs: &Expr,
    output_port_names: &std::collections::HashSet<&str>,
    register_by_name: &HashMap<String, RegisterDecl>,
    memory_ports: &HashMap<String, String>,
    register_assigns: &mut Vec<Assign>,
    port_or_memfield_assigns: &mut Vec<Assign>,
    clocks: &mut ClockTracker,
    sink: &DiagnosticSink,
) -> Result<(), TranslateError> {
    match lhs {
        Expr::Reference { name, .. } if register_by_name.contains_key(name) => {
            register_assigns.push(Assign {
                target: name.clone(),
                rhs: rhs.clone(),
            });
            Ok(())
        }
        Expr::Reference { name, .. } if output_port_names.contains(name.as_str()) => {
            port_or_memfield_assigns.push(Assign {
                target: name.clone(),
                rhs: rhs.clone(),
            });
            Ok(())
        }
        Expr::SubField { parent, field, .. } => {
            let Some(port_name) = parent.root_reference_name() else {
                return Err(TranslateError::illegal_statement(
                    "connect lhs sub-field has no root reference".to_string(),
                ));
            };
            if !memory_ports.contains_key(port_name) {
                return Err(TranslateError::illegal_statement(format!(
                    "connect lhs '{port_name}.{field}' does not reference a known memory port"
                )));
            }
            if rhs.ty().is_clock() {
                clocks.observe(rhs);
                sink.emit(Diagnostic::warning(
                    DiagnosticCode::new(Category::Convention, 1),
                    format!("dropped clock-hook connect on memory port field '{port_name}.{field}'"),
                    Span::DUMMY,
                ).with_note(
                    "a memory port's clock field is not declared or assigned in the target; \
                     the single module clock already governs the write procedure's implicit step",
                ));
                Ok(())
            } else {
                port_or_memfield_assigns.push(Assign {
                    target: format!("{port_name}_{field}"),
                    rhs: rhs.clone(),
                });
                Ok(())
            }
        }
        _ => Err(TranslateError::illegal_statement(format!(
            "connect lhs {lhs:?} is not a register, output port, or memory port field"
        ))),
    }
}
