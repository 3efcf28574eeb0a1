//! Module-level declarations: ports, statements, and memories.

use serde::{Deserialize, Serialize};

use crate::expr::Expr;
use crate::types::Type;

/// The direction of a module port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortDirection {
    /// An input port.
    Input,
    /// An output port.
    Output,
}

/// A module port declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    /// The port name.
    pub name: String,
    /// The port direction.
    pub direction: PortDirection,
    /// The port type. `Type::Clock` ports are never declared in the target
    /// (see the module emitter).
    pub ty: Type,
}

/// A memory declaration.
///
/// Per the invariants this translator enforces, every memory must have
/// write-latency 1, read-latency 0, no readwrite ports, and a ground data
/// type — the last of which holds trivially since [`Type`] has no aggregate
/// variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryDecl {
    /// The memory's name.
    pub name: String,
    /// The element (data) type stored at each address.
    pub data_type: Type,
    /// The number of addressable elements.
    pub depth: u64,
    /// Write latency in cycles. Must be 1.
    pub write_latency: u32,
    /// Read latency in cycles. Must be 0.
    pub read_latency: u32,
    /// Names of read ports, in declaration order.
    pub readers: Vec<String>,
    /// Names of write ports, in declaration order.
    pub writers: Vec<String>,
    /// Names of combined read/write ports. Must be empty.
    pub readwriters: Vec<String>,
}

impl MemoryDecl {
    /// Returns every port name on this memory, in reader-then-writer-then-
    /// readwriter order.
    pub fn all_port_names(&self) -> impl Iterator<Item = &str> {
        self.readers
            .iter()
            .chain(self.writers.iter())
            .chain(self.readwriters.iter())
            .map(String::as_str)
    }
}

/// A statement in a module body.
///
/// This is the input shape the statement classifier (`crate::classify`)
/// consumes; it is deliberately flat rather than recursive (there is no
/// `Block`/`When` compound form) because the classifier's upstream passes
/// (out of scope for this translator) have already flattened conditional
/// assignment chains into a single unconditional `Connect` per lhs, with
/// any residual conditionality folded into `Mux` expressions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    /// A combinational node: an implicitly-declared named intermediate value.
    Node {
        /// The node's name.
        name: String,
        /// The value expression.
        value: Expr,
        /// The derived type (equal to `value.ty()` in well-formed input).
        ty: Type,
    },
    /// A register declaration.
    Register {
        /// The register's name.
        name: String,
        /// The register's type.
        ty: Type,
        /// The clock expression driving this register.
        clock: Expr,
        /// The reset expression. `None` means no reset; `Some` must resolve
        /// to a literal zero or a reference to a well-known reset signal
        /// name (see [`crate::classify::RESET_SIGNAL_NAMES`]) or the
        /// classifier rejects the module with `illegal-reset`.
        reset: Option<Expr>,
    },
    /// A memory declaration.
    Memory(MemoryDecl),
    /// An assignment to a register, output port, or memory port field.
    Connect {
        /// The assignment target.
        lhs: Expr,
        /// The assigned value.
        rhs: Expr,
    },
}

/// A single flat module: the unit of translation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    /// The module's name.
    pub name: String,
    /// The module's port list, in declaration order.
    pub ports: Vec<Port>,
    /// The module's body statements, in source order.
    pub body: Vec<Statement>,
}
