//! Module emission: renders a [`ClassifiedModule`] to transition-system
//! text in a fixed section order.

use std::fmt::Write as _;

use crate::classify::{addr_width_for_depth, ClassifiedModule};
use crate::config::TranslatorConfig;
use crate::error::TranslateError;
use crate::memwrite::synthesize_write_procedure;
use crate::serialize::{serialize_expr, serialize_memory_type, serialize_type};
use crate::stmt::PortDirection;
use crate::types::Type;

/// Port names never declared in the emitted module: the clock (and any
/// well-known reset signal, when present as a port) are structural, not
/// data, in the target language.
fn is_structural_port(name: &str, ty: &Type) -> bool {
    ty.is_clock() || crate::classify::RESET_SIGNAL_NAMES.contains(&name)
}

struct Writer {
    out: String,
    indent_width: usize,
    level: usize,
}

impl Writer {
    fn new(indent_width: usize) -> Self {
        Self {
            out: String::new(),
            indent_width,
            level: 0,
        }
    }

    fn line(&mut self, text: &str) {
        if text.is_empty() {
            let _ = writeln!(self.out);
        } else {
            let pad = " ".repeat(self.indent_width * self.level);
            let _ = writeln!(self.out, "{pad}{text}");
        }
    }

    fn indent(&mut self) {
        self.level += 1;
    }

    fn dedent(&mut self) {
        self.level = self.level.saturating_sub(1);
    }
}

/// Emits a classified module to transition-system text, per the fixed
/// section order: module header, port/register/memory/wire/node
/// declarations, `init`, write procedures, `next`, assumptions,
/// invariants, and an optional `control` block.
pub fn emit_module(
    classified: &ClassifiedModule,
    config: &TranslatorConfig,
    bmc_steps: Option<u32>,
    assumption_refs: &[String],
    property_refs: &[String],
) -> Result<String, TranslateError> {
    let mut w = Writer::new(config.indent_width);

    w.line(&format!("module {} {{", classified.name));
    w.indent();

    emit_ports(&mut w, classified)?;
    emit_registers(&mut w, classified)?;
    emit_memories(&mut w, classified)?;
    emit_wires(&mut w, classified)?;
    emit_nodes(&mut w, classified)?;

    w.line("init {");
    w.indent();
    emit_init(&mut w, classified)?;
    w.dedent();
    w.line("}");
    w.line("");

    let procedures: Vec<_> = classified
        .memory_decls
        .iter()
        .map(synthesize_write_procedure)
        .collect();
    for proc in &procedures {
        if proc.modifies.is_empty() {
            w.line(&format!("procedure write_mem_{}() {{", proc.memory));
        } else {
            w.line(&format!(
                "procedure write_mem_{}() modifies {}; {{",
                proc.memory,
                proc.modifies.join(", ")
            ));
        }
        w.indent();
        for l in &proc.lines {
            w.line(l);
        }
        w.dedent();
        w.line("}");
        w.line("");
    }

    w.line("next {");
    w.indent();
    for proc in &procedures {
        w.line(&format!("call write_mem_{}();", proc.memory));
    }
    for assign in &classified.register_assigns {
        let rhs = serialize_expr(&assign.rhs, false)?;
        w.line(&format!("{}' = {rhs};", assign.target));
    }
    for node in &classified.nodes {
        let rhs = serialize_expr(&node.value, true)?;
        w.line(&format!("{}' = {rhs};", node.name));
    }
    for reader in &classified.reader_wires {
        w.line(&format!(
            "{}' = {}[{}'];",
            reader.data, reader.memory, reader.addr
        ));
    }
    for assign in &classified.port_or_memfield_assigns {
        let rhs = serialize_expr(&assign.rhs, true)?;
        w.line(&format!("{}' = {rhs};", assign.target));
    }
    w.dedent();
    w.line("}");
    w.line("");

    for reference in assumption_refs {
        w.line(&format!("assume assert_{reference} : {reference};"));
    }
    for reference in property_refs {
        w.line(&format!("invariant assert_{reference} : {reference};"));
    }

    if let Some(steps) = bmc_steps {
        w.line("");
        w.line("control {");
        w.indent();
        w.line(&format!("vobj = unroll({steps});"));
        w.line("check;");
        w.line("print_results();");
        w.line("vobj.print_cex();");
        w.dedent();
        w.line("}");
    }

    w.dedent();
    w.line("}");

    Ok(w.out)
}

fn emit_ports(w: &mut Writer, classified: &ClassifiedModule) -> Result<(), TranslateError> {
    for port in &classified.ports {
        if is_structural_port(&port.name, &port.ty) {
            continue;
        }
        let dir = match port.direction {
            PortDirection::Input => "input",
            PortDirection::Output => "output",
        };
        let ty = serialize_type(&port.ty)?;
        w.line(&format!("{dir} {} : {ty};", port.name));
    }
    w.line("");
    Ok(())
}

fn emit_registers(w: &mut Writer, classified: &ClassifiedModule) -> Result<(), TranslateError> {
    if classified.register_decls.is_empty() {
        return Ok(());
    }
    w.line("// Registers");
    for reg in &classified.register_decls {
        let ty = serialize_type(&reg.ty)?;
        w.line(&format!("var {} : {ty};", reg.name));
    }
    w.line("");
    Ok(())
}

fn emit_memories(w: &mut Writer, classified: &ClassifiedModule) -> Result<(), TranslateError> {
    if classified.memory_decls.is_empty() {
        return Ok(());
    }
    w.line("// Memories");
    for mem in &classified.memory_decls {
        let addr_width = addr_width_for_depth(mem.depth);
        let ty = serialize_memory_type(addr_width, &mem.data_type)?;
        w.line(&format!("var {} : {ty};", mem.name));
    }
    w.line("");
    Ok(())
}

fn emit_wires(w: &mut Writer, classified: &ClassifiedModule) -> Result<(), TranslateError> {
    if classified.wire_decls.is_empty() {
        return Ok(());
    }
    w.line("// Wires");
    for wire in &classified.wire_decls {
        let ty = serialize_type(&wire.ty)?;
        w.line(&format!("var {} : {ty};", wire.name));
    }
    w.line("");
    Ok(())
}

fn emit_nodes(w: &mut Writer, classified: &ClassifiedModule) -> Result<(), TranslateError> {
    if classified.nodes.is_empty() {
        return Ok(());
    }
    w.line("// Nodes");
    for node in &classified.nodes {
        let ty = serialize_type(&node.ty)?;
        w.line(&format!("var {} : {ty};", node.name));
    }
    w.line("");
    Ok(())
}

fn emit_init(w: &mut Writer, classified: &ClassifiedModule) -> Result<(), TranslateError> {
    for mem in &classified.memory_decls {
        let addr_width = addr_width_for_depth(mem.depth);
        let zero = crate::expr::Expr::Literal {
            value: 0,
            width: mem.data_type.width().unwrap_or(1),
            signed: mem.data_type.is_signed(),
        };
        w.line(&format!(
            "assume (forall (a : bv{addr_width}) :: {}[a] == {});",
            mem.name,
            serialize_expr(&zero, false)?
        ));
    }
    for reg in &classified.register_decls {
        let value = serialize_expr(&reg.init_value, false)?;
        w.line(&format!("{} = {value};", reg.name));
    }
    for node in &classified.nodes {
        let rhs = serialize_expr(&node.value, false)?;
        w.line(&format!("{} = {rhs};", node.name));
    }
    for assign in &classified.port_or_memfield_assigns {
        let rhs = serialize_expr(&assign.rhs, false)?;
        w.line(&format!("{} = {rhs};", assign.target));
    }
    Ok(())
}
