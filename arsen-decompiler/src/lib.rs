pub mod emit;
pub mod region;
pub mod structure;
pub mod vars;

use std::panic::{AssertUnwindSafe, catch_unwind};

use arsen_ir::{ControlFlowGraph, Function, OperandKind};

use crate::emit::Emitter;
use crate::vars::VariableContext;

/// Generate C-like pseudocode for one function.
///
/// Never fails: any panic while structuring or emitting degrades to a
/// fixed stub for this function only, so one corrupt function cannot
/// poison a whole generation run.
pub fn generate_pseudocode(function: &Function) -> String {
    match catch_unwind(AssertUnwindSafe(|| generate_inner(function))) {
        Ok(text) => text,
        Err(_) => {
            log::error!("pseudocode generation panicked for {}", function.name);
            fallback_stub(&display_name(function))
        }
    }
}

fn generate_inner(function: &Function) -> String {
    let name = display_name(function);

    if function.basic_blocks.is_empty() {
        return format!("int {name}()\n{{\n}}");
    }

    let cfg = ControlFlowGraph::build(function);
    let mut vars = VariableContext::new();
    collect_variables(function, &mut vars);

    let mut out = format!("int {name}()\n{{\n");
    let locals = vars.all_variables();
    if !locals.is_empty() {
        for local in &locals {
            out.push_str("    int ");
            out.push_str(local);
            out.push_str(";\n");
        }
        out.push('\n');
    }

    let region = structure::build_region(&cfg);
    let mut emitter = Emitter::new(&cfg, &mut vars);
    emitter.emit_region(&region);
    out.push_str(&emitter.finish());

    out.push('}');
    out
}

/// Pre-assign every synthetic name so declarations precede first use.
fn collect_variables(function: &Function, vars: &mut VariableContext) {
    for block in &function.basic_blocks {
        for insn in &block.instructions {
            for op in &insn.operands {
                match op.kind {
                    OperandKind::Register => {
                        vars.for_register(&op.text);
                    }
                    OperandKind::Displacement => {
                        vars.for_stack_offset(op.value);
                    }
                    OperandKind::Memory => {
                        vars.for_memory(&op.text, op.value);
                    }
                    OperandKind::Immediate => {}
                }
            }
        }
    }
}

fn display_name(function: &Function) -> String {
    if function.name.is_empty() {
        Function::default_name(function.address)
    } else {
        function.name.clone()
    }
}

/// The minimal valid output substituted when generation fails.
pub fn fallback_stub(name: &str) -> String {
    format!("int {name}()\n{{\n    while (true)\n    {{\n        break;\n    }}\n}}")
}
