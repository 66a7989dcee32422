use std::fmt::Write;

use arsen_ir::{
    BasicBlock, ControlFlowGraph, Function, Instruction, InstructionKind, Operand, OperandKind,
};

use crate::region::Region;
use crate::vars::VariableContext;

/// Renders a region tree as C-like pseudocode.
pub struct Emitter<'a> {
    cfg: &'a ControlFlowGraph,
    vars: &'a mut VariableContext,
    out: String,
    indent: usize,
}

impl<'a> Emitter<'a> {
    pub fn new(cfg: &'a ControlFlowGraph, vars: &'a mut VariableContext) -> Self {
        Emitter {
            cfg,
            vars,
            out: String::new(),
            indent: 1,
        }
    }

    pub fn finish(self) -> String {
        self.out
    }

    pub fn emit_region(&mut self, region: &Region) {
        match region {
            Region::Sequence(children) => {
                for child in children {
                    self.emit_region(child);
                }
            }
            Region::Block(addr) => {
                if let Some(block) = self.cfg.block(*addr) {
                    self.emit_block(block);
                }
            }
            Region::IfThen { condition, body } => {
                self.line(&format!("if ({condition})"));
                self.braced(body);
            }
            Region::IfThenElse {
                condition,
                then_body,
                else_body,
            } => {
                self.line(&format!("if ({condition})"));
                self.braced(then_body);
                self.line("else");
                self.braced(else_body);
            }
            Region::WhileLoop { condition, body } => {
                self.line(&format!("while ({condition})"));
                self.braced(body);
            }
            Region::DoWhileLoop { condition, body } => {
                self.line("do");
                self.braced(body);
                let last = self.out.trim_end_matches('\n').len();
                self.out.truncate(last);
                let _ = writeln!(self.out, " while ({condition});");
            }
            Region::InfiniteLoop { body } => {
                self.line("while (true)");
                self.braced(body);
            }
            Region::Switch { selector, cases } => {
                self.line(&format!("switch ({selector})"));
                self.braced(cases);
            }
            Region::Unknown(children) => self.linear_fallback(children),
        }
    }

    fn braced(&mut self, children: &[Region]) {
        self.line("{");
        self.indent += 1;
        for child in children {
            self.emit_region(child);
        }
        self.indent -= 1;
        self.line("}");
    }

    /// Pre-order flattening for shapes the structurer gave up on: every
    /// leaf block reachable in the tree is still emitted, losing nesting
    /// but never dropping instructions.
    fn linear_fallback(&mut self, children: &[Region]) {
        let mut stack: Vec<&Region> = children.iter().rev().collect();
        while let Some(region) = stack.pop() {
            match region {
                Region::Block(addr) => {
                    if let Some(block) = self.cfg.block(*addr) {
                        self.emit_block(block);
                    }
                }
                Region::Sequence(inner) | Region::Unknown(inner) => {
                    stack.extend(inner.iter().rev());
                }
                Region::IfThen { body, .. }
                | Region::WhileLoop { body, .. }
                | Region::DoWhileLoop { body, .. }
                | Region::InfiniteLoop { body }
                | Region::Switch { cases: body, .. } => {
                    stack.extend(body.iter().rev());
                }
                Region::IfThenElse {
                    then_body,
                    else_body,
                    ..
                } => {
                    stack.extend(else_body.iter().rev());
                    stack.extend(then_body.iter().rev());
                }
            }
        }
    }

    fn emit_block(&mut self, block: &BasicBlock) {
        for insn in &block.instructions {
            self.emit_instruction(insn);
        }
    }

    fn emit_instruction(&mut self, insn: &Instruction) {
        match insn.kind {
            InstructionKind::Return => {
                if let Some(op) = insn.operands.first() {
                    let expr = self.expression(op);
                    self.line(&format!("return {expr};"));
                } else {
                    self.line("return;");
                }
            }
            InstructionKind::Nop => {}
            InstructionKind::Call => {
                let callee = if let Some(target) = insn.target {
                    Function::default_name(target)
                } else if let Some(op) = insn.operands.first() {
                    self.expression(op)
                } else {
                    "unknown_call".to_string()
                };
                self.line(&format!("{callee}();"));
            }
            // Control transfers are captured structurally.
            InstructionKind::Jump | InstructionKind::ConditionalJump => {}
            InstructionKind::Normal => {
                if let Some(stmt) = self.translate(insn) {
                    self.line(&format!("{stmt};"));
                }
            }
        }
    }

    /// Mnemonic-family pattern matching. `None` means the instruction is
    /// suppressed (flag setters, stack bookkeeping).
    fn translate(&mut self, insn: &Instruction) -> Option<String> {
        let mnemonic = insn.mnemonic.to_lowercase();
        let ops = &insn.operands;

        if mnemonic.starts_with("mov") && ops.len() == 2 {
            let dst = self.lvalue(&ops[0]);
            let src = self.expression(&ops[1]);
            return Some(format!("{dst} = {src}"));
        }
        if mnemonic.starts_with("lea") && ops.len() == 2 {
            let dst = self.lvalue(&ops[0]);
            let src = self.expression(&ops[1]);
            return Some(format!("{dst} = &({src})"));
        }
        if ops.len() == 2 {
            if let Some(op) = arithmetic_operator(&mnemonic) {
                let dst = self.lvalue(&ops[0]);
                let src = self.expression(&ops[1]);
                return Some(format!("{dst} = {dst} {op} {src}"));
            }
        }
        if (mnemonic.starts_with("cmp") || mnemonic.starts_with("test")) && ops.len() == 2 {
            return None;
        }
        if mnemonic.starts_with("inc") && ops.len() == 1 {
            let dst = self.lvalue(&ops[0]);
            return Some(format!("{dst} = {dst} + 1"));
        }
        if mnemonic.starts_with("dec") && ops.len() == 1 {
            let dst = self.lvalue(&ops[0]);
            return Some(format!("{dst} = {dst} - 1"));
        }
        if mnemonic.starts_with("neg") && ops.len() == 1 {
            let dst = self.lvalue(&ops[0]);
            return Some(format!("{dst} = -{dst}"));
        }
        if mnemonic.starts_with("not") && ops.len() == 1 {
            let dst = self.lvalue(&ops[0]);
            return Some(format!("{dst} = ~{dst}"));
        }
        if mnemonic.starts_with("push") {
            return None;
        }
        if mnemonic.starts_with("pop") && ops.len() == 1 {
            let dst = self.lvalue(&ops[0]);
            return Some(format!("{dst} = stack_pop()"));
        }
        if mnemonic.starts_with("str") && ops.len() == 2 {
            let dst = self.lvalue(&ops[0]);
            let src = self.expression(&ops[1]);
            return Some(format!("*({dst}) = {src}"));
        }
        if mnemonic.starts_with("ldr") && ops.len() == 2 {
            let dst = self.lvalue(&ops[0]);
            let src = self.expression(&ops[1]);
            return Some(format!("{dst} = *({src})"));
        }

        // Untranslatable instruction: keep it visible as a comment.
        self.line(&format!("// {}", insn.full_text()));
        None
    }

    fn lvalue(&mut self, op: &Operand) -> String {
        match op.kind {
            OperandKind::Register => self.vars.for_register(&op.text),
            OperandKind::Memory => self.vars.for_memory(&op.text, op.value),
            OperandKind::Displacement => self.vars.for_stack_offset(op.value),
            OperandKind::Immediate => self.expression(op),
        }
    }

    fn expression(&mut self, op: &Operand) -> String {
        match op.kind {
            OperandKind::Register => self.vars.for_register(&op.text),
            OperandKind::Immediate => {
                if op.value < 10 {
                    op.value.to_string()
                } else {
                    format!("0x{:X}", op.value)
                }
            }
            OperandKind::Memory => self.vars.for_memory(&op.text, op.value),
            OperandKind::Displacement => self.vars.for_stack_offset(op.value),
        }
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.indent * 4 {
            self.out.push(' ');
        }
        self.out.push_str(text);
        self.out.push('\n');
    }
}

fn arithmetic_operator(mnemonic: &str) -> Option<&'static str> {
    if mnemonic.starts_with("add") {
        Some("+")
    } else if mnemonic.starts_with("sub") {
        Some("-")
    } else if mnemonic.starts_with("mul") || mnemonic.starts_with("imul") {
        Some("*")
    } else if mnemonic.starts_with("and") {
        Some("&")
    } else if mnemonic.starts_with("xor") {
        Some("^")
    } else if mnemonic.starts_with("or") {
        Some("|")
    } else if mnemonic.starts_with("shl") || mnemonic.starts_with("sal") {
        Some("<<")
    } else if mnemonic.starts_with("shr") || mnemonic.starts_with("sar") {
        Some(">>")
    } else {
        None
    }
}
