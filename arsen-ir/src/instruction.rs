use serde::Serialize;

use crate::address::Address;
use crate::operand::Operand;

/// Coarse instruction classification driving control-flow recovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InstructionKind {
    Normal,
    Call,
    Jump,
    ConditionalJump,
    Return,
    Nop,
}

/// One decoded machine instruction.
///
/// Created once by a disassembler call and never mutated afterwards.
/// `target` is the resolved branch destination, present for calls and
/// (conditional) jumps whose destination is statically known.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Instruction {
    pub address: Address,
    pub bytes: Vec<u8>,
    pub mnemonic: String,
    pub operands: Vec<Operand>,
    pub size: u32,
    pub kind: InstructionKind,
    pub target: Option<Address>,
}

impl Instruction {
    /// `mnemonic op1, op2` rendering for listings.
    pub fn full_text(&self) -> String {
        if self.operands.is_empty() {
            return self.mnemonic.clone();
        }
        let ops: Vec<&str> = self.operands.iter().map(|o| o.text.as_str()).collect();
        format!("{} {}", self.mnemonic, ops.join(", "))
    }

    /// Uppercase hex of the raw instruction bytes.
    pub fn bytes_hex(&self) -> String {
        use std::fmt::Write;
        let mut out = String::with_capacity(self.bytes.len() * 2);
        for b in &self.bytes {
            let _ = write!(out, "{b:02X}");
        }
        out
    }

    /// Address of the byte immediately following this instruction.
    pub fn next_address(&self) -> Address {
        self.address.add(self.size as i64)
    }
}
