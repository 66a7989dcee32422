use serde::Serialize;

use crate::address::Address;
use crate::instruction::Instruction;

/// A maximal straight-line instruction run with one entry and one exit.
///
/// Instructions are stored in address order. Successor and predecessor
/// sets hold block start addresses; they are filled in during function
/// detection and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasicBlock {
    pub start: Address,
    /// Address one past the last instruction.
    pub end: Address,
    pub instructions: Vec<Instruction>,
    pub successors: Vec<Address>,
    pub predecessors: Vec<Address>,
}

impl BasicBlock {
    pub fn new(start: Address) -> Self {
        BasicBlock {
            start,
            end: start,
            instructions: Vec::new(),
            successors: Vec::new(),
            predecessors: Vec::new(),
        }
    }

    pub fn last_instruction(&self) -> Option<&Instruction> {
        self.instructions.last()
    }
}
