use std::collections::BTreeMap;

use crate::address::Address;
use crate::basic_block::BasicBlock;
use crate::function::Function;

/// Control-flow graph for a single function.
///
/// Blocks are keyed by start address; adjacency lists are copied out of
/// the blocks and sorted so iteration order is deterministic. Built fresh
/// per function and read-only once constructed.
#[derive(Debug, Clone)]
pub struct ControlFlowGraph {
    blocks: BTreeMap<Address, BasicBlock>,
    successors: BTreeMap<Address, Vec<Address>>,
    predecessors: BTreeMap<Address, Vec<Address>>,
    entry: Option<Address>,
}

impl ControlFlowGraph {
    /// Build the graph from a function's basic blocks.
    ///
    /// The lowest-address block becomes the entry. A function with no
    /// blocks yields an empty graph with no entry, not an error.
    pub fn build(function: &Function) -> Self {
        let mut blocks = BTreeMap::new();
        let mut successors = BTreeMap::new();
        let mut predecessors = BTreeMap::new();

        for block in &function.basic_blocks {
            let start = block.start;

            let mut succ = block.successors.clone();
            succ.sort_unstable();
            successors.insert(start, succ);

            let mut pred = block.predecessors.clone();
            pred.sort_unstable();
            predecessors.insert(start, pred);

            blocks.insert(start, block.clone());
        }

        let entry = blocks.keys().next().copied();

        ControlFlowGraph {
            blocks,
            successors,
            predecessors,
            entry,
        }
    }

    pub fn entry(&self) -> Option<Address> {
        self.entry
    }

    pub fn block(&self, address: Address) -> Option<&BasicBlock> {
        self.blocks.get(&address)
    }

    pub fn blocks(&self) -> &BTreeMap<Address, BasicBlock> {
        &self.blocks
    }

    pub fn successors(&self, address: Address) -> &[Address] {
        self.successors.get(&address).map_or(&[], Vec::as_slice)
    }

    pub fn predecessors(&self, address: Address) -> &[Address] {
        self.predecessors.get(&address).map_or(&[], Vec::as_slice)
    }

    /// Block start addresses in ascending order.
    pub fn block_addresses(&self) -> impl Iterator<Item = Address> + '_ {
        self.blocks.keys().copied()
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::{Instruction, InstructionKind};

    fn block(start: u64, end: u64, succs: &[u64], preds: &[u64]) -> BasicBlock {
        BasicBlock {
            start: Address::new(start),
            end: Address::new(end),
            instructions: vec![Instruction {
                address: Address::new(start),
                bytes: vec![0x90],
                mnemonic: "nop".into(),
                operands: vec![],
                size: 1,
                kind: InstructionKind::Nop,
                target: None,
            }],
            successors: succs.iter().map(|&a| Address::new(a)).collect(),
            predecessors: preds.iter().map(|&a| Address::new(a)).collect(),
        }
    }

    fn function(blocks: Vec<BasicBlock>) -> Function {
        Function {
            address: Address::new(0x1000),
            name: Function::default_name(Address::new(0x1000)),
            size: 0x30,
            basic_blocks: blocks,
            callers: vec![],
            callees: vec![],
        }
    }

    #[test]
    fn empty_function_yields_empty_graph() {
        let cfg = ControlFlowGraph::build(&function(vec![]));
        assert!(cfg.is_empty());
        assert_eq!(cfg.entry(), None);
        assert!(cfg.successors(Address::new(0x1000)).is_empty());
    }

    #[test]
    fn entry_is_lowest_block() {
        let cfg = ControlFlowGraph::build(&function(vec![
            block(0x1010, 0x1020, &[], &[0x1000]),
            block(0x1000, 0x1010, &[0x1010], &[]),
        ]));
        assert_eq!(cfg.entry(), Some(Address::new(0x1000)));
        assert_eq!(cfg.block_count(), 2);
    }

    #[test]
    fn predecessors_invert_successors() {
        let cfg = ControlFlowGraph::build(&function(vec![
            block(0x1000, 0x1010, &[0x1010, 0x1020], &[]),
            block(0x1010, 0x1020, &[0x1020], &[0x1000]),
            block(0x1020, 0x1030, &[], &[0x1010, 0x1000]),
        ]));
        for from in cfg.block_addresses().collect::<Vec<_>>() {
            for &to in cfg.successors(from) {
                assert!(
                    cfg.predecessors(to).contains(&from),
                    "{to} should list {from} as predecessor"
                );
            }
        }
        for to in cfg.block_addresses().collect::<Vec<_>>() {
            for &from in cfg.predecessors(to) {
                assert!(
                    cfg.successors(from).contains(&to),
                    "{from} should list {to} as successor"
                );
            }
        }
    }

    #[test]
    fn adjacency_is_sorted() {
        let cfg = ControlFlowGraph::build(&function(vec![
            block(0x1000, 0x1010, &[0x1020, 0x1010], &[]),
            block(0x1010, 0x1020, &[], &[0x1000]),
            block(0x1020, 0x1030, &[], &[0x1000]),
        ]));
        let succ = cfg.successors(Address::new(0x1000));
        assert_eq!(succ, &[Address::new(0x1010), Address::new(0x1020)]);
    }
}
