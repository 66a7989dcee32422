use serde::Serialize;

use crate::address::Address;
use crate::basic_block::BasicBlock;

/// A discovered function: entry address, display name, size in bytes,
/// and its basic blocks in address order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Function {
    pub address: Address,
    pub name: String,
    pub size: u64,
    pub basic_blocks: Vec<BasicBlock>,
    pub callers: Vec<Address>,
    pub callees: Vec<Address>,
}

impl Function {
    /// Canonical name for a function with no resolved symbol.
    pub fn default_name(address: Address) -> String {
        format!("SUB_{:016X}", address.value())
    }

    /// A degenerate zero-size record for an entry point with no decoded
    /// instructions. Never silently dropped by detection.
    pub fn empty(address: Address) -> Self {
        Function {
            address,
            name: Self::default_name(address),
            size: 0,
            basic_blocks: Vec::new(),
            callers: Vec::new(),
            callees: Vec::new(),
        }
    }

    pub fn instruction_count(&self) -> usize {
        self.basic_blocks.iter().map(|b| b.instructions.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_name_is_uppercase_hex() {
        assert_eq!(
            Function::default_name(Address::new(0x40_1000)),
            "SUB_0000000000401000"
        );
    }
}
