pub mod address;
pub mod arch;
pub mod basic_block;
pub mod cfg;
pub mod function;
pub mod instruction;
pub mod operand;
pub mod xref;

pub use address::Address;
pub use arch::{Architecture, Endianness};
pub use basic_block::BasicBlock;
pub use cfg::ControlFlowGraph;
pub use function::Function;
pub use instruction::{Instruction, InstructionKind};
pub use operand::{Operand, OperandKind};
pub use xref::{CrossReference, XrefKind};
