pub mod arm;
pub mod mips;
pub mod powerpc;
pub mod x86;

use arsen_ir::{Address, Architecture, Instruction, InstructionKind};

/// Errors from [`for_architecture`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DisasmError {
    /// No decoder exists for the requested architecture.
    #[error("no disassembler for architecture: {0}")]
    Unsupported(Architecture),
}

/// Decodes one instruction at a byte offset within a buffer.
///
/// Decoding never fails mid-buffer: when too few bytes remain for a
/// multi-byte form, implementations return a 1-byte `invalid` placeholder
/// so callers can advance and resynchronize.
pub trait Disassembler: Send + Sync {
    fn architecture(&self) -> Architecture;

    fn disassemble(&self, address: Address, data: &[u8], offset: usize) -> Instruction;

    /// Upper bound on encoded instruction length for this architecture.
    fn max_instruction_size(&self) -> usize;
}

/// Select the concrete decoder for an architecture.
pub fn for_architecture(
    architecture: Architecture,
) -> Result<Box<dyn Disassembler>, DisasmError> {
    match architecture {
        Architecture::X86 | Architecture::X86_64 => {
            Ok(Box::new(x86::X86Disassembler::new(architecture)))
        }
        Architecture::Arm | Architecture::Arm64 => {
            Ok(Box::new(arm::ArmDisassembler::new(architecture)))
        }
        Architecture::Mips => Ok(Box::new(mips::MipsDisassembler)),
        Architecture::PowerPc => Ok(Box::new(powerpc::PowerPcDisassembler)),
        Architecture::Unknown => Err(DisasmError::Unsupported(architecture)),
    }
}

/// The shared 1-byte resynchronization placeholder.
pub(crate) fn invalid_instruction(address: Address, data: &[u8], offset: usize) -> Instruction {
    log::trace!("undecodable byte at {address}, emitting placeholder");
    Instruction {
        address,
        bytes: vec![data.get(offset).copied().unwrap_or(0)],
        mnemonic: "invalid".into(),
        operands: Vec::new(),
        size: 1,
        kind: InstructionKind::Normal,
        target: None,
    }
}
