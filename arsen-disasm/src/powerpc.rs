use arsen_ir::{Address, Architecture, Instruction, InstructionKind};

use crate::{Disassembler, invalid_instruction};

/// The canonical PowerPC NOP encoding (`ori 0,0,0`).
const PPC_NOP: u32 = 0x6000_0000;

/// PowerPC decoder: every instruction is one 4-byte big-endian word.
///
/// Words other than the canonical NOP are emitted as raw `.long` data.
pub struct PowerPcDisassembler;

impl Disassembler for PowerPcDisassembler {
    fn architecture(&self) -> Architecture {
        Architecture::PowerPc
    }

    fn disassemble(&self, address: Address, data: &[u8], offset: usize) -> Instruction {
        if offset + 4 > data.len() {
            return invalid_instruction(address, data, offset);
        }
        let bytes = data[offset..offset + 4].to_vec();
        let word = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);

        let (mnemonic, kind) = if word == PPC_NOP {
            ("nop".to_string(), InstructionKind::Nop)
        } else {
            (format!(".long 0x{word:08X}"), InstructionKind::Normal)
        };

        Instruction {
            address,
            bytes,
            mnemonic,
            operands: Vec::new(),
            size: 4,
            kind,
            target: None,
        }
    }

    fn max_instruction_size(&self) -> usize {
        4
    }
}
