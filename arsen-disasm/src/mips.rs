use arsen_ir::{Address, Architecture, Instruction, InstructionKind, Operand};

use crate::{Disassembler, invalid_instruction};

const REG_NAMES: [&str; 32] = [
    "$zero", "$at", "$v0", "$v1", "$a0", "$a1", "$a2", "$a3", "$t0", "$t1", "$t2", "$t3", "$t4",
    "$t5", "$t6", "$t7", "$s0", "$s1", "$s2", "$s3", "$s4", "$s5", "$s6", "$s7", "$t8", "$t9",
    "$k0", "$k1", "$gp", "$sp", "$fp", "$ra",
];

/// MIPS32 decoder: fixed 4-byte big-endian words.
pub struct MipsDisassembler;

impl Disassembler for MipsDisassembler {
    fn architecture(&self) -> Architecture {
        Architecture::Mips
    }

    fn disassemble(&self, address: Address, data: &[u8], offset: usize) -> Instruction {
        if offset + 4 > data.len() {
            return invalid_instruction(address, data, offset);
        }
        let bytes = data[offset..offset + 4].to_vec();
        let word = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);

        if word == 0 {
            return fixed(address, bytes, "nop".into(), vec![], InstructionKind::Nop, None);
        }
        if word == 0x03E0_0008 {
            return fixed(
                address,
                bytes,
                "jr".into(),
                vec![Operand::register("$ra")],
                InstructionKind::Return,
                None,
            );
        }

        match word >> 26 {
            // J/JAL: region-form target within the current 256 MiB segment.
            2 | 3 => {
                let link = (word >> 26) == 3;
                let index = (word & 0x03FF_FFFF) as u64;
                let target =
                    Address::new((address.value().wrapping_add(4) & 0xF000_0000) | (index << 2));
                let (mnemonic, kind) = if link {
                    ("jal", InstructionKind::Call)
                } else {
                    ("j", InstructionKind::Jump)
                };
                fixed(
                    address,
                    bytes,
                    mnemonic.into(),
                    vec![Operand::immediate(target.to_string(), target.value() as i64)],
                    kind,
                    Some(target),
                )
            }
            // BEQ/BNE: 16-bit word offset relative to the delay slot.
            4 | 5 => {
                let mnemonic = if (word >> 26) == 4 { "beq" } else { "bne" };
                let rs = ((word >> 21) & 0x1F) as usize;
                let rt = ((word >> 16) & 0x1F) as usize;
                let imm = (word & 0xFFFF) as i16 as i64;
                let target = address.add(4 + imm * 4);
                fixed(
                    address,
                    bytes,
                    mnemonic.into(),
                    vec![
                        Operand::register(REG_NAMES[rs]),
                        Operand::register(REG_NAMES[rt]),
                        Operand::immediate(target.to_string(), target.value() as i64),
                    ],
                    InstructionKind::ConditionalJump,
                    Some(target),
                )
            }
            _ => fixed(
                address,
                bytes,
                format!(".word 0x{word:08X}"),
                vec![],
                InstructionKind::Normal,
                None,
            ),
        }
    }

    fn max_instruction_size(&self) -> usize {
        4
    }
}

fn fixed(
    address: Address,
    bytes: Vec<u8>,
    mnemonic: String,
    operands: Vec<Operand>,
    kind: InstructionKind,
    target: Option<Address>,
) -> Instruction {
    Instruction {
        address,
        bytes,
        mnemonic,
        operands,
        size: 4,
        kind,
        target,
    }
}
