use arsen_ir::{Address, Architecture, Instruction, InstructionKind, Operand};

use crate::{Disassembler, invalid_instruction};

/// Branch mnemonic suffixes by condition field, `al` rendered empty.
const CONDITION_SUFFIXES: [&str; 15] = [
    "eq", "ne", "cs", "cc", "mi", "pl", "vs", "vc", "hi", "ls", "ge", "lt", "gt", "le", "",
];

/// A32 decoder: fixed 4-byte little-endian words.
pub struct ArmDisassembler {
    architecture: Architecture,
}

impl ArmDisassembler {
    pub fn new(architecture: Architecture) -> Self {
        ArmDisassembler { architecture }
    }

    fn word(&self, address: Address, word: u32, bytes: Vec<u8>) -> Instruction {
        // Canonical encodings first.
        if word == 0xE1A0_0000 {
            return fixed(address, bytes, "nop".into(), vec![], InstructionKind::Nop, None);
        }
        if word == 0xE12F_FF1E {
            return fixed(
                address,
                bytes,
                "bx".into(),
                vec![Operand::register("lr")],
                InstructionKind::Return,
                None,
            );
        }

        // B/BL: cond(4) 101 L offset(24); target is pc-relative with the
        // two-instruction pipeline offset.
        if (word & 0x0E00_0000) == 0x0A00_0000 {
            let cond = (word >> 28) as usize & 0xF;
            let link = word & (1 << 24) != 0;
            let offset24 = ((word & 0x00FF_FFFF) as i32) << 8 >> 8;
            let target = address.add(8 + (offset24 as i64) * 4);

            let (mnemonic, kind) = if link {
                ("bl".to_string(), InstructionKind::Call)
            } else if cond < 14 {
                (format!("b{}", CONDITION_SUFFIXES[cond]), InstructionKind::ConditionalJump)
            } else {
                ("b".to_string(), InstructionKind::Jump)
            };

            return fixed(
                address,
                bytes,
                mnemonic,
                vec![Operand::immediate(target.to_string(), target.value() as i64)],
                kind,
                Some(target),
            );
        }

        // MOV rd, #imm (data-processing immediate, rotated 8-bit value).
        if (word & 0x0FE0_0000) == 0x03A0_0000 {
            let rd = (word >> 12) & 0xF;
            let rotate = ((word >> 8) & 0xF) * 2;
            let imm = (word & 0xFF).rotate_right(rotate);
            return fixed(
                address,
                bytes,
                "mov".into(),
                vec![
                    Operand::register(format!("r{rd}")),
                    Operand::immediate(format!("#{imm}"), imm as i64),
                ],
                InstructionKind::Normal,
                None,
            );
        }

        fixed(
            address,
            bytes,
            format!(".word 0x{word:08X}"),
            vec![],
            InstructionKind::Normal,
            None,
        )
    }
}

impl Disassembler for ArmDisassembler {
    fn architecture(&self) -> Architecture {
        self.architecture
    }

    fn disassemble(&self, address: Address, data: &[u8], offset: usize) -> Instruction {
        if offset + 4 > data.len() {
            return invalid_instruction(address, data, offset);
        }
        let bytes = data[offset..offset + 4].to_vec();
        let word = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        self.word(address, word, bytes)
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
