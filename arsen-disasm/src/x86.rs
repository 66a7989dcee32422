use arsen_ir::{Address, Architecture, Instruction, InstructionKind, Operand};

use crate::{Disassembler, invalid_instruction};

const REGS_32: [&str; 8] = ["eax", "ecx", "edx", "ebx", "esp", "ebp", "esi", "edi"];
const REGS_64: [&str; 8] = ["rax", "rcx", "rdx", "rbx", "rsp", "rbp", "rsi", "rdi"];

/// Short conditional jumps 0x70..=0x7F, in opcode order.
const JCC_MNEMONICS: [&str; 16] = [
    "jo", "jno", "jb", "jae", "je", "jne", "jbe", "ja", "js", "jns", "jp", "jnp", "jl", "jge",
    "jle", "jg",
];

/// x86/x86-64 decoder for a representative opcode subset.
///
/// Unrecognized opcodes become 1-byte `db 0x..` data pseudo-instructions
/// so a linear sweep can always make progress.
pub struct X86Disassembler {
    architecture: Architecture,
}

impl X86Disassembler {
    pub fn new(architecture: Architecture) -> Self {
        X86Disassembler { architecture }
    }

    fn register_name(&self, index: usize) -> &'static str {
        let table = if self.architecture == Architecture::X86_64 {
            &REGS_64
        } else {
            &REGS_32
        };
        table[index & 7]
    }

    /// `call`/`jmp` rel32: target = address + size + displacement.
    fn decode_rel32(
        &self,
        address: Address,
        data: &[u8],
        offset: usize,
        mnemonic: &str,
        kind: InstructionKind,
    ) -> Instruction {
        if offset + 5 > data.len() {
            return invalid_instruction(address, data, offset);
        }
        let displacement = i32::from_le_bytes([
            data[offset + 1],
            data[offset + 2],
            data[offset + 3],
            data[offset + 4],
        ]);
        let target = address.add(5 + displacement as i64);
        Instruction {
            address,
            bytes: data[offset..offset + 5].to_vec(),
            mnemonic: mnemonic.into(),
            operands: vec![Operand::immediate(target.to_string(), target.value() as i64)],
            size: 5,
            kind,
            target: Some(target),
        }
    }

    fn decode_jcc_rel8(&self, address: Address, data: &[u8], offset: usize) -> Instruction {
        if offset + 2 > data.len() {
            return invalid_instruction(address, data, offset);
        }
        let opcode = data[offset];
        let displacement = data[offset + 1] as i8;
        let target = address.add(2 + displacement as i64);
        Instruction {
            address,
            bytes: data[offset..offset + 2].to_vec(),
            mnemonic: JCC_MNEMONICS[(opcode - 0x70) as usize].into(),
            operands: vec![Operand::immediate(target.to_string(), target.value() as i64)],
            size: 2,
            kind: InstructionKind::ConditionalJump,
            target: Some(target),
        }
    }

    fn single_byte(
        &self,
        address: Address,
        byte: u8,
        mnemonic: String,
        operands: Vec<Operand>,
        kind: InstructionKind,
    ) -> Instruction {
        Instruction {
            address,
            bytes: vec![byte],
            mnemonic,
            operands,
            size: 1,
            kind,
            target: None,
        }
    }
}

impl Disassembler for X86Disassembler {
    fn architecture(&self) -> Architecture {
        self.architecture
    }

    fn disassemble(&self, address: Address, data: &[u8], offset: usize) -> Instruction {
        let Some(&opcode) = data.get(offset) else {
            return invalid_instruction(address, data, offset);
        };

        match opcode {
            0x90 => self.single_byte(address, opcode, "nop".into(), vec![], InstructionKind::Nop),
            0xC3 => self.single_byte(
                address,
                opcode,
                "ret".into(),
                vec![],
                InstructionKind::Return,
            ),
            0xE8 => self.decode_rel32(address, data, offset, "call", InstructionKind::Call),
            0xE9 => self.decode_rel32(address, data, offset, "jmp", InstructionKind::Jump),
            0x70..=0x7F => self.decode_jcc_rel8(address, data, offset),
            0x50..=0x57 => self.single_byte(
                address,
                opcode,
                "push".into(),
                vec![Operand::register(self.register_name((opcode - 0x50) as usize))],
                InstructionKind::Normal,
            ),
            0x58..=0x5F => self.single_byte(
                address,
                opcode,
                "pop".into(),
                vec![Operand::register(self.register_name((opcode - 0x58) as usize))],
                InstructionKind::Normal,
            ),
            _ => self.single_byte(
                address,
                opcode,
                format!("db 0x{opcode:02X}"),
                vec![],
                InstructionKind::Normal,
            ),
        }
    }

    fn max_instruction_size(&self) -> usize {
        15
    }
}
