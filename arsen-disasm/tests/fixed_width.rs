use arsen_disasm::for_architecture;
use arsen_ir::{Address, Architecture, InstructionKind};

#[test]
fn powerpc_nop_and_raw_words() {
    let d = for_architecture(Architecture::PowerPc).unwrap();

    let nop = d.disassemble(Address::new(0x100), &[0x60, 0x00, 0x00, 0x00], 0);
    assert_eq!(nop.mnemonic, "nop");
    assert_eq!(nop.kind, InstructionKind::Nop);
    assert_eq!(nop.size, 4);

    let raw = d.disassemble(Address::new(0x104), &[0x7C, 0x08, 0x02, 0xA6], 0);
    assert_eq!(raw.mnemonic, ".long 0x7C0802A6");
    assert_eq!(raw.kind, InstructionKind::Normal);
    assert_eq!(raw.size, 4);
}

#[test]
fn powerpc_truncated_word_is_one_byte_invalid() {
    let d = for_architecture(Architecture::PowerPc).unwrap();
    let insn = d.disassemble(Address::new(0x100), &[0x60, 0x00], 0);
    assert_eq!(insn.mnemonic, "invalid");
    assert_eq!(insn.size, 1, "placeholder must advance exactly one byte");
}

#[test]
fn arm_branch_targets_include_pipeline_offset() {
    let d = for_architecture(Architecture::Arm).unwrap();

    // b +8 (offset24 = 2): target = 0x1000 + 8 + 8 = 0x1010
    let b = d.disassemble(Address::new(0x1000), &0xEA000002u32.to_le_bytes(), 0);
    assert_eq!(b.mnemonic, "b");
    assert_eq!(b.kind, InstructionKind::Jump);
    assert_eq!(b.target, Some(Address::new(0x1010)));

    // bl backward (offset24 = -4): target = 0x1000 + 8 - 16 = 0xFF8
    let bl = d.disassemble(Address::new(0x1000), &0xEBFFFFFCu32.to_le_bytes(), 0);
    assert_eq!(bl.mnemonic, "bl");
    assert_eq!(bl.kind, InstructionKind::Call);
    assert_eq!(bl.target, Some(Address::new(0xFF8)));

    // beq: condition field 0
    let beq = d.disassemble(Address::new(0x1000), &0x0A000000u32.to_le_bytes(), 0);
    assert_eq!(beq.mnemonic, "beq");
    assert_eq!(beq.kind, InstructionKind::ConditionalJump);
}

#[test]
fn arm_return_and_nop() {
    let d = for_architecture(Architecture::Arm).unwrap();

    let ret = d.disassemble(Address::new(0), &0xE12FFF1Eu32.to_le_bytes(), 0);
    assert_eq!(ret.full_text(), "bx lr");
    assert_eq!(ret.kind, InstructionKind::Return);

    let nop = d.disassemble(Address::new(0), &0xE1A00000u32.to_le_bytes(), 0);
    assert_eq!(nop.kind, InstructionKind::Nop);
}

#[test]
fn mips_jumps_and_branches() {
    let d = for_architecture(Architecture::Mips).unwrap();

    // jal 0x40: index 0x10, target = (0x1000+4) & 0xF0000000 | 0x40 = 0x40
    let jal = d.disassemble(Address::new(0x1000), &0x0C000010u32.to_be_bytes(), 0);
    assert_eq!(jal.mnemonic, "jal");
    assert_eq!(jal.kind, InstructionKind::Call);
    assert_eq!(jal.target, Some(Address::new(0x40)));

    // jr $ra
    let jr = d.disassemble(Address::new(0), &0x03E00008u32.to_be_bytes(), 0);
    assert_eq!(jr.full_text(), "jr $ra");
    assert_eq!(jr.kind, InstructionKind::Return);

    // beq $zero, $zero, +4 words: target = 0x1000 + 4 + 16 = 0x1014
    let beq = d.disassemble(Address::new(0x1000), &0x10000004u32.to_be_bytes(), 0);
    assert_eq!(beq.mnemonic, "beq");
    assert_eq!(beq.kind, InstructionKind::ConditionalJump);
    assert_eq!(beq.target, Some(Address::new(0x1014)));

    // all-zero word is the canonical nop
    let nop = d.disassemble(Address::new(0), &[0, 0, 0, 0], 0);
    assert_eq!(nop.mnemonic, "nop");
    assert_eq!(nop.kind, InstructionKind::Nop);
}

#[test]
fn fixed_width_decoders_report_max_size_4() {
    for arch in [Architecture::Arm, Architecture::Mips, Architecture::PowerPc] {
        let d = for_architecture(arch).unwrap();
        assert_eq!(d.max_instruction_size(), 4, "{arch}");
    }
}
