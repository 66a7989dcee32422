use std::path::PathBuf;
use std::sync::Arc;

use arsen_analysis::passes::FunctionDetectionPass;
use arsen_analysis::{AnalysisContext, AnalysisPass, Config, EventBus, PseudocodeService};
use arsen_file::{BinaryFile, BinaryFormat, Section, SectionFlags};
use arsen_ir::{Address, Architecture, Endianness, XrefKind};

fn image(code: Vec<u8>, base: u64, entry: u64) -> Arc<BinaryFile> {
    let size = code.len() as u64;
    Arc::new(BinaryFile {
        path: PathBuf::from("test.bin"),
        format: BinaryFormat::Raw,
        architecture: Architecture::X86_64,
        endianness: Endianness::Little,
        bitness: 64,
        entry_point: Address(entry),
        sections: vec![Section {
            name: ".raw".into(),
            virtual_address: Address(base),
            virtual_size: size,
            raw_address: Address(0),
            raw_size: size,
            flags: SectionFlags::READ | SectionFlags::EXECUTE,
            data: code,
        }],
    })
}

// Two functions: the entry with a conditional, and a call target.
//
// 0x1000  push rbp
// 0x1001  call 0x1010
// 0x1006  je   0x100A
// 0x1008  pop  rbp
// 0x1009  ret
// 0x100A  nop
// 0x100B  ret
// 0x100C  nop nop nop nop (padding)
// 0x1010  ret
fn sample() -> Arc<BinaryFile> {
    image(
        vec![
            0x55, 0xE8, 0x0A, 0x00, 0x00, 0x00, 0x74, 0x02, 0x5D, 0xC3, 0x90, 0xC3, 0x90, 0x90,
            0x90, 0x90, 0xC3,
        ],
        0x1000,
        0x1000,
    )
}

fn analyze(binary: Arc<BinaryFile>) -> Arc<arsen_analysis::AnalysisResult> {
    let events = Arc::new(EventBus::new());
    let pseudocode = Arc::new(PseudocodeService::new());
    let config = Config {
        worker_threads: 2,
        ..Config::default()
    };
    let engine = arsen_analysis::AnalysisEngine::new(events, pseudocode, &config).unwrap();
    engine.analyze(binary).wait().unwrap()
}

#[test]
fn detects_entry_and_call_target() {
    let result = analyze(sample());
    let starts: Vec<Address> = result.functions.keys().copied().collect();
    assert_eq!(starts, vec![Address(0x1000), Address(0x1010)]);
    let main = &result.functions[&Address(0x1000)];
    assert_eq!(main.name, "SUB_0000000000001000");
    assert_eq!(main.size, 0xC);
    assert_eq!(main.instruction_count(), 7);
    let callee = &result.functions[&Address(0x1010)];
    assert_eq!(callee.instruction_count(), 1);
}

#[test]
fn blocks_partition_the_function() {
    let result = analyze(sample());
    let main = &result.functions[&Address(0x1000)];
    let starts: Vec<Address> = main.basic_blocks.iter().map(|b| b.start).collect();
    assert_eq!(starts, vec![Address(0x1000), Address(0x1008), Address(0x100A)]);

    // Every instruction lands in exactly one block.
    let total: usize = main.basic_blocks.iter().map(|b| b.instructions.len()).sum();
    assert_eq!(total, main.instruction_count());
    for block in &main.basic_blocks {
        for insn in &block.instructions {
            assert!(insn.address >= block.start && insn.address < block.end);
        }
    }
}

#[test]
fn predecessors_invert_successors() {
    let result = analyze(sample());
    let main = &result.functions[&Address(0x1000)];
    let entry_block = &main.basic_blocks[0];
    assert_eq!(entry_block.successors.len(), 2);
    assert!(entry_block.successors.contains(&Address(0x100A)));
    assert!(entry_block.successors.contains(&Address(0x1008)));
    for block in &main.basic_blocks {
        for &succ in &block.successors {
            let target = main.basic_blocks.iter().find(|b| b.start == succ);
            if let Some(target) = target {
                assert!(target.predecessors.contains(&block.start));
            }
        }
    }
}

#[test]
fn records_call_and_jump_references() {
    let result = analyze(sample());
    assert!(result.cross_references.contains(&arsen_ir::CrossReference {
        from: Address(0x1001),
        to: Address(0x1010),
        kind: XrefKind::Call,
    }));
    assert!(result.cross_references.contains(&arsen_ir::CrossReference {
        from: Address(0x1006),
        to: Address(0x100A),
        kind: XrefKind::Jump,
    }));
    let callee = &result.functions[&Address(0x1010)];
    assert_eq!(callee.callers, vec![Address(0x1001)]);
    let main = &result.functions[&Address(0x1000)];
    assert_eq!(main.callees, vec![Address(0x1010)]);
}

#[test]
fn pseudocode_is_cached_for_every_function() {
    let binary = sample();
    let events = Arc::new(EventBus::new());
    let pseudocode = Arc::new(PseudocodeService::new());
    let config = Config {
        worker_threads: 2,
        ..Config::default()
    };
    let engine =
        arsen_analysis::AnalysisEngine::new(events, pseudocode.clone(), &config).unwrap();
    let result = engine.analyze(binary).wait().unwrap();
    assert_eq!(pseudocode.cached_count(), result.functions.len());
    let text = pseudocode.generate(&result.functions[&Address(0x1010)]);
    assert!(text.starts_with("int SUB_0000000000001010()"));
}

#[test]
fn nop_terminated_block_gets_no_fallthrough_edge() {
    // je +2; nop; nop; ret — the middle block is closed by the branch
    // target leader at 0x1004 and ends in a nop, which contributes no
    // successor edge. Only the conditional branch fans out.
    let result = analyze(image(vec![0x74, 0x02, 0x90, 0x90, 0xC3], 0x1000, 0x1000));
    let main = &result.functions[&Address(0x1000)];
    let starts: Vec<Address> = main.basic_blocks.iter().map(|b| b.start).collect();
    assert_eq!(starts, vec![Address(0x1000), Address(0x1002), Address(0x1004)]);

    let entry = &main.basic_blocks[0];
    assert!(entry.successors.contains(&Address(0x1004)));
    assert!(entry.successors.contains(&Address(0x1002)));

    let middle = &main.basic_blocks[1];
    assert!(middle.successors.is_empty());

    let target = &main.basic_blocks[2];
    assert_eq!(target.predecessors, vec![Address(0x1000)]);
}

#[test]
fn traversal_stops_at_the_instruction_cap() {
    // 20,000 reachable instructions against the default cap of 10,000.
    let mut code = vec![0x90u8; 20_000];
    code.push(0xC3);
    let binary = image(code, 0x1000, 0x1000);
    let context = AnalysisContext::new(binary);
    let pass = FunctionDetectionPass::new(10_000);
    pass.execute(&context).unwrap();
    let function = context.function(Address(0x1000)).unwrap();
    assert_eq!(function.instruction_count(), 10_000);
}

#[test]
fn unmapped_entry_yields_degenerate_function() {
    let binary = image(vec![0xC3], 0x1000, 0x9000);
    let result = analyze(binary);
    let function = &result.functions[&Address(0x9000)];
    assert_eq!(function.size, 0);
    assert!(function.basic_blocks.is_empty());
    assert_eq!(function.name, "SUB_0000000000009000");
}

#[test]
fn strings_come_from_readable_sections() {
    let mut code = b"AB\x00CDEF\x01hello\x00".to_vec();
    code.push(0xC3);
    let result = analyze(image(code, 0x1000, 0x1000));
    assert!(result.strings.contains(&"CDEF".to_owned()));
    assert!(result.strings.contains(&"hello".to_owned()));
    assert!(!result.strings.iter().any(|s| s == "AB"));
}
