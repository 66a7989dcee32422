use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};

use arsen_disasm::Disassembler;
use arsen_ir::{Address, BasicBlock, Function, Instruction, InstructionKind};

use crate::context::AnalysisContext;
use crate::engine::AnalysisPass;
use crate::error::Result;

/// Seeds function starts from the entry point and call targets, then
/// traverses each start to build its instruction set and basic blocks.
pub struct FunctionDetectionPass {
    max_instructions: usize,
}

impl FunctionDetectionPass {
    pub fn new(max_instructions: usize) -> Self {
        FunctionDetectionPass { max_instructions }
    }

    fn sweep_section(
        &self,
        context: &AnalysisContext,
        disassembler: &dyn Disassembler,
        base: Address,
        data: &[u8],
        starts: &mut BTreeSet<Address>,
    ) {
        let mut offset = 0usize;
        while offset < data.len() {
            let address = base.add(offset as i64);
            let instruction = disassembler.disassemble(address, data, offset);
            // Placeholders decoded from invalid bytes always advance by
            // at least one byte, so the sweep terminates.
            let size = instruction.size.max(1) as usize;
            if instruction.kind == InstructionKind::Call {
                if let Some(target) = instruction.target {
                    starts.insert(target);
                }
            }
            context.add_instruction(instruction);
            offset += size;
        }
    }

    /// Follows fallthrough and branch edges from `start`, capped at
    /// `max_instructions` to keep pathological inputs bounded.
    fn analyze_function(&self, context: &AnalysisContext, start: Address) -> Function {
        let mut visited: HashSet<Address> = HashSet::new();
        let mut queue: VecDeque<Address> = VecDeque::new();
        let mut instructions: Vec<Instruction> = Vec::new();
        queue.push_back(start);
        while let Some(address) = queue.pop_front() {
            if instructions.len() >= self.max_instructions {
                log::warn!(
                    "function at {start} exceeds {} instructions, truncating",
                    self.max_instructions
                );
                break;
            }
            if !visited.insert(address) {
                continue;
            }
            let Some(instruction) = context.instruction(address) else {
                continue;
            };
            let kind = instruction.kind;
            let target = instruction.target;
            let next = instruction.next_address();
            instructions.push(instruction);
            if kind == InstructionKind::Return {
                continue;
            }
            if matches!(kind, InstructionKind::Jump | InstructionKind::ConditionalJump) {
                if let Some(target) = target {
                    queue.push_back(target);
                }
            }
            if kind != InstructionKind::Jump && context.has_instruction(next) {
                queue.push_back(next);
            }
        }
        if instructions.is_empty() {
            return Function::empty(start);
        }
        instructions.sort_by_key(|i| i.address);
        let size = instructions
            .last()
            .map(|last| last.next_address().distance(instructions[0].address))
            .unwrap_or(0);
        let basic_blocks = build_basic_blocks(&instructions);
        Function {
            address: start,
            name: Function::default_name(start),
            size,
            basic_blocks,
            callers: Vec::new(),
            callees: Vec::new(),
        }
    }
}

impl AnalysisPass for FunctionDetectionPass {
    fn name(&self) -> &str {
        "function-detection"
    }

    fn execute(&self, context: &AnalysisContext) -> Result<()> {
        let binary = context.binary();
        let disassembler = arsen_disasm::for_architecture(binary.architecture)?;
        let mut starts: BTreeSet<Address> = BTreeSet::new();
        starts.insert(binary.entry_point);
        for section in &binary.sections {
            if section.is_executable() {
                self.sweep_section(
                    context,
                    disassembler.as_ref(),
                    section.virtual_address,
                    &section.data,
                    &mut starts,
                );
            }
        }
        for start in starts {
            let function = self.analyze_function(context, start);
            context.add_function(function);
        }
        log::debug!("detected {} functions", context.function_count());
        Ok(())
    }
}

/// Partitions a sorted instruction list into basic blocks.
///
/// Leaders are the first instruction, every branch target, and every
/// instruction following a control transfer. Branch targets become
/// successor edges even when they fall outside the function; only
/// edges between blocks of this function get the predecessor inverse.
fn build_basic_blocks(instructions: &[Instruction]) -> Vec<BasicBlock> {
    let Some(first) = instructions.first() else {
        return Vec::new();
    };
    let mut leaders: BTreeSet<Address> = BTreeSet::new();
    leaders.insert(first.address);
    for instruction in instructions {
        if is_terminator(instruction.kind) {
            leaders.insert(instruction.next_address());
            if let Some(target) = instruction.target {
                leaders.insert(target);
            }
        }
    }

    let mut blocks: BTreeMap<Address, BasicBlock> = BTreeMap::new();
    let mut current: Option<BasicBlock> = None;
    for instruction in instructions {
        if leaders.contains(&instruction.address) {
            if let Some(block) = current.take() {
                blocks.insert(block.start, block);
            }
            current = Some(BasicBlock::new(instruction.address));
        }
        let terminator = is_terminator(instruction.kind);
        if let Some(block) = current.as_mut() {
            block.end = instruction.next_address();
            block.instructions.push(instruction.clone());
        }
        if terminator {
            if let Some(block) = current.take() {
                blocks.insert(block.start, block);
            }
        }
    }
    if let Some(block) = current.take() {
        blocks.insert(block.start, block);
    }

    let mut edges: Vec<(Address, Address)> = Vec::new();
    for block in blocks.values_mut() {
        let Some(last) = block.instructions.last() else {
            continue;
        };
        let kind = last.kind;
        if matches!(kind, InstructionKind::Jump | InstructionKind::ConditionalJump) {
            if let Some(target) = last.target {
                block.successors.push(target);
                edges.push((block.start, target));
            }
        }
        let falls_through = matches!(
            kind,
            InstructionKind::ConditionalJump | InstructionKind::Normal | InstructionKind::Call
        );
        if falls_through && leaders.contains(&last.next_address()) {
            let next = last.next_address();
            block.successors.push(next);
            edges.push((block.start, next));
        }
    }
    for (from, to) in edges {
        if let Some(block) = blocks.get_mut(&to) {
            block.predecessors.push(from);
        }
    }
    blocks.into_values().collect()
}

fn is_terminator(kind: InstructionKind) -> bool {
    matches!(
        kind,
        InstructionKind::Jump | InstructionKind::ConditionalJump | InstructionKind::Return
    )
}
