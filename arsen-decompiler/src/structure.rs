use std::collections::BTreeSet;

use arsen_ir::{Address, ControlFlowGraph, InstructionKind};

use crate::region::Region;

/// Recover a region tree from a CFG.
///
/// Structuring handles straight-line code and if/else only: blocks are
/// visited in ascending address order, fall-through chains merge into
/// sequences, and two-way conditional exits become if/then(/else). Back
/// edges and multi-way exits are left as plain blocks; the emitter's
/// linear fallback guarantees their instructions still appear. Visited
/// marking makes the recursion terminate on cyclic graphs.
pub fn build_region(cfg: &ControlFlowGraph) -> Region {
    let order: Vec<Address> = cfg.block_addresses().collect();
    if order.is_empty() {
        return Region::Sequence(Vec::new());
    }

    let mut visited = BTreeSet::new();
    let mut regions = Vec::new();

    for addr in order {
        if visited.contains(&addr) {
            continue;
        }
        if let Some(region) = detect(addr, cfg, &mut visited) {
            regions.push(region);
        }
    }

    Region::Sequence(regions)
}

fn detect(addr: Address, cfg: &ControlFlowGraph, visited: &mut BTreeSet<Address>) -> Option<Region> {
    if visited.contains(&addr) {
        return None;
    }
    let block = cfg.block(addr)?;
    visited.insert(addr);

    let successors = cfg.successors(addr);

    if successors.is_empty() {
        return Some(Region::Block(addr));
    }

    if successors.len() == 1 {
        let next = successors[0];
        let preds_of_next = cfg.predecessors(next);

        // Only merge a pure fall-through chain; a join point (loop header,
        // diamond merge) is structured independently when reached in order.
        if preds_of_next == [addr] {
            let mut seq = vec![Region::Block(addr)];
            if let Some(next_region) = detect(next, cfg, visited) {
                seq.push(next_region);
            }
            return Some(Region::Sequence(seq));
        }
        return Some(Region::Block(addr));
    }

    if successors.len() == 2
        && block
            .last_instruction()
            .is_some_and(|i| i.kind == InstructionKind::ConditionalJump)
    {
        let true_target = successors[0];
        let false_target = successors[1];

        let condition = block
            .last_instruction()
            .map(|i| condition_for(&i.mnemonic))
            .unwrap_or_else(|| "condition".to_string());

        let true_region = detect(true_target, cfg, visited);
        let false_region = detect(false_target, cfg, visited);

        let mut seq = vec![Region::Block(addr)];
        match (true_region, false_region) {
            (Some(t), Some(f)) => seq.push(Region::IfThenElse {
                condition,
                then_body: vec![t],
                else_body: vec![f],
            }),
            (Some(t), None) => seq.push(Region::IfThen {
                condition,
                body: vec![t],
            }),
            (None, Some(f)) => seq.push(Region::IfThen {
                condition,
                body: vec![f],
            }),
            (None, None) => {}
        }
        return Some(Region::Sequence(seq));
    }

    // Irreducible or unstructured shape: emit the raw block only.
    Some(Region::Block(addr))
}

/// Synthesize a condition expression from a conditional-branch mnemonic.
pub fn condition_for(mnemonic: &str) -> String {
    let expr = match mnemonic {
        "jz" | "je" => "v1 == 0",
        "jnz" | "jne" => "v1 != 0",
        "jg" | "jgt" => "v1 > v2",
        "jl" | "jlt" => "v1 < v2",
        "jge" => "v1 >= v2",
        "jle" => "v1 <= v2",
        "beq" => "v1 == v2",
        "bne" => "v1 != v2",
        "bgt" => "v1 > v2",
        "blt" => "v1 < v2",
        _ => "condition",
    };
    expr.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condition_table_covers_both_styles() {
        assert_eq!(condition_for("je"), "v1 == 0");
        assert_eq!(condition_for("jne"), "v1 != 0");
        assert_eq!(condition_for("jge"), "v1 >= v2");
        assert_eq!(condition_for("jle"), "v1 <= v2");
        assert_eq!(condition_for("beq"), "v1 == v2");
        assert_eq!(condition_for("blt"), "v1 < v2");
        assert_eq!(condition_for("bsr"), "condition");
    }
}
