use arsen_ir::{CrossReference, InstructionKind, XrefKind};

use crate::context::AnalysisContext;
use crate::engine::AnalysisPass;
use crate::error::Result;

/// Records a cross-reference for every resolved control transfer and
/// wires caller/callee lists between detected functions.
///
/// One reference per decoded instruction; duplicates are not collapsed.
pub struct CrossReferencePass;

impl AnalysisPass for CrossReferencePass {
    fn name(&self) -> &str {
        "cross-references"
    }

    fn execute(&self, context: &AnalysisContext) -> Result<()> {
        let mut count = 0usize;
        for address in context.instruction_addresses() {
            let Some(instruction) = context.instruction(address) else {
                continue;
            };
            let Some(target) = instruction.target else {
                continue;
            };
            let kind = match instruction.kind {
                InstructionKind::Call => XrefKind::Call,
                InstructionKind::Jump | InstructionKind::ConditionalJump => XrefKind::Jump,
                _ => continue,
            };
            context.add_cross_reference(CrossReference {
                from: address,
                to: target,
                kind,
            });
            count += 1;
            if kind == XrefKind::Call && context.function(target).is_some() {
                context.update_function(target, |callee| callee.callers.push(address));
                if let Some(caller) = containing_function(context, address) {
                    context.update_function(caller, |f| f.callees.push(target));
                }
            }
        }
        log::debug!("recorded {count} cross-references");
        Ok(())
    }
}

/// Start address of the function whose range covers `address`, if any.
fn containing_function(
    context: &AnalysisContext,
    address: arsen_ir::Address,
) -> Option<arsen_ir::Address> {
    context
        .function_addresses()
        .into_iter()
        .filter(|&start| start <= address)
        .filter(|&start| {
            context
                .function(start)
                .is_some_and(|f| address.distance(start) < f.size.max(1))
        })
        .next_back()
}
