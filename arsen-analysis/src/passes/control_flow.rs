use arsen_ir::ControlFlowGraph;

use crate::context::AnalysisContext;
use crate::engine::AnalysisPass;
use crate::error::Result;

/// Validates the per-function graphs built during detection.
///
/// Block and edge construction happens in the detection pass; this
/// stage rebuilds each graph view and reports shape statistics, and is
/// the extension point for later flow analyses.
pub struct ControlFlowAnalysisPass;

impl AnalysisPass for ControlFlowAnalysisPass {
    fn name(&self) -> &str {
        "control-flow"
    }

    fn execute(&self, context: &AnalysisContext) -> Result<()> {
        let mut blocks = 0usize;
        let mut edges = 0usize;
        for address in context.function_addresses() {
            let Some(function) = context.function(address) else {
                continue;
            };
            let cfg = ControlFlowGraph::build(&function);
            blocks += cfg.block_count();
            edges += cfg
                .block_addresses()
                .map(|a| cfg.successors(a).len())
                .sum::<usize>();
        }
        log::debug!("control flow: {blocks} blocks, {edges} edges");
        Ok(())
    }
}
