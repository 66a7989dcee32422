use std::sync::Arc;

use crate::context::AnalysisContext;
use crate::engine::AnalysisPass;
use crate::error::Result;
use crate::events::{Event, EventBus};
use crate::pseudocode::PseudocodeService;

/// Pre-generates pseudocode for every detected function so later
/// lookups hit the service cache.
pub struct PseudocodeGenerationPass {
    service: Arc<PseudocodeService>,
    events: Arc<EventBus>,
}

impl PseudocodeGenerationPass {
    pub fn new(service: Arc<PseudocodeService>, events: Arc<EventBus>) -> Self {
        PseudocodeGenerationPass { service, events }
    }
}

impl AnalysisPass for PseudocodeGenerationPass {
    fn name(&self) -> &str {
        "pseudocode"
    }

    fn execute(&self, context: &AnalysisContext) -> Result<()> {
        self.service.clear_cache();
        let mut generated = 0usize;
        for address in context.function_addresses() {
            let Some(function) = context.function(address) else {
                continue;
            };
            self.service.generate(&function);
            generated += 1;
        }
        log::debug!("generated pseudocode for {generated} functions");
        self.events
            .publish(Event::PseudocodeGenerated { functions: generated });
        Ok(())
    }
}
