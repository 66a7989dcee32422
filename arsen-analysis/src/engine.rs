use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::mpsc;

use arsen_file::BinaryFile;
use parking_lot::RwLock;

use crate::config::Config;
use crate::context::{AnalysisContext, AnalysisResult};
use crate::error::{AnalysisError, Result};
use crate::events::{Event, EventBus};
use crate::passes;
use crate::pseudocode::PseudocodeService;

/// One stage of the analysis pipeline.
///
/// Passes run sequentially in registration order and communicate only
/// through the shared [`AnalysisContext`].
pub trait AnalysisPass: Send + Sync {
    fn name(&self) -> &str;
    fn execute(&self, context: &AnalysisContext) -> Result<()>;
}

/// Runs the registered passes over a loaded binary on a worker pool.
pub struct AnalysisEngine {
    pool: rayon::ThreadPool,
    passes: RwLock<Vec<Arc<dyn AnalysisPass>>>,
    events: Arc<EventBus>,
}

impl AnalysisEngine {
    /// Builds an engine with the standard pass pipeline.
    pub fn new(
        events: Arc<EventBus>,
        pseudocode: Arc<PseudocodeService>,
        config: &Config,
    ) -> Result<Self> {
        let engine = AnalysisEngine::with_passes(events.clone(), config, Vec::new())?;
        engine.register_pass(Arc::new(passes::FunctionDetectionPass::new(
            config.max_function_instructions,
        )));
        engine.register_pass(Arc::new(passes::ControlFlowAnalysisPass));
        engine.register_pass(Arc::new(passes::CrossReferencePass));
        engine.register_pass(Arc::new(passes::StringAnalysisPass::new(
            config.min_string_length,
        )));
        engine.register_pass(Arc::new(passes::PseudocodeGenerationPass::new(
            pseudocode, events,
        )));
        Ok(engine)
    }

    /// Builds an engine with an explicit pass list.
    pub fn with_passes(
        events: Arc<EventBus>,
        config: &Config,
        passes: Vec<Arc<dyn AnalysisPass>>,
    ) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.worker_threads)
            .thread_name(|i| format!("analysis-{i}"))
            .build()
            .map_err(|e| AnalysisError::ThreadPool(e.to_string()))?;
        Ok(AnalysisEngine {
            pool,
            passes: RwLock::new(passes),
            events,
        })
    }

    /// Appends a pass to the pipeline. Runs after the standard passes.
    pub fn register_pass(&self, pass: Arc<dyn AnalysisPass>) {
        self.passes.write().push(pass);
    }

    pub fn pass_names(&self) -> Vec<String> {
        self.passes.read().iter().map(|p| p.name().to_owned()).collect()
    }

    /// Starts an analysis run and returns a handle to its result.
    ///
    /// A failing pass is logged and skipped; the remaining passes still
    /// run and the run still completes with whatever was collected.
    pub fn analyze(&self, binary: Arc<BinaryFile>) -> AnalysisHandle {
        let (sender, receiver) = mpsc::channel();
        let passes: Vec<Arc<dyn AnalysisPass>> = self.passes.read().clone();
        let events = self.events.clone();
        events.publish(Event::AnalysisStarted {
            path: binary.path.clone(),
        });
        self.pool.spawn(move || {
            let context = AnalysisContext::new(binary);
            let total = passes.len();
            for (index, pass) in passes.iter().enumerate() {
                log::debug!("running analysis pass: {}", pass.name());
                let outcome = catch_unwind(AssertUnwindSafe(|| pass.execute(&context)));
                match outcome {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => {
                        log::error!("analysis pass {} failed: {e}", pass.name());
                        events.publish(Event::Error {
                            message: format!("pass {} failed: {e}", pass.name()),
                        });
                    }
                    Err(_) => {
                        log::error!("analysis pass {} panicked", pass.name());
                        events.publish(Event::Error {
                            message: format!("pass {} panicked", pass.name()),
                        });
                    }
                }
                let percent = ((index + 1) * 100 / total) as u32;
                events.publish(Event::AnalysisProgress { percent });
            }
            let result = Arc::new(context.snapshot());
            log::info!(
                "analysis complete: {} functions, {} instructions, {} strings",
                result.functions.len(),
                result.instructions.len(),
                result.strings.len()
            );
            events.publish(Event::AnalysisCompleted {
                result: result.clone(),
            });
            let _ = sender.send(result);
        });
        AnalysisHandle { receiver }
    }
}

/// Awaitable handle to an in-flight analysis run.
pub struct AnalysisHandle {
    receiver: mpsc::Receiver<Arc<AnalysisResult>>,
}

impl AnalysisHandle {
    /// Blocks until the run finishes.
    pub fn wait(self) -> Result<Arc<AnalysisResult>> {
        self.receiver.recv().map_err(|_| AnalysisError::WorkerLost)
    }
}
