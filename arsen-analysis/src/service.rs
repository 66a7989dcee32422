use std::path::Path;
use std::sync::Arc;

use arsen_file::{self, BinaryFile};
use arsen_ir::{Address, Architecture, Instruction};
use parking_lot::RwLock;

use crate::cache::CacheManager;
use crate::config::Config;
use crate::context::AnalysisResult;
use crate::engine::{AnalysisEngine, AnalysisHandle};
use crate::error::{AnalysisError, Result};
use crate::events::{Event, EventBus};
use crate::pseudocode::PseudocodeService;

/// Facade tying the loader, engine, caches and decompiler together.
///
/// Holds the currently loaded binary and the most recent analysis
/// result. All collaborators are injected or built from the supplied
/// configuration; nothing here is process-global.
pub struct BinaryService {
    engine: AnalysisEngine,
    events: Arc<EventBus>,
    caches: CacheManager,
    pseudocode: Arc<PseudocodeService>,
    current_binary: RwLock<Option<Arc<BinaryFile>>>,
    current_analysis: RwLock<Option<Arc<AnalysisResult>>>,
}

impl BinaryService {
    pub fn new(events: Arc<EventBus>, config: &Config) -> Result<Self> {
        let pseudocode = Arc::new(PseudocodeService::new());
        let engine = AnalysisEngine::new(events.clone(), pseudocode.clone(), config)?;
        Ok(BinaryService {
            engine,
            events,
            caches: CacheManager::new(config),
            pseudocode,
            current_binary: RwLock::new(None),
            current_analysis: RwLock::new(None),
        })
    }

    /// Maps a flat image and makes it the current binary.
    ///
    /// Loading a new binary discards the previous analysis and flushes
    /// every cache.
    pub fn load_binary(
        &self,
        path: &Path,
        architecture: Architecture,
        base: u64,
        entry: Option<u64>,
    ) -> Result<Arc<BinaryFile>> {
        let binary = match arsen_file::load_raw(path, architecture, base, entry) {
            Ok(binary) => Arc::new(binary),
            Err(e) => {
                self.events.publish(Event::Error {
                    message: format!("failed to load {}: {e}", path.display()),
                });
                return Err(e.into());
            }
        };
        *self.current_binary.write() = Some(binary.clone());
        *self.current_analysis.write() = None;
        self.caches.clear_all();
        self.pseudocode.clear_cache();
        self.events.publish(Event::BinaryLoaded {
            path: binary.path.clone(),
        });
        log::info!("loaded {} ({architecture})", binary.path.display());
        Ok(binary)
    }

    /// Starts analyzing the current binary on the worker pool.
    pub fn analyze(&self) -> Result<AnalysisHandle> {
        let binary = self
            .current_binary
            .read()
            .clone()
            .ok_or(AnalysisError::NoBinaryLoaded)?;
        Ok(self.engine.analyze(binary))
    }

    /// Runs a full analysis and stores the result for later queries.
    pub fn analyze_blocking(&self) -> Result<Arc<AnalysisResult>> {
        let result = self.analyze()?.wait()?;
        *self.current_analysis.write() = Some(result.clone());
        Ok(result)
    }

    pub fn current_binary(&self) -> Option<Arc<BinaryFile>> {
        self.current_binary.read().clone()
    }

    pub fn current_analysis(&self) -> Result<Arc<AnalysisResult>> {
        self.current_analysis
            .read()
            .clone()
            .ok_or(AnalysisError::NoAnalysisAvailable)
    }

    /// Pseudocode for the function starting at `address`, memoized by
    /// the pseudocode service.
    pub fn pseudocode_for(&self, address: Address) -> Result<String> {
        let analysis = self.current_analysis()?;
        let function = analysis
            .function(address)
            .ok_or(AnalysisError::UnknownFunction(address))?;
        Ok(self.pseudocode.generate(function))
    }

    /// Decoded instruction at `address`, served from the bounded cache
    /// when possible.
    pub fn instruction_at(&self, address: Address) -> Result<Option<Instruction>> {
        if let Some(hit) = self.caches.instruction(address) {
            return Ok(Some(hit));
        }
        let analysis = self.current_analysis()?;
        let instruction = analysis.instructions.get(&address).cloned();
        if let Some(instruction) = &instruction {
            self.caches.put_instruction(instruction.clone());
        }
        Ok(instruction)
    }

    pub fn clear_caches(&self) {
        self.caches.clear_all();
        self.pseudocode.clear_cache();
    }
}
