//! Analysis pipeline: function detection, control flow, cross
//! references, string extraction and pseudocode generation, driven by
//! an engine running on a bounded worker pool.

pub mod cache;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod events;
pub mod passes;
pub mod pseudocode;
pub mod service;

pub use cache::{BoundedCache, CacheManager};
pub use config::Config;
pub use context::{AnalysisContext, AnalysisResult};
pub use engine::{AnalysisEngine, AnalysisHandle, AnalysisPass};
pub use error::{AnalysisError, Result};
pub use events::{Event, EventBus};
pub use pseudocode::PseudocodeService;
pub use service::BinaryService;
