mod control_flow;
mod function_detection;
mod pseudocode_gen;
mod strings;
mod xref;

pub use control_flow::ControlFlowAnalysisPass;
pub use function_detection::FunctionDetectionPass;
pub use pseudocode_gen::PseudocodeGenerationPass;
pub use strings::StringAnalysisPass;
pub use xref::CrossReferencePass;
