pub mod binary;
pub mod error;
pub mod loader;
pub mod section;

pub use binary::{BinaryFile, BinaryFormat};
pub use error::{Error, Result};
pub use loader::load_raw;
pub use section::{Section, SectionFlags};
