use std::path::PathBuf;

use serde::Serialize;

use arsen_ir::{Address, Architecture, Endianness};

use crate::section::Section;

/// Container format the loader identified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryFormat {
    Raw,
    Elf,
    Pe,
    MachO,
}

/// An already-loaded binary image, as handed to the analysis core.
///
/// Produced by a loader (container parsing itself lives outside this
/// core); consumed read-only by every analysis pass.
#[derive(Debug, Clone, Serialize)]
pub struct BinaryFile {
    pub path: PathBuf,
    pub format: BinaryFormat,
    pub architecture: Architecture,
    pub endianness: Endianness,
    pub bitness: u32,
    pub entry_point: Address,
    pub sections: Vec<Section>,
}

impl BinaryFile {
    pub fn section_by_address(&self, address: Address) -> Option<&Section> {
        self.sections.iter().find(|s| s.contains_address(address))
    }

    pub fn section_by_name(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }
}
