use std::fs::File;
use std::path::Path;

use memmap2::Mmap;

use arsen_ir::{Address, Architecture, Endianness};

use crate::binary::{BinaryFile, BinaryFormat};
use crate::error::Result;
use crate::section::{Section, SectionFlags};

/// Load a flat binary image as a single readable, executable section.
///
/// This is the interface-boundary stand-in for the format-aware loaders
/// (ELF/PE/Mach-O), which are outside the analysis core. The whole file
/// becomes one `.raw` section mapped at `base`, with the entry point at
/// `entry` (or `base` when unspecified).
pub fn load_raw(
    path: &Path,
    architecture: Architecture,
    base: u64,
    entry: Option<u64>,
) -> Result<BinaryFile> {
    let file = File::open(path)?;
    // SAFETY: the mapping is copied into an owned buffer before the file
    // handle is dropped; no view outlives the map.
    let mmap = unsafe { Mmap::map(&file)? };
    if mmap.is_empty() {
        return Err(crate::error::Error::FileTooSmall(0));
    }

    log::info!("Loaded raw image {} ({} bytes)", path.display(), mmap.len());

    let endianness = match architecture {
        Architecture::PowerPc | Architecture::Mips => Endianness::Big,
        _ => Endianness::Little,
    };
    let bitness = match architecture {
        Architecture::X86 | Architecture::Arm | Architecture::Mips => 32,
        _ => 64,
    };

    let section = Section {
        name: ".raw".into(),
        virtual_address: Address::new(base),
        virtual_size: mmap.len() as u64,
        raw_address: Address::new(0),
        raw_size: mmap.len() as u64,
        flags: SectionFlags::READ | SectionFlags::EXECUTE,
        data: mmap.to_vec(),
    };

    Ok(BinaryFile {
        path: path.to_path_buf(),
        format: BinaryFormat::Raw,
        architecture,
        endianness,
        bitness,
        entry_point: Address::new(entry.unwrap_or(base)),
        sections: vec![section],
    })
}
