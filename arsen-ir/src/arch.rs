use serde::Serialize;

/// Instruction set architectures the disassembler factory can be keyed by.
///
/// `Unknown` is what a loader reports for machine types it cannot identify;
/// requesting a disassembler for it fails fast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Architecture {
    X86,
    X86_64,
    Arm,
    Arm64,
    Mips,
    PowerPc,
    Unknown,
}

impl std::fmt::Display for Architecture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Architecture::X86 => "x86",
            Architecture::X86_64 => "x86_64",
            Architecture::Arm => "arm",
            Architecture::Arm64 => "arm64",
            Architecture::Mips => "mips",
            Architecture::PowerPc => "powerpc",
            Architecture::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Byte order of the loaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Endianness {
    Little,
    Big,
}
