use bitflags::bitflags;
use serde::Serialize;

use arsen_ir::Address;

bitflags! {
    /// Section permission flags, matching the common PE characteristic bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    pub struct SectionFlags: u32 {
        const EXECUTE = 0x2000_0000;
        const READ = 0x4000_0000;
        const WRITE = 0x8000_0000;
    }
}

/// One loaded section: virtual placement, raw placement, and content.
#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub name: String,
    pub virtual_address: Address,
    pub virtual_size: u64,
    pub raw_address: Address,
    pub raw_size: u64,
    pub flags: SectionFlags,
    #[serde(skip)]
    pub data: Vec<u8>,
}

impl Section {
    pub fn is_executable(&self) -> bool {
        self.flags.contains(SectionFlags::EXECUTE)
    }

    pub fn is_readable(&self) -> bool {
        self.flags.contains(SectionFlags::READ)
    }

    pub fn is_writable(&self) -> bool {
        self.flags.contains(SectionFlags::WRITE)
    }

    pub fn contains_address(&self, address: Address) -> bool {
        let addr = address.value();
        let start = self.virtual_address.value();
        addr >= start && addr < start + self.virtual_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_containment() {
        let section = Section {
            name: ".text".into(),
            virtual_address: Address::new(0x1000),
            virtual_size: 0x200,
            raw_address: Address::new(0),
            raw_size: 0x200,
            flags: SectionFlags::READ | SectionFlags::EXECUTE,
            data: vec![],
        };
        assert!(section.contains_address(Address::new(0x1000)));
        assert!(section.contains_address(Address::new(0x11FF)));
        assert!(!section.contains_address(Address::new(0x1200)));
        assert!(section.is_executable());
        assert!(!section.is_writable());
    }

    #[test]
    fn sections_serialize_to_json() {
        let section = Section {
            name: ".text".into(),
            virtual_address: Address::new(0x1000),
            virtual_size: 0x200,
            raw_address: Address::new(0),
            raw_size: 0x200,
            flags: SectionFlags::READ | SectionFlags::EXECUTE,
            data: vec![0x90],
        };
        let json = serde_json::to_string(&section).unwrap();
        assert!(json.contains("EXECUTE"), "got: {json}");
        assert!(json.contains("READ"));
        // Raw content is skipped in listings.
        assert!(!json.contains("data"));
    }
}
