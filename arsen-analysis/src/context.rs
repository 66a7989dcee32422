use std::collections::BTreeMap;
use std::sync::Arc;

use arsen_file::BinaryFile;
use arsen_ir::{Address, CrossReference, Function, Instruction};
use dashmap::DashMap;
use serde::Serialize;

/// Shared mutable state the analysis passes write into.
///
/// All containers are internally synchronized so passes can record
/// results without external locking.
pub struct AnalysisContext {
    binary: Arc<BinaryFile>,
    instructions: DashMap<Address, Instruction>,
    functions: DashMap<Address, Function>,
    cross_references: boxcar::Vec<CrossReference>,
    strings: boxcar::Vec<String>,
}

impl AnalysisContext {
    pub fn new(binary: Arc<BinaryFile>) -> Self {
        AnalysisContext {
            binary,
            instructions: DashMap::new(),
            functions: DashMap::new(),
            cross_references: boxcar::Vec::new(),
            strings: boxcar::Vec::new(),
        }
    }

    pub fn binary(&self) -> &BinaryFile {
        &self.binary
    }

    pub fn add_instruction(&self, instruction: Instruction) {
        self.instructions.insert(instruction.address, instruction);
    }

    pub fn instruction(&self, address: Address) -> Option<Instruction> {
        self.instructions.get(&address).map(|r| r.value().clone())
    }

    pub fn has_instruction(&self, address: Address) -> bool {
        self.instructions.contains_key(&address)
    }

    pub fn instruction_count(&self) -> usize {
        self.instructions.len()
    }

    pub fn instruction_addresses(&self) -> Vec<Address> {
        let mut addresses: Vec<Address> = self.instructions.iter().map(|r| *r.key()).collect();
        addresses.sort_unstable();
        addresses
    }

    pub fn add_function(&self, function: Function) {
        self.functions.insert(function.address, function);
    }

    pub fn function(&self, address: Address) -> Option<Function> {
        self.functions.get(&address).map(|r| r.value().clone())
    }

    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    pub fn function_addresses(&self) -> Vec<Address> {
        let mut addresses: Vec<Address> = self.functions.iter().map(|r| *r.key()).collect();
        addresses.sort_unstable();
        addresses
    }

    pub fn update_function<F>(&self, address: Address, update: F)
    where
        F: FnOnce(&mut Function),
    {
        if let Some(mut entry) = self.functions.get_mut(&address) {
            update(entry.value_mut());
        }
    }

    pub fn add_cross_reference(&self, xref: CrossReference) {
        self.cross_references.push(xref);
    }

    pub fn add_string(&self, string: String) {
        self.strings.push(string);
    }

    /// Freezes the mutable state into an immutable, sorted result.
    pub fn snapshot(&self) -> AnalysisResult {
        AnalysisResult {
            instructions: self
                .instructions
                .iter()
                .map(|r| (*r.key(), r.value().clone()))
                .collect(),
            functions: self
                .functions
                .iter()
                .map(|r| (*r.key(), r.value().clone()))
                .collect(),
            cross_references: self.cross_references.iter().map(|(_, x)| *x).collect(),
            strings: self.strings.iter().map(|(_, s)| s.clone()).collect(),
        }
    }
}

/// Immutable outcome of one analysis run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysisResult {
    pub instructions: BTreeMap<Address, Instruction>,
    pub functions: BTreeMap<Address, Function>,
    pub cross_references: Vec<CrossReference>,
    pub strings: Vec<String>,
}

impl AnalysisResult {
    pub fn function(&self, address: Address) -> Option<&Function> {
        self.functions.get(&address)
    }
}
