use std::collections::BTreeMap;

use arsen_ir::{Address, Function};
use dashmap::DashMap;

/// Memoizing front end over the decompiler.
///
/// Generated text is keyed by function start address and reused until
/// `clear_cache` is called, typically after a fresh analysis run.
#[derive(Default)]
pub struct PseudocodeService {
    cache: DashMap<Address, String>,
}

impl PseudocodeService {
    pub fn new() -> Self {
        PseudocodeService::default()
    }

    pub fn generate(&self, function: &Function) -> String {
        if let Some(hit) = self.cache.get(&function.address) {
            return hit.value().clone();
        }
        let text = arsen_decompiler::generate_pseudocode(function);
        self.cache.insert(function.address, text.clone());
        text
    }

    pub fn generate_all<'a, I>(&self, functions: I) -> BTreeMap<Address, String>
    where
        I: IntoIterator<Item = &'a Function>,
    {
        functions
            .into_iter()
            .map(|f| (f.address, self.generate(f)))
            .collect()
    }

    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memoizes_by_function_address() {
        let service = PseudocodeService::new();
        let function = Function::empty(Address(0x1000));
        let first = service.generate(&function);
        let second = service.generate(&function);
        assert_eq!(first, second);
        assert_eq!(service.cached_count(), 1);
        service.clear_cache();
        assert_eq!(service.cached_count(), 0);
    }
}
