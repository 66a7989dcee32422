use std::any::Any;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use arsen_ir::{Address, Instruction};
use parking_lot::Mutex;

use crate::config::Config;

struct CacheEntry<V> {
    value: V,
    last_access: Instant,
}

/// Map bounded by capacity and an expire-after-access TTL.
///
/// An entry's clock resets on every read or write; entries idle longer
/// than the TTL are dropped lazily on the next operation that touches
/// the map. When the map is full, inserting a new key evicts the entry
/// with the oldest access time. No background thread is involved.
pub struct BoundedCache<K, V> {
    entries: Mutex<HashMap<K, CacheEntry<V>>>,
    capacity: usize,
    ttl: Duration,
}

impl<K: Eq + Hash + Clone, V: Clone> BoundedCache<K, V> {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        BoundedCache {
            entries: Mutex::new(HashMap::new()),
            capacity,
            ttl,
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.lock();
        let now = Instant::now();
        match entries.get_mut(key) {
            Some(entry) if now.duration_since(entry.last_access) <= self.ttl => {
                entry.last_access = now;
                Some(entry.value.clone())
            }
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, key: K, value: V) {
        let mut entries = self.entries.lock();
        let now = Instant::now();
        entries.retain(|_, entry| now.duration_since(entry.last_access) <= self.ttl);
        if entries.len() >= self.capacity && !entries.contains_key(&key) {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_access)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                entries.remove(&oldest);
            }
        }
        entries.insert(
            key,
            CacheEntry {
                value,
                last_access: now,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

/// Type-erased artifact slot for pass results that outlive one run.
pub type Artifact = Arc<dyn Any + Send + Sync>;

/// Owns the process-wide caches and their eviction policies.
pub struct CacheManager {
    instructions: BoundedCache<Address, Instruction>,
    artifacts: BoundedCache<String, Artifact>,
}

impl CacheManager {
    pub fn new(config: &Config) -> Self {
        CacheManager {
            instructions: BoundedCache::new(config.instruction_cache_capacity, config.cache_ttl()),
            artifacts: BoundedCache::new(config.artifact_cache_capacity, config.cache_ttl()),
        }
    }

    pub fn instruction(&self, address: Address) -> Option<Instruction> {
        self.instructions.get(&address)
    }

    pub fn put_instruction(&self, instruction: Instruction) {
        self.instructions.insert(instruction.address, instruction);
    }

    pub fn artifact(&self, key: &str) -> Option<Artifact> {
        self.artifacts.get(&key.to_owned())
    }

    pub fn put_artifact(&self, key: &str, artifact: Artifact) {
        self.artifacts.insert(key.to_owned(), artifact);
    }

    pub fn clear_all(&self) {
        self.instructions.clear();
        self.artifacts.clear();
        log::debug!("all caches cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_evicts_least_recently_accessed() {
        let cache = BoundedCache::new(2, Duration::from_secs(60));
        cache.insert("a", 1);
        cache.insert("b", 2);
        assert_eq!(cache.get(&"a"), Some(1));
        cache.insert("c", 3);
        assert_eq!(cache.get(&"b"), None);
        assert_eq!(cache.get(&"a"), Some(1));
        assert_eq!(cache.get(&"c"), Some(3));
    }

    #[test]
    fn reinserting_existing_key_does_not_evict() {
        let cache = BoundedCache::new(2, Duration::from_secs(60));
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.insert("a", 10);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&"a"), Some(10));
        assert_eq!(cache.get(&"b"), Some(2));
    }

    #[test]
    fn entries_expire_after_idle() {
        let cache = BoundedCache::new(8, Duration::from_millis(10));
        cache.insert("a", 1);
        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(cache.get(&"a"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn access_resets_the_clock() {
        let cache = BoundedCache::new(8, Duration::from_secs(60));
        cache.insert("a", 1);
        assert_eq!(cache.get(&"a"), Some(1));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn clear_all_empties_both_caches() {
        let manager = CacheManager::new(&Config::default());
        let insn = arsen_disasm::for_architecture(arsen_ir::Architecture::X86_64)
            .unwrap()
            .disassemble(Address(0x1000), &[0x90], 0);
        manager.put_instruction(insn);
        manager.put_artifact("strings", Arc::new(vec!["hello".to_owned()]));
        assert!(manager.instruction(Address(0x1000)).is_some());
        manager.clear_all();
        assert!(manager.instruction(Address(0x1000)).is_none());
        assert!(manager.artifact("strings").is_none());
    }
}
