use std::collections::HashMap;

/// Per-function synthetic variable naming.
///
/// Registers map to `r_<register>`; stack offsets and memory descriptors
/// get `local_N` / `mem_N` names assigned in first-seen order and reused
/// on every later mention. Scoped to one pseudocode generation call.
#[derive(Debug, Default)]
pub struct VariableContext {
    register_vars: HashMap<String, String>,
    stack_vars: HashMap<i64, String>,
    memory_vars: HashMap<String, String>,
    next_local_index: usize,
}

impl VariableContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_register(&mut self, register: &str) -> String {
        let key = register.to_lowercase();
        if let Some(existing) = self.register_vars.get(&key) {
            return existing.clone();
        }
        let name = format!("r_{key}");
        self.register_vars.insert(key, name.clone());
        name
    }

    pub fn for_stack_offset(&mut self, offset: i64) -> String {
        if let Some(existing) = self.stack_vars.get(&offset) {
            return existing.clone();
        }
        let name = format!("local_{}", self.next_local_index);
        self.next_local_index += 1;
        self.stack_vars.insert(offset, name.clone());
        name
    }

    pub fn for_memory(&mut self, descriptor: &str, value: i64) -> String {
        let key = format!("{descriptor}:{value}");
        if let Some(existing) = self.memory_vars.get(&key) {
            return existing.clone();
        }
        let name = format!("mem_{}", self.next_local_index);
        self.next_local_index += 1;
        self.memory_vars.insert(key, name.clone());
        name
    }

    /// Every assigned name, sorted alphabetically for the declaration list.
    pub fn all_variables(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .register_vars
            .values()
            .chain(self.stack_vars.values())
            .chain(self.memory_vars.values())
            .cloned()
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_stable_per_key() {
        let mut vars = VariableContext::new();
        assert_eq!(vars.for_register("EAX"), "r_eax");
        assert_eq!(vars.for_register("eax"), "r_eax");

        let a = vars.for_stack_offset(-8);
        let b = vars.for_stack_offset(-16);
        assert_eq!(a, "local_0");
        assert_eq!(b, "local_1");
        assert_eq!(vars.for_stack_offset(-8), "local_0");

        let m = vars.for_memory("[rip+0x20]", 0x20);
        assert_eq!(m, "mem_2");
        assert_eq!(vars.for_memory("[rip+0x20]", 0x20), "mem_2");
    }

    #[test]
    fn declaration_list_is_sorted() {
        let mut vars = VariableContext::new();
        vars.for_register("rbx");
        vars.for_stack_offset(-4);
        vars.for_register("rax");
        assert_eq!(vars.all_variables(), vec!["local_0", "r_rax", "r_rbx"]);
    }
}
