use crate::context::AnalysisContext;
use crate::engine::AnalysisPass;
use crate::error::Result;

/// Scans readable sections for runs of printable ASCII.
pub struct StringAnalysisPass {
    min_length: usize,
}

impl StringAnalysisPass {
    pub fn new(min_length: usize) -> Self {
        StringAnalysisPass { min_length }
    }

    fn scan(&self, data: &[u8], out: &mut Vec<String>) {
        let mut run = String::new();
        for &byte in data {
            if (32..=126).contains(&byte) {
                run.push(byte as char);
            } else {
                if run.len() >= self.min_length {
                    out.push(std::mem::take(&mut run));
                } else {
                    run.clear();
                }
            }
        }
        if run.len() >= self.min_length {
            out.push(run);
        }
    }
}

impl AnalysisPass for StringAnalysisPass {
    fn name(&self) -> &str {
        "strings"
    }

    fn execute(&self, context: &AnalysisContext) -> Result<()> {
        let mut found = Vec::new();
        for section in &context.binary().sections {
            if section.is_readable() {
                self.scan(&section.data, &mut found);
            }
        }
        let count = found.len();
        for string in found {
            context.add_string(string);
        }
        log::debug!("extracted {count} strings");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_shorter_than_minimum_are_dropped() {
        let pass = StringAnalysisPass::new(4);
        let mut out = Vec::new();
        pass.scan(b"AB\x00CDEF\x01hello world\x00", &mut out);
        assert_eq!(out, vec!["CDEF".to_owned(), "hello world".to_owned()]);
    }

    #[test]
    fn run_at_end_of_section_is_kept() {
        let pass = StringAnalysisPass::new(4);
        let mut out = Vec::new();
        pass.scan(b"\x00tail", &mut out);
        assert_eq!(out, vec!["tail".to_owned()]);
    }
}
