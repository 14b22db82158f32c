//! String literal interning
//!
//! Every distinct literal text gets one label, `str1`, `str2`, ... in the
//! order the generator first meets it. The table is emitted once at the top
//! of the program.

use log::debug;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct StringLiteralPool {
    /// Literal texts in label order
    literals: Vec<String>,
    labels: HashMap<String, usize>,
}

impl StringLiteralPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Label for `text`, creating one on first sight
    pub fn intern(&mut self, text: &str) -> String {
        if let Some(&index) = self.labels.get(text) {
            return Self::label(index);
        }
        let index = self.literals.len();
        self.literals.push(text.to_string());
        self.labels.insert(text.to_string(), index);
        let label = Self::label(index);
        debug!("interned {:?} as {}", text, label);
        label
    }

    fn label(index: usize) -> String {
        format!("str{}", index + 1)
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// One `label: "text"` line per literal
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, text) in self.literals.iter().enumerate() {
            out.push_str(&format!("{}: \"{}\"\n", Self::label(i), escape(text)));
        }
        out
    }
}

/// Escape a literal so it reads back as the same string in LIR
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}
