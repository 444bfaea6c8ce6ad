//! Link reference definitions.

use rustc_hash::FxBuildHasher as FastHashBuilder;
use std::collections::HashMap;

/// A link reference definition (URL + optional title).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRefDef {
    pub url: String,
    pub title: Option<String>,
}

/// Store of link reference definitions, keyed by lower-cased identifier.
///
/// Built by the tokenizer and handed to the renderer by value. A later
/// definition of the same identifier replaces the earlier one.
#[derive(Debug, Clone, Default)]
pub struct LinkRefStore {
    defs: Vec<LinkRefDef>,
    by_label: HashMap<String, usize, FastHashBuilder>,
}

impl LinkRefStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a definition; returns its index.
    pub fn insert(&mut self, id: &str, def: LinkRefDef) -> usize {
        let key = normalize_label(id);
        if let Some(&idx) = self.by_label.get(&key) {
            self.defs[idx] = def;
            return idx;
        }
        let idx = self.defs.len();
        self.defs.push(def);
        self.by_label.insert(key, idx);
        idx
    }

    /// Attach a title found on the line after a definition.
    pub fn set_title(&mut self, idx: usize, title: String) {
        if let Some(def) = self.defs.get_mut(idx) {
            def.title = Some(title);
        }
    }

    pub fn get_index(&self, id: &str) -> Option<usize> {
        self.by_label.get(&normalize_label(id)).copied()
    }

    pub fn get(&self, idx: usize) -> Option<&LinkRefDef> {
        self.defs.get(idx)
    }

    /// Case-insensitive lookup by identifier.
    pub fn lookup(&self, id: &str) -> Option<&LinkRefDef> {
        self.get_index(id).and_then(|idx| self.get(idx))
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

/// Lookup key for an identifier: lower-cased, inner whitespace collapsed.
pub fn normalize_label(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    for word in id.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.extend(word.chars().flat_map(char::to_lowercase));
    }
    out
}
