//! Global Style Deduplicator
//!
//! Collapses structurally equal styles across all pages into one entry.
//! Class-derived styles win over per-component ones; otherwise the name that
//! sorts first wins.

use std::collections::{BTreeMap, BTreeSet};

use crate::layout::Layout;

/// Pick (selected, replaced) for two equal styles.
fn prioritize<'a>(common: &BTreeSet<String>, a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if !common.contains(a) && common.contains(b) {
        (b, a)
    } else {
        (a, b)
    }
}

/// Find every replaced style name and the name that replaces it.
pub fn find_replacements(layout: &Layout, common: &BTreeSet<String>) -> BTreeMap<String, String> {
    let names: Vec<&String> = layout.styles.keys().collect();
    let mut replacement: BTreeMap<String, String> = BTreeMap::new();

    for (i, a) in names.iter().enumerate() {
        for b in &names[i + 1..] {
            let (selected, replaced) = prioritize(common, a, b);
            if replacement.contains_key(selected) || replacement.contains_key(replaced) {
                continue;
            }
            if layout.styles[*a] == layout.styles[*b] {
                log::debug!("Replacing style {} with {}", replaced, selected);
                replacement.insert(replaced.to_string(), selected.to_string());
            }
        }
    }

    replacement
}

/// Follow replacement chains to the surviving name.
fn resolve<'a>(replacement: &'a BTreeMap<String, String>, name: &'a str) -> &'a str {
    let mut current = name;
    // Each entry points at a name that was unscheduled when it was recorded,
    // so chains are acyclic and at most `len` long.
    for _ in 0..=replacement.len() {
        match replacement.get(current) {
            Some(next) => current = next,
            None => break,
        }
    }
    current
}

/// Deduplicate the layout's styles in place. Returns the number of removed
/// styles.
pub fn deduplicate(layout: &mut Layout, common: &BTreeSet<String>) -> usize {
    let replacement = find_replacements(layout, common);

    for page in layout.pages.values_mut() {
        for comp in &mut page.components {
            if let Some(style) = &comp.style {
                if replacement.contains_key(style) {
                    comp.style = Some(resolve(&replacement, style).to_string());
                }
            }
        }
    }

    for name in replacement.keys() {
        layout.styles.remove(name);
        log::debug!("Removed style {}", name);
    }

    replacement.len()
}
