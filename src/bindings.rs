//! Binding Parser
//!
//! A shape's description may carry lines of the form
//! `property:$function(...)`, where `property` is the lower-case field name
//! used in the layout. The expression text is kept verbatim.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

static BINDING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([a-z0-9]+):(\$[a-zA-Z0-9]+\(.+?\))$").expect("binding pattern is valid")
});

/// Extract every binding from a free-text annotation. Lines that do not match
/// are ignored; a later line for the same property wins.
pub fn parse_bindings(text: &str) -> BTreeMap<String, String> {
    let mut bindings = BTreeMap::new();

    for line in text.split('\n') {
        if let Some(caps) = BINDING.captures(line.trim()) {
            bindings.insert(caps[1].to_string(), caps[2].to_string());
        }
    }

    bindings
}
