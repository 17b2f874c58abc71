//! Phase 3: Cross-reference checks
//!
//! Runs once the whole file has been read, so a property may require one
//! declared further down.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::value::Property;

/// `(property, target)` pairs whose `requires` target is not defined in
/// `properties`, in declaration order.
pub fn dangling_requires(properties: &IndexMap<String, Property>) -> Vec<(&str, &str)> {
    properties
        .values()
        .flat_map(|p| p.requires.iter().map(move |target| (p.name.as_str(), target.as_str())))
        .filter(|(_, target)| !properties.contains_key(*target))
        .collect()
}

/// Report each dangling `requires` target as a reference error on the line
/// where the requiring property was declared.
pub fn check_requires(
    properties: &IndexMap<String, Property>,
    declared_at: &HashMap<String, usize>,
    diagnostics: &mut Diagnostics,
) {
    for (name, target) in dangling_requires(properties) {
        let line = declared_at.get(name).copied().unwrap_or_default();
        diagnostics
            .report(
                DiagnosticKind::Reference,
                line,
                format!("{} depends on {}, which does not exist", name, target),
            )
            .emit();
    }
}
