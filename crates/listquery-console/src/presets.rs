//! Views that ship with the binary.

use crate::error::{ConsoleError, Result};
use crate::view::ViewSpec;

const BUILTIN: &[(&str, &str)] = &[
    ("tickets", include_str!("../views/tickets.yaml")),
    ("audit-log", include_str!("../views/audit-log.yaml")),
    ("assignments", include_str!("../views/assignments.yaml")),
    ("wallets", include_str!("../views/wallets.yaml")),
];

/// Names of the built-in views.
pub fn builtin_names() -> impl Iterator<Item = &'static str> {
    BUILTIN.iter().map(|(name, _)| *name)
}

/// Loads a built-in view by name.
pub fn builtin(name: &str) -> Result<ViewSpec> {
    let (_, source) = BUILTIN
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .ok_or_else(|| ConsoleError::UnknownView {
            name: name.to_string(),
            available: builtin_names().collect::<Vec<_>>().join(", "),
        })?;
    ViewSpec::from_yaml(source)
}

/// Loads every built-in view.
pub fn builtin_views() -> Result<Vec<ViewSpec>> {
    builtin_names().map(builtin).collect()
}
