//! Student identity, keyed by canonical CPF.

use serde::{Deserialize, Serialize};

/// Strips everything but ASCII digits, the canonical CPF form used for
/// row-to-enrollment resolution.
pub fn normalize_cpf(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// A student as seen by this engine: identity plus display name. CRUD and
/// persistence for students live in the surrounding layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    cpf: String,
    name: String,
}

impl Student {
    /// The CPF is normalized at construction.
    pub fn new(cpf: impl AsRef<str>, name: impl Into<String>) -> Self {
        Self {
            cpf: normalize_cpf(cpf.as_ref()),
            name: name.into(),
        }
    }

    /// Canonical, punctuation-stripped identifier.
    pub fn cpf(&self) -> &str {
        &self.cpf
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
