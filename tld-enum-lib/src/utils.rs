//! Helpers for turning user input into candidate domains.

use crate::error::TldEnumError;
use std::collections::HashSet;

/// Longest label DNS allows.
const MAX_LABEL_LEN: usize = 63;

/// Normalize a company/brand name for enumeration.
///
/// The name is trimmed and lower-cased, then must form a single DNS label:
/// ASCII letters, digits and hyphens, at most 63 characters, not starting or
/// ending with a hyphen.
pub fn normalize_base_name(raw: &str) -> Result<String, TldEnumError> {
    let base = raw.trim().to_lowercase();

    if base.is_empty() {
        return Err(TldEnumError::invalid_input(raw, "Base name cannot be empty"));
    }

    if base.len() > MAX_LABEL_LEN {
        return Err(TldEnumError::invalid_input(
            raw,
            "Base name cannot be longer than 63 characters",
        ));
    }

    if base.starts_with('-') || base.ends_with('-') {
        return Err(TldEnumError::invalid_input(
            raw,
            "Base name cannot start or end with a hyphen",
        ));
    }

    if !base.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(TldEnumError::invalid_input(
            raw,
            "Base name may only contain letters, digits and hyphens",
        ));
    }

    Ok(base)
}

/// Build `<base>.<tld>` for every TLD, in TLD order.
///
/// Duplicate TLDs collapse into one candidate so every domain maps to
/// exactly one check.
pub fn expand_base_name(base_name: &str, tlds: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();

    tlds.iter()
        .map(|tld| tld.trim())
        .filter(|tld| !tld.is_empty())
        .map(|tld| format!("{}.{}", base_name, tld))
        .filter(|domain| seen.insert(domain.clone()))
        .collect()
}
