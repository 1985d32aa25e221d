use std::collections::HashSet;

/// Suffix attempts after the bare name: `name_2` through `name_101`.
pub const MAX_NAME_ATTEMPTS: usize = 100;

/// Pick a name not present in `existing`: the proposal itself, or the first
/// free `{proposed}_N` for N starting at 2. `None` once every attempt is taken.
///
/// The backend stays the source of truth for uniqueness; a concurrent create
/// between listing and adding is not detected here.
pub fn assign_unique_name(proposed: &str, existing: &HashSet<String>) -> Option<String> {
    if !existing.contains(proposed) {
        return Some(proposed.to_string());
    }
    (2..2 + MAX_NAME_ATTEMPTS)
        .map(|n| format!("{}_{}", proposed, n))
        .find(|candidate| !existing.contains(candidate))
}
