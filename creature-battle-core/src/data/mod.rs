//! Static content catalogs: elemental types, moves, abilities, effects and
//! creature templates. The engine looks entries up by identifier and is
//! otherwise agnostic to their contents.

pub mod abilities;
pub mod effects;
pub mod moves;
pub mod templates;
pub mod types;

/// Catalog identifiers compare case-insensitively with punctuation ignored.
pub(crate) fn normalize_id(name: &str) -> String {
    name.to_ascii_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_punctuation_and_case() {
        assert_eq!(normalize_id("Will-o-Wisp"), "willowisp");
        assert_eq!(normalize_id("Blaze Kick"), "blazekick");
        assert_eq!(normalize_id("struggle"), "struggle");
    }
}
