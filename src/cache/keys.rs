//! Versioned cache key layout for enriched anime records.

/// Prefix of the key version currently written.
pub const CURRENT_KEY_PREFIX: &str = "anime:v4:";

/// Earlier key formats, in the order they are probed during migration.
pub const LEGACY_KEY_PREFIXES: [&str; 3] = ["anime:v3:", "anime:v2:", "anime:"];

/// Key under which the enriched record for `id` is written.
pub fn current_key(id: &str) -> String {
    format!("{CURRENT_KEY_PREFIX}{id}")
}

/// Legacy keys for `id`, newest format first.
pub fn legacy_keys(id: &str) -> impl Iterator<Item = String> + '_ {
    LEGACY_KEY_PREFIXES
        .iter()
        .map(move |prefix| format!("{prefix}{id}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_key_format() {
        assert_eq!(current_key("20"), "anime:v4:20");
    }

    #[test]
    fn legacy_keys_in_probe_order() {
        let keys: Vec<_> = legacy_keys("20").collect();
        assert_eq!(keys, ["anime:v3:20", "anime:v2:20", "anime:20"]);
    }
}
