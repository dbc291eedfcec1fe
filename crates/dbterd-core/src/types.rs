//! Catalog type names to DBML type aliases

use indexmap::IndexMap;

/// Built-in substitutions applied to catalog column types
pub const DEFAULT_TYPE_ALIASES: &[(&str, &str)] = &[
    ("double precision", "double"),
    ("timestamp with time zone", "timestamptz"),
];

/// Exact-match lookup from warehouse type names to DBML-friendly aliases
///
/// Types with no entry pass through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMap {
    aliases: IndexMap<String, String>,
}

impl Default for TypeMap {
    fn default() -> Self {
        Self {
            aliases: DEFAULT_TYPE_ALIASES
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
        }
    }
}

impl TypeMap {
    /// Add or replace an alias
    pub fn insert(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.aliases.insert(from.into(), to.into());
    }

    /// Extend with additional aliases, overriding existing entries
    pub fn with_overrides<'a>(mut self, overrides: impl IntoIterator<Item = (&'a String, &'a String)>) -> Self {
        for (from, to) in overrides {
            self.insert(from.clone(), to.clone());
        }
        self
    }

    /// Resolve the display type for a catalog type
    pub fn resolve<'a>(&'a self, data_type: &'a str) -> &'a str {
        self.aliases
            .get(data_type)
            .map(String::as_str)
            .unwrap_or(data_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_aliases() {
        let map = TypeMap::default();
        assert_eq!(map.resolve("double precision"), "double");
        assert_eq!(map.resolve("timestamp with time zone"), "timestamptz");
    }

    #[test]
    fn unmapped_types_pass_through() {
        let map = TypeMap::default();
        assert_eq!(map.resolve("integer"), "integer");
        assert_eq!(map.resolve("character varying(256)"), "character varying(256)");
    }

    #[test]
    fn lookup_is_exact_match() {
        let map = TypeMap::default();
        assert_eq!(map.resolve("DOUBLE PRECISION"), "DOUBLE PRECISION");
        assert_eq!(map.resolve("double precision "), "double precision ");
    }

    #[test]
    fn overrides_replace_and_extend() {
        let mut extra = IndexMap::new();
        extra.insert("double precision".to_string(), "float8".to_string());
        extra.insert("character varying".to_string(), "varchar".to_string());

        let map = TypeMap::default().with_overrides(&extra);
        assert_eq!(map.resolve("double precision"), "float8");
        assert_eq!(map.resolve("character varying"), "varchar");
        assert_eq!(map.resolve("timestamp with time zone"), "timestamptz");
    }
}
