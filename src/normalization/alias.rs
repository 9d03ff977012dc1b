use std::collections::HashMap;

/// Data-driven mapper translating known alternate team spellings into one
/// canonical spelling.
///
/// Every loader that resolves teams consults the same table; a loader with
/// its own private spelling rules would silently create duplicate Team rows
/// for the same real-world organization. Unknown names pass through
/// unchanged, so the mapping is total over strings.
#[derive(Debug, Default, Clone)]
pub struct TeamAliases {
    aliases: HashMap<String, String>,
}

impl TeamAliases {
    /// Build a table seeded with the known rebrandings/sponsor prefixes.
    pub fn with_defaults() -> Self {
        Self::default()
            .register("Giants Gaming", "GIANTX")
            .register("NRG Esports", "NRG")
            .register("Movistar KOI(KOI)", "KOI")
            .register("JD Mall JDG Esports(JDG Esports)", "JDG Esports")
    }

    /// Register or override an alias.
    pub fn register(mut self, alias: impl Into<String>, canonical: impl Into<String>) -> Self {
        self.aliases.insert(alias.into(), canonical.into());
        self
    }

    /// The canonical spelling for a raw team name.
    pub fn canonical<'a>(&'a self, raw: &'a str) -> &'a str {
        self.aliases.get(raw).map(String::as_str).unwrap_or(raw)
    }
}
