use ahash::AHashSet;

/// Known external references a process may point at.
///
/// An unset catalog accepts every reference; a configured one rejects
/// references it does not list.
#[derive(Debug, Clone, Default)]
pub struct ReferenceCatalog {
    processes: Option<AHashSet<String>>,
    rule_units: Option<AHashSet<String>>,
}

impl ReferenceCatalog {
    pub fn with_processes<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.processes
            .get_or_insert_with(AHashSet::new)
            .extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn with_rule_units<I, S>(mut self, units: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rule_units
            .get_or_insert_with(AHashSet::new)
            .extend(units.into_iter().map(Into::into));
        self
    }

    pub fn knows_process(&self, id: &str) -> bool {
        self.processes.as_ref().is_none_or(|known| known.contains(id))
    }

    pub fn knows_rule_unit(&self, unit: &str) -> bool {
        self.rule_units.as_ref().is_none_or(|known| known.contains(unit))
    }
}
