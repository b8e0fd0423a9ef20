use serde::Deserialize;

/// One row of the deprecated-timezone table: a deprecated `tz` name and its
/// current IANA `alias`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimezoneAlias {
    pub tz: String,
    pub alias: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    entries: Vec<TimezoneAlias>,
}

impl AliasTable {
    pub fn new(entries: Vec<TimezoneAlias>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current name for `name`.
    ///
    /// Table rows are matched by suffix, so "US/Mountain" also matches a row
    /// listing "America/US/Mountain". Only an unambiguous match (exactly one
    /// row) is applied; otherwise the name is returned unchanged.
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        let mut matches = self.entries.iter().filter(|e| e.tz.ends_with(name));
        match (matches.next(), matches.next()) {
            (Some(entry), None) => &entry.alias,
            _ => name,
        }
    }
}

impl FromIterator<TimezoneAlias> for AliasTable {
    fn from_iter<I: IntoIterator<Item = TimezoneAlias>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
