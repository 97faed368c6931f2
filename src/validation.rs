//! Bookkeeping of defined and referenced nonterminals, used by grammar validation.

use crate::definition::Definition;

/// Records nonterminals that head a definition (defined) or appear inside a production
/// (referenced); reports the undefined and duplicated ones.
#[derive(Debug, Default)]
pub(crate) struct NonterminalSets<'a> {
    defined: crate::HashSet<&'a str>,
    duplicated: crate::HashSet<&'a str>,
    referenced: crate::HashSet<&'a str>,
}

impl<'a> NonterminalSets<'a> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Collect both sides of every definition in one pass.
    pub(crate) fn from_definitions(definitions: impl Iterator<Item = &'a Definition>) -> Self {
        let mut sets = Self::new();
        for definition in definitions {
            sets.record_lhs(definition.nonterminal());
            for production in definition.productions_iter() {
                for nt in production.nonterminals_iter() {
                    sets.record_rhs(nt);
                }
            }
        }
        sets
    }

    pub(crate) fn record_lhs(&mut self, nt: &'a str) {
        if !self.defined.insert(nt) {
            self.duplicated.insert(nt);
        }
    }

    pub(crate) fn record_rhs(&mut self, nt: &'a str) {
        self.referenced.insert(nt);
    }

    /// Nonterminals that are referenced but not defined, sorted by name.
    pub(crate) fn undefined(&self) -> Vec<&'a str> {
        let mut undefined: Vec<_> = self.referenced.difference(&self.defined).copied().collect();
        undefined.sort_unstable();
        undefined
    }

    /// Nonterminals defined more than once, sorted by name.
    pub(crate) fn duplicated(&self) -> Vec<&'a str> {
        let mut duplicated: Vec<_> = self.duplicated.iter().copied().collect();
        duplicated.sort_unstable();
        duplicated
    }
}
