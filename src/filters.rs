//! Named audio-filter toggles for a guild queue.
//!
//! Applying a filter to the output stream is the caller's job; the queue only
//! records which filters are switched on.

use std::collections::HashMap;

use crate::error::{QueueError, QueueResult};

/// Name of the bass boost filter. While enabled it raises the calculated
/// volume of the owning queue by a fixed gain.
pub const BASSBOOST: &str = "bassboost";

/// A set of named filter toggles whose key domain is fixed at construction.
///
/// Every name supplied to [`FilterSet::new`] starts out disabled. Names not in
/// the set are rejected at toggle time rather than silently added.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    states: HashMap<String, bool>,
}

impl FilterSet {
    /// Creates a filter set from the given names, all disabled. An empty name
    /// list is valid and yields an empty set.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let states = names.into_iter().map(|name| (name.into(), false)).collect();
        Self { states }
    }

    /// Whether the named filter is currently enabled. Names outside the set
    /// report `false`.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.states.get(name).copied().unwrap_or(false)
    }

    /// Switches the named filter on or off.
    pub fn set(&mut self, name: &str, enabled: bool) -> QueueResult<()> {
        match self.states.get_mut(name) {
            Some(state) => {
                *state = enabled;
                Ok(())
            }
            None => Err(QueueError::UnknownFilter(name.to_string())),
        }
    }

    /// Flips the named filter, returning its new state.
    pub fn toggle(&mut self, name: &str) -> QueueResult<bool> {
        match self.states.get_mut(name) {
            Some(state) => {
                *state = !*state;
                Ok(*state)
            }
            None => Err(QueueError::UnknownFilter(name.to_string())),
        }
    }

    /// Iterates over every filter name in the set.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.states.keys().map(String::as_str)
    }

    /// Iterates over the names of the filters currently enabled.
    pub fn enabled(&self) -> impl Iterator<Item = &str> {
        self.states
            .iter()
            .filter(|(_, enabled)| **enabled)
            .map(|(name, _)| name.as_str())
    }

    /// Number of filter names in the set.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether the set was constructed without any filter names.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn new_set_has_exactly_the_given_names_all_disabled() {
        let filters = FilterSet::new([BASSBOOST, "nightcore", "vaporwave"]);

        assert_eq!(filters.len(), 3);
        let mut names: Vec<_> = filters.names().collect();
        names.sort_unstable();
        assert_eq!(names, vec![BASSBOOST, "nightcore", "vaporwave"]);
        assert!(filters.enabled().next().is_none());
    }

    #[test]
    fn empty_name_list_yields_empty_set() {
        let filters = FilterSet::new(Vec::<String>::new());
        assert!(filters.is_empty());
        assert!(!filters.is_enabled(BASSBOOST));
    }

    #[test]
    fn toggle_flips_and_reports_state() {
        let mut filters = FilterSet::new([BASSBOOST]);

        assert_eq!(filters.toggle(BASSBOOST).unwrap(), true);
        assert!(filters.is_enabled(BASSBOOST));
        assert_eq!(filters.toggle(BASSBOOST).unwrap(), false);
        assert!(!filters.is_enabled(BASSBOOST));
    }

    #[test]
    fn unknown_names_are_rejected_not_created() {
        let mut filters = FilterSet::new([BASSBOOST]);

        assert_matches!(filters.set("8d", true), Err(QueueError::UnknownFilter(name)) if name == "8d");
        assert_matches!(filters.toggle("8d"), Err(QueueError::UnknownFilter(_)));
        assert_eq!(filters.len(), 1);
    }
}
