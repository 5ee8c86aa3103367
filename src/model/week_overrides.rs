//! Week-scoped overrides held in an explicit keyed store.
//!
//! The store is owned by whoever holds scheduling state and is passed around by
//! reference; there is no process-wide instance.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// ISO year and week number of a calendar week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WeekKey {
    pub year: i32,
    pub week: u32,
}

impl WeekKey {
    pub fn of(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }

    /// The Monday that opens this week.
    pub fn monday(&self) -> Option<NaiveDate> {
        NaiveDate::from_isoywd_opt(self.year, self.week, chrono::Weekday::Mon)
    }
}

impl std::fmt::Display for WeekKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-W{:02}", self.year, self.week)
    }
}

/// Per-week values keyed by [`WeekKey`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekOverrides<T> {
    entries: BTreeMap<WeekKey, T>,
}

impl<T> Default for WeekOverrides<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T> WeekOverrides<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: WeekKey) -> Option<&T> {
        self.entries.get(&key)
    }

    /// Look up the override for the week containing `date`.
    pub fn get_for(&self, date: NaiveDate) -> Option<&T> {
        self.get(WeekKey::of(date))
    }

    /// Store `value`, returning whatever it replaced.
    pub fn set(&mut self, key: WeekKey, value: T) -> Option<T> {
        self.entries.insert(key, value)
    }

    pub fn clear(&mut self, key: WeekKey) -> Option<T> {
        self.entries.remove(&key)
    }

    pub fn clear_all(&mut self) {
        self.entries.clear();
    }

    pub fn contains(&self, key: WeekKey) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&WeekKey, &T)> {
        self.entries.iter()
    }
}

impl WeekOverrides<bool> {
    /// Flip a boolean flag, dropping the entry when it goes back to false.
    pub fn toggle(&mut self, key: WeekKey) -> bool {
        if self.clear(key).is_some() {
            false
        } else {
            self.set(key, true);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_uses_iso_week_year() {
        // 2024-12-30 belongs to ISO week 1 of 2025.
        let key = WeekKey::of(NaiveDate::from_ymd_opt(2024, 12, 30).unwrap());
        assert_eq!(key, WeekKey { year: 2025, week: 1 });
        assert_eq!(key.to_string(), "2025-W01");
        assert_eq!(key.monday(), NaiveDate::from_ymd_opt(2024, 12, 30));
    }

    #[test]
    fn set_get_clear() {
        let mut store = WeekOverrides::new();
        let date = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();
        let key = WeekKey::of(date);
        assert!(store.set(key, 3u8).is_none());
        assert_eq!(store.get_for(date), Some(&3));
        assert_eq!(store.set(key, 4), Some(3));
        assert_eq!(store.clear(key), Some(4));
        assert!(store.is_empty());
    }

    #[test]
    fn toggle_round_trips() {
        let mut store = WeekOverrides::<bool>::new();
        let key = WeekKey { year: 2025, week: 10 };
        assert!(store.toggle(key));
        assert!(store.contains(key));
        assert!(!store.toggle(key));
        assert!(!store.contains(key));
    }
}
