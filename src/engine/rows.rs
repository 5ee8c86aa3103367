//! Greedy row packing of time-ranged items.

use uuid::Uuid;

use super::conflict::{self, TrackEntry};
use crate::model::{TimeRange, TimelineItem};

/// Items packed into visual rows. Each row is ordered by start date.
#[derive(Debug, Clone, Default)]
pub struct RowLayout<'a> {
    pub rows: Vec<Vec<&'a TimelineItem>>,
    min_gap_days: i64,
}

/// Pack `items` into the fewest rows a first-fit pass finds.
///
/// Items are taken by start date, ties by name, and each goes into the first
/// row whose last item it does not conflict with. A row holding a continuous
/// item therefore never takes another one.
pub fn arrange_rows(items: &[TimelineItem], min_gap_days: i64) -> RowLayout<'_> {
    let mut sorted: Vec<&TimelineItem> = items.iter().collect();
    sorted.sort_by(|a, b| {
        a.range
            .start
            .cmp(&b.range.start)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut rows: Vec<Vec<&TimelineItem>> = Vec::new();
    for item in sorted {
        let entry = TrackEntry::from(item);
        let slot = rows.iter().position(|row| {
            row.last()
                .map(|last| !conflict::conflicts(&TrackEntry::from(*last), &entry, min_gap_days))
                .unwrap_or(true)
        });
        match slot {
            Some(i) => rows[i].push(item),
            None => rows.push(vec![item]),
        }
    }

    RowLayout { rows, min_gap_days }
}

impl<'a> RowLayout<'a> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row holding `id`.
    pub fn row_of(&self, id: Uuid) -> Option<usize> {
        self.rows.iter().position(|row| row.iter().any(|i| i.id == id))
    }

    /// Items sharing a row with `id`, itself included.
    pub fn row_mates(&self, id: Uuid) -> &[&'a TimelineItem] {
        self.row_of(id).map(|r| self.rows[r].as_slice()).unwrap_or(&[])
    }

    /// First row where a placement fits without conflicting with any item.
    /// `ignore` is left out of the check, for an item looking to change rows.
    pub fn free_row_for(&self, range: TimeRange, continuous: bool, ignore: Option<Uuid>) -> Option<usize> {
        let probe = TrackEntry::new(ignore.unwrap_or_else(Uuid::nil), range, continuous);
        self.rows.iter().position(|row| {
            row.iter()
                .filter(|i| Some(i.id) != ignore)
                .all(|i| !conflict::conflicts(&TrackEntry::from(*i), &probe, self.min_gap_days))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, day).unwrap()
    }

    fn item(name: &str, start: NaiveDate, end: NaiveDate) -> TimelineItem {
        TimelineItem::new(name, Uuid::nil(), start, end)
    }

    fn names(layout: &RowLayout<'_>) -> Vec<Vec<String>> {
        layout
            .rows
            .iter()
            .map(|r| r.iter().map(|i| i.name.clone()).collect())
            .collect()
    }

    #[test]
    fn packs_into_fewest_rows() {
        let items = vec![
            item("C", d(1, 20), d(1, 25)),
            item("A", d(1, 1), d(1, 10)),
            item("B", d(1, 5), d(1, 15)),
            item("D", d(1, 17), d(1, 19)),
        ];
        let layout = arrange_rows(&items, 2);
        assert_eq!(names(&layout), vec![vec!["A", "D"], vec!["B", "C"]]);
    }

    #[test]
    fn ties_break_by_name() {
        let items = vec![item("Zeta", d(1, 1), d(1, 3)), item("Alpha", d(1, 1), d(1, 3))];
        let layout = arrange_rows(&items, 2);
        assert_eq!(names(&layout), vec![vec!["Alpha"], vec!["Zeta"]]);
    }

    #[test]
    fn continuous_item_closes_its_row() {
        let mut open = item("Open", d(1, 1), d(1, 1));
        open.continuous = true;
        let items = vec![open, item("Later", d(6, 1), d(6, 3))];
        let layout = arrange_rows(&items, 2);
        assert_eq!(layout.len(), 2);
        assert_eq!(layout.row_of(items[1].id), Some(1));
    }

    #[test]
    fn free_row_lookup() {
        let items = vec![item("A", d(1, 1), d(1, 10)), item("B", d(1, 5), d(1, 20))];
        let layout = arrange_rows(&items, 2);
        assert_eq!(layout.free_row_for(TimeRange::new(d(1, 12), d(1, 14)), false, None), Some(0));
        assert_eq!(layout.free_row_for(TimeRange::new(d(1, 8), d(1, 14)), false, None), None);
        assert_eq!(
            layout.free_row_for(TimeRange::new(d(1, 8), d(1, 14)), false, Some(items[0].id)),
            Some(0)
        );
        assert_eq!(layout.row_mates(items[1].id).len(), 1);
    }
}
