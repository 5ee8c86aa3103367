use std::path::Path;

use chrono::NaiveDate;
use log::{info, warn};

use crate::error::StoreError;
use crate::model::{TimelineItem, Track, ITEM_PALETTE};

/// Track used for rows that do not name one.
pub const DEFAULT_TRACK_NAME: &str = "General";

/// Items read from a CSV file, with the tracks they refer to.
#[derive(Debug, Clone, Default)]
pub struct CsvImport {
    pub items: Vec<TimelineItem>,
    /// Existing tracks reused by name plus any new ones, in first-use order.
    pub tracks: Vec<Track>,
    pub skipped: usize,
}

/// Try parsing a date string with several common formats.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    for fmt in &["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    None
}

fn parse_flag(s: &str) -> bool {
    matches!(
        s.trim().to_lowercase().as_str(),
        "true" | "yes" | "1" | "open" | "ongoing" | "continuous"
    )
}

/// Detect delimiter by checking the first line for common separators.
fn detect_delimiter(first_line: &str) -> u8 {
    let semicolons = first_line.matches(';').count();
    let commas = first_line.matches(',').count();
    let tabs = first_line.matches('\t').count();

    if semicolons >= commas && semicolons >= tabs {
        b';'
    } else if tabs >= commas {
        b'\t'
    } else {
        b','
    }
}

fn normalize_header(h: &str) -> String {
    h.trim().to_lowercase().replace([' ', '-', '_'], "")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Name,
    Start,
    End,
    Track,
    Continuous,
}

fn header_to_col(normalized: &str) -> Option<Column> {
    match normalized {
        "name" | "item" | "itemname" | "task" | "tasklabel" | "label" | "title" | "activity" => Some(Column::Name),
        "start" | "startdate" | "from" | "begin" | "begindate" => Some(Column::Start),
        "end" | "enddate" | "to" | "finish" | "finishdate" | "due" | "duedate" => Some(Column::End),
        "row" | "track" | "lane" | "team" | "resource" => Some(Column::Track),
        "continuous" | "openended" | "ongoing" => Some(Column::Continuous),
        _ => None,
    }
}

fn field_of<'r>(record: &'r csv::StringRecord, col_map: &[Option<Column>], c: Column) -> &'r str {
    col_map
        .iter()
        .position(|m| *m == Some(c))
        .and_then(|idx| record.get(idx))
        .unwrap_or("")
}

/// Import work items from a CSV file.
///
/// `existing` are the tracks already in the schedule; rows naming one of them
/// (case-insensitive) land on it.
pub fn import_items(path: &Path, existing: &[Track]) -> Result<CsvImport, StoreError> {
    let content = std::fs::read_to_string(path)?;
    let import = parse_items(&content, existing)?;
    info!(
        "imported {} items from {} ({} rows skipped)",
        import.items.len(),
        path.display(),
        import.skipped
    );
    Ok(import)
}

/// Parse CSV text. Delimiter and header names are detected.
pub fn parse_items(content: &str, existing: &[Track]) -> Result<CsvImport, StoreError> {
    let first_line = content.lines().next().unwrap_or("");
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(detect_delimiter(first_line))
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let col_map: Vec<Option<Column>> = headers
        .iter()
        .map(|h| header_to_col(&normalize_header(h)))
        .collect();

    let has = |c: Column| col_map.contains(&Some(c));
    if !has(Column::Name) || !has(Column::Start) || !has(Column::End) {
        return Err(StoreError::MissingColumns {
            found: headers.iter().map(str::to_string).collect(),
        });
    }

    let mut import = CsvImport::default();
    let mut known: Vec<Track> = existing.to_vec();

    for (i, result) in reader.records().enumerate() {
        let line = i + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!("skipping CSV row {line}: {e}");
                import.skipped += 1;
                continue;
            }
        };

        let name = field_of(&record, &col_map, Column::Name);
        let start_raw = field_of(&record, &col_map, Column::Start);
        let end_raw = field_of(&record, &col_map, Column::End);
        if name.is_empty() {
            warn!("skipping CSV row {line}: no name");
            import.skipped += 1;
            continue;
        }

        let Some(start) = parse_date(start_raw) else {
            warn!("skipping CSV row {line}: invalid start date '{start_raw}'");
            import.skipped += 1;
            continue;
        };

        let continuous = parse_flag(field_of(&record, &col_map, Column::Continuous));
        let end = match parse_date(end_raw) {
            Some(d) => d.max(start),
            None if continuous => start,
            None => {
                warn!("skipping CSV row {line}: invalid end date '{end_raw}'");
                import.skipped += 1;
                continue;
            }
        };

        let track_name = match field_of(&record, &col_map, Column::Track) {
            "" => DEFAULT_TRACK_NAME,
            t => t,
        };
        let row_id = match known.iter().find(|t| t.name.eq_ignore_ascii_case(track_name)) {
            Some(t) => t.id,
            None => {
                let track = Track::new(track_name);
                let id = track.id;
                known.push(track);
                id
            }
        };
        if !import.tracks.iter().any(|t| t.id == row_id) {
            if let Some(t) = known.iter().find(|t| t.id == row_id) {
                import.tracks.push(t.clone());
            }
        }

        let mut item = if continuous {
            TimelineItem::new_continuous(name, row_id, start)
        } else {
            TimelineItem::new(name, row_id, start, end)
        };
        item.color = ITEM_PALETTE[import.items.len() % ITEM_PALETTE.len()];
        import.items.push(item);
    }

    if import.items.is_empty() {
        return Err(if import.skipped > 0 {
            StoreError::NoValidRows { skipped: import.skipped }
        } else {
            StoreError::Empty
        });
    }
    Ok(import)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, day).unwrap()
    }

    #[test]
    fn reads_semicolon_file_with_loose_headers() {
        let csv = "Task Label;Start Date;End Date;Team\n\
                   Design;01/03/2025;14/03/2025;Web\n\
                   Build;2025-03-17;2025-04-04;web\n";
        let import = parse_items(csv, &[]).unwrap();
        assert_eq!(import.items.len(), 2);
        assert_eq!(import.tracks.len(), 1);
        assert_eq!(import.items[0].range.start, d(3, 1));
        assert_eq!(import.items[1].range.end, d(4, 4));
        assert_eq!(import.items[0].row_id, import.items[1].row_id);
    }

    #[test]
    fn continuous_rows_may_omit_the_end() {
        let csv = "name,start,end,continuous\nSupport,2025-05-01,,yes\nBroken,2025-05-01,,no\n";
        let import = parse_items(csv, &[]).unwrap();
        assert_eq!(import.items.len(), 1);
        assert!(import.items[0].continuous);
        assert_eq!(import.items[0].range.end, d(5, 1));
        assert_eq!(import.skipped, 1);
        assert_eq!(import.tracks[0].name, DEFAULT_TRACK_NAME);
    }

    #[test]
    fn existing_tracks_are_reused() {
        let ops = Track::new("Ops");
        let csv = "name,start,end,track\nPatch,2025-01-02,2025-01-03,OPS\n";
        let import = parse_items(csv, std::slice::from_ref(&ops)).unwrap();
        assert_eq!(import.items[0].row_id, ops.id);
    }

    #[test]
    fn missing_columns_are_reported() {
        let err = parse_items("title,when\nA,2025-01-01\n", &[]).unwrap_err();
        assert!(matches!(err, StoreError::MissingColumns { found } if found == vec!["title", "when"]));
    }

    #[test]
    fn only_bad_rows_is_an_error() {
        let err = parse_items("name,start,end\nA,soon,later\n", &[]).unwrap_err();
        assert!(matches!(err, StoreError::NoValidRows { skipped: 1 }));
        assert!(matches!(parse_items("name,start,end\n", &[]), Err(StoreError::Empty)));
    }
}
