use std::path::Path;

use log::info;

use crate::error::StoreError;
use crate::model::Schedule;

/// Export work items to a semicolon-delimited CSV file the importer reads back.
///
/// Columns: Name ; Start Date ; End Date ; Track ; Continuous. Dates are
/// DD/MM/YYYY and continuous items leave the end empty. Returns the number of
/// items written.
pub fn export_items(schedule: &Schedule, path: &Path) -> Result<usize, StoreError> {
    let mut wtr = csv::WriterBuilder::new().delimiter(b';').from_path(path)?;

    wtr.write_record(["Name", "Start Date", "End Date", "Track", "Continuous"])?;
    for item in &schedule.items {
        let end = if item.continuous {
            String::new()
        } else {
            item.range.end.format("%d/%m/%Y").to_string()
        };
        let track = schedule.track(item.row_id).map(|t| t.name.as_str()).unwrap_or("");
        wtr.write_record([
            item.name.as_str(),
            &item.range.start.format("%d/%m/%Y").to_string(),
            &end,
            track,
            if item.continuous { "yes" } else { "no" },
        ])?;
    }
    wtr.flush()?;

    info!("exported {} items to {}", schedule.items.len(), path.display());
    Ok(schedule.items.len())
}
