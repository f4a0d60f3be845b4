//! Grid to records: header parsing, row mapping, coercion and validation.

use tracing::{debug, warn};

use crate::cell::CellValue;
use crate::mapper::HeaderLayout;
use crate::schema::SheetRecord;

/// Turn a raw grid into validated records, preserving source row order.
///
/// Row 0 is the header. A grid with no data rows yields nothing. Rows that
/// fail validation are dropped without error.
pub fn to_records<R: SheetRecord>(grid: &[Vec<CellValue>]) -> Vec<R> {
    let Some((header, rows)) = grid.split_first() else {
        return Vec::new();
    };
    if rows.is_empty() {
        return Vec::new();
    }

    let header: Vec<String> = header
        .iter()
        .map(|cell| cell.to_text().trim().to_string())
        .collect();
    let layout = HeaderLayout::resolve(&header, R::HEADERS);
    if layout.is_empty() {
        warn!(header = ?header, "no recognised columns in header row");
    }

    let records: Vec<R> = rows
        .iter()
        .map(|row| R::from_fields(&layout.map_row(row)))
        .filter(R::is_retained)
        .collect();

    let dropped = rows.len() - records.len();
    if dropped > 0 {
        debug!(
            rows = rows.len(),
            kept = records.len(),
            dropped,
            "dropped rows missing required fields"
        );
    }
    records
}
