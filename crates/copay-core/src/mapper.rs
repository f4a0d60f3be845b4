//! Header-driven mapping of data rows onto record fields.
//!
//! Header text is compared after trimming, exactly and case-sensitively.
//! Unknown headers are ignored so extra spreadsheet columns are harmless,
//! and column order does not matter as long as the header text is unchanged.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::cell::CellValue;

/// Raw cells of one data row keyed by the record field they map to.
#[derive(Debug)]
pub struct FieldBag<'a, F> {
    cells: HashMap<F, &'a CellValue>,
}

impl<'a, F: Copy + Eq + Hash> FieldBag<'a, F> {
    /// The cell mapped to `field`, if the header was present and the row reached it.
    pub fn get(&self, field: F) -> Option<&'a CellValue> {
        self.cells.get(&field).copied()
    }
}

/// Header positions resolved against a dictionary, built once per grid.
#[derive(Debug, Clone)]
pub struct HeaderLayout<F> {
    columns: Vec<(usize, F)>,
}

impl<F: Copy + Eq + Hash> HeaderLayout<F> {
    /// Resolve which header positions feed which fields.
    ///
    /// If the same header appears twice, the first occurrence wins.
    pub fn resolve<S: AsRef<str>>(header: &[S], dictionary: &[(&str, F)]) -> Self {
        let mut seen = HashSet::new();
        let mut columns = Vec::new();
        for (index, name) in header.iter().enumerate() {
            let name = name.as_ref().trim();
            if let Some(&(_, field)) = dictionary.iter().find(|(key, _)| *key == name)
                && seen.insert(field)
            {
                columns.push((index, field));
            }
        }
        Self { columns }
    }

    /// Copy the cells under recognised headers into a [`FieldBag`].
    ///
    /// Rows shorter than the header simply leave the trailing fields absent.
    pub fn map_row<'a>(&self, row: &'a [CellValue]) -> FieldBag<'a, F> {
        let cells = self
            .columns
            .iter()
            .filter_map(|&(index, field)| row.get(index).map(|cell| (field, cell)))
            .collect();
        FieldBag { cells }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
