//! Distinct field values for populating filter choices.

use std::collections::BTreeSet;

use crate::record::Record;

/// Sorted distinct values of a string-typed field.
///
/// Non-string fields contribute nothing, so a selector pointing at a flag
/// or a number yields an empty list instead of stringified values.
pub fn unique_values<'a, R, I>(records: I, field: R::Field) -> Vec<String>
where
    R: Record + 'a,
    I: IntoIterator<Item = &'a R>,
{
    records
        .into_iter()
        .filter_map(|record| record.value(field).as_text())
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
