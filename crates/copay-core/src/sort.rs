//! Sort comparators for the procedure table and the partner directory.

use std::borrow::Borrow;
use std::cmp::Ordering;

use crate::record::{
    FieldValue, PartnerField, PartnerRecord, ProcedureField, ProcedureRecord, Record,
};
use crate::sort_key::collate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// Orient an ascending comparison.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Column and direction of a table sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec<F> {
    pub field: F,
    pub direction: SortDirection,
}

impl<F: Copy> SortSpec<F> {
    pub fn new(field: F, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    pub fn ascending(field: F) -> Self {
        Self::new(field, SortDirection::Ascending)
    }
}

impl Default for SortSpec<PartnerField> {
    fn default() -> Self {
        Self::ascending(PartnerField::PartnerName)
    }
}

/// Ascending comparison of two values of the same field.
///
/// Flags order false before true, numbers numerically, text by lowercase
/// collation.
pub fn compare_values(a: FieldValue<'_>, b: FieldValue<'_>) -> Ordering {
    match (a, b) {
        (FieldValue::Flag(a), FieldValue::Flag(b)) => a.cmp(&b),
        (FieldValue::Number(a), FieldValue::Number(b)) => a.total_cmp(&b),
        (a, b) => collate(&a.to_text().to_lowercase(), &b.to_text().to_lowercase()),
    }
}

pub fn compare_procedures(
    a: &ProcedureRecord,
    b: &ProcedureRecord,
    spec: SortSpec<ProcedureField>,
) -> Ordering {
    spec.direction.apply(compare_values(a.value(spec.field), b.value(spec.field)))
}

/// Preferred-tier partners come first whatever the field or direction;
/// the field comparison only orders partners within each tier group.
pub fn compare_partners(
    a: &PartnerRecord,
    b: &PartnerRecord,
    spec: SortSpec<PartnerField>,
) -> Ordering {
    b.is_preferred().cmp(&a.is_preferred()).then_with(|| {
        spec.direction.apply(compare_values(a.value(spec.field), b.value(spec.field)))
    })
}

/// Stable in-place sort; works on owned records or borrowed subsets.
pub fn sort_procedures<R>(records: &mut [R], spec: SortSpec<ProcedureField>)
where
    R: Borrow<ProcedureRecord>,
{
    records.sort_by(|a, b| compare_procedures(a.borrow(), b.borrow(), spec));
}

/// Stable in-place sort with the preferred tier partitioned first.
pub fn sort_partners<R>(records: &mut [R], spec: SortSpec<PartnerField>)
where
    R: Borrow<PartnerRecord>,
{
    records.sort_by(|a, b| compare_partners(a.borrow(), b.borrow(), spec));
}
