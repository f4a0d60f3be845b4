pub mod cell;
pub mod columns;
pub mod filter;
pub mod mapper;
pub mod pipeline;
pub mod record;
pub mod schema;
pub mod sort;
pub mod sort_key;
pub mod unique;

pub use cell::{CellValue, Grid};
pub use columns::visible_columns;
pub use filter::{
    CopayState, FilterSpec, PartnerBuckets, PartnerCategory, PartnerFilter, filter_partners,
    filter_procedures, split_partners,
};
pub use pipeline::to_records;
pub use record::{
    FieldValue, PREFERRED_TIER, PartnerField, PartnerRecord, ProcedureField, ProcedureRecord,
    Record,
};
pub use schema::SheetRecord;
pub use sort::{SortDirection, SortSpec, sort_partners, sort_procedures};
pub use unique::unique_values;
