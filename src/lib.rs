pub use self::{
    menu::Menu,
    record::{Amount, ParsedDraft, Record, RecordDraft, RecordError, RecordId, DEFAULT_CATEGORY},
    report::{export_report, list_view, summarize, write_listing, write_report, Listing, Summary},
    store::{LedgerConfig, LedgerStore, StoreError},
};

pub mod report;
pub mod store;

mod menu;
mod record;
