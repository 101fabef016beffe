// Appeals Ledger - support-appeal ID tracking with country reconciliation
//
// Core pieces:
// - Category ledger of ticket identifiers (add/remove/move, fixed category set)
// - Country directory with free-text name resolution
// - Reconciliation engine joining the ledger against uploaded rows and
//   user overrides into a deterministic text report
// - Blob-store persistence with a SQLite backend

pub mod config;
pub mod countries;
pub mod error;
pub mod ledger;
pub mod overrides;
pub mod report;
pub mod session;
pub mod storage;

pub use config::{CategoryConfig, LedgerConfig};
pub use countries::{Country, CountryDirectory};
pub use error::LedgerError;
pub use ledger::{AddOutcome, CategoryLedger, LedgerEntry, TicketRecord};
pub use overrides::OverrideStore;
pub use report::quick::{generate_quick_report, QuickSelections, SortMode};
pub use report::{reconcile, MatchReport, ReconcileOutcome, UploadedRow};
pub use session::AppSession;
pub use storage::{BlobStore, MemoryStore, SqliteStore};
