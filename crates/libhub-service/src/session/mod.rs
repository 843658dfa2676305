//! Session ledger service.

pub mod ledger;

pub use ledger::SessionLedger;
