pub mod entry;
pub mod ledger;
pub mod ports;
