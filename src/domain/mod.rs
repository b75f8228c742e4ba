//! Domain model: account records, the limit policy and the ports the ledger
//! depends on.

pub mod account;
pub mod clock;
pub mod policy;
pub mod ports;
