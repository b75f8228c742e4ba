//! Adapters that feed the ledger from, and report it to, the outside world.

pub mod csv;
