//! Application layer containing the ledger operations.
//!
//! `Ledger` is the entry point for every account operation. It serializes work
//! per account id through an async lock registry, so operations on different
//! accounts run in parallel while each account sees one writer at a time.

pub mod ledger;
pub mod locks;
