//! Redline library
//!
//! Line-based diff engine and the version-history reconciliation workflow it
//! feeds: compute a human-readable edit classification between two document
//! revisions, then drive review / restore / rollback against an external
//! history store and apply gateway.

pub mod config;
pub mod constant;
pub mod diff;
pub mod gateway;
pub mod history;
pub mod session;
