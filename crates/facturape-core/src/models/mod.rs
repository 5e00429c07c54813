//! Data models shared by the extraction engine and its callers.

pub mod config;
pub mod invoice;
