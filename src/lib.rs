//! winhop: rank and filter open windows, browser tabs, and running
//! applications against an incremental free-text query, and emit one Alfred
//! script-filter document.
//!
//! The engine is platform-independent: records expose pre-folded search
//! fragments ([`search::Searchable`]), sources are merged by [`aggregate`],
//! and tab favicons resolve through the snapshot-consistent side cache in
//! [`favicon`]. OS enumeration and browser scripting live behind
//! [`platform`].

pub mod aggregate;
pub mod alfred;
pub mod apps;
pub mod browser;
pub mod config;
pub mod error;
pub mod favicon;
pub mod logging;
pub mod platform;
pub mod search;
pub mod transliterate;
pub mod windows;
