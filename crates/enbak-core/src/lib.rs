//! Enbak Core Library
//!
//! Export of a locally synchronized note database into ENEX archives.

pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod model;
pub mod storage;
