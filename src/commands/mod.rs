//! CLI commands for enbak

pub mod dispatch;
pub mod export;
pub mod init_db;
