//! Route handlers

pub mod diagnose;
pub mod history;
pub mod knowledge;
