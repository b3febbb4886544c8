/// Shared utilities

pub mod interner;
