//! Request handlers.

pub mod notes;
