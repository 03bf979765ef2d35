//! Read entities definitions.

pub mod vehicle;
