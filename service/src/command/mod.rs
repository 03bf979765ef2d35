//! [`Command`] definition.

pub mod register_entry;
pub mod register_exit;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    register_entry::RegisterEntry,
    register_exit::{Departure, RegisterExit},
};
