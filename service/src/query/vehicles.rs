//! [`Query`] collection related to the multiple [`Vehicle`]s.

use common::operations::By;

use crate::{domain::Vehicle, read};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries all the parked [`Vehicle`]s, in order of their entry.
pub type Parked = DatabaseQuery<By<Vec<Vehicle>, read::vehicle::Parked>>;

/// Queries the departed [`Vehicle`]s, the most recently departed first.
pub type History =
    DatabaseQuery<By<Vec<Vehicle>, read::vehicle::history::Filter>>;
