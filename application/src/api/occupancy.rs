//! Endpoint reporting the parking lot occupancy.

use axum::{Extension, Json};
use serde::Serialize;
use service::{query, read, Query as _};

use crate::{AsError, Error, Service};

/// Occupancy of the parking lot.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Occupancy {
    /// Number of parked vehicles.
    pub parked: usize,

    /// Total number of parking spaces.
    pub capacity: usize,

    /// Number of free parking spaces.
    pub available: usize,
}

impl From<read::vehicle::Occupancy> for Occupancy {
    fn from(occupancy: read::vehicle::Occupancy) -> Self {
        let read::vehicle::Occupancy {
            parked,
            capacity,
            available,
        } = occupancy;
        Self {
            parked,
            capacity,
            available,
        }
    }
}

/// Reports how many parking spaces are taken and free.
///
/// # Errors
///
/// Errors if the database fails.
pub async fn show(
    Extension(service): Extension<Service>,
) -> Result<Json<Occupancy>, Error> {
    let occupancy = service
        .execute(query::Occupancy)
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(occupancy.into()))
}
