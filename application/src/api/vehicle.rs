//! Endpoints managing [`Vehicle`]s in the parking lot.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path,
    },
    Extension, Json,
};
use common::{DateTime, DateTimeOf, Money};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use service::{
    command::{register_entry, register_exit, RegisterEntry, RegisterExit},
    domain::{self, vehicle},
    query::{self, charge::QuoteError, QuoteCharge},
    read, Command as _, Query as _,
};

use crate::{AsError, Error, Service};

use super::{
    fee::{Charge, Stay},
    InputError, VehicleError,
};

/// [`domain::Vehicle`] visiting the parking lot.
#[derive(Clone, Debug, Serialize)]
pub struct Vehicle {
    /// ID of the visit.
    pub id: String,

    /// License plate.
    pub plate: String,

    /// Vehicle class.
    pub class: String,

    /// Owner name.
    pub owner: String,

    /// Owner phone number.
    pub phone: String,

    /// Code printed on the entry ticket.
    pub code: String,

    /// Time the vehicle entered at.
    #[serde(with = "common::datetime::serde::rfc3339")]
    pub entered_at: DateTime,

    /// Time the vehicle left at, if it did.
    #[serde(with = "common::datetime::serde::rfc3339::option")]
    pub exited_at: Option<DateTime>,

    /// Charge paid on leaving, if it did.
    pub charge: Option<Charge>,
}

impl From<domain::Vehicle> for Vehicle {
    fn from(vehicle: domain::Vehicle) -> Self {
        let domain::Vehicle {
            id,
            plate,
            class,
            owner,
            phone,
            code,
            entered_at,
            exited_at,
            charge,
        } = vehicle;

        Self {
            id: id.to_string(),
            plate: plate.to_string(),
            class: class.to_string(),
            owner: owner.to_string(),
            phone: phone.to_string(),
            code: code.to_string(),
            entered_at: entered_at.coerce(),
            exited_at: exited_at.map(DateTimeOf::coerce),
            charge: charge.map(Into::into),
        }
    }
}

/// Request registering a vehicle entering the parking lot.
#[derive(Clone, Debug, Deserialize)]
pub struct EntryRequest {
    /// License plate.
    pub plate: String,

    /// Vehicle class.
    pub class: String,

    /// Owner name.
    pub owner: String,

    /// Owner phone number.
    pub phone: String,
}

/// Ticket issued on a vehicle entering the parking lot.
#[derive(Clone, Debug, Serialize)]
pub struct EntryTicket {
    /// Parked vehicle.
    pub vehicle: Vehicle,

    /// Hourly rate the vehicle is billed with.
    pub hourly_rate: Money,
}

/// Receipt of a vehicle billed for its stay.
#[derive(Clone, Debug, Serialize)]
pub struct Receipt {
    /// Billed vehicle.
    pub vehicle: Vehicle,

    /// Billed stay.
    pub stay: Stay,

    /// Charge for the stay.
    pub charge: Charge,
}

/// Query parameters of a charge quote.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct QuoteParams {
    /// Time to quote the charge at, defaulting to now.
    pub at: Option<String>,
}

/// Registers a vehicle entering the parking lot.
///
/// # Errors
///
/// Errors if the request is malformed, the lot is full or the vehicle is
/// parked already.
pub async fn enter(
    Extension(service): Extension<Service>,
    req: Result<Json<EntryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<EntryTicket>), Error> {
    let Json(EntryRequest {
        plate,
        class,
        owner,
        phone,
    }) = req.map_err(AsError::into_error)?;

    let cmd = RegisterEntry {
        plate: super::plate(&plate)?,
        class: super::class(&class)?,
        owner: vehicle::Owner::new(&owner).ok_or(InputError::Owner)?,
        phone: vehicle::Phone::new(&phone).ok_or(InputError::Phone)?,
    };
    let vehicle = service
        .execute(cmd)
        .await
        .map_err(AsError::into_error)?;

    let hourly_rate = service
        .config()
        .tariff
        .rate(vehicle.class)
        .ok_or_else(|| Error::internal(&"no rate for a parked vehicle"))?;

    Ok((
        StatusCode::CREATED,
        Json(EntryTicket {
            vehicle: vehicle.into(),
            hourly_rate,
        }),
    ))
}

/// Lists the vehicles currently in the parking lot, in order of entry.
///
/// # Errors
///
/// Errors if the database fails.
pub async fn list(
    Extension(service): Extension<Service>,
) -> Result<Json<Vec<Vehicle>>, Error> {
    let parked = service
        .execute(query::vehicles::Parked::by(read::vehicle::Parked))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(parked.into_iter().map(Into::into).collect()))
}

/// Looks up the parked vehicle with the provided plate.
///
/// # Errors
///
/// Errors if the plate is malformed or no such vehicle is parked.
pub async fn show(
    Extension(service): Extension<Service>,
    Path(plate): Path<String>,
) -> Result<Json<Vehicle>, Error> {
    let vehicle = service
        .execute(query::vehicle::ByPlate::by(super::plate(&plate)?))
        .await
        .map_err(AsError::into_error)?
        .ok_or(VehicleError::NotParked)?;

    Ok(Json(vehicle.into()))
}

/// Quotes the charge a parked vehicle would pay when leaving at the provided
/// time, without registering its exit.
///
/// # Errors
///
/// Errors if the request is malformed or no such vehicle is parked.
pub async fn quote(
    Extension(service): Extension<Service>,
    Path(plate): Path<String>,
    params: Result<axum::extract::Query<QuoteParams>, QueryRejection>,
) -> Result<Json<Receipt>, Error> {
    let axum::extract::Query(QuoteParams { at }) =
        params.map_err(AsError::into_error)?;

    let query = QuoteCharge {
        plate: super::plate(&plate)?,
        at: at.as_deref().map(super::datetime).transpose()?,
    };
    let quote = service
        .execute(query)
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(Receipt {
        vehicle: quote.vehicle.into(),
        stay: quote.stay.into(),
        charge: quote.charge.into(),
    }))
}

/// Registers a parked vehicle leaving the parking lot, billing its stay.
///
/// # Errors
///
/// Errors if the plate is malformed or no such vehicle is parked.
pub async fn exit(
    Extension(service): Extension<Service>,
    Path(plate): Path<String>,
) -> Result<Json<Receipt>, Error> {
    let departure = service
        .execute(RegisterExit {
            plate: super::plate(&plate)?,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(Receipt {
        vehicle: departure.vehicle.into(),
        stay: departure.stay.into(),
        charge: departure.charge.into(),
    }))
}

impl AsError for register_entry::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        crate::define_error! {
            enum Error {
                #[code = "VEHICLE_ALREADY_PARKED"]
                #[status = CONFLICT]
                #[message = "`Vehicle` with the provided plate is parked \
                             already"]
                AlreadyParked,

                #[code = "LOT_FULL"]
                #[status = CONFLICT]
                #[message = "All the parking spaces are taken"]
                LotFull,

                #[code = "NO_RATE"]
                #[status = UNPROCESSABLE_ENTITY]
                #[message = "No hourly rate is configured for the vehicle \
                             class"]
                NoRate,
            }
        }

        match self {
            Self::AlreadyParked(_) => Some(Error::AlreadyParked.into()),
            Self::Db(e) => e.try_as_error(),
            Self::LotFull(_) => Some(Error::LotFull.into()),
            Self::NoRate(_) => Some(Error::NoRate.into()),
        }
    }
}

impl AsError for register_exit::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Charge(e) => e.try_as_error(),
            Self::Db(e) => e.try_as_error(),
            Self::NotParked(_) => Some(VehicleError::NotParked.into()),
        }
    }
}

impl AsError for QuoteError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Charge(e) => e.try_as_error(),
            Self::Db(e) => e.try_as_error(),
            Self::NotParked(_) => Some(VehicleError::NotParked.into()),
        }
    }
}
