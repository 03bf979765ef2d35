//! Fee calculation endpoint and shared billing representations.

use axum::{extract::rejection::JsonRejection, Extension, Json};
use common::Money;
use serde::{Deserialize, Serialize};
use service::{domain, query::ComputeCharge, Query as _};

use crate::{AsError, Error, Service};

/// Request of a fee calculation.
#[derive(Clone, Debug, Deserialize)]
pub struct FeeRequest {
    /// Vehicle class to bill.
    pub class: String,

    /// Time the stay starts at.
    pub entry: String,

    /// Time the stay ends at, defaulting to now.
    #[serde(default)]
    pub exit: Option<String>,
}

/// Result of a fee calculation.
#[derive(Clone, Debug, Serialize)]
pub struct Fee {
    /// Billed stay.
    pub stay: Stay,

    /// Charge for the stay.
    pub charge: Charge,
}

/// Length of a stay in the parking lot.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Stay {
    /// Whole minutes of the stay.
    pub total_minutes: u64,

    /// Whole hours of the stay.
    pub hours: u64,

    /// Minutes of the stay past the whole hours.
    pub minutes: u64,
}

impl From<domain::Stay> for Stay {
    fn from(stay: domain::Stay) -> Self {
        Self {
            total_minutes: stay.total_minutes(),
            hours: stay.hours(),
            minutes: stay.minutes(),
        }
    }
}

/// Amount billed for a stay.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Charge {
    /// Number of started fractions billed.
    pub fractions: u64,

    /// Length of a single fraction in minutes.
    pub fraction_minutes: u64,

    /// Price of a single fraction.
    pub fraction_price: Money,

    /// Total amount to pay.
    pub amount: Money,
}

impl From<domain::Charge> for Charge {
    fn from(charge: domain::Charge) -> Self {
        Self {
            fractions: charge.fractions,
            fraction_minutes: domain::charge::FRACTION_MINUTES,
            fraction_price: charge.fraction_price,
            amount: charge.amount,
        }
    }
}

/// Computes the fee of a stay with no vehicle registered.
///
/// # Errors
///
/// Errors if the request is malformed or the stay cannot be billed.
pub async fn compute(
    Extension(service): Extension<Service>,
    req: Result<Json<FeeRequest>, JsonRejection>,
) -> Result<Json<Fee>, Error> {
    let Json(FeeRequest { class, entry, exit }) =
        req.map_err(AsError::into_error)?;

    let query = ComputeCharge {
        class: super::class(&class)?,
        entry: super::datetime(&entry)?,
        exit: exit.as_deref().map(super::datetime).transpose()?,
    };
    let (stay, charge) = service
        .execute(query)
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(Fee {
        stay: stay.into(),
        charge: charge.into(),
    }))
}

impl AsError for domain::charge::ChargeError {
    fn try_as_error(&self) -> Option<Error> {
        crate::define_error! {
            enum Error {
                #[code = "NO_RATE"]
                #[status = UNPROCESSABLE_ENTITY]
                #[message = "No hourly rate is configured for the vehicle \
                             class"]
                NoRate,

                #[code = "NEGATIVE_STAY"]
                #[status = BAD_REQUEST]
                #[message = "Exit time precedes entry time"]
                NegativeStay,

                #[code = "AMOUNT_OVERFLOW"]
                #[status = UNPROCESSABLE_ENTITY]
                #[message = "Amount due is too large"]
                Overflow,
            }
        }

        match self {
            Self::NoRate(_) => Some(Error::NoRate.into()),
            Self::NegativeStay => Some(Error::NegativeStay.into()),
            Self::Overflow => Some(Error::Overflow.into()),
        }
    }
}

#[cfg(test)]
mod spec {
    use http::StatusCode;
    use serde_json::json;
    use service::domain::charge::ChargeError;

    use crate::{
        api::spec::{app, send},
        AsError as _,
    };

    #[tokio::test]
    async fn computes_fee_of_stay() {
        let (status, body) = send(
            &app(1),
            "POST",
            "/fee",
            Some(json!({
                "class": "carro",
                "entry": "2024-05-10T08:00:00Z",
                "exit": "2024-05-10T08:47:00Z",
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["stay"]["total_minutes"], 47);
        assert_eq!(body["charge"]["fractions"], 4);
        assert_eq!(body["charge"]["fraction_minutes"], 15);
        assert_eq!(body["charge"]["amount"], "3500COP");
    }

    #[tokio::test]
    async fn bills_started_fractions() {
        let (status, body) = send(
            &app(1),
            "POST",
            "/fee",
            Some(json!({
                "class": "moto",
                "entry": "2024-05-10T08:00:00-05:00",
                "exit": "2024-05-10T09:01:00-05:00",
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["stay"]["hours"], 1);
        assert_eq!(body["stay"]["minutes"], 1);
        assert_eq!(body["charge"]["fractions"], 5);
        assert_eq!(body["charge"]["amount"], "2500COP");
    }

    #[tokio::test]
    async fn rejects_unknown_class() {
        let (status, body) = send(
            &app(1),
            "POST",
            "/fee",
            Some(json!({
                "class": "bus",
                "entry": "2024-05-10T08:00:00Z",
            })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "UNKNOWN_VEHICLE_CLASS");
    }

    #[tokio::test]
    async fn rejects_exit_before_entry() {
        let (status, body) = send(
            &app(1),
            "POST",
            "/fee",
            Some(json!({
                "class": "camioneta",
                "entry": "2024-05-10T08:00:00Z",
                "exit": "2024-05-10T07:59:00Z",
            })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "NEGATIVE_STAY");
    }

    #[tokio::test]
    async fn rejects_malformed_datetime() {
        let (status, body) = send(
            &app(1),
            "POST",
            "/fee",
            Some(json!({
                "class": "moto",
                "entry": "yesterday",
            })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_DATETIME");
    }

    #[test]
    fn overflowing_amount_is_unprocessable() {
        let err = ChargeError::Overflow.as_error();

        assert_eq!(err.code, "AMOUNT_OVERFLOW");
        assert_eq!(err.status_code, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn rejects_malformed_body() {
        let (status, body) =
            send(&app(1), "POST", "/fee", Some(json!({ "class": 1 }))).await;

        assert!(status.is_client_error());
        assert_eq!(body["code"], "BAD_REQUEST");
    }
}
