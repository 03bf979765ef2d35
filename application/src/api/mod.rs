//! HTTP API definitions.

pub mod fee;
pub mod history;
pub mod occupancy;
pub mod vehicle;

use std::str::FromStr as _;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use common::DateTime;
use service::domain::vehicle as domain;

use crate::{define_error, Error, Service};

/// Builds the [`Router`] serving the HTTP API of the provided [`Service`].
pub fn router(service: Service) -> Router {
    Router::new()
        .route("/fee", post(fee::compute))
        .route("/vehicles", get(vehicle::list).post(vehicle::enter))
        .route("/vehicles/:plate", get(vehicle::show))
        .route("/vehicles/:plate/charge", get(vehicle::quote))
        .route("/vehicles/:plate/exit", post(vehicle::exit))
        .route("/occupancy", get(occupancy::show))
        .route("/history", get(history::list))
        .layer(Extension(service))
}

define_error! {
    enum InputError {
        #[code = "INVALID_PLATE"]
        #[status = BAD_REQUEST]
        #[message = "Plate must be 1 to 16 letters, digits, spaces or dashes"]
        Plate,

        #[code = "UNKNOWN_VEHICLE_CLASS"]
        #[status = BAD_REQUEST]
        #[message = "Vehicle class must be one of `moto`, `carro` or \
                     `camioneta`"]
        Class,

        #[code = "INVALID_OWNER"]
        #[status = BAD_REQUEST]
        #[message = "Owner name must be non-empty"]
        Owner,

        #[code = "INVALID_PHONE"]
        #[status = BAD_REQUEST]
        #[message = "Phone number is malformed"]
        Phone,

        #[code = "INVALID_DATETIME"]
        #[status = BAD_REQUEST]
        #[message = "Date and time must be in RFC 3339 format"]
        DateTime,
    }
}

define_error! {
    enum VehicleError {
        #[code = "VEHICLE_NOT_PARKED"]
        #[status = NOT_FOUND]
        #[message = "No `Vehicle` with the provided plate is parked"]
        NotParked,
    }
}

/// Parses the provided string into a [`domain::Plate`].
fn plate(s: &str) -> Result<domain::Plate, Error> {
    domain::Plate::new(s).ok_or_else(|| InputError::Plate.into())
}

/// Parses the provided string into a [`domain::Class`].
fn class(s: &str) -> Result<domain::Class, Error> {
    domain::Class::from_str(s.trim()).map_err(|_| InputError::Class.into())
}

/// Parses the provided RFC 3339 string into a [`DateTime`].
fn datetime(s: &str) -> Result<DateTime, Error> {
    DateTime::from_rfc3339(s.trim()).map_err(|_| InputError::DateTime.into())
}

#[cfg(test)]
mod spec {
    use axum::{body::Body, Router};
    use http::{Request, StatusCode};
    use service::{infra::Memory, Config};
    use tower::ServiceExt as _;

    use crate::Service;

    use super::router;

    /// Creates a [`Router`] over an empty parking lot of the provided
    /// `capacity`.
    pub(super) fn app(capacity: usize) -> Router {
        router(Service::new(
            Config {
                capacity,
                ..Config::default()
            },
            Memory::new(),
        ))
    }

    /// Sends the provided request returning its status and JSON body.
    pub(super) async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header(http::header::CONTENT_TYPE, "application/json");
        let req = match body {
            Some(json) => req.body(Body::from(json.to_string())),
            None => req.body(Body::empty()),
        }
        .unwrap();

        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let (status, _) = send(&app(1), "GET", "/parking", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
