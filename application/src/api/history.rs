//! Endpoint listing the vehicles that left the parking lot.

use axum::{
    extract::{rejection::QueryRejection, Query},
    Extension, Json,
};
use serde::Deserialize;
use service::{query, read::vehicle::history, Query as _};

use crate::{AsError, Error, Service};

use super::vehicle::Vehicle;

/// Query parameters filtering the history.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Params {
    /// Part of the plate to search for, ignoring its case.
    pub plate: Option<String>,

    /// Vehicle class to match.
    pub class: Option<String>,

    /// Earliest exit time (inclusive).
    pub from: Option<String>,

    /// Latest exit time (inclusive).
    pub to: Option<String>,
}

impl TryFrom<Params> for history::Filter {
    type Error = Error;

    fn try_from(params: Params) -> Result<Self, Self::Error> {
        let Params {
            plate,
            class,
            from,
            to,
        } = params;

        // Empty parameters don't filter anything.
        let given = |param: Option<String>| {
            param
                .map(|p| p.trim().to_owned())
                .filter(|p| !p.is_empty())
        };

        Ok(Self {
            plate: given(plate),
            class: given(class).as_deref().map(super::class).transpose()?,
            from: given(from).as_deref().map(super::datetime).transpose()?,
            to: given(to).as_deref().map(super::datetime).transpose()?,
        })
    }
}

/// Lists the departed vehicles matching the provided [`Params`], the most
/// recently departed first.
///
/// # Errors
///
/// Errors if the parameters are malformed.
pub async fn list(
    Extension(service): Extension<Service>,
    params: Result<Query<Params>, QueryRejection>,
) -> Result<Json<Vec<Vehicle>>, Error> {
    let Query(params) = params.map_err(AsError::into_error)?;

    let departed = service
        .execute(query::vehicles::History::by(params.try_into()?))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(departed.into_iter().map(Into::into).collect()))
}

#[cfg(test)]
mod spec {
    use http::StatusCode;
    use serde_json::json;

    use crate::api::spec::{app, send};

    #[tokio::test]
    async fn lists_departed_vehicles() {
        let app = app(3);
        for (plate, class) in [("ABC123", "carro"), ("XYZ789", "moto")] {
            let req = json!({
                "plate": plate,
                "class": class,
                "owner": "Ana",
                "phone": "3001234567",
            });
            _ = send(&app, "POST", "/vehicles", Some(req)).await;
            _ = send(&app, "POST", &format!("/vehicles/{plate}/exit"), None)
                .await;
        }
        let req = json!({
            "plate": "PARK01",
            "class": "moto",
            "owner": "Ana",
            "phone": "3001234567",
        });
        _ = send(&app, "POST", "/vehicles", Some(req)).await;

        let (status, body) = send(&app, "GET", "/history", None).await;
        assert_eq!(status, StatusCode::OK);
        let plates = body
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["plate"].as_str().unwrap().to_owned())
            .collect::<Vec<_>>();
        assert_eq!(plates.len(), 2);
        assert!(!plates.contains(&"PARK01".to_owned()));

        let (_, body) = send(&app, "GET", "/history?plate=bc1", None).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["plate"], "ABC123");
        assert!(body[0]["charge"]["amount"].is_string());

        let (_, body) = send(&app, "GET", "/history?class=moto", None).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["plate"], "XYZ789");

        let (_, body) = send(
            &app,
            "GET",
            "/history?from=2000-01-01T00:00:00Z&to=2000-12-31T23:59:59Z",
            None,
        )
        .await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn ignores_empty_filter_params() {
        let app = app(1);
        let req = json!({
            "plate": "EMP001",
            "class": "carro",
            "owner": "Ana",
            "phone": "3001234567",
        });
        _ = send(&app, "POST", "/vehicles", Some(req)).await;
        _ = send(&app, "POST", "/vehicles/EMP001/exit", None).await;

        let (status, body) =
            send(&app, "GET", "/history?plate=&class=&from=&to=", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["plate"], "EMP001");

        let (status, body) =
            send(&app, "GET", "/history?class=%20&to=", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rejects_malformed_filter() {
        let app = app(1);

        let (status, body) =
            send(&app, "GET", "/history?class=tractor", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "UNKNOWN_VEHICLE_CLASS");

        let (status, body) =
            send(&app, "GET", "/history?from=last-week", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_DATETIME");
    }
}
