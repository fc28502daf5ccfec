//! axum middleware that runs the route gate on every request.
//!
//! ```ignore
//! let gate = Arc::new(RouteGate::new(table));
//! let app = Router::new()
//!     .route("/dashboard", get(dashboard))
//!     .layer(axum::middleware::from_fn_with_state(gate, route_gate_middleware));
//! ```
//!
//! The auth layer in front of this one marks signed-in requests by inserting
//! a [`SessionMarker`] extension.

use crate::core::route_gate::{RouteGate, RouteTable};
use crate::domain::model::GateDecision;
use axum::{
    body::Body,
    extract::State,
    http::{header::LOCATION, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

/// Present in request extensions when the request carries a valid session.
#[derive(Debug, Clone, Default)]
pub struct SessionMarker {
    pub subject: Option<String>,
}

pub async fn route_gate_middleware(
    State(gate): State<Arc<RouteGate>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if RouteTable::is_excluded(req.uri().path()) {
        return next.run(req).await;
    }

    let is_logged_in = req.extensions().get::<SessionMarker>().is_some();
    let decision = gate.decide(req.uri().path(), req.uri().query(), is_logged_in);

    match decision {
        GateDecision::Continue => next.run(req).await,
        GateDecision::Redirect { location } => found(&location),
    }
}

fn found(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => (StatusCode::FOUND, [(LOCATION, value)]).into_response(),
        Err(e) => {
            tracing::error!("Invalid redirect location {:?}: {}", location, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
