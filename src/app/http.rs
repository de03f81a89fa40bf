use crate::core::provisioner::{PanelResponse, Provisioner};
use crate::domain::ports::PanelApi;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get};
use axum::{Json, Router};
use std::sync::Arc;

pub const HEALTH_ROUTE: &str = "/healthz";

/// 建立 axum router。所有 method 都交給同一個 handler，由它回 405。
pub fn router<A: PanelApi + 'static>(provisioner: Arc<Provisioner<A>>, path: &str) -> Router {
    Router::new()
        .route(HEALTH_ROUTE, get(|| async { "ok" }))
        .route(path, any(create_panel::<A>))
        .with_state(provisioner)
}

#[tracing::instrument(name = "create_panel", skip_all, fields(method = %method, uri = %uri))]
async fn create_panel<A: PanelApi + 'static>(
    State(provisioner): State<Arc<Provisioner<A>>>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let response = provisioner.handle(method.as_str(), &body).await;
    tracing::info!(status = response.status, "Request finished");
    response.into_response()
}

impl IntoResponse for PanelResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, Json(self.body)).into_response();
        if let Some(allow) = self.allow {
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static(allow));
        }
        response
    }
}
