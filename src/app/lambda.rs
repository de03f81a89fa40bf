use crate::core::provisioner::{PanelResponse, Provisioner};
use crate::domain::ports::PanelApi;
use crate::utils::error::{ProvisionError, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const MSG_INVALID_BASE64: &str = "request body is not valid base64";

/// API Gateway (REST v1 / HTTP v2) 與 function URL 的事件。
///
/// v1 把 method 放在最外層的 `httpMethod`，v2 與 function URL 放在
/// `requestContext.http.method`。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LambdaRequest {
    #[serde(default, alias = "method")]
    pub http_method: Option<String>,
    #[serde(default)]
    pub request_context: Option<RequestContext>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    #[serde(default)]
    pub http: Option<HttpContext>,
    #[serde(default)]
    pub http_method: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HttpContext {
    #[serde(default)]
    pub method: Option<String>,
}

impl LambdaRequest {
    /// 找不到 method 時回傳空字串，交給 handler 回 405
    pub fn method(&self) -> &str {
        let context = self.request_context.as_ref();
        self.http_method
            .as_deref()
            .or_else(|| context.and_then(|c| c.http.as_ref()?.method.as_deref()))
            .or_else(|| context.and_then(|c| c.http_method.as_deref()))
            .unwrap_or_default()
    }

    pub fn decode_body(&self) -> Result<Vec<u8>> {
        match &self.body {
            Some(body) if self.is_base64_encoded => STANDARD
                .decode(body)
                .map_err(|_| ProvisionError::validation(MSG_INVALID_BASE64)),
            Some(body) => Ok(body.clone().into_bytes()),
            None => Ok(Vec::new()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LambdaResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl From<PanelResponse> for LambdaResponse {
    fn from(response: PanelResponse) -> Self {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        if let Some(allow) = response.allow {
            headers.insert("Allow".to_string(), allow.to_string());
        }
        Self {
            status_code: response.status,
            headers,
            body: response.body.to_string(),
        }
    }
}

/// 每個事件都會得到一個 HTTP 回應，body 解碼失敗也一樣
pub async fn handle_event<A: PanelApi>(
    provisioner: &Provisioner<A>,
    request: LambdaRequest,
) -> LambdaResponse {
    let method = request.method();
    if method != crate::core::provisioner::ALLOWED_METHOD {
        return provisioner.handle(method, &[]).await.into();
    }

    match request.decode_body() {
        Ok(body) => provisioner.handle(method, &body).await.into(),
        Err(e) => {
            tracing::warn!("Rejected lambda event: {}", e);
            PanelResponse::from_error(&e).into()
        }
    }
}
