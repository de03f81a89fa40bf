use crate::core::password::{random_password, PASSWORD_LENGTH};
use crate::core::request::ProvisionRequest;
use crate::domain::model::{
    NewServer, NewUser, ProvisionResult, ProvisionedUser, ResourceProfile, ServerTemplate,
};
use crate::domain::ports::PanelApi;
use crate::utils::error::{ProvisionError, Result};
use serde_json::{json, Value};

pub const ALLOWED_METHOD: &str = "POST";

/// 與 web framework 無關的回應；axum 和 lambda 兩邊各自轉換
#[derive(Debug, Clone, PartialEq)]
pub struct PanelResponse {
    pub status: u16,
    pub allow: Option<&'static str>,
    pub body: Value,
}

impl PanelResponse {
    pub fn ok(body: Value) -> Self {
        Self {
            status: 200,
            allow: None,
            body,
        }
    }

    pub fn method_not_allowed() -> Self {
        Self {
            status: 405,
            allow: Some(ALLOWED_METHOD),
            body: json!({ "error": "Method not allowed" }),
        }
    }

    pub fn from_error(err: &ProvisionError) -> Self {
        Self {
            status: err.status_code(),
            allow: None,
            body: json!({ "error": err.to_string() }),
        }
    }
}

/// 建立帳號再建立伺服器。兩步依序執行，帳號建立失敗就不會呼叫建立伺服器；
/// 伺服器建立失敗時已建立的帳號不會被刪除。
pub struct Provisioner<A: PanelApi> {
    api: A,
    template: ServerTemplate,
}

impl<A: PanelApi> Provisioner<A> {
    pub fn new(api: A, template: ServerTemplate) -> Self {
        Self { api, template }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub async fn handle(&self, method: &str, body: &[u8]) -> PanelResponse {
        if method != ALLOWED_METHOD {
            tracing::debug!("Rejecting {} request", method);
            return PanelResponse::method_not_allowed();
        }

        let outcome = match ProvisionRequest::from_body(body) {
            Ok(request) => self
                .provision(request)
                .await
                .and_then(|result| serde_json::to_value(&result).map_err(ProvisionError::from)),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(body) => PanelResponse::ok(body),
            Err(e) => {
                log_failure(&e);
                PanelResponse::from_error(&e)
            }
        }
    }

    pub async fn provision(&self, request: ProvisionRequest) -> Result<ProvisionResult> {
        let limits = ResourceProfile::new(request.ram, &self.template);
        let password = random_password(PASSWORD_LENGTH);

        tracing::info!(
            username = %request.username,
            admin = request.kind.is_admin(),
            "Creating panel account"
        );
        let new_user = NewUser::new(request.kind, &request.email, &request.username, password);
        let user = self.api.create_user(&new_user).await?;
        tracing::info!(user_id = user.id, uuid = %user.uuid, "Panel account created");

        let new_server = NewServer::new(user.id, request.kind, limits, &self.template);
        tracing::info!(
            user_id = user.id,
            memory_mb = new_server.limits.memory,
            "Creating server"
        );
        let server = self.api.create_server(&new_server).await?;
        tracing::info!(
            server_id = server.id,
            identifier = %server.identifier,
            "✅ Server created"
        );

        Ok(ProvisionResult {
            success: true,
            message: format!(
                "Berhasil membuat {} dengan RAM {}.",
                request.kind.display_name(),
                request.ram.describe()
            ),
            user: ProvisionedUser {
                id: user.id,
                uuid: user.uuid,
                username: request.username,
                email: request.email,
                password: new_user.password,
            },
            server,
        })
    }
}

/// 呼叫端的錯誤記 warn，下游失敗記 error
fn log_failure(err: &ProvisionError) -> tracing::Level {
    if err.is_client_error() {
        tracing::warn!("Rejected provisioning request: {}", err);
        tracing::Level::WARN
    } else {
        tracing::error!("❌ Provisioning failed: {}", err);
        tracing::Level::ERROR
    }
}
