use crate::domain::model::{NewServer, NewUser, RemoteServer, RemoteUser, ServerTemplate};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait ConfigProvider: Send + Sync {
    fn api_base(&self) -> &str;
    fn api_key(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn server_template(&self) -> ServerTemplate;
}

/// Pterodactyl application API 中會用到的部分
#[async_trait]
pub trait PanelApi: Send + Sync {
    async fn create_user(&self, user: &NewUser) -> Result<RemoteUser>;
    async fn create_server(&self, server: &NewServer) -> Result<RemoteServer>;
}
