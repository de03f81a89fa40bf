pub mod client;
pub mod password;
pub mod provisioner;
pub mod request;

pub use crate::domain::model::{ProvisionResult, ServerTemplate};
pub use crate::domain::ports::{ConfigProvider, PanelApi};
pub use crate::utils::error::Result;
