use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Pterodactyl 以 0 表示不限制
pub const UNLIMITED_MEMORY: u64 = 0;
pub const FALLBACK_MEMORY_MB: u64 = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    Panel,
    Admin,
}

impl PanelKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "panel" => Some(Self::Panel),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Panel => "Panel",
            Self::Admin => "Admin Panel",
        }
    }

    pub fn server_name(self) -> &'static str {
        match self {
            Self::Panel => "User Panel",
            Self::Admin => "Admin Panel",
        }
    }

    pub fn server_description(self) -> &'static str {
        match self {
            Self::Panel => "User Pterodactyl",
            Self::Admin => "Admin Pterodactyl",
        }
    }

    pub fn last_name(self) -> &'static str {
        match self {
            Self::Panel => "User",
            Self::Admin => "Admin",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RamTier {
    Gigabytes(u8),
    Unlimited,
}

impl RamTier {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "unlimited" => Some(Self::Unlimited),
            "1" | "2" | "3" | "4" | "5" | "6" | "7" | "8" | "9" => {
                value.parse().ok().map(Self::Gigabytes)
            }
            _ => None,
        }
    }

    pub fn as_str(&self) -> String {
        match self {
            Self::Gigabytes(gb) => gb.to_string(),
            Self::Unlimited => "unlimited".to_string(),
        }
    }

    pub fn memory_mb(&self) -> u64 {
        memory_limit_for(&self.as_str())
    }

    /// 給使用者看的描述，例如 "2 GB"
    pub fn describe(&self) -> String {
        match self {
            Self::Gigabytes(gb) => format!("{} GB", gb),
            Self::Unlimited => "Unlimited".to_string(),
        }
    }
}

/// 將 RAM 字串轉為 MB。
///
/// 無法解析為正整數的值會落到 1024 MB；經過 [`RamTier::parse`] 驗證的值不會走到這條路。
pub fn memory_limit_for(raw: &str) -> u64 {
    if raw == "unlimited" {
        return UNLIMITED_MEMORY;
    }
    match raw.parse::<u64>() {
        Ok(gb) if gb > 0 => gb * 1024,
        _ => FALLBACK_MEMORY_MB,
    }
}

/// 建立伺服器時由設定檔提供的部分
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerTemplate {
    pub egg_id: u64,
    pub docker_image: String,
    pub startup: String,
    pub location_id: u64,
    pub disk: u64,
    pub cpu: u64,
    #[serde(default)]
    pub environment: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceProfile {
    pub memory: u64,
    pub swap: u64,
    pub disk: u64,
    pub io: u32,
    pub cpu: u64,
}

impl ResourceProfile {
    pub const IO_WEIGHT: u32 = 500;

    pub fn new(ram: RamTier, template: &ServerTemplate) -> Self {
        Self {
            memory: ram.memory_mb(),
            swap: 0,
            disk: template.disk,
            io: Self::IO_WEIGHT,
            cpu: template.cpu,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub root_admin: bool,
    pub language: String,
}

impl NewUser {
    pub fn new(kind: PanelKind, email: &str, username: &str, password: String) -> Self {
        Self {
            email: email.to_string(),
            username: username.to_string(),
            first_name: "Panel".to_string(),
            last_name: kind.last_name().to_string(),
            password,
            root_admin: kind.is_admin(),
            language: "en".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureLimits {
    pub databases: u32,
    pub allocations: u32,
    pub backups: u32,
}

impl Default for FeatureLimits {
    fn default() -> Self {
        Self {
            databases: 2,
            allocations: 1,
            backups: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Deploy {
    pub locations: Vec<u64>,
    pub dedicated_ip: bool,
    pub port_range: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewServer {
    pub name: String,
    pub description: String,
    pub user: u64,
    pub egg: u64,
    pub docker_image: String,
    pub startup: String,
    pub limits: ResourceProfile,
    pub feature_limits: FeatureLimits,
    pub environment: BTreeMap<String, serde_json::Value>,
    pub deploy: Deploy,
    pub start_on_completion: bool,
}

impl NewServer {
    pub fn new(
        owner_id: u64,
        kind: PanelKind,
        limits: ResourceProfile,
        template: &ServerTemplate,
    ) -> Self {
        Self {
            name: kind.server_name().to_string(),
            description: kind.server_description().to_string(),
            user: owner_id,
            egg: template.egg_id,
            docker_image: template.docker_image.clone(),
            startup: template.startup.clone(),
            limits,
            feature_limits: FeatureLimits::default(),
            environment: template.environment.clone(),
            deploy: Deploy {
                locations: vec![template.location_id],
                dedicated_ip: false,
                port_range: Vec::new(),
            },
            start_on_completion: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteUser {
    pub id: u64,
    pub uuid: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteServer {
    pub id: u64,
    pub uuid: String,
    pub identifier: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProvisionedUser {
    pub id: u64,
    pub uuid: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProvisionResult {
    pub success: bool,
    pub message: String,
    pub user: ProvisionedUser,
    pub server: RemoteServer,
}
