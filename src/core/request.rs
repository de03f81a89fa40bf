use crate::domain::model::{PanelKind, RamTier};
use crate::utils::error::{ProvisionError, Result};
use serde_json::Value;

pub const MAX_USERNAME_LEN: usize = 32;
pub const DEFAULT_PANEL_USERNAME: &str = "userpanel";

pub const MSG_INVALID_TYPE: &str = "type harus 'panel' atau 'admin'.";
pub const MSG_INVALID_RAM: &str = "RAM tidak valid. Pilih 1–9 atau unlimited.";
pub const MSG_MISSING_EMAIL: &str = "email wajib diisi.";
pub const MSG_MISSING_USERNAME: &str = "username wajib untuk admin.";
pub const MSG_MISSING_DOMAIN: &str = "domain wajib diisi untuk panel.";

/// 通過驗證、已正規化的建立請求
#[derive(Debug, Clone, PartialEq)]
pub struct ProvisionRequest {
    pub kind: PanelKind,
    pub ram: RamTier,
    pub email: String,
    pub username: String,
}

impl ProvisionRequest {
    /// 解析 request body。無法解析的 JSON 視同空物件，交給後面的欄位檢查回報錯誤。
    pub fn from_body(body: &[u8]) -> Result<Self> {
        let value = serde_json::from_slice::<Value>(body).unwrap_or(Value::Null);
        Self::from_value(&value)
    }

    /// 依序驗證，第一個失敗的欄位決定錯誤訊息
    pub fn from_value(body: &Value) -> Result<Self> {
        let kind = body
            .get("type")
            .and_then(Value::as_str)
            .and_then(PanelKind::parse)
            .ok_or_else(|| ProvisionError::validation(MSG_INVALID_TYPE))?;

        let ram = text_field(body, "ram")
            .as_deref()
            .and_then(RamTier::parse)
            .ok_or_else(|| ProvisionError::validation(MSG_INVALID_RAM))?;

        let email =
            text_field(body, "email").ok_or_else(|| ProvisionError::validation(MSG_MISSING_EMAIL))?;

        let username = match kind {
            PanelKind::Admin => {
                let raw = text_field(body, "username")
                    .ok_or_else(|| ProvisionError::validation(MSG_MISSING_USERNAME))?;
                admin_username(&raw)
            }
            PanelKind::Panel => {
                let raw = text_field(body, "domain")
                    .ok_or_else(|| ProvisionError::validation(MSG_MISSING_DOMAIN))?;
                panel_username(&raw)
            }
        };

        Ok(Self {
            kind,
            ram,
            email,
            username,
        })
    }
}

/// 取出欄位並轉成字串；空字串、0、false、null 都視為未填
fn text_field(body: &Value, key: &str) -> Option<String> {
    match body.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(number_text(n)),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

/// 整數值的浮點數 (例如 2.0) 輸出成 "2"
fn number_text(n: &serde_json::Number) -> String {
    if n.is_f64() {
        if let Some(f) = n.as_f64().filter(|f| f.fract() == 0.0 && f.abs() < 1e15) {
            return format!("{}", f as i64);
        }
    }
    n.to_string()
}

/// admin 帳號：小寫、只留 [a-z0-9_]、最多 32 字元。結果可能是空字串，沒有預設值。
pub fn admin_username(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_')
        .take(MAX_USERNAME_LEN)
        .collect()
}

/// panel 帳號由網域產生：去掉開頭的 http(s)://、只留 [a-z0-9]、最多 32 字元，空的話用 "userpanel"
pub fn panel_username(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let without_scheme = lowered
        .strip_prefix("https://")
        .or_else(|| lowered.strip_prefix("http://"))
        .unwrap_or(&lowered);

    let username: String = without_scheme
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .take(MAX_USERNAME_LEN)
        .collect();

    if username.is_empty() {
        DEFAULT_PANEL_USERNAME.to_string()
    } else {
        username
    }
}
