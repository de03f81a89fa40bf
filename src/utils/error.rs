use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    // 呼叫端輸入錯誤，訊息直接回傳給使用者
    #[error("{message}")]
    ValidationError { message: String },

    // 遠端 panel API 回傳非 2xx，message 已經過 extract_error_message 挑選
    #[error("{message}")]
    RemoteApiError { status: u16, message: String },

    #[error("Unexpected response from panel API: {message}")]
    UnexpectedResponse { message: String },
}

impl ProvisionError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    /// 對應到回給呼叫端的 HTTP 狀態碼
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ValidationError { .. } => 400,
            _ => 500,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

pub type Result<T> = std::result::Result<T, ProvisionError>;
