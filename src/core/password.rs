use base64::{engine::general_purpose::STANDARD, Engine};
use rand::{rngs::OsRng, RngCore};

pub const PASSWORD_LENGTH: usize = 14;

/// 產生 `len` 個隨機 byte，base64 之後截成 `len` 個字元。
///
/// 字元集為 `[A-Za-z0-9+/]`，每個字元最多 6 bits，所以熵約為 `6 * len` bits，低於 `8 * len`。
/// 長度與字元集是對外可見的行為，不要改成其他編碼。
pub fn random_password(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);

    let mut encoded = STANDARD.encode(&bytes);
    encoded.truncate(len);
    encoded
}
