use serde::{Deserialize, Serialize};

/// Payload of `GET /check-auth`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthStatus {
    #[serde(default)]
    pub logged_in: bool,
    #[serde(default)]
    pub username: Option<String>,
}

/// Payload of `POST /change-password`. The server re-checks everything; the
/// client validates first so obviously bad input never leaves the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}
