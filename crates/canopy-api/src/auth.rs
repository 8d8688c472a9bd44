// Login and signup against `/auth/*`.
//
// The service answers both calls with `{ user, message?, token? }`; a
// rejected attempt carries its reason in `message`.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;

/// Role requested for every self-service signup.
pub const SIGNUP_ROLE: &str = "ADMIN";

/// The authenticated user as returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Anything else the server attaches to the user object.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Body of a successful `/auth/login` or `/auth/signup` response.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub user: AuthUser,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Serialize)]
struct LoginBody<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct SignupBody<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
    role: &'a str,
}

impl ApiClient {
    /// `POST /auth/login`
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<AuthResponse, Error> {
        debug!(username, "logging in");
        self.post_auth(
            "login",
            &LoginBody {
                username,
                password: password.expose_secret(),
            },
        )
        .await
    }

    /// `POST /auth/signup` with the fixed `ADMIN` role.
    pub async fn signup(
        &self,
        username: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<AuthResponse, Error> {
        debug!(username, "signing up");
        self.post_auth(
            "signup",
            &SignupBody {
                username,
                email,
                password: password.expose_secret(),
                role: SIGNUP_ROLE,
            },
        )
        .await
    }
}
