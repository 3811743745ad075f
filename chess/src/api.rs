//! Contract of the account and leaderboard service
//!
//! The service speaks JSON over HTTP. Every failed request answers with
//! `{"success": false, "error": "..."}`, and authenticated endpoints expect an
//! `Authorization: Bearer <token>` header.
//!
//! The blocking [`ApiClient`] is available with the `client` feature.

use crate::opponent::Difficulty;
use crate::types::{Color, Outcome};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Rating change applied by the service for each result
pub const RATING_STEP: i32 = 10;

pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Request was not sent, as it would be rejected anyway
    #[error("{0}")]
    Invalid(&'static str),
    #[error("request rejected: {0}")]
    Rejected(String),
    #[error("not authorized")]
    Unauthorized,
    #[error("cannot decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[cfg(feature = "client")]
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl SignupRequest {
    /// Checks the fields the same way the service does
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.username.is_empty() || self.email.is_empty() || self.password.is_empty() {
            return Err(ApiError::Invalid("All fields are required"));
        }
        if self.username.chars().count() < MIN_USERNAME_LEN {
            return Err(ApiError::Invalid(
                "Username must be at least 3 characters",
            ));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ApiError::Invalid(
                "Password must be at least 6 characters",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.email.is_empty() || self.password.is_empty() {
            return Err(ApiError::Invalid("Email and password are required"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub rating: i32,
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub user: User,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub success: bool,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub username: String,
    pub rating: i32,
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: UserStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Result of a finished game, from the player's side
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameResult {
    Win,
    Loss,
    Draw,
}

impl GameResult {
    /// Returns the result for the player with color `player`
    pub fn from_outcome(outcome: Outcome, player: Color) -> GameResult {
        if outcome.winner() == player {
            GameResult::Win
        } else {
            GameResult::Loss
        }
    }

    /// Rating change applied by the service
    pub fn rating_delta(&self) -> i32 {
        match self {
            Self::Win => RATING_STEP,
            Self::Loss => -RATING_STEP,
            Self::Draw => 0,
        }
    }
}

/// Body of `POST /games`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameReport {
    pub result: GameResult,
    pub moves: Vec<String>,
    pub difficulty: Difficulty,
    pub time_control: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub rating: i32,
    pub wins: u32,
    pub games_played: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardResponse {
    pub success: bool,
    pub leaderboard: Vec<LeaderboardEntry>,
}

/// Saved game, as listed by `GET /user/games`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: i64,
    pub result: GameResult,
    /// Moves as stored by the service, i.e. a JSON-encoded list
    pub moves: String,
    pub difficulty: String,
    pub time_control: String,
    #[serde(default)]
    pub opponent: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

impl GameRecord {
    /// Decodes the stored move list
    pub fn move_list(&self) -> Result<Vec<String>, ApiError> {
        Ok(serde_json::from_str(&self.moves)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserGamesResponse {
    pub success: bool,
    pub games: Vec<GameRecord>,
}

/// Turns a response with HTTP status `status` and JSON body `body` into `T`
///
/// A `success: false` body with an `error` text is [`ApiError::Rejected`], even on 401.
pub fn decode_response<T: DeserializeOwned>(status: u16, body: Value) -> Result<T, ApiError> {
    let failed = body.get("success").and_then(Value::as_bool) == Some(false);
    match body.get("error").and_then(Value::as_str) {
        Some(msg) if failed => return Err(ApiError::Rejected(msg.to_string())),
        _ if status == 401 => return Err(ApiError::Unauthorized),
        _ if failed => return Err(ApiError::Rejected("unknown error".to_string())),
        _ => {}
    }
    Ok(serde_json::from_value(body)?)
}

#[cfg(feature = "client")]
pub use client::ApiClient;

#[cfg(feature = "client")]
mod client {
    use super::*;

    use reqwest::blocking::{Client, RequestBuilder};
    use tracing::{debug, info};

    /// Blocking client for the account and leaderboard service
    pub struct ApiClient {
        http: Client,
        base_url: String,
        token: Option<String>,
    }

    impl ApiClient {
        /// Creates a client for the service at `base_url`, e.g. `http://localhost:3000`
        pub fn new(base_url: impl Into<String>) -> ApiClient {
            ApiClient {
                http: Client::new(),
                base_url: base_url.into().trim_end_matches('/').to_string(),
                token: None,
            }
        }

        pub fn with_token(mut self, token: impl Into<String>) -> ApiClient {
            self.token = Some(token.into());
            self
        }

        pub fn token(&self) -> Option<&str> {
            self.token.as_deref()
        }

        pub fn logout(&mut self) {
            self.token = None;
        }

        fn url(&self, path: &str) -> String {
            format!("{}/api{}", self.base_url, path)
        }

        fn authorized(&self, req: RequestBuilder) -> Result<RequestBuilder, ApiError> {
            let token = self.token.as_deref().ok_or(ApiError::Unauthorized)?;
            Ok(req.bearer_auth(token))
        }

        fn send<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, ApiError> {
            let resp = req.send()?;
            let status = resp.status().as_u16();
            let body: Value = resp.json()?;
            debug!(status, "api response");
            decode_response(status, body)
        }

        pub fn health(&self) -> Result<HealthResponse, ApiError> {
            Self::send(self.http.get(self.url("/health")))
        }

        /// Creates an account and remembers the issued token
        pub fn signup(&mut self, req: &SignupRequest) -> Result<AuthResponse, ApiError> {
            req.validate()?;
            let resp: AuthResponse = Self::send(self.http.post(self.url("/signup")).json(req))?;
            info!(username = %resp.user.username, "signed up");
            self.token = Some(resp.token.clone());
            Ok(resp)
        }

        /// Logs in and remembers the issued token
        pub fn login(&mut self, req: &LoginRequest) -> Result<AuthResponse, ApiError> {
            req.validate()?;
            let resp: AuthResponse = Self::send(self.http.post(self.url("/login")).json(req))?;
            info!(username = %resp.user.username, "logged in");
            self.token = Some(resp.token.clone());
            Ok(resp)
        }

        pub fn verify(&self) -> Result<VerifyResponse, ApiError> {
            Self::send(self.authorized(self.http.get(self.url("/verify")))?)
        }

        pub fn stats(&self) -> Result<StatsResponse, ApiError> {
            Self::send(self.authorized(self.http.get(self.url("/stats")))?)
        }

        pub fn save_game(&self, report: &GameReport) -> Result<MessageResponse, ApiError> {
            let req = self.authorized(self.http.post(self.url("/games")).json(report))?;
            let resp = Self::send(req)?;
            info!(result = ?report.result, moves = report.moves.len(), "game saved");
            Ok(resp)
        }

        pub fn leaderboard(&self) -> Result<LeaderboardResponse, ApiError> {
            Self::send(self.http.get(self.url("/leaderboard")))
        }

        pub fn user_games(&self) -> Result<UserGamesResponse, ApiError> {
            Self::send(self.authorized(self.http.get(self.url("/user/games")))?)
        }
    }

}
