//! Login session: tokens and the signed-in user.
//!
//! The service and older client builds spell the login fields several ways.
//! Every spelling is resolved once, here, on ingest; the rest of the crate
//! only sees [`Session`] and [`UserProfile`].

use std::path::{Path, PathBuf};

use rounds_shared::types::UserId;
use rounds_shared::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// The signed-in user, as far as the client cares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawUserProfile", rename_all = "camelCase")]
pub struct UserProfile {
    /// Canonical user id.
    pub user_id: UserId,
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    /// Avatar path or URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

#[derive(Deserialize)]
struct RawUserProfile {
    #[serde(rename = "userId")]
    user_id_camel: Option<UserId>,
    #[serde(rename = "user_id")]
    user_id_snake: Option<UserId>,
    id: Option<UserId>,
    nickname: Option<String>,
    #[serde(rename = "avatarUrl", alias = "avatar_url", alias = "avatar")]
    avatar_url: Option<String>,
}

impl TryFrom<RawUserProfile> for UserProfile {
    type Error = String;

    fn try_from(raw: RawUserProfile) -> Result<Self, Self::Error> {
        let user_id = raw
            .user_id_camel
            .or(raw.user_id_snake)
            .or(raw.id)
            .ok_or_else(|| "user object has no userId, user_id or id".to_string())?;
        Ok(Self {
            user_id,
            nickname: raw.nickname,
            avatar_url: raw.avatar_url,
        })
    }
}

/// A normalised login response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "LoginEnvelope")]
pub struct LoginPayload {
    /// Bearer token.
    pub access_token: String,
    /// Refresh token, if issued.
    pub refresh_token: Option<String>,
    /// The signed-in user.
    pub user: UserProfile,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LoginEnvelope {
    Wrapped { data: RawLoginPayload },
    Bare(RawLoginPayload),
}

#[derive(Deserialize)]
struct RawLoginPayload {
    #[serde(rename = "accessToken")]
    access_token_camel: Option<String>,
    #[serde(rename = "access_token")]
    access_token_snake: Option<String>,
    token: Option<String>,
    #[serde(rename = "refreshToken")]
    refresh_token_camel: Option<String>,
    #[serde(rename = "refresh_token")]
    refresh_token_snake: Option<String>,
    user: Option<UserProfile>,
    #[serde(rename = "userInfo")]
    user_info_camel: Option<UserProfile>,
    #[serde(rename = "user_info")]
    user_info_snake: Option<UserProfile>,
}

impl TryFrom<LoginEnvelope> for LoginPayload {
    type Error = String;

    fn try_from(envelope: LoginEnvelope) -> Result<Self, Self::Error> {
        let raw = match envelope {
            LoginEnvelope::Wrapped { data } | LoginEnvelope::Bare(data) => data,
        };
        let access_token = raw
            .access_token_camel
            .or(raw.access_token_snake)
            .or(raw.token)
            .ok_or_else(|| "login response has no access token".to_string())?;
        let user = raw
            .user
            .or(raw.user_info_camel)
            .or(raw.user_info_snake)
            .ok_or_else(|| "login response has no user".to_string())?;
        Ok(Self {
            access_token,
            refresh_token: raw.refresh_token_camel.or(raw.refresh_token_snake),
            user,
        })
    }
}

/// Persisted login state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Bearer token.
    pub access_token: String,
    /// Refresh token, if issued.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// The signed-in user.
    pub user: UserProfile,
}

impl From<LoginPayload> for Session {
    fn from(login: LoginPayload) -> Self {
        Self {
            access_token: login.access_token,
            refresh_token: login.refresh_token,
            user: login.user,
        }
    }
}

/// Owns the current session and its file on disk.
///
/// Shared behind an `Arc`; readers take the lock briefly and clone what
/// they need.
#[derive(Debug)]
pub struct SessionManager {
    path: PathBuf,
    current: RwLock<Option<Session>>,
}

impl SessionManager {
    /// Creates a logged-out manager persisting to `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            current: RwLock::new(None),
        }
    }

    /// Creates a manager and loads any session saved at `path`.
    ///
    /// A missing file means logged out. An unreadable file is logged and
    /// treated the same way.
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let manager = Self::new(path);
        match read_session(&manager.path).await {
            Ok(Some(session)) => {
                debug!(user_id = %session.user.user_id, "Loaded saved session");
                *manager.current.write().await = Some(session);
            }
            Ok(None) => debug!(path = %manager.path.display(), "No saved session"),
            Err(err) => warn!(path = %manager.path.display(), "Ignoring saved session: {err}"),
        }
        manager
    }

    /// Path of the session file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the session and writes it to disk.
    pub async fn store(&self, session: Session) -> AppResult<()> {
        write_session(&self.path, &session).await?;
        info!(user_id = %session.user.user_id, "Session stored");
        *self.current.write().await = Some(session);
        Ok(())
    }

    /// Drops the session and deletes its file.
    pub async fn clear(&self) -> AppResult<()> {
        let had_session = self.current.write().await.take().is_some();
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => {
                return Err(AppError::Internal(format!(
                    "failed to delete {}: {err}",
                    self.path.display()
                )));
            }
        }
        if had_session {
            info!("Session cleared");
        }
        Ok(())
    }

    /// The current bearer token, if logged in.
    pub async fn token(&self) -> Option<String> {
        self.current
            .read()
            .await
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    /// The signed-in user, if any.
    pub async fn current_user(&self) -> Option<UserProfile> {
        self.current.read().await.as_ref().map(|s| s.user.clone())
    }

    /// Returns true if a session is held.
    pub async fn is_logged_in(&self) -> bool {
        self.current.read().await.is_some()
    }
}

async fn read_session(path: &Path) -> AppResult<Option<Session>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(AppError::Internal(format!(
            "failed to read {}: {err}",
            path.display()
        ))),
    }
}

async fn write_session(path: &Path, session: &Session) -> AppResult<()> {
    let io_error =
        |err: std::io::Error| AppError::Internal(format!("failed to write {}: {err}", path.display()));

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
    }
    let bytes = serde_json::to_vec_pretty(session)?;
    tokio::fs::write(path, bytes).await.map_err(io_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn temp_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("rounds-session-{}", uuid::Uuid::new_v4()))
            .join("session.json")
    }

    #[rstest]
    #[case(r#"{"accessToken":"t1","refreshToken":"r1","userInfo":{"userId":7,"nickname":"Li"}}"#)]
    #[case(r#"{"access_token":"t1","refresh_token":"r1","user":{"user_id":"7","nickname":"Li"}}"#)]
    #[case(r#"{"token":"t1","refreshToken":"r1","user_info":{"id":7,"nickname":"Li"}}"#)]
    #[case(r#"{"code":200,"data":{"accessToken":"t1","refreshToken":"r1","userInfo":{"id":"7","nickname":"Li"}}}"#)]
    fn test_login_payload_field_spellings(#[case] json: &str) {
        let login: LoginPayload = serde_json::from_str(json).unwrap();
        assert_eq!(login.access_token, "t1");
        assert_eq!(login.refresh_token.as_deref(), Some("r1"));
        assert_eq!(login.user.user_id, UserId::new("7"));
        assert_eq!(login.user.nickname.as_deref(), Some("Li"));
    }

    #[test]
    fn test_login_payload_prefers_camel_case() {
        let json = r#"{"accessToken":"a","token":"b","user":{"userId":1,"id":99}}"#;
        let login: LoginPayload = serde_json::from_str(json).unwrap();
        assert_eq!(login.access_token, "a");
        assert_eq!(login.user.user_id, UserId::new("1"));
    }

    #[test]
    fn test_login_payload_requires_token_and_user() {
        assert!(serde_json::from_str::<LoginPayload>(r#"{"user":{"id":1}}"#).is_err());
        assert!(serde_json::from_str::<LoginPayload>(r#"{"token":"t"}"#).is_err());
        assert!(serde_json::from_str::<LoginPayload>(r#"{"token":"t","user":{"nickname":"x"}}"#).is_err());
    }

    #[test]
    fn test_session_serialises_canonical_form() {
        let login: LoginPayload =
            serde_json::from_str(r#"{"token":"t","user_info":{"user_id":3}}"#).unwrap();
        let value = serde_json::to_value(Session::from(login)).unwrap();
        assert_eq!(value["accessToken"], "t");
        assert_eq!(value["user"]["userId"], "3");
        assert!(value.get("refreshToken").is_none());
    }

    #[tokio::test]
    async fn test_store_load_clear_round_trip() {
        let path = temp_path();
        let manager = SessionManager::new(&path);
        assert!(!manager.is_logged_in().await);

        let session = Session {
            access_token: "tok".to_string(),
            refresh_token: None,
            user: UserProfile {
                user_id: UserId::new("42"),
                nickname: Some("Zhao".to_string()),
                avatar_url: None,
            },
        };
        manager.store(session.clone()).await.unwrap();
        assert_eq!(manager.token().await.as_deref(), Some("tok"));

        let reloaded = SessionManager::load(&path).await;
        assert_eq!(reloaded.current_user().await, Some(session.user.clone()));

        reloaded.clear().await.unwrap();
        assert!(!reloaded.is_logged_in().await);
        assert!(!path.exists());

        let after = SessionManager::load(&path).await;
        assert!(after.token().await.is_none());
        // Clearing twice is harmless.
        after.clear().await.unwrap();

        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }

    #[tokio::test]
    async fn test_corrupt_file_means_logged_out() {
        let path = temp_path();
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).unwrap();
        }
        std::fs::write(&path, b"not json").unwrap();

        let manager = SessionManager::load(&path).await;
        assert!(!manager.is_logged_in().await);

        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }
}
