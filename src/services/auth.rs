use std::sync::Arc;

use actix_web::{FromRequest, HttpRequest, dev::Payload, web::Data};
use chrono::{Duration, Utc};
use futures_util::future::LocalBoxFuture;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppState;
use crate::config::Config;
use crate::database::models::{AuthResponse, LoginInput, NewUser, UserInfo};
use crate::database::repositories::UserStore;
use crate::error::AppError;
use crate::services::password::{CredentialError, hash_password, verify_password};
use crate::services::session::{SessionStore, SharedSession};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid, // user id
    pub sid: Uuid, // session id
    pub exp: usize,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    sessions: SessionStore,
    config: Config,
}

impl AuthService {
    pub fn new(config: Config, users: Arc<dyn UserStore>) -> Self {
        Self {
            users,
            sessions: SessionStore::new(config.session_ttl_hours),
            config,
        }
    }

    /// `Ok(None)` for unknown, inactive or mismatched credentials. Remote
    /// failures are the only errors.
    pub async fn login(&self, request: LoginInput) -> Result<Option<AuthResponse>, AppError> {
        let email = request.email.trim();
        let Some(user) = self.users.find_active_by_email(email).await? else {
            log::warn!("Login rejected for {}: no active user", email);
            return Ok(None);
        };

        match verify_password(&request.password, &user.password_hash) {
            Ok(true) => {}
            Ok(false) => {
                log::warn!("Login rejected for {}: password mismatch", email);
                return Ok(None);
            }
            Err(CredentialError::Verification(e)) => {
                log::warn!("Login rejected for {}: stored hash unusable ({})", email, e);
                return Ok(None);
            }
            Err(e) => return Err(AppError::internal_server_error_message(e.to_string())),
        }

        // Timestamp first: a failure after this point leaves the user logged
        // out with an updated last_login.
        let now = Utc::now();
        self.users.touch_last_login(user.id, now).await?;

        let mut info = UserInfo::from(user);
        info.last_login = Some(now);

        let session = self.sessions.create(info.clone()).await;
        let session_id = session.lock().await.session_id;
        let expires_at = now + Duration::hours(i64::from(self.config.session_ttl_hours));
        let token = self.generate_token(info.id, session_id, expires_at.timestamp())?;

        log::info!("User {} logged in (session {})", info.email, session_id);

        Ok(Some(AuthResponse {
            token,
            user: info,
            expires_at,
        }))
    }

    pub async fn logout(&self, session_id: Uuid) {
        self.sessions.remove(session_id).await;
        log::info!("Session {} closed", session_id);
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.session_secret.as_ref()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|_| AppError::Unauthorized)?;

        Ok(token_data.claims)
    }

    /// Token to live session. A token outliving its session (logout, idle
    /// eviction) is rejected.
    pub async fn resolve(&self, token: &str) -> Result<SharedSession, AppError> {
        let claims = self.verify_token(token)?;
        let session = self
            .sessions
            .get(claims.sid)
            .await
            .ok_or(AppError::Unauthorized)?;

        if session.lock().await.user.id != claims.sub {
            return Err(AppError::Unauthorized);
        }

        Ok(session)
    }

    /// Creates an operator account. The dashboard has no user management
    /// screen, so accounts are otherwise provisioned in the database.
    pub async fn provision_user(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
        role: &str,
    ) -> Result<UserInfo, AppError> {
        let password_hash = hash_password(password, self.config.bcrypt_cost)
            .map_err(|e| AppError::internal_server_error_message(e.to_string()))?;

        let user = self
            .users
            .insert(NewUser {
                email: email.trim().to_string(),
                password_hash,
                full_name: full_name.to_string(),
                role: role.to_string(),
            })
            .await?;

        log::info!("Provisioned user {}", user.email);
        Ok(user.into())
    }

    fn generate_token(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        expires_at: i64,
    ) -> Result<String, AppError> {
        let claims = Claims {
            sub: user_id,
            sid: session_id,
            exp: expires_at as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.session_secret.as_ref()),
        )
        .map_err(|e| AppError::internal_server_error_message(e.to_string()))
    }
}

/// Token from the `Authorization: Bearer` header, if any.
pub fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
}

/// The caller's live session, resolved from the `Authorization: Bearer`
/// header.
pub struct Session(pub SharedSession);

impl FromRequest for Session {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<Data<AppState>>().cloned();
        let token = bearer_token(req);

        Box::pin(async move {
            let state = state.ok_or_else(|| {
                AppError::internal_server_error_message("Application state not configured")
            })?;
            let token = token.ok_or(AppError::Unauthorized)?;
            let session = state.auth.resolve(&token).await?;
            Ok(Session(session))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryDatabase;
    use crate::database::models::UserPatch;

    async fn service() -> (AuthService, MemoryDatabase) {
        let db = MemoryDatabase::new();
        let service = AuthService::new(Config::test_config(), Arc::new(db.clone()));
        service
            .provision_user("hrd@company.com", "rahasia123", "Sari HRD", "hrd")
            .await
            .unwrap();
        (service, db)
    }

    fn login(email: &str, password: &str) -> LoginInput {
        LoginInput {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn login_opens_a_resolvable_session() {
        let (service, _) = service().await;
        let before = Utc::now();

        let auth = service
            .login(login("hrd@company.com", "rahasia123"))
            .await
            .unwrap()
            .expect("credentials accepted");

        assert!(auth.user.last_login.unwrap() >= before);
        let session = service.resolve(&auth.token).await.unwrap();
        assert_eq!(session.lock().await.user.email, "hrd@company.com");
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_return_none() {
        let (service, _) = service().await;
        assert!(
            service
                .login(login("hrd@company.com", "salah"))
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            service
                .login(login("nobody@company.com", "rahasia123"))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn inactive_user_cannot_log_in() {
        let (service, db) = service().await;
        let user = db
            .find_active_by_email("hrd@company.com")
            .await
            .unwrap()
            .unwrap();
        db.update(
            user.id,
            UserPatch {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let result = service
            .login(login("hrd@company.com", "rahasia123"))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn logout_invalidates_the_token() {
        let (service, _) = service().await;
        let auth = service
            .login(login("hrd@company.com", "rahasia123"))
            .await
            .unwrap()
            .unwrap();
        let claims = service.verify_token(&auth.token).unwrap();

        service.logout(claims.sid).await;
        assert!(matches!(
            service.resolve(&auth.token).await,
            Err(AppError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn tampered_token_is_rejected() {
        let (service, _) = service().await;
        assert!(matches!(
            service.resolve("not.a.token").await,
            Err(AppError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn unavailable_store_surfaces_remote_error() {
        let (service, db) = service().await;
        db.set_unavailable(true);
        let err = service
            .login(login("hrd@company.com", "rahasia123"))
            .await
            .unwrap_err();
        assert!(err.is_remote());
    }
}
