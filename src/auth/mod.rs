// region:    --- Imports
use crate::account::model::Role;
use crate::error::LedgerError;
use crate::state::AppState;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use serde::Serialize;
use uuid::Uuid;

// endregion: --- Imports

// region:    --- Modules
pub mod password;
pub mod session;

// endregion: --- Modules

// region:    --- Authenticated Caller
/// 인증된 호출자
/// 모든 원장 연산은 세션이 아니라 이 값을 명시적으로 전달받는다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AuthenticatedCaller {
    pub account_id: i64,
    pub role: Role,
}

impl AuthenticatedCaller {
    pub fn new(account_id: i64, role: Role) -> Self {
        Self { account_id, role }
    }

    /// 역할 확인
    pub fn require(&self, role: Role) -> Result<(), LedgerError> {
        if self.role == role {
            Ok(())
        } else {
            Err(LedgerError::Unauthorized(format!(
                "{} 권한이 필요합니다.",
                role
            )))
        }
    }
}

/// Bearer 토큰에서 세션 조회
#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedCaller {
    type Rejection = LedgerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts, state).await?;
        state
            .sessions
            .resolve(&token)
            .ok_or(LedgerError::Unauthenticated)
    }
}

/// 세션 토큰 (로그아웃용)
#[derive(Debug, Clone, Copy)]
pub struct SessionToken(pub Uuid);

#[async_trait]
impl FromRequestParts<AppState> for SessionToken {
    type Rejection = LedgerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        bearer_token(parts, state).await.map(SessionToken)
    }
}

async fn bearer_token(parts: &mut Parts, state: &AppState) -> Result<Uuid, LedgerError> {
    let TypedHeader(Authorization(bearer)) =
        TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
            .map_err(|_| LedgerError::Unauthenticated)?;
    Uuid::parse_str(bearer.token()).map_err(|_| LedgerError::Unauthenticated)
}

// endregion: --- Authenticated Caller
