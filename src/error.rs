// region:    --- Imports
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::error;

// endregion: --- Imports

// region:    --- Ledger Error
/// 원장 연산 오류
#[derive(Debug, Error)]
pub enum LedgerError {
    /// 잘못된 입력 (금액 범위, 필수 항목 누락 등)
    #[error("잘못된 요청입니다: {0}")]
    Validation(String),

    /// 입찰 금액이 현재 가격 이하
    #[error("입찰 금액은 현재 가격({current_price})보다 높아야 합니다.")]
    BidTooLow { current_price: Decimal },

    #[error("경매가 이미 종료되었습니다.")]
    AuctionEnded,

    #[error("경매가 아직 종료되지 않았습니다.")]
    AuctionStillOpen,

    #[error("{0}을(를) 찾을 수 없습니다.")]
    NotFound(&'static str),

    #[error("권한이 없습니다: {0}")]
    Unauthorized(String),

    /// 세션이 없거나 만료됨
    #[error("로그인이 필요합니다.")]
    Unauthenticated,

    #[error("이미 결제가 완료된 경매입니다.")]
    AlreadySettled,

    /// 트랜잭션 커밋 실패 (재시도 가능)
    #[error("저장소 처리에 실패했습니다: {0}")]
    PersistenceFailure(String),

    /// 저장소와 무관한 서버 내부 오류 (재시도 불가)
    #[error("서버 내부 오류: {0}")]
    Internal(String),
}

impl LedgerError {
    /// 응답 코드
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::Validation(_) => "VALIDATION_ERROR",
            LedgerError::BidTooLow { .. } => "LOW_BID",
            LedgerError::AuctionEnded => "ALREADY_ENDED",
            LedgerError::AuctionStillOpen => "STILL_OPEN",
            LedgerError::NotFound(_) => "NOT_FOUND",
            LedgerError::Unauthorized(_) => "UNAUTHORIZED",
            LedgerError::Unauthenticated => "UNAUTHENTICATED",
            LedgerError::AlreadySettled => "ALREADY_SETTLED",
            LedgerError::PersistenceFailure(_) => "PERSISTENCE_FAILURE",
            LedgerError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            LedgerError::Validation(_) => StatusCode::BAD_REQUEST,
            LedgerError::BidTooLow { .. }
            | LedgerError::AuctionEnded
            | LedgerError::AuctionStillOpen
            | LedgerError::AlreadySettled => StatusCode::CONFLICT,
            LedgerError::NotFound(_) => StatusCode::NOT_FOUND,
            LedgerError::Unauthorized(_) => StatusCode::FORBIDDEN,
            LedgerError::Unauthenticated => StatusCode::UNAUTHORIZED,
            LedgerError::PersistenceFailure(_) => StatusCode::SERVICE_UNAVAILABLE,
            LedgerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, LedgerError::PersistenceFailure(_))
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        LedgerError::Validation(message.into())
    }
}

impl From<sqlx::Error> for LedgerError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db_err) = e.as_database_error() {
            if db_err.is_unique_violation() {
                match db_err.constraint() {
                    Some("accounts_email_key") => {
                        return LedgerError::validation("이미 등록된 이메일입니다.")
                    }
                    Some("transactions_auction_id_key") => return LedgerError::AlreadySettled,
                    _ => {}
                }
            }
        }
        error!("{:<12} --> 데이터베이스 오류: {:?}", "Store", e);
        LedgerError::PersistenceFailure(e.to_string())
    }
}

/// 요청 본문 파싱 실패 (필드 누락, 타입 불일치)
impl From<JsonRejection> for LedgerError {
    fn from(rejection: JsonRejection) -> Self {
        LedgerError::Validation(rejection.body_text())
    }
}

/// 비밀번호 해시 실패
impl From<argon2::password_hash::Error> for LedgerError {
    fn from(e: argon2::password_hash::Error) -> Self {
        error!("{:<12} --> 비밀번호 해시 실패: {}", "Auth", e);
        LedgerError::Internal(format!("비밀번호 해시 실패: {}", e))
    }
}

// endregion: --- Ledger Error

// region:    --- Response
impl IntoResponse for LedgerError {
    fn into_response(self) -> Response {
        let mut body = serde_json::json!({
            "error": self.to_string(),
            "code": self.code(),
            "retryable": self.is_retryable(),
        });
        if let LedgerError::BidTooLow { current_price } = &self {
            body["current_price"] = serde_json::json!(current_price);
        }
        (self.status(), Json(body)).into_response()
    }
}

// endregion: --- Response
