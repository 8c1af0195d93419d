use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 계정 역할
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
    Seller,
    User,
}

impl TryFrom<String> for Role {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// 계정 모델
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

// 신규 계정
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

// 관리자 계정 수정 내용
#[derive(Debug, Clone)]
pub struct AccountUpdate {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub role: Role,
    /// None 이면 기존 비밀번호 유지
    pub password_hash: Option<String>,
}
