use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// 입찰 모델
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bid {
    pub id: i64,
    pub auction_id: i64,
    pub user_id: i64,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

// 입찰자, 경매 이름을 포함한 입찰 (관리자 목록)
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct BidListing {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub bid: Bid,
    pub user_name: String,
    pub auction_name: String,
}

// 신규 입찰
#[derive(Debug, Clone)]
pub struct NewBid {
    pub auction_id: i64,
    pub user_id: i64,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

// 결제 상태
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
pub enum PaymentStatus {
    Completed,
}

impl TryFrom<String> for PaymentStatus {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// 결제 모델 (transactions 테이블)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Payment {
    pub id: i64,
    pub auction_id: i64,
    pub user_id: i64,
    pub amount: Decimal,
    pub method: String,
    #[sqlx(try_from = "String")]
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

// 신규 결제
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub auction_id: i64,
    pub user_id: i64,
    pub amount: Decimal,
    pub method: String,
    pub created_at: DateTime<Utc>,
}
