use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// 저장되는 경매 상태
// "ended" 는 저장하지 않고 조회 시점의 시각으로 계산한다.
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
pub enum AuctionStatus {
    Active,
    Sold,
}

impl TryFrom<String> for AuctionStatus {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// 특정 시각 기준 경매 단계
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuctionPhase {
    Active,
    Ended,
    Sold,
}

// 경매 모델
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Auction {
    pub id: i64,
    pub seller_id: i64,
    pub name: String,
    pub description: String,
    pub category: Option<String>,
    pub starting_price: Decimal,
    pub current_price: Decimal,
    pub quantity: i32,
    pub end_at: DateTime<Utc>,
    pub image_path: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: AuctionStatus,
    pub created_at: DateTime<Utc>,
}

impl Auction {
    /// 경매 단계 계산
    pub fn phase(&self, now: DateTime<Utc>) -> AuctionPhase {
        match self.status {
            AuctionStatus::Sold => AuctionPhase::Sold,
            AuctionStatus::Active if now >= self.end_at => AuctionPhase::Ended,
            AuctionStatus::Active => AuctionPhase::Active,
        }
    }

    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        self.phase(now) == AuctionPhase::Active
    }
}

// 판매자 이름을 포함한 경매 (관리자 목록)
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SellerAuction {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub auction: Auction,
    pub seller_name: String,
}

// 신규 경매
#[derive(Debug, Clone)]
pub struct NewAuction {
    pub seller_id: i64,
    pub name: String,
    pub description: String,
    pub category: Option<String>,
    pub starting_price: Decimal,
    pub quantity: i32,
    pub end_at: DateTime<Utc>,
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

// 경매 목록 필터
// 모든 조건은 저장소에서 바인드 파라미터로 처리한다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuctionFilter {
    pub seller_id: Option<i64>,
    pub status: Option<AuctionStatus>,
    pub category: Option<String>,
    pub search: Option<String>,
}

impl AuctionFilter {
    /// 구매자용 목록: 진행 중인 경매만
    pub fn listing(category: Option<String>, search: Option<String>) -> Self {
        Self {
            seller_id: None,
            status: Some(AuctionStatus::Active),
            category: category
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty() && c != "All"),
            search: search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }

    pub fn by_seller(seller_id: i64) -> Self {
        Self {
            seller_id: Some(seller_id),
            ..Self::default()
        }
    }

    /// 메모리 저장소용 매칭
    pub fn matches(&self, auction: &Auction) -> bool {
        if self.seller_id.is_some_and(|id| id != auction.seller_id) {
            return false;
        }
        if self.status.is_some_and(|status| status != auction.status) {
            return false;
        }
        if let Some(category) = &self.category {
            if auction.category.as_deref() != Some(category.as_str()) {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            return auction.name.to_lowercase().contains(&needle)
                || auction.description.to_lowercase().contains(&needle);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn auction(end_at: DateTime<Utc>, status: AuctionStatus) -> Auction {
        Auction {
            id: 1,
            seller_id: 2,
            name: "Malabar Pepper".to_string(),
            description: "Bold black pepper".to_string(),
            category: Some("Whole Spices".to_string()),
            starting_price: Decimal::from(100),
            current_price: Decimal::from(100),
            quantity: 5,
            end_at,
            image_path: None,
            status,
            created_at: end_at - Duration::days(1),
        }
    }

    #[test]
    fn phase_is_derived_from_the_clock() {
        let end = Utc::now();
        let active = auction(end, AuctionStatus::Active);
        assert_eq!(active.phase(end - Duration::seconds(1)), AuctionPhase::Active);
        assert_eq!(active.phase(end), AuctionPhase::Ended);
        let sold = auction(end, AuctionStatus::Sold);
        assert_eq!(sold.phase(end - Duration::hours(1)), AuctionPhase::Sold);
    }

    #[test]
    fn listing_filter_ignores_all_category_and_blank_search() {
        let filter = AuctionFilter::listing(Some("All".to_string()), Some("  ".to_string()));
        assert_eq!(filter.category, None);
        assert_eq!(filter.search, None);
        assert_eq!(filter.status, Some(AuctionStatus::Active));
    }

    #[test]
    fn search_matches_name_or_description_case_insensitively() {
        let a = auction(Utc::now(), AuctionStatus::Active);
        assert!(AuctionFilter::listing(None, Some("PEPPER".to_string())).matches(&a));
        assert!(AuctionFilter::listing(None, Some("bold".to_string())).matches(&a));
        assert!(!AuctionFilter::listing(None, Some("saffron".to_string())).matches(&a));
        assert!(!AuctionFilter::listing(Some("Rare Finds".to_string()), None).matches(&a));
    }
}
