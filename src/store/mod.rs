// region:    --- Imports
use crate::account::model::{Account, AccountUpdate, NewAccount};
use crate::auction::model::{Auction, AuctionFilter, NewAuction, SellerAuction};
use crate::bidding::model::{Bid, BidListing, NewBid, NewPayment, Payment};
use crate::error::LedgerError;
use async_trait::async_trait;

// endregion: --- Imports

// region:    --- Modules
pub mod memory;
pub mod postgres;

pub use memory::InMemoryLedgerStore;
pub use postgres::PostgresLedgerStore;

// endregion: --- Modules

// region:    --- Ledger Store Trait
/// 원장 저장소 트레이트
///
/// 입찰 수락과 결제는 저장소가 커밋 시점에 조건을 다시 확인하는 원자적 연산으로 제공한다.
/// 조건이 맞지 않으면 `Ok(None)` 을 반환하고 아무것도 쓰지 않는다.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    // 계정
    async fn insert_account(&self, account: NewAccount) -> Result<Account, LedgerError>;
    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, LedgerError>;
    async fn list_accounts(&self) -> Result<Vec<Account>, LedgerError>;
    async fn update_account(
        &self,
        id: i64,
        update: AccountUpdate,
    ) -> Result<Option<Account>, LedgerError>;
    /// 계정 삭제 (경매, 입찰, 결제 연쇄 삭제)
    async fn delete_account(&self, id: i64) -> Result<bool, LedgerError>;

    // 경매
    async fn insert_auction(&self, auction: NewAuction) -> Result<Auction, LedgerError>;
    async fn find_auction(&self, id: i64) -> Result<Option<Auction>, LedgerError>;
    async fn list_auctions(&self, filter: &AuctionFilter) -> Result<Vec<Auction>, LedgerError>;
    /// 전체 경매 (상태 무관, 최신순, 판매자 이름 포함)
    async fn list_all_auctions(&self) -> Result<Vec<SellerAuction>, LedgerError>;
    /// 경매 삭제 (입찰, 결제 연쇄 삭제)
    async fn delete_auction(&self, id: i64) -> Result<bool, LedgerError>;

    // 입찰
    /// 금액 내림차순, 동일 금액은 먼저 들어온 순
    async fn list_bids(&self, auction_id: i64) -> Result<Vec<Bid>, LedgerError>;
    /// 현재 가격 갱신 + 입찰 기록
    /// `amount > current_price`, 진행 중, `end_at > created_at` 일 때만 수행
    async fn accept_bid(&self, bid: NewBid) -> Result<Option<Bid>, LedgerError>;
    /// 전체 입찰 (최신순, 입찰자와 경매 이름 포함)
    async fn list_all_bids(&self) -> Result<Vec<BidListing>, LedgerError>;
    async fn delete_bid(&self, id: i64) -> Result<bool, LedgerError>;

    // 결제
    /// 결제 기록 + 경매 sold 처리
    /// 진행 중(active) 상태이고 종료 시각이 지났을 때만 수행
    async fn settle(&self, payment: NewPayment) -> Result<Option<Payment>, LedgerError>;
    async fn list_payments(&self, auction_id: i64) -> Result<Vec<Payment>, LedgerError>;
}

// endregion: --- Ledger Store Trait
