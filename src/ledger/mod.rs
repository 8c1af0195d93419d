/// 경매 원장
/// 1. 입찰
/// 2. 낙찰자 조회
/// 3. 낙찰 결제
/// 4. 경매 등록, 조회, 관리자 삭제
// region:    --- Imports
use crate::account::model::Role;
use crate::auction::commands::CreateAuctionCommand;
use crate::auction::model::{Auction, AuctionFilter, AuctionPhase, SellerAuction};
use crate::auth::AuthenticatedCaller;
use crate::bidding::model::{Bid, BidListing, NewBid, NewPayment, Payment};
use crate::error::LedgerError;
use crate::store::LedgerStore;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Modules
pub mod rules;

// endregion: --- Modules

// region:    --- Config
/// 최대 재시도 횟수
const MAX_RETRIES: i32 = 3;

/// 원장 설정
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// 입찰, 시작가 상한
    pub max_bid_amount: Decimal,
    /// 허용 결제 수단
    pub payment_methods: Vec<String>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_bid_amount: Decimal::from(1_000_000),
            payment_methods: vec![
                "UPI".to_string(),
                "Google Pay".to_string(),
                "PhonePe".to_string(),
            ],
        }
    }
}

// endregion: --- Config

// region:    --- Views
/// 경매 상세 (입찰 목록 포함)
#[derive(Debug, Clone, Serialize)]
pub struct AuctionDetail {
    #[serde(flatten)]
    pub auction: Auction,
    pub phase: AuctionPhase,
    pub bids: Vec<Bid>,
}

/// 경매 목록 항목
#[derive(Debug, Clone, Serialize)]
pub struct AuctionSummary {
    #[serde(flatten)]
    pub auction: Auction,
    pub phase: AuctionPhase,
}

/// 관리자 경매 목록 항목
#[derive(Debug, Clone, Serialize)]
pub struct AdminAuctionSummary {
    #[serde(flatten)]
    pub auction: SellerAuction,
    pub phase: AuctionPhase,
}

// endregion: --- Views

// region:    --- Auction Ledger
pub struct AuctionLedger {
    store: Arc<dyn LedgerStore>,
    config: LedgerConfig,
}

impl AuctionLedger {
    pub fn new(store: Arc<dyn LedgerStore>, config: LedgerConfig) -> Self {
        Self { store, config }
    }

    async fn require_auction(&self, auction_id: i64) -> Result<Auction, LedgerError> {
        self.store
            .find_auction(auction_id)
            .await?
            .ok_or(LedgerError::NotFound("경매"))
    }

    /// 1. 입찰
    /// 사전 검증 후 저장소의 조건부 갱신으로 커밋한다.
    /// 조건부 갱신이 실패하면 경매를 다시 읽어 실패 원인을 판단하고, 여전히 유효하면 재시도한다.
    pub async fn place_bid(
        &self,
        caller: &AuthenticatedCaller,
        auction_id: i64,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<Bid, LedgerError> {
        info!(
            "{:<12} --> 입찰 요청 auction_id: {}, bidder_id: {}, amount: {}",
            "Ledger", auction_id, caller.account_id, amount
        );
        caller.require(Role::User)?;
        rules::validate_amount(amount, self.config.max_bid_amount)?;

        let mut retries = 0;
        while retries < MAX_RETRIES {
            let auction = self.require_auction(auction_id).await?;
            rules::check_bid(&auction, amount, now)?;

            let bid = NewBid {
                auction_id,
                user_id: caller.account_id,
                amount,
                created_at: now,
            };
            match self.store.accept_bid(bid).await? {
                Some(bid) => {
                    info!(
                        "{:<12} --> 입찰 성공: 현재 가격 {} (bid_id: {})",
                        "Ledger", bid.amount, bid.id
                    );
                    return Ok(bid);
                }
                None => {
                    warn!(
                        "{:<12} --> 동시 입찰로 인한 갱신 실패: 재확인",
                        "Ledger"
                    );
                    retries += 1;
                }
            }
        }

        Err(LedgerError::PersistenceFailure(
            "최대 재시도 횟수 초과".to_string(),
        ))
    }

    /// 2. 낙찰자 조회
    /// 입찰이 없으면 None
    pub async fn compute_winner(
        &self,
        auction_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<Bid>, LedgerError> {
        info!("{:<12} --> 낙찰자 조회 auction_id: {}", "Ledger", auction_id);
        let auction = self.require_auction(auction_id).await?;
        rules::ensure_closed(&auction, now)?;
        let bids = self.store.list_bids(auction_id).await?;
        Ok(rules::select_winner(&bids).cloned())
    }

    /// 3. 낙찰 결제
    pub async fn settle_payment(
        &self,
        caller: &AuthenticatedCaller,
        auction_id: i64,
        amount: Decimal,
        method: &str,
        now: DateTime<Utc>,
    ) -> Result<Payment, LedgerError> {
        info!(
            "{:<12} --> 결제 요청 auction_id: {}, payer_id: {}, method: {}",
            "Ledger", auction_id, caller.account_id, method
        );
        let method = method.trim();
        if !self.config.payment_methods.iter().any(|m| m == method) {
            return Err(LedgerError::validation("지원하지 않는 결제 수단입니다."));
        }

        let auction = self.require_auction(auction_id).await?;
        rules::ensure_closed(&auction, now)?;
        if auction.phase(now) == AuctionPhase::Sold {
            return Err(LedgerError::AlreadySettled);
        }

        let bids = self.store.list_bids(auction_id).await?;
        let winner = rules::select_winner(&bids).ok_or(LedgerError::NotFound("낙찰 입찰"))?;
        if winner.user_id != caller.account_id {
            warn!(
                "{:<12} --> 낙찰자가 아닌 계정의 결제 시도 account_id: {}",
                "Ledger", caller.account_id
            );
            return Err(LedgerError::Unauthorized(
                "경매 낙찰자만 결제할 수 있습니다.".to_string(),
            ));
        }
        if winner.amount != amount {
            return Err(LedgerError::validation(format!(
                "결제 금액이 낙찰 금액({})과 다릅니다.",
                winner.amount
            )));
        }

        let payment = NewPayment {
            auction_id,
            user_id: caller.account_id,
            amount: winner.amount,
            method: method.to_string(),
            created_at: now,
        };
        match self.store.settle(payment).await? {
            Some(payment) => {
                info!(
                    "{:<12} --> 결제 완료: auction_id {}, 금액 {}",
                    "Ledger", auction_id, payment.amount
                );
                Ok(payment)
            }
            None => Err(LedgerError::AlreadySettled),
        }
    }

    /// 4. 경매 등록 (판매자)
    pub async fn create_auction(
        &self,
        caller: &AuthenticatedCaller,
        cmd: CreateAuctionCommand,
        now: DateTime<Utc>,
    ) -> Result<Auction, LedgerError> {
        caller.require(Role::Seller)?;
        let auction = cmd.validate(caller.account_id, self.config.max_bid_amount, now)?;
        let auction = self.store.insert_auction(auction).await?;
        info!(
            "{:<12} --> 경매 등록 id: {}, seller_id: {}",
            "Ledger", auction.id, auction.seller_id
        );
        Ok(auction)
    }

    /// 진행 중인 경매 목록
    pub async fn list_auctions(
        &self,
        filter: &AuctionFilter,
        now: DateTime<Utc>,
    ) -> Result<Vec<AuctionSummary>, LedgerError> {
        let auctions = self.store.list_auctions(filter).await?;
        Ok(auctions
            .into_iter()
            .map(|auction| AuctionSummary {
                phase: auction.phase(now),
                auction,
            })
            .collect())
    }

    /// 판매자 본인 경매 목록
    pub async fn seller_auctions(
        &self,
        caller: &AuthenticatedCaller,
        now: DateTime<Utc>,
    ) -> Result<Vec<AuctionSummary>, LedgerError> {
        caller.require(Role::Seller)?;
        self.list_auctions(&AuctionFilter::by_seller(caller.account_id), now)
            .await
    }

    /// 경매 상세
    pub async fn auction_detail(
        &self,
        auction_id: i64,
        now: DateTime<Utc>,
    ) -> Result<AuctionDetail, LedgerError> {
        let auction = self.require_auction(auction_id).await?;
        let bids = self.store.list_bids(auction_id).await?;
        Ok(AuctionDetail {
            phase: auction.phase(now),
            auction,
            bids,
        })
    }

    /// 입찰 이력 (금액 내림차순)
    pub async fn bids(&self, auction_id: i64) -> Result<Vec<Bid>, LedgerError> {
        self.require_auction(auction_id).await?;
        self.store.list_bids(auction_id).await
    }

    /// 경매 결제 내역
    pub async fn payments(&self, auction_id: i64) -> Result<Vec<Payment>, LedgerError> {
        self.require_auction(auction_id).await?;
        self.store.list_payments(auction_id).await
    }

    /// 관리자 경매 목록 (판매 완료 포함, 최신순)
    pub async fn admin_auctions(
        &self,
        caller: &AuthenticatedCaller,
        now: DateTime<Utc>,
    ) -> Result<Vec<AdminAuctionSummary>, LedgerError> {
        caller.require(Role::Admin)?;
        let auctions = self.store.list_all_auctions().await?;
        Ok(auctions
            .into_iter()
            .map(|auction| AdminAuctionSummary {
                phase: auction.auction.phase(now),
                auction,
            })
            .collect())
    }

    /// 관리자 입찰 목록 (최신순)
    pub async fn admin_bids(
        &self,
        caller: &AuthenticatedCaller,
    ) -> Result<Vec<BidListing>, LedgerError> {
        caller.require(Role::Admin)?;
        self.store.list_all_bids().await
    }

    /// 관리자 경매 삭제 (입찰 포함)
    pub async fn delete_auction(
        &self,
        caller: &AuthenticatedCaller,
        auction_id: i64,
    ) -> Result<(), LedgerError> {
        caller.require(Role::Admin)?;
        if !self.store.delete_auction(auction_id).await? {
            return Err(LedgerError::NotFound("경매"));
        }
        info!("{:<12} --> 경매 삭제 id: {}", "Ledger", auction_id);
        Ok(())
    }

    /// 관리자 입찰 삭제
    /// 현재 가격은 되돌리지 않는다.
    pub async fn delete_bid(
        &self,
        caller: &AuthenticatedCaller,
        bid_id: i64,
    ) -> Result<(), LedgerError> {
        caller.require(Role::Admin)?;
        if !self.store.delete_bid(bid_id).await? {
            return Err(LedgerError::NotFound("입찰"));
        }
        info!("{:<12} --> 입찰 삭제 id: {}", "Ledger", bid_id);
        Ok(())
    }
}

// endregion: --- Auction Ledger
