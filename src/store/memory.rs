/// 메모리 저장소
/// DATABASE_URL 없이 실행할 때와 테스트에서 사용한다.
/// 전체 상태를 하나의 Mutex 로 보호하므로 모든 연산이 직렬화된다.
// region:    --- Imports
use super::LedgerStore;
use crate::account::model::{Account, AccountUpdate, NewAccount};
use crate::auction::model::{Auction, AuctionFilter, AuctionStatus, NewAuction, SellerAuction};
use crate::bidding::model::{Bid, BidListing, NewBid, NewPayment, Payment, PaymentStatus};
use crate::error::LedgerError;
use crate::ledger::rules;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::Mutex;
use tracing::debug;

// endregion: --- Imports

// region:    --- State
#[derive(Debug, Default)]
struct MemoryState {
    accounts: BTreeMap<i64, Account>,
    auctions: BTreeMap<i64, Auction>,
    bids: BTreeMap<i64, Bid>,
    payments: BTreeMap<i64, Payment>,
    last_id: i64,
}

impl MemoryState {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.accounts
            .values()
            .any(|a| a.email == email && Some(a.id) != except)
    }

    fn remove_auction(&mut self, id: i64) -> bool {
        self.bids.retain(|_, b| b.auction_id != id);
        self.payments.retain(|_, p| p.auction_id != id);
        self.auctions.remove(&id).is_some()
    }
}

// endregion: --- State

// region:    --- In Memory Store
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    state: Mutex<MemoryState>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn insert_account(&self, account: NewAccount) -> Result<Account, LedgerError> {
        let mut state = self.state.lock().await;
        if state.email_taken(&account.email, None) {
            return Err(LedgerError::validation("이미 등록된 이메일입니다."));
        }
        let account = Account {
            id: state.next_id(),
            name: account.name,
            phone: account.phone,
            email: account.email,
            password_hash: account.password_hash,
            role: account.role,
            created_at: Utc::now(),
        };
        state.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, LedgerError> {
        let state = self.state.lock().await;
        Ok(state.accounts.values().find(|a| a.email == email).cloned())
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, LedgerError> {
        Ok(self.state.lock().await.accounts.values().cloned().collect())
    }

    async fn update_account(
        &self,
        id: i64,
        update: AccountUpdate,
    ) -> Result<Option<Account>, LedgerError> {
        let mut state = self.state.lock().await;
        if state.email_taken(&update.email, Some(id)) {
            return Err(LedgerError::validation("이미 등록된 이메일입니다."));
        }
        let Some(account) = state.accounts.get_mut(&id) else {
            return Ok(None);
        };
        account.name = update.name;
        account.phone = update.phone;
        account.email = update.email;
        account.role = update.role;
        if let Some(hash) = update.password_hash {
            account.password_hash = hash;
        }
        Ok(Some(account.clone()))
    }

    async fn delete_account(&self, id: i64) -> Result<bool, LedgerError> {
        let mut state = self.state.lock().await;
        if state.accounts.remove(&id).is_none() {
            return Ok(false);
        }
        let owned: Vec<i64> = state
            .auctions
            .values()
            .filter(|a| a.seller_id == id)
            .map(|a| a.id)
            .collect();
        for auction_id in owned {
            state.remove_auction(auction_id);
        }
        state.bids.retain(|_, b| b.user_id != id);
        state.payments.retain(|_, p| p.user_id != id);
        Ok(true)
    }

    async fn insert_auction(&self, auction: NewAuction) -> Result<Auction, LedgerError> {
        let mut state = self.state.lock().await;
        if !state.accounts.contains_key(&auction.seller_id) {
            return Err(LedgerError::NotFound("판매자"));
        }
        let auction = Auction {
            id: state.next_id(),
            seller_id: auction.seller_id,
            name: auction.name,
            description: auction.description,
            category: auction.category,
            starting_price: auction.starting_price,
            current_price: auction.starting_price,
            quantity: auction.quantity,
            end_at: auction.end_at,
            image_path: auction.image_path,
            status: AuctionStatus::Active,
            created_at: auction.created_at,
        };
        state.auctions.insert(auction.id, auction.clone());
        Ok(auction)
    }

    async fn find_auction(&self, id: i64) -> Result<Option<Auction>, LedgerError> {
        Ok(self.state.lock().await.auctions.get(&id).cloned())
    }

    async fn list_auctions(&self, filter: &AuctionFilter) -> Result<Vec<Auction>, LedgerError> {
        let state = self.state.lock().await;
        let mut auctions: Vec<Auction> = state
            .auctions
            .values()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();
        auctions.sort_by(|a, b| a.end_at.cmp(&b.end_at).then(a.id.cmp(&b.id)));
        Ok(auctions)
    }

    async fn list_all_auctions(&self) -> Result<Vec<SellerAuction>, LedgerError> {
        let state = self.state.lock().await;
        let mut auctions: Vec<SellerAuction> = state
            .auctions
            .values()
            .filter_map(|auction| {
                let seller = state.accounts.get(&auction.seller_id)?;
                Some(SellerAuction {
                    auction: auction.clone(),
                    seller_name: seller.name.clone(),
                })
            })
            .collect();
        auctions.sort_by(|a, b| {
            b.auction
                .created_at
                .cmp(&a.auction.created_at)
                .then(b.auction.id.cmp(&a.auction.id))
        });
        Ok(auctions)
    }

    async fn delete_auction(&self, id: i64) -> Result<bool, LedgerError> {
        Ok(self.state.lock().await.remove_auction(id))
    }

    async fn list_bids(&self, auction_id: i64) -> Result<Vec<Bid>, LedgerError> {
        let state = self.state.lock().await;
        let mut bids: Vec<Bid> = state
            .bids
            .values()
            .filter(|b| b.auction_id == auction_id)
            .cloned()
            .collect();
        rules::sort_bids(&mut bids);
        Ok(bids)
    }

    async fn accept_bid(&self, bid: NewBid) -> Result<Option<Bid>, LedgerError> {
        let mut state = self.state.lock().await;
        let id = state.next_id();
        let Some(auction) = state.auctions.get_mut(&bid.auction_id) else {
            return Ok(None);
        };
        // 커밋 시점 재확인
        if auction.status != AuctionStatus::Active
            || auction.end_at <= bid.created_at
            || bid.amount <= auction.current_price
        {
            debug!(
                "{:<12} --> 입찰 조건 불일치 auction_id: {}",
                "Store", bid.auction_id
            );
            return Ok(None);
        }
        auction.current_price = bid.amount;
        let recorded = Bid {
            id,
            auction_id: bid.auction_id,
            user_id: bid.user_id,
            amount: bid.amount,
            created_at: bid.created_at,
        };
        state.bids.insert(id, recorded.clone());
        Ok(Some(recorded))
    }

    async fn list_all_bids(&self) -> Result<Vec<BidListing>, LedgerError> {
        let state = self.state.lock().await;
        let mut bids: Vec<BidListing> = state
            .bids
            .values()
            .filter_map(|bid| {
                let user = state.accounts.get(&bid.user_id)?;
                let auction = state.auctions.get(&bid.auction_id)?;
                Some(BidListing {
                    bid: bid.clone(),
                    user_name: user.name.clone(),
                    auction_name: auction.name.clone(),
                })
            })
            .collect();
        bids.sort_by(|a, b| {
            b.bid
                .created_at
                .cmp(&a.bid.created_at)
                .then(b.bid.id.cmp(&a.bid.id))
        });
        Ok(bids)
    }

    async fn delete_bid(&self, id: i64) -> Result<bool, LedgerError> {
        Ok(self.state.lock().await.bids.remove(&id).is_some())
    }

    async fn settle(&self, payment: NewPayment) -> Result<Option<Payment>, LedgerError> {
        let mut state = self.state.lock().await;
        let id = state.next_id();
        let Some(auction) = state.auctions.get_mut(&payment.auction_id) else {
            return Ok(None);
        };
        if auction.status != AuctionStatus::Active || auction.end_at > payment.created_at {
            return Ok(None);
        }
        auction.status = AuctionStatus::Sold;
        let recorded = Payment {
            id,
            auction_id: payment.auction_id,
            user_id: payment.user_id,
            amount: payment.amount,
            method: payment.method,
            status: PaymentStatus::Completed,
            created_at: payment.created_at,
        };
        state.payments.insert(id, recorded.clone());
        Ok(Some(recorded))
    }

    async fn list_payments(&self, auction_id: i64) -> Result<Vec<Payment>, LedgerError> {
        let state = self.state.lock().await;
        Ok(state
            .payments
            .values()
            .filter(|p| p.auction_id == auction_id)
            .cloned()
            .collect())
    }
}

// endregion: --- In Memory Store
