// region:    --- Imports
use super::LedgerStore;
use crate::account::model::{Account, AccountUpdate, NewAccount};
use crate::auction::model::{Auction, AuctionFilter, NewAuction, SellerAuction};
use crate::bidding::model::{Bid, BidListing, NewBid, NewPayment, Payment};
use crate::database::DatabaseManager;
use crate::error::LedgerError;
use crate::query::queries;
use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use std::sync::Arc;
use tracing::{debug, info};

// endregion: --- Imports

// region:    --- Postgres Store
/// Postgres 원장 저장소
pub struct PostgresLedgerStore {
    db_manager: Arc<DatabaseManager>,
}

impl PostgresLedgerStore {
    pub fn new(db_manager: Arc<DatabaseManager>) -> Self {
        Self { db_manager }
    }
}

/// LIKE 패턴 특수문자 이스케이프
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// 목록 조회 쿼리 생성 (모든 조건은 바인드 파라미터)
fn build_auction_query(filter: &AuctionFilter) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::<Postgres>::new(queries::SELECT_AUCTIONS);
    if let Some(seller_id) = filter.seller_id {
        builder.push(" AND seller_id = ").push_bind(seller_id);
    }
    if let Some(status) = filter.status {
        builder.push(" AND status = ").push_bind(status.to_string());
    }
    if let Some(category) = &filter.category {
        builder.push(" AND category = ").push_bind(category.clone());
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", escape_like(search));
        builder
            .push(" AND (name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    builder.push(" ORDER BY end_at ASC, id ASC");
    builder
}

#[async_trait]
impl LedgerStore for PostgresLedgerStore {
    async fn insert_account(&self, account: NewAccount) -> Result<Account, LedgerError> {
        info!("{:<12} --> 계정 등록 email: {}", "Store", account.email);
        let account = sqlx::query_as::<_, Account>(queries::INSERT_ACCOUNT)
            .bind(&account.name)
            .bind(&account.phone)
            .bind(&account.email)
            .bind(&account.password_hash)
            .bind(account.role.as_ref())
            .fetch_one(self.db_manager.pool())
            .await?;
        Ok(account)
    }

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, LedgerError> {
        Ok(sqlx::query_as::<_, Account>(queries::GET_ACCOUNT_BY_EMAIL)
            .bind(email)
            .fetch_optional(self.db_manager.pool())
            .await?)
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, LedgerError> {
        Ok(sqlx::query_as::<_, Account>(queries::GET_ALL_ACCOUNTS)
            .fetch_all(self.db_manager.pool())
            .await?)
    }

    async fn update_account(
        &self,
        id: i64,
        update: AccountUpdate,
    ) -> Result<Option<Account>, LedgerError> {
        Ok(sqlx::query_as::<_, Account>(queries::UPDATE_ACCOUNT)
            .bind(&update.name)
            .bind(&update.phone)
            .bind(&update.email)
            .bind(update.role.as_ref())
            .bind(update.password_hash.as_deref())
            .bind(id)
            .fetch_optional(self.db_manager.pool())
            .await?)
    }

    async fn delete_account(&self, id: i64) -> Result<bool, LedgerError> {
        let result = sqlx::query(queries::DELETE_ACCOUNT)
            .bind(id)
            .execute(self.db_manager.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_auction(&self, auction: NewAuction) -> Result<Auction, LedgerError> {
        let auction = sqlx::query_as::<_, Auction>(queries::INSERT_AUCTION)
            .bind(auction.seller_id)
            .bind(&auction.name)
            .bind(&auction.description)
            .bind(auction.category.as_deref())
            .bind(auction.starting_price)
            .bind(auction.quantity)
            .bind(auction.end_at)
            .bind(auction.image_path.as_deref())
            .bind(auction.created_at)
            .fetch_one(self.db_manager.pool())
            .await?;
        info!("{:<12} --> 경매 등록 id: {}", "Store", auction.id);
        Ok(auction)
    }

    async fn find_auction(&self, id: i64) -> Result<Option<Auction>, LedgerError> {
        Ok(sqlx::query_as::<_, Auction>(queries::GET_AUCTION)
            .bind(id)
            .fetch_optional(self.db_manager.pool())
            .await?)
    }

    async fn list_auctions(&self, filter: &AuctionFilter) -> Result<Vec<Auction>, LedgerError> {
        debug!("{:<12} --> 경매 목록 조회 filter: {:?}", "Store", filter);
        let mut builder = build_auction_query(filter);
        Ok(builder
            .build_query_as::<Auction>()
            .fetch_all(self.db_manager.pool())
            .await?)
    }

    async fn list_all_auctions(&self) -> Result<Vec<SellerAuction>, LedgerError> {
        Ok(sqlx::query_as::<_, SellerAuction>(queries::GET_ALL_AUCTIONS)
            .fetch_all(self.db_manager.pool())
            .await?)
    }

    async fn delete_auction(&self, id: i64) -> Result<bool, LedgerError> {
        let result = sqlx::query(queries::DELETE_AUCTION)
            .bind(id)
            .execute(self.db_manager.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_bids(&self, auction_id: i64) -> Result<Vec<Bid>, LedgerError> {
        Ok(sqlx::query_as::<_, Bid>(queries::GET_AUCTION_BIDS)
            .bind(auction_id)
            .fetch_all(self.db_manager.pool())
            .await?)
    }

    async fn accept_bid(&self, bid: NewBid) -> Result<Option<Bid>, LedgerError> {
        self.db_manager
            .transaction(|tx| {
                Box::pin(async move {
                    // 현재 가격 확인 및 업데이트
                    let updated = sqlx::query_scalar::<_, i64>(queries::RAISE_CURRENT_PRICE)
                        .bind(bid.amount)
                        .bind(bid.auction_id)
                        .bind(bid.created_at)
                        .fetch_optional(&mut **tx)
                        .await?;
                    if updated.is_none() {
                        return Ok(None);
                    }

                    // 입찰 기록 추가
                    let recorded = sqlx::query_as::<_, Bid>(queries::INSERT_BID)
                        .bind(bid.auction_id)
                        .bind(bid.user_id)
                        .bind(bid.amount)
                        .bind(bid.created_at)
                        .fetch_one(&mut **tx)
                        .await?;
                    Ok::<_, LedgerError>(Some(recorded))
                })
            })
            .await
    }

    async fn list_all_bids(&self) -> Result<Vec<BidListing>, LedgerError> {
        Ok(sqlx::query_as::<_, BidListing>(queries::GET_ALL_BIDS)
            .fetch_all(self.db_manager.pool())
            .await?)
    }

    async fn delete_bid(&self, id: i64) -> Result<bool, LedgerError> {
        let result = sqlx::query(queries::DELETE_BID)
            .bind(id)
            .execute(self.db_manager.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn settle(&self, payment: NewPayment) -> Result<Option<Payment>, LedgerError> {
        self.db_manager
            .transaction(|tx| {
                Box::pin(async move {
                    let updated = sqlx::query_scalar::<_, i64>(queries::MARK_AUCTION_SOLD)
                        .bind(payment.auction_id)
                        .bind(payment.created_at)
                        .fetch_optional(&mut **tx)
                        .await?;
                    if updated.is_none() {
                        return Ok(None);
                    }

                    let recorded = sqlx::query_as::<_, Payment>(queries::INSERT_PAYMENT)
                        .bind(payment.auction_id)
                        .bind(payment.user_id)
                        .bind(payment.amount)
                        .bind(&payment.method)
                        .bind(payment.created_at)
                        .fetch_one(&mut **tx)
                        .await?;
                    Ok::<_, LedgerError>(Some(recorded))
                })
            })
            .await
    }

    async fn list_payments(&self, auction_id: i64) -> Result<Vec<Payment>, LedgerError> {
        Ok(sqlx::query_as::<_, Payment>(queries::GET_AUCTION_PAYMENTS)
            .bind(auction_id)
            .fetch_all(self.db_manager.pool())
            .await?)
    }
}

// endregion: --- Postgres Store

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("100%_pure\\"), "100\\%\\_pure\\\\");
        assert_eq!(escape_like("saffron"), "saffron");
    }

    #[test]
    fn listing_query_binds_every_filter() {
        let filter = AuctionFilter::listing(
            Some("Whole Spices".to_string()),
            Some("pepper' OR 1=1 --".to_string()),
        );
        let builder = build_auction_query(&filter);
        let sql = builder.sql();
        assert!(sql.contains("status = $1"));
        assert!(sql.contains("category = $2"));
        assert!(sql.contains("name ILIKE $3 OR description ILIKE $4"));
        assert!(!sql.contains("pepper"));
        assert!(sql.ends_with("ORDER BY end_at ASC, id ASC"));
    }
}
