//! DATABASE_URL 이 설정된 경우에만 실행되는 Postgres 저장소 테스트
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use spice_auction::account::model::{NewAccount, Role};
use spice_auction::auction::model::{AuctionFilter, AuctionStatus, NewAuction};
use spice_auction::auth::AuthenticatedCaller;
use spice_auction::bidding::model::{NewBid, NewPayment};
use spice_auction::database::DatabaseManager;
use spice_auction::error::LedgerError;
use spice_auction::ledger::{AuctionLedger, LedgerConfig};
use spice_auction::store::{LedgerStore, PostgresLedgerStore};
use std::sync::Arc;
use uuid::Uuid;

/// 데이터베이스 연결 (DATABASE_URL 이 없으면 None)
async fn setup() -> Option<Arc<PostgresLedgerStore>> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL 미설정: Postgres 테스트 생략");
        return None;
    };
    let db_manager = Arc::new(
        DatabaseManager::new(&database_url, 5)
            .await
            .expect("데이터베이스 연결 실패"),
    );
    db_manager
        .initialize_database(false)
        .await
        .expect("스키마 생성 실패");
    Some(Arc::new(PostgresLedgerStore::new(db_manager)))
}

async fn account(store: &PostgresLedgerStore, role: Role) -> i64 {
    store
        .insert_account(NewAccount {
            name: "Store Test".to_string(),
            phone: "9876543210".to_string(),
            email: format!("{}@spice.test", Uuid::new_v4()),
            password_hash: "unused".to_string(),
            role,
        })
        .await
        .unwrap()
        .id
}

/// 시작가 100 경매 (종료 시각 지정)
async fn auction(store: &PostgresLedgerStore, seller_id: i64, ends_in: Duration) -> i64 {
    let now = Utc::now();
    store
        .insert_auction(NewAuction {
            seller_id,
            name: "Star Anise".to_string(),
            description: format!("lot {}", Uuid::new_v4()),
            category: Some("Whole Spices".to_string()),
            starting_price: Decimal::from(100),
            quantity: 2,
            end_at: now + ends_in,
            image_path: None,
            created_at: now,
        })
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn test_conditional_price_update() {
    let Some(store) = setup().await else { return };
    let seller = account(&store, Role::Seller).await;
    let buyer = account(&store, Role::User).await;
    let auction_id = auction(&store, seller, Duration::hours(1)).await;

    let bid = |amount: i64| NewBid {
        auction_id,
        user_id: buyer,
        amount: Decimal::from(amount),
        created_at: Utc::now(),
    };

    assert!(store.accept_bid(bid(150)).await.unwrap().is_some());
    // 현재가 이하의 입찰은 커밋되지 않는다
    assert!(store.accept_bid(bid(150)).await.unwrap().is_none());
    assert!(store.accept_bid(bid(120)).await.unwrap().is_none());

    let stored = store.find_auction(auction_id).await.unwrap().unwrap();
    assert_eq!(stored.current_price, Decimal::from(150));
    assert_eq!(store.list_bids(auction_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_settlement_is_recorded_once() {
    let Some(store) = setup().await else { return };
    let seller = account(&store, Role::Seller).await;
    let buyer = account(&store, Role::User).await;
    let auction_id = auction(&store, seller, Duration::seconds(1)).await;

    store
        .accept_bid(NewBid {
            auction_id,
            user_id: buyer,
            amount: Decimal::from(130),
            created_at: Utc::now() - Duration::seconds(5),
        })
        .await
        .unwrap();

    let payment = || NewPayment {
        auction_id,
        user_id: buyer,
        amount: Decimal::from(130),
        method: "UPI".to_string(),
        created_at: Utc::now() + Duration::minutes(1),
    };
    assert!(store.settle(payment()).await.unwrap().is_some());
    assert!(store.settle(payment()).await.unwrap().is_none());

    let stored = store.find_auction(auction_id).await.unwrap().unwrap();
    assert_eq!(stored.status, AuctionStatus::Sold);
    assert_eq!(store.list_payments(auction_id).await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_bids_through_ledger() {
    let Some(store) = setup().await else { return };
    let seller = account(&store, Role::Seller).await;
    let auction_id = auction(&store, seller, Duration::hours(1)).await;
    let ledger = Arc::new(AuctionLedger::new(store.clone(), LedgerConfig::default()));

    let mut handles = Vec::new();
    for amount in [101, 102] {
        let caller = AuthenticatedCaller::new(account(&store, Role::User).await, Role::User);
        let ledger = Arc::clone(&ledger);
        handles.push(tokio::spawn(async move {
            ledger
                .place_bid(&caller, auction_id, Decimal::from(amount), Utc::now())
                .await
        }));
    }
    for handle in handles {
        if let Err(err) = handle.await.unwrap() {
            assert!(matches!(err, LedgerError::BidTooLow { .. }), "{err:?}");
        }
    }

    let stored = store.find_auction(auction_id).await.unwrap().unwrap();
    assert_eq!(stored.current_price, Decimal::from(102));
    let bids = store.list_bids(auction_id).await.unwrap();
    assert_eq!(bids[0].amount, Decimal::from(102));
}

#[tokio::test]
async fn test_listing_search_is_parameterized() {
    let Some(store) = setup().await else { return };
    let seller = account(&store, Role::Seller).await;
    let auction_id = auction(&store, seller, Duration::hours(1)).await;
    let lot = store.find_auction(auction_id).await.unwrap().unwrap().description;

    let found = store
        .list_auctions(&AuctionFilter::listing(
            Some("Whole Spices".to_string()),
            Some(lot.clone()),
        ))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);

    let injected = store
        .list_auctions(&AuctionFilter::listing(None, Some(format!("{lot}' OR '1'='1"))))
        .await
        .unwrap();
    assert!(injected.is_empty());
}

#[tokio::test]
async fn test_account_delete_cascades() {
    let Some(store) = setup().await else { return };
    let seller = account(&store, Role::Seller).await;
    let buyer = account(&store, Role::User).await;
    let auction_id = auction(&store, seller, Duration::hours(1)).await;
    store
        .accept_bid(NewBid {
            auction_id,
            user_id: buyer,
            amount: Decimal::from(111),
            created_at: Utc::now(),
        })
        .await
        .unwrap();

    assert!(store.delete_account(buyer).await.unwrap());
    assert!(store.list_bids(auction_id).await.unwrap().is_empty());
    assert!(store.delete_account(seller).await.unwrap());
    assert!(store.find_auction(auction_id).await.unwrap().is_none());
    assert!(!store.delete_account(seller).await.unwrap());
}

#[tokio::test]
async fn test_admin_listings_join_names() {
    let Some(store) = setup().await else { return };
    let seller = account(&store, Role::Seller).await;
    let buyer = account(&store, Role::User).await;
    let auction_id = auction(&store, seller, Duration::hours(1)).await;
    let bid = store
        .accept_bid(NewBid {
            auction_id,
            user_id: buyer,
            amount: Decimal::from(140),
            created_at: Utc::now(),
        })
        .await
        .unwrap()
        .unwrap();

    let auctions = store.list_all_auctions().await.unwrap();
    let listed = auctions
        .iter()
        .find(|a| a.auction.id == auction_id)
        .expect("경매 누락");
    assert_eq!(listed.auction.name, "Star Anise");
    assert_eq!(listed.seller_name, "Store Test");

    let bids = store.list_all_bids().await.unwrap();
    let listed = bids.iter().find(|b| b.bid.id == bid.id).expect("입찰 누락");
    assert_eq!(listed.user_name, "Store Test");
    assert_eq!(listed.auction_name, "Star Anise");
    assert_eq!(listed.bid.amount, Decimal::from(140));
}
