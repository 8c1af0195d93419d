// region:    --- Imports
use crate::account::commands::{LoginCommand, RegisterCommand, UpdateAccountCommand};
use crate::account::model::Account;
use crate::account::LoginSession;
use crate::auction::commands::CreateAuctionCommand;
use crate::auction::model::{Auction, AuctionFilter};
use crate::auth::{AuthenticatedCaller, SessionToken};
use crate::bidding::commands::{PlaceBidCommand, SettlePaymentCommand};
use crate::bidding::model::{Bid, BidListing, Payment};
use crate::error::LedgerError;
use crate::ledger::{AdminAuctionSummary, AuctionDetail, AuctionSummary};
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use axum_extra::extract::WithRejection;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

// endregion: --- Imports

// region:    --- Payloads
/// 경매 목록 조회 조건
#[derive(Debug, Default, Deserialize)]
pub struct AuctionListParams {
    pub category: Option<String>,
    pub search: Option<String>,
}

/// 입찰 결과
#[derive(Debug, Serialize)]
pub struct BidPlaced {
    pub message: &'static str,
    pub current_price: Decimal,
    pub bid: Bid,
}

/// 낙찰자 조회 결과
#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum WinnerView {
    Winner { bid: Bid },
    NoBids,
}

// endregion: --- Payloads

// region:    --- Account Handlers

/// 회원 가입
pub async fn handle_register(
    State(state): State<AppState>,
    WithRejection(Json(cmd), _): WithRejection<Json<RegisterCommand>, LedgerError>,
) -> Result<(StatusCode, Json<Account>), LedgerError> {
    info!("{:<12} --> 회원 가입 요청", "Handler");
    let account = state.accounts.register(cmd).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// 로그인
pub async fn handle_login(
    State(state): State<AppState>,
    WithRejection(Json(cmd), _): WithRejection<Json<LoginCommand>, LedgerError>,
) -> Result<Json<LoginSession>, LedgerError> {
    info!("{:<12} --> 로그인 요청", "Handler");
    Ok(Json(state.accounts.login(cmd).await?))
}

/// 로그아웃
pub async fn handle_logout(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
) -> StatusCode {
    state.accounts.logout(&token);
    StatusCode::NO_CONTENT
}

// endregion: --- Account Handlers

// region:    --- Auction Handlers

/// 경매 목록 조회 (진행 중)
pub async fn handle_get_auctions(
    State(state): State<AppState>,
    Query(params): Query<AuctionListParams>,
) -> Result<Json<Vec<AuctionSummary>>, LedgerError> {
    info!("{:<12} --> 경매 목록 조회 {:?}", "Handler", params);
    let filter = AuctionFilter::listing(params.category, params.search);
    let now = state.clock.now();
    Ok(Json(state.ledger.list_auctions(&filter, now).await?))
}

/// 경매 등록
pub async fn handle_create_auction(
    State(state): State<AppState>,
    caller: AuthenticatedCaller,
    WithRejection(Json(cmd), _): WithRejection<Json<CreateAuctionCommand>, LedgerError>,
) -> Result<(StatusCode, Json<Auction>), LedgerError> {
    info!(
        "{:<12} --> 경매 등록 요청 seller_id: {}",
        "Handler", caller.account_id
    );
    let now = state.clock.now();
    let auction = state.ledger.create_auction(&caller, cmd, now).await?;
    Ok((StatusCode::CREATED, Json(auction)))
}

/// 경매 상세 조회
pub async fn handle_get_auction(
    State(state): State<AppState>,
    Path(auction_id): Path<i64>,
) -> Result<Json<AuctionDetail>, LedgerError> {
    info!("{:<12} --> 경매 상세 조회 id: {}", "Handler", auction_id);
    let now = state.clock.now();
    Ok(Json(state.ledger.auction_detail(auction_id, now).await?))
}

/// 판매자 본인 경매 목록
pub async fn handle_get_seller_auctions(
    State(state): State<AppState>,
    caller: AuthenticatedCaller,
) -> Result<Json<Vec<AuctionSummary>>, LedgerError> {
    let now = state.clock.now();
    Ok(Json(state.ledger.seller_auctions(&caller, now).await?))
}

// endregion: --- Auction Handlers

// region:    --- Bidding Handlers

/// 입찰 요청 처리
pub async fn handle_bid(
    State(state): State<AppState>,
    Path(auction_id): Path<i64>,
    caller: AuthenticatedCaller,
    WithRejection(Json(cmd), _): WithRejection<Json<PlaceBidCommand>, LedgerError>,
) -> Result<Json<BidPlaced>, LedgerError> {
    info!(
        "{:<12} --> 입찰 요청 처리 시작: auction_id {}, {:?}",
        "Handler", auction_id, cmd
    );
    let now = state.clock.now();
    let bid = state
        .ledger
        .place_bid(&caller, auction_id, cmd.bid_amount, now)
        .await?;
    Ok(Json(BidPlaced {
        message: "입찰이 성공적으로 처리되었습니다.",
        current_price: bid.amount,
        bid,
    }))
}

/// 입찰 이력 조회
pub async fn handle_get_bid_history(
    State(state): State<AppState>,
    Path(auction_id): Path<i64>,
) -> Result<Json<Vec<Bid>>, LedgerError> {
    info!("{:<12} --> 입찰 이력 조회 id: {}", "Handler", auction_id);
    Ok(Json(state.ledger.bids(auction_id).await?))
}

/// 낙찰자 조회
pub async fn handle_get_winner(
    State(state): State<AppState>,
    Path(auction_id): Path<i64>,
) -> Result<Json<WinnerView>, LedgerError> {
    info!("{:<12} --> 낙찰자 조회 id: {}", "Handler", auction_id);
    let now = state.clock.now();
    let view = match state.ledger.compute_winner(auction_id, now).await? {
        Some(bid) => WinnerView::Winner { bid },
        None => WinnerView::NoBids,
    };
    Ok(Json(view))
}

/// 낙찰 결제
pub async fn handle_payment(
    State(state): State<AppState>,
    Path(auction_id): Path<i64>,
    caller: AuthenticatedCaller,
    WithRejection(Json(cmd), _): WithRejection<Json<SettlePaymentCommand>, LedgerError>,
) -> Result<(StatusCode, Json<Payment>), LedgerError> {
    info!(
        "{:<12} --> 결제 요청 처리 시작: auction_id {}",
        "Handler", auction_id
    );
    let now = state.clock.now();
    let payment = state
        .ledger
        .settle_payment(&caller, auction_id, cmd.amount, &cmd.method, now)
        .await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

// endregion: --- Bidding Handlers

// region:    --- Admin Handlers

/// 계정 목록
pub async fn handle_admin_get_accounts(
    State(state): State<AppState>,
    caller: AuthenticatedCaller,
) -> Result<Json<Vec<Account>>, LedgerError> {
    Ok(Json(state.accounts.list(&caller).await?))
}

/// 계정 수정
pub async fn handle_admin_update_account(
    State(state): State<AppState>,
    Path(account_id): Path<i64>,
    caller: AuthenticatedCaller,
    WithRejection(Json(cmd), _): WithRejection<Json<UpdateAccountCommand>, LedgerError>,
) -> Result<Json<Account>, LedgerError> {
    info!("{:<12} --> 계정 수정 요청 id: {}", "Handler", account_id);
    Ok(Json(state.accounts.update(&caller, account_id, cmd).await?))
}

/// 계정 삭제
pub async fn handle_admin_delete_account(
    State(state): State<AppState>,
    Path(account_id): Path<i64>,
    caller: AuthenticatedCaller,
) -> Result<StatusCode, LedgerError> {
    info!("{:<12} --> 계정 삭제 요청 id: {}", "Handler", account_id);
    state.accounts.delete(&caller, account_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// 전체 경매 목록
pub async fn handle_admin_get_auctions(
    State(state): State<AppState>,
    caller: AuthenticatedCaller,
) -> Result<Json<Vec<AdminAuctionSummary>>, LedgerError> {
    let now = state.clock.now();
    Ok(Json(state.ledger.admin_auctions(&caller, now).await?))
}

/// 전체 입찰 목록
pub async fn handle_admin_get_bids(
    State(state): State<AppState>,
    caller: AuthenticatedCaller,
) -> Result<Json<Vec<BidListing>>, LedgerError> {
    Ok(Json(state.ledger.admin_bids(&caller).await?))
}

/// 경매 삭제
pub async fn handle_admin_delete_auction(
    State(state): State<AppState>,
    Path(auction_id): Path<i64>,
    caller: AuthenticatedCaller,
) -> Result<StatusCode, LedgerError> {
    info!("{:<12} --> 경매 삭제 요청 id: {}", "Handler", auction_id);
    state.ledger.delete_auction(&caller, auction_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// 입찰 삭제
pub async fn handle_admin_delete_bid(
    State(state): State<AppState>,
    Path(bid_id): Path<i64>,
    caller: AuthenticatedCaller,
) -> Result<StatusCode, LedgerError> {
    info!("{:<12} --> 입찰 삭제 요청 id: {}", "Handler", bid_id);
    state.ledger.delete_bid(&caller, bid_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// endregion: --- Admin Handlers

// region:    --- Router
/// 라우터 설정
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/register", post(handle_register))
        .route("/login", post(handle_login))
        .route("/logout", post(handle_logout))
        .route(
            "/auctions",
            get(handle_get_auctions).post(handle_create_auction),
        )
        .route("/auctions/:id", get(handle_get_auction))
        .route(
            "/auctions/:id/bids",
            get(handle_get_bid_history).post(handle_bid),
        )
        .route("/auctions/:id/winner", get(handle_get_winner))
        .route("/auctions/:id/payment", post(handle_payment))
        .route("/seller/auctions", get(handle_get_seller_auctions))
        .route("/admin/accounts", get(handle_admin_get_accounts))
        .route(
            "/admin/accounts/:id",
            put(handle_admin_update_account).delete(handle_admin_delete_account),
        )
        .route("/admin/auctions", get(handle_admin_get_auctions))
        .route("/admin/auctions/:id", delete(handle_admin_delete_auction))
        .route("/admin/bids", get(handle_admin_get_bids))
        .route("/admin/bids/:id", delete(handle_admin_delete_bid))
        .with_state(state)
}

// endregion: --- Router
