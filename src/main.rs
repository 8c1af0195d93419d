// region:    --- Imports
use axum::extract::DefaultBodyLimit;
use clap::Parser;
use spice_auction::clock::SystemClock;
use spice_auction::config::Options;
use spice_auction::database::DatabaseManager;
use spice_auction::handlers;
use spice_auction::state::AppState;
use spice_auction::store::{InMemoryLedgerStore, LedgerStore, PostgresLedgerStore};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};
// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    let options = Options::parse();
    let config = options.ledger_config()?;

    // 저장소 선택 (DATABASE_URL 이 없으면 메모리 저장소)
    let store: Arc<dyn LedgerStore> = match &options.database_url {
        Some(database_url) => {
            let db_manager =
                Arc::new(DatabaseManager::new(database_url, options.max_connections).await?);
            if let Err(e) = db_manager.initialize_database(options.reset_database).await {
                error!("{:<12} --> 데이터베이스 초기화 실패: {:?}", "Main", e);
                return Err(e.into());
            }
            info!("{:<12} --> 데이터베이스 초기화 성공", "Main");
            Arc::new(PostgresLedgerStore::new(db_manager))
        }
        None => {
            warn!(
                "{:<12} --> DATABASE_URL 미설정: 메모리 저장소로 실행 (재시작 시 데이터 유실)",
                "Main"
            );
            Arc::new(InMemoryLedgerStore::new())
        }
    };

    let state = AppState::new(store, config, Arc::new(SystemClock));

    // 관리자 계정 준비
    match (&options.admin_email, &options.admin_password) {
        (Some(email), Some(password)) => {
            state
                .accounts
                .ensure_admin(&options.admin_name, email, password)
                .await?;
        }
        _ => warn!(
            "{:<12} --> ADMIN_EMAIL / ADMIN_PASSWORD 미설정: 관리자 계정 생성 생략",
            "Main"
        ),
    }

    // 테스트 페이지를 위한 cors 설정
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let routes_all = handlers::routes(state)
        .layer(cors)
        .layer(DefaultBodyLimit::max(1024 * 1024));

    let listener = TcpListener::bind(options.listen_addr).await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    // 서버 실행
    if let Err(err) = axum::serve(listener, routes_all.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
