use crate::account::AccountDirectory;
use crate::auth::session::SessionRegistry;
use crate::clock::Clock;
use crate::ledger::{AuctionLedger, LedgerConfig};
use crate::store::LedgerStore;
use std::sync::Arc;

/// 핸들러 공유 상태
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<AuctionLedger>,
    pub accounts: Arc<AccountDirectory>,
    pub sessions: Arc<SessionRegistry>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(store: Arc<dyn LedgerStore>, config: LedgerConfig, clock: Arc<dyn Clock>) -> Self {
        let sessions = Arc::new(SessionRegistry::new());
        Self {
            ledger: Arc::new(AuctionLedger::new(Arc::clone(&store), config)),
            accounts: Arc::new(AccountDirectory::new(store, Arc::clone(&sessions))),
            sessions,
            clock,
        }
    }
}
