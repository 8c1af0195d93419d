use super::AuthenticatedCaller;
use dashmap::DashMap;
use tracing::info;
use uuid::Uuid;

/// 로그인 세션 저장소
/// 토큰 -> 호출자 매핑만 메모리에 보관한다.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: DashMap<Uuid, AuthenticatedCaller>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 세션 발급
    pub fn issue(&self, caller: AuthenticatedCaller) -> Uuid {
        let token = Uuid::new_v4();
        self.sessions.insert(token, caller);
        info!(
            "{:<12} --> 세션 발급 account_id: {}",
            "Session", caller.account_id
        );
        token
    }

    pub fn resolve(&self, token: &Uuid) -> Option<AuthenticatedCaller> {
        self.sessions.get(token).map(|entry| *entry.value())
    }

    /// 세션 종료
    pub fn revoke(&self, token: &Uuid) -> bool {
        self.sessions.remove(token).is_some()
    }

    /// 계정의 모든 세션 종료 (계정 수정, 삭제 시)
    pub fn revoke_account(&self, account_id: i64) {
        self.sessions
            .retain(|_, caller| caller.account_id != account_id);
    }
}
