// region:    --- Imports
use crate::auth::password::{hash_password, verify_password};
use crate::auth::session::SessionRegistry;
use crate::auth::AuthenticatedCaller;
use crate::error::LedgerError;
use crate::store::LedgerStore;
use commands::{LoginCommand, RegisterCommand, UpdateAccountCommand};
use model::{Account, AccountUpdate, NewAccount, Role};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

// endregion: --- Imports

// region:    --- Modules
pub mod commands;
pub mod model;

// endregion: --- Modules

/// 로그인 결과
#[derive(Debug, Clone, Serialize)]
pub struct LoginSession {
    pub token: Uuid,
    pub account: Account,
}

// region:    --- Account Directory
/// 계정 관리 (가입, 로그인, 관리자 수정 및 삭제)
pub struct AccountDirectory {
    store: Arc<dyn LedgerStore>,
    sessions: Arc<SessionRegistry>,
}

impl AccountDirectory {
    pub fn new(store: Arc<dyn LedgerStore>, sessions: Arc<SessionRegistry>) -> Self {
        Self { store, sessions }
    }

    /// 회원 가입
    pub async fn register(&self, cmd: RegisterCommand) -> Result<Account, LedgerError> {
        let registration = cmd.validate()?;
        if self
            .store
            .find_account_by_email(&registration.email)
            .await?
            .is_some()
        {
            return Err(LedgerError::validation("이미 등록된 이메일입니다."));
        }

        let account = self
            .store
            .insert_account(NewAccount {
                password_hash: hash_password(&registration.password)?,
                name: registration.name,
                phone: registration.phone,
                email: registration.email,
                role: registration.role,
            })
            .await?;
        info!(
            "{:<12} --> 회원 가입 id: {}, role: {}",
            "Account", account.id, account.role
        );
        Ok(account)
    }

    /// 로그인
    pub async fn login(&self, cmd: LoginCommand) -> Result<LoginSession, LedgerError> {
        let email = commands::normalize_email(&cmd.email);
        if email.is_empty() || cmd.password.is_empty() {
            return Err(LedgerError::validation("모든 항목을 입력해 주세요."));
        }

        let account = match self.store.find_account_by_email(&email).await? {
            Some(account) if verify_password(&cmd.password, &account.password_hash) => account,
            _ => {
                warn!("{:<12} --> 로그인 실패 email: {}", "Account", email);
                return Err(LedgerError::Unauthenticated);
            }
        };

        let token = self
            .sessions
            .issue(AuthenticatedCaller::new(account.id, account.role));
        Ok(LoginSession { token, account })
    }

    /// 로그아웃
    pub fn logout(&self, token: &Uuid) {
        self.sessions.revoke(token);
    }

    /// 관리자 계정 생성 (서버 시작 시)
    pub async fn ensure_admin(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Account, LedgerError> {
        let email = commands::normalize_email(email);
        if let Some(account) = self.store.find_account_by_email(&email).await? {
            if account.role != Role::Admin {
                warn!(
                    "{:<12} --> 관리자 이메일이 다른 역할로 등록되어 있음: {}",
                    "Account", email
                );
            }
            return Ok(account);
        }
        let account = self
            .store
            .insert_account(NewAccount {
                name: name.to_string(),
                phone: String::new(),
                email,
                password_hash: hash_password(password)?,
                role: Role::Admin,
            })
            .await?;
        info!("{:<12} --> 관리자 계정 생성 id: {}", "Account", account.id);
        Ok(account)
    }

    /// 계정 목록 (관리자)
    pub async fn list(&self, caller: &AuthenticatedCaller) -> Result<Vec<Account>, LedgerError> {
        caller.require(Role::Admin)?;
        self.store.list_accounts().await
    }

    /// 계정 수정 (관리자)
    pub async fn update(
        &self,
        caller: &AuthenticatedCaller,
        account_id: i64,
        cmd: UpdateAccountCommand,
    ) -> Result<Account, LedgerError> {
        caller.require(Role::Admin)?;
        let changes = cmd.validate()?;
        let password_hash = match &changes.password {
            Some(password) => Some(hash_password(password)?),
            None => None,
        };
        let account = self
            .store
            .update_account(
                account_id,
                AccountUpdate {
                    name: changes.name,
                    phone: changes.phone,
                    email: changes.email,
                    role: changes.role,
                    password_hash,
                },
            )
            .await?
            .ok_or(LedgerError::NotFound("계정"))?;

        // 역할이 바뀌었을 수 있으므로 기존 세션 종료
        self.sessions.revoke_account(account_id);
        info!("{:<12} --> 계정 수정 id: {}", "Account", account_id);
        Ok(account)
    }

    /// 계정 삭제 (관리자, 경매와 입찰 연쇄 삭제)
    pub async fn delete(
        &self,
        caller: &AuthenticatedCaller,
        account_id: i64,
    ) -> Result<(), LedgerError> {
        caller.require(Role::Admin)?;
        if caller.account_id == account_id {
            return Err(LedgerError::validation("본인 계정은 삭제할 수 없습니다."));
        }
        if !self.store.delete_account(account_id).await? {
            return Err(LedgerError::NotFound("계정"));
        }
        self.sessions.revoke_account(account_id);
        info!("{:<12} --> 계정 삭제 id: {}", "Account", account_id);
        Ok(())
    }
}

// endregion: --- Account Directory
