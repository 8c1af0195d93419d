/// 계정 관련 커맨드
/// 1. 회원 가입
/// 2. 로그인
/// 3. 관리자 계정 수정
// region:    --- Imports
use super::model::Role;
use crate::error::LedgerError;
use email_address::EmailAddress;
use serde::Deserialize;

// endregion: --- Imports

// region:    --- Commands
/// 회원 가입 명령
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterCommand {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password: String,
    #[serde(default = "default_user_type")]
    pub user_type: String,
}

fn default_user_type() -> String {
    "buyer".to_string()
}

/// 로그인 명령
#[derive(Debug, Clone, Deserialize)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

/// 관리자 계정 수정 명령
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAccountCommand {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub role: Role,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub confirm_password: Option<String>,
}

/// 검증을 통과한 가입 정보
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// 검증을 통과한 수정 정보
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountChanges {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub role: Role,
    pub password: Option<String>,
}

const MIN_PASSWORD_LEN: usize = 8;
const MIN_RESET_PASSWORD_LEN: usize = 6;
const MIN_PHONE_DIGITS: usize = 10;

// endregion: --- Commands

// region:    --- Validation
impl RegisterCommand {
    /// 1. 회원 가입 검증
    /// 여러 오류가 있으면 모두 모아서 반환한다.
    pub fn validate(self) -> Result<Registration, LedgerError> {
        let name = self.name.trim().to_string();
        let phone = self.phone.trim().to_string();
        let email = normalize_email(&self.email);
        let mut errors = Vec::new();

        if name.is_empty() {
            errors.push("이름은 필수입니다.");
        } else if !is_valid_name(&name) {
            errors.push("이름은 영문자와 공백만 사용할 수 있습니다.");
        }

        if phone.is_empty() {
            errors.push("전화번호는 필수입니다.");
        } else if !phone
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_whitespace() || matches!(c, '(' | ')' | '-'))
        {
            errors.push("전화번호는 숫자, 공백, 하이픈, 괄호만 사용할 수 있습니다.");
        }
        let digits = digits_only(&phone);
        if digits.len() < MIN_PHONE_DIGITS {
            errors.push("전화번호는 최소 10자리여야 합니다.");
        }

        if !EmailAddress::is_valid(&email) {
            errors.push("이메일 형식이 올바르지 않습니다.");
        }

        if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.push("비밀번호는 최소 8자 이상이어야 합니다.");
        }

        // 관리자는 가입으로 만들 수 없음
        let role = match self.user_type.trim() {
            "buyer" => Some(Role::User),
            "seller" => Some(Role::Seller),
            _ => {
                errors.push("잘못된 회원 유형입니다.");
                None
            }
        };

        match role {
            Some(role) if errors.is_empty() => Ok(Registration {
                name,
                phone: digits,
                email,
                password: self.password,
                role,
            }),
            _ => Err(LedgerError::validation(errors.join(" "))),
        }
    }
}

impl UpdateAccountCommand {
    /// 3. 관리자 계정 수정 검증
    pub fn validate(self) -> Result<AccountChanges, LedgerError> {
        let name = self.name.trim().to_string();
        let email = normalize_email(&self.email);
        if name.is_empty() || email.is_empty() {
            return Err(LedgerError::validation("필수 항목이 누락되었습니다."));
        }
        if !EmailAddress::is_valid(&email) {
            return Err(LedgerError::validation("이메일 형식이 올바르지 않습니다."));
        }

        let password = self.password.filter(|p| !p.is_empty());
        let confirm = self.confirm_password.filter(|p| !p.is_empty());
        let password = match (password, confirm) {
            (None, None) => None,
            (password, confirm) if password != confirm => {
                return Err(LedgerError::validation("비밀번호가 일치하지 않습니다."))
            }
            (Some(password), _) if password.chars().count() < MIN_RESET_PASSWORD_LEN => {
                return Err(LedgerError::validation(
                    "비밀번호는 최소 6자 이상이어야 합니다.",
                ))
            }
            (password, _) => password,
        };

        Ok(AccountChanges {
            name,
            phone: digits_only(self.phone.trim()),
            email,
            role: self.role,
            password,
        })
    }
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn is_valid_name(name: &str) -> bool {
    name.chars()
        .all(|c| c.is_ascii_alphabetic() || c.is_whitespace())
}

fn digits_only(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

// endregion: --- Validation

#[cfg(test)]
mod tests {
    use super::*;

    fn register(name: &str, phone: &str, email: &str, password: &str, user_type: &str) -> RegisterCommand {
        RegisterCommand {
            name: name.to_string(),
            phone: phone.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            user_type: user_type.to_string(),
        }
    }

    #[test]
    fn buyer_registration_maps_to_user_role() {
        let registration = register(
            " Asha Menon ",
            "(987) 654-3210",
            "Asha@Example.com",
            "cardamom1",
            "buyer",
        )
        .validate()
        .unwrap();

        assert_eq!(registration.name, "Asha Menon");
        assert_eq!(registration.phone, "9876543210");
        assert_eq!(registration.email, "asha@example.com");
        assert_eq!(registration.role, Role::User);
    }

    #[test]
    fn seller_registration_maps_to_seller_role() {
        let registration = register("Ravi", "9876543210", "ravi@example.com", "pepper123", "seller")
            .validate()
            .unwrap();
        assert_eq!(registration.role, Role::Seller);
    }

    #[test]
    fn admin_cannot_self_register() {
        let err = register("Root", "9876543210", "root@example.com", "password1", "admin")
            .validate()
            .unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[test]
    fn rejects_digits_in_name_short_phone_and_short_password() {
        for cmd in [
            register("R2D2", "9876543210", "r@example.com", "password1", "buyer"),
            register("Ravi", "98765", "r@example.com", "password1", "buyer"),
            register("Ravi", "98765abcde12", "r@example.com", "password1", "buyer"),
            register("Ravi", "9876543210", "not-an-email", "password1", "buyer"),
            register("Ravi", "9876543210", "r@example.com", "short", "buyer"),
        ] {
            assert!(matches!(cmd.validate(), Err(LedgerError::Validation(_))));
        }
    }

    #[test]
    fn account_update_requires_matching_passwords() {
        let cmd = UpdateAccountCommand {
            name: "Ravi".to_string(),
            email: "ravi@example.com".to_string(),
            phone: "9876543210".to_string(),
            role: Role::Seller,
            password: Some("saffron".to_string()),
            confirm_password: Some("saffron!".to_string()),
        };
        assert!(cmd.validate().is_err());
    }

    #[test]
    fn account_update_without_password_keeps_it() {
        let cmd = UpdateAccountCommand {
            name: "Ravi".to_string(),
            email: "ravi@example.com".to_string(),
            phone: String::new(),
            role: Role::Admin,
            password: Some(String::new()),
            confirm_password: None,
        };
        let changes = cmd.validate().unwrap();
        assert_eq!(changes.password, None);
        assert_eq!(changes.role, Role::Admin);
    }
}
