// region:    --- Imports
use crate::error::LedgerError;
use crate::ledger::{rules, LedgerConfig};
use clap::{crate_name, crate_version, Parser};
use rust_decimal::Decimal;
use std::net::SocketAddr;

// endregion: --- Imports

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_BID_AMOUNT: &str = "1000000";
const DEFAULT_PAYMENT_METHODS: &str = "UPI,Google Pay,PhonePe";

/// 서버 실행 옵션
/// 모든 옵션은 환경 변수로도 지정할 수 있다.
#[derive(Parser, Clone, Debug)]
#[command(name = crate_name!())]
#[command(version = crate_version!())]
#[command(about = "Spice auction ledger service")]
pub struct Options {
    /// Address and port the server will bind to.
    #[arg(long = "listen-addr")]
    #[arg(default_value = DEFAULT_LISTEN_ADDR)]
    #[arg(env = "LISTEN_ADDR")]
    pub listen_addr: SocketAddr,

    /// Postgres url. Without it the ledger runs on the in-memory store.
    #[arg(long = "database-url")]
    #[arg(env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Maximum size of the connection pool.
    #[arg(long = "max-connections")]
    #[arg(default_value_t = 5)]
    #[arg(env = "DATABASE_MAX_CONNECTIONS")]
    pub max_connections: u32,

    /// Drop and recreate every table on startup.
    #[arg(long = "reset-database")]
    #[arg(env = "RESET_DATABASE")]
    pub reset_database: bool,

    /// Upper bound for bids and starting prices.
    #[arg(long = "max-bid-amount")]
    #[arg(default_value = DEFAULT_MAX_BID_AMOUNT)]
    #[arg(env = "MAX_BID_AMOUNT")]
    pub max_bid_amount: Decimal,

    /// Accepted payment method labels, comma separated.
    #[arg(long = "payment-methods")]
    #[arg(value_delimiter = ',')]
    #[arg(default_value = DEFAULT_PAYMENT_METHODS)]
    #[arg(env = "PAYMENT_METHODS")]
    pub payment_methods: Vec<String>,

    /// Display name of the bootstrap admin account.
    #[arg(long = "admin-name")]
    #[arg(default_value = "Administrator")]
    #[arg(env = "ADMIN_NAME")]
    pub admin_name: String,

    /// Email of the bootstrap admin account.
    #[arg(long = "admin-email")]
    #[arg(env = "ADMIN_EMAIL")]
    pub admin_email: Option<String>,

    /// Password of the bootstrap admin account.
    #[arg(long = "admin-password")]
    #[arg(env = "ADMIN_PASSWORD")]
    pub admin_password: Option<String>,
}

impl Options {
    /// 원장 설정 생성
    /// 상한은 금액 컬럼에 저장 가능한 범위 안이어야 한다.
    pub fn ledger_config(&self) -> Result<LedgerConfig, LedgerError> {
        let storable = rules::max_storable_amount();
        if self.max_bid_amount <= Decimal::ZERO || self.max_bid_amount > storable {
            return Err(LedgerError::validation(format!(
                "MAX_BID_AMOUNT 는 0 초과 {} 이하여야 합니다. (입력값 {})",
                storable, self.max_bid_amount
            )));
        }
        let payment_methods: Vec<String> = self
            .payment_methods
            .iter()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .collect();
        if payment_methods.is_empty() {
            return Err(LedgerError::validation(
                "PAYMENT_METHODS 에 결제 수단이 하나 이상 필요합니다.",
            ));
        }
        Ok(LedgerConfig {
            max_bid_amount: self.max_bid_amount,
            payment_methods,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_ledger_defaults() {
        let options = Options::try_parse_from(["spice-auction"]).unwrap();
        assert_eq!(options.ledger_config().unwrap(), LedgerConfig::default());
    }

    #[test]
    fn payment_methods_are_split_and_trimmed() {
        let options = Options::try_parse_from([
            "spice-auction",
            "--payment-methods",
            "UPI, Card ,",
            "--max-bid-amount",
            "5000.50",
        ])
        .unwrap();
        let config = options.ledger_config().unwrap();
        assert_eq!(config.payment_methods, vec!["UPI", "Card"]);
        assert_eq!(config.max_bid_amount, Decimal::new(500050, 2));
    }

    #[test]
    fn ceiling_must_fit_the_amount_columns() {
        let options =
            Options::try_parse_from(["spice-auction", "--max-bid-amount", "9999999999.99"])
                .unwrap();
        assert!(options.ledger_config().is_ok());

        for ceiling in ["10000000000", "0", "-1"] {
            let arg = format!("--max-bid-amount={ceiling}");
            let options = Options::try_parse_from(["spice-auction", arg.as_str()]).unwrap();
            let err = options.ledger_config().unwrap_err();
            assert!(matches!(err, LedgerError::Validation(_)), "{ceiling}: {err:?}");
        }
    }

    #[test]
    fn payment_methods_cannot_be_empty() {
        let options =
            Options::try_parse_from(["spice-auction", "--payment-methods", " , "]).unwrap();
        assert!(options.ledger_config().is_err());
    }
}
