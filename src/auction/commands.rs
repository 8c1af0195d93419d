/// 경매 등록 커맨드
// region:    --- Imports
use super::model::NewAuction;
use crate::error::LedgerError;
use crate::ledger::rules;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

// endregion: --- Imports

const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

/// 경매 등록 명령 (판매자)
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAuctionCommand {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    pub starting_price: Decimal,
    pub quantity: i32,
    pub end_at: DateTime<Utc>,
    #[serde(default)]
    pub image_path: Option<String>,
}

impl CreateAuctionCommand {
    /// 등록 검증 후 신규 경매 생성
    pub fn validate(
        self,
        seller_id: i64,
        max_price: Decimal,
        now: DateTime<Utc>,
    ) -> Result<NewAuction, LedgerError> {
        let name = self.name.trim().to_string();
        let description = self.description.trim().to_string();
        if name.is_empty() {
            return Err(LedgerError::validation("상품명은 필수입니다."));
        }
        if description.is_empty() {
            return Err(LedgerError::validation("상품 설명은 필수입니다."));
        }
        rules::validate_amount(self.starting_price, max_price)?;
        if self.quantity <= 0 {
            return Err(LedgerError::validation("수량이 올바르지 않습니다."));
        }
        if self.end_at <= now {
            return Err(LedgerError::validation(
                "종료 시각은 현재 이후여야 합니다.",
            ));
        }

        let image_path = self
            .image_path
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());
        if let Some(path) = &image_path {
            let valid = path
                .rsplit_once('.')
                .map(|(_, ext)| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
                .unwrap_or(false);
            if !valid {
                return Err(LedgerError::validation(
                    "이미지는 JPG, JPEG, PNG, GIF 형식만 허용됩니다.",
                ));
            }
        }

        Ok(NewAuction {
            seller_id,
            name,
            description,
            category: self
                .category
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            starting_price: self.starting_price,
            quantity: self.quantity,
            end_at: self.end_at,
            image_path,
            created_at: now,
        })
    }
}
