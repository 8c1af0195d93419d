/// 입찰 관련 커맨드
/// 1. 입찰
/// 2. 낙찰 결제
/// 입찰자, 결제자 id 는 요청 본문이 아니라 세션에서 가져온다.
use rust_decimal::Decimal;
use serde::Deserialize;

/// 입찰 명령
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceBidCommand {
    pub bid_amount: Decimal,
}

/// 결제 명령
#[derive(Debug, Clone, Deserialize)]
pub struct SettlePaymentCommand {
    /// 클라이언트가 본 낙찰 금액
    pub amount: Decimal,
    pub method: String,
}
