/// 입찰, 낙찰 규칙
/// 저장소와 무관한 순수 함수만 둔다.
// region:    --- Imports
use crate::auction::model::{Auction, AuctionPhase};
use crate::bidding::model::Bid;
use crate::error::LedgerError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

// endregion: --- Imports

/// 금액 소수점 자리수 (NUMERIC(12, 2))
pub const AMOUNT_SCALE: u32 = 2;

/// 저장 가능한 최대 금액 (NUMERIC(12, 2))
pub fn max_storable_amount() -> Decimal {
    Decimal::new(999_999_999_999, AMOUNT_SCALE)
}

// region:    --- Rules
/// 금액 검증: 양수, 소수점 둘째 자리까지, 상한 이하
pub fn validate_amount(amount: Decimal, ceiling: Decimal) -> Result<(), LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::validation("금액은 0보다 커야 합니다."));
    }
    if amount.normalize().scale() > AMOUNT_SCALE {
        return Err(LedgerError::validation(
            "금액은 소수점 둘째 자리까지만 입력할 수 있습니다.",
        ));
    }
    if amount > ceiling {
        return Err(LedgerError::validation(format!(
            "금액이 너무 큽니다. (최대 {})",
            ceiling
        )));
    }
    Ok(())
}

/// 입찰 가능 여부 검증
pub fn check_bid(auction: &Auction, amount: Decimal, now: DateTime<Utc>) -> Result<(), LedgerError> {
    if !auction.is_open(now) {
        return Err(LedgerError::AuctionEnded);
    }
    if amount <= auction.current_price {
        return Err(LedgerError::BidTooLow {
            current_price: auction.current_price,
        });
    }
    Ok(())
}

/// 종료된 경매인지 검증 (낙찰자 조회, 결제)
pub fn ensure_closed(auction: &Auction, now: DateTime<Utc>) -> Result<(), LedgerError> {
    match auction.phase(now) {
        AuctionPhase::Active => Err(LedgerError::AuctionStillOpen),
        AuctionPhase::Ended | AuctionPhase::Sold => Ok(()),
    }
}

/// 낙찰 입찰 선택
/// 최고 금액, 동일 금액이면 먼저 들어온 입찰 (시각, id 순)
pub fn select_winner(bids: &[Bid]) -> Option<&Bid> {
    bids.iter().min_by(|a, b| {
        b.amount
            .cmp(&a.amount)
            .then(a.created_at.cmp(&b.created_at))
            .then(a.id.cmp(&b.id))
    })
}

/// 입찰 목록 정렬: 금액 내림차순, 동일 금액은 먼저 들어온 순
pub fn sort_bids(bids: &mut [Bid]) {
    bids.sort_by(|a, b| {
        b.amount
            .cmp(&a.amount)
            .then(a.created_at.cmp(&b.created_at))
            .then(a.id.cmp(&b.id))
    });
}

// endregion: --- Rules

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auction::model::AuctionStatus;
    use chrono::{Duration, TimeZone};

    fn at(second: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + second, 0).unwrap()
    }

    fn bid(id: i64, user_id: i64, amount: i64, second: i64) -> Bid {
        Bid {
            id,
            auction_id: 1,
            user_id,
            amount: Decimal::from(amount),
            created_at: at(second),
        }
    }

    fn auction(current_price: i64, status: AuctionStatus) -> Auction {
        Auction {
            id: 1,
            seller_id: 9,
            name: "Cardamom".to_string(),
            description: "Green pods".to_string(),
            category: None,
            starting_price: Decimal::from(50),
            current_price: Decimal::from(current_price),
            quantity: 1,
            end_at: at(100),
            image_path: None,
            status,
            created_at: at(0),
        }
    }

    #[test]
    fn earliest_bid_at_the_maximum_amount_wins() {
        let bids = vec![bid(1, 1, 100, 1), bid(2, 2, 150, 2), bid(3, 3, 150, 3)];
        let winner = select_winner(&bids).unwrap();
        assert_eq!(winner.user_id, 2);

        // 입력 순서와 무관
        let reversed: Vec<Bid> = bids.into_iter().rev().collect();
        assert_eq!(select_winner(&reversed).unwrap().user_id, 2);
    }

    #[test]
    fn no_bids_means_no_winner() {
        assert!(select_winner(&[]).is_none());
    }

    #[test]
    fn bid_must_exceed_current_price() {
        let a = auction(100, AuctionStatus::Active);
        assert!(matches!(
            check_bid(&a, Decimal::from(100), at(10)),
            Err(LedgerError::BidTooLow { current_price }) if current_price == Decimal::from(100)
        ));
        assert!(check_bid(&a, Decimal::new(10001, 2), at(10)).is_ok());
    }

    #[test]
    fn ended_auction_rejects_even_high_bids() {
        let a = auction(100, AuctionStatus::Active);
        assert!(matches!(
            check_bid(&a, Decimal::from(500), at(100)),
            Err(LedgerError::AuctionEnded)
        ));
        let sold = auction(100, AuctionStatus::Sold);
        assert!(matches!(
            check_bid(&sold, Decimal::from(500), at(10)),
            Err(LedgerError::AuctionEnded)
        ));
    }

    #[test]
    fn amount_validation() {
        let ceiling = Decimal::from(1_000_000);
        assert!(validate_amount(Decimal::ZERO, ceiling).is_err());
        assert!(validate_amount(Decimal::from(-5), ceiling).is_err());
        assert!(validate_amount(Decimal::new(1_000_001, 0), ceiling).is_err());
        assert!(validate_amount(Decimal::new(12345, 3), ceiling).is_err());
        assert!(validate_amount(Decimal::new(12340, 3), ceiling).is_ok());
        assert!(validate_amount(ceiling, ceiling).is_ok());
    }

    #[test]
    fn winner_query_needs_a_closed_auction() {
        let a = auction(100, AuctionStatus::Active);
        assert!(matches!(
            ensure_closed(&a, a.end_at - Duration::seconds(1)),
            Err(LedgerError::AuctionStillOpen)
        ));
        assert!(ensure_closed(&a, a.end_at).is_ok());
    }

    #[test]
    fn bids_sort_by_amount_then_time() {
        let mut bids = vec![bid(1, 1, 100, 1), bid(3, 3, 150, 3), bid(2, 2, 150, 2)];
        sort_bids(&mut bids);
        let ids: Vec<i64> = bids.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }
}
