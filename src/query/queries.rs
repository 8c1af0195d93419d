// region:    --- Accounts
/// 계정 등록
pub const INSERT_ACCOUNT: &str = r#"
    INSERT INTO accounts (name, phone, email, password_hash, role)
    VALUES ($1, $2, $3, $4, $5)
    RETURNING id, name, phone, email, password_hash, role, created_at
"#;

/// 이메일로 계정 조회
pub const GET_ACCOUNT_BY_EMAIL: &str =
    "SELECT id, name, phone, email, password_hash, role, created_at FROM accounts WHERE email = $1";

/// 모든 계정 조회
pub const GET_ALL_ACCOUNTS: &str =
    "SELECT id, name, phone, email, password_hash, role, created_at FROM accounts ORDER BY id";

/// 계정 수정 (비밀번호는 NULL 이면 유지)
pub const UPDATE_ACCOUNT: &str = r#"
    UPDATE accounts
    SET name = $1, phone = $2, email = $3, role = $4,
        password_hash = COALESCE($5, password_hash)
    WHERE id = $6
    RETURNING id, name, phone, email, password_hash, role, created_at
"#;

/// 계정 삭제 (경매, 입찰, 결제는 FK 로 연쇄 삭제)
pub const DELETE_ACCOUNT: &str = "DELETE FROM accounts WHERE id = $1";

// endregion: --- Accounts

// region:    --- Auctions
/// 경매 등록
pub const INSERT_AUCTION: &str = r#"
    INSERT INTO auctions (seller_id, name, description, category, starting_price, current_price, quantity, end_at, image_path, status, created_at)
    VALUES ($1, $2, $3, $4, $5, $5, $6, $7, $8, 'active', $9)
    RETURNING id, seller_id, name, description, category, starting_price, current_price, quantity, end_at, image_path, status, created_at
"#;

/// 경매 조회
pub const GET_AUCTION: &str = "SELECT id, seller_id, name, description, category, starting_price, current_price, quantity, end_at, image_path, status, created_at FROM auctions WHERE id = $1";

/// 경매 목록 조회 (조건은 QueryBuilder 로 추가)
pub const SELECT_AUCTIONS: &str = "SELECT id, seller_id, name, description, category, starting_price, current_price, quantity, end_at, image_path, status, created_at FROM auctions WHERE TRUE";

/// 전체 경매 조회 (관리자, 판매자 이름 포함)
pub const GET_ALL_AUCTIONS: &str = r#"
    SELECT a.id, a.seller_id, a.name, a.description, a.category, a.starting_price, a.current_price,
           a.quantity, a.end_at, a.image_path, a.status, a.created_at, u.name AS seller_name
    FROM auctions a
    JOIN accounts u ON a.seller_id = u.id
    ORDER BY a.created_at DESC, a.id DESC
"#;

/// 경매 삭제 (입찰, 결제는 FK 로 연쇄 삭제)
pub const DELETE_AUCTION: &str = "DELETE FROM auctions WHERE id = $1";

/// 현재 가격 갱신 (조건부 업데이트)
pub const RAISE_CURRENT_PRICE: &str = r#"
    UPDATE auctions SET current_price = $1
    WHERE id = $2 AND current_price < $1 AND status = 'active' AND end_at > $3
    RETURNING id
"#;

/// 낙찰 처리 (조건부 업데이트)
pub const MARK_AUCTION_SOLD: &str = r#"
    UPDATE auctions SET status = 'sold'
    WHERE id = $1 AND status = 'active' AND end_at <= $2
    RETURNING id
"#;

// endregion: --- Auctions

// region:    --- Bids
/// 입찰 기록
pub const INSERT_BID: &str = r#"
    INSERT INTO bids (auction_id, user_id, amount, created_at)
    VALUES ($1, $2, $3, $4)
    RETURNING id, auction_id, user_id, amount, created_at
"#;

/// 입찰 이력 조회
pub const GET_AUCTION_BIDS: &str = r#"
    SELECT id, auction_id, user_id, amount, created_at
    FROM bids
    WHERE auction_id = $1
    ORDER BY amount DESC, created_at ASC, id ASC
"#;

/// 전체 입찰 조회 (관리자, 입찰자와 경매 이름 포함)
pub const GET_ALL_BIDS: &str = r#"
    SELECT b.id, b.auction_id, b.user_id, b.amount, b.created_at,
           u.name AS user_name, a.name AS auction_name
    FROM bids b
    JOIN accounts u ON b.user_id = u.id
    JOIN auctions a ON b.auction_id = a.id
    ORDER BY b.created_at DESC, b.id DESC
"#;

/// 입찰 삭제
pub const DELETE_BID: &str = "DELETE FROM bids WHERE id = $1";

// endregion: --- Bids

// region:    --- Payments
/// 결제 기록
pub const INSERT_PAYMENT: &str = r#"
    INSERT INTO transactions (auction_id, user_id, amount, method, status, created_at)
    VALUES ($1, $2, $3, $4, 'completed', $5)
    RETURNING id, auction_id, user_id, amount, method, status, created_at
"#;

/// 경매 결제 조회
pub const GET_AUCTION_PAYMENTS: &str = r#"
    SELECT id, auction_id, user_id, amount, method, status, created_at
    FROM transactions
    WHERE auction_id = $1
    ORDER BY id
"#;

// endregion: --- Payments
