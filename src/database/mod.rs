use sqlx::postgres::{PgPool, PgPoolOptions};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::{info, warn};

pub struct DatabaseManager {
    pool: Arc<PgPool>,
}

impl DatabaseManager {
    /// 데이터베이스 매니저 생성
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        info!("{:<12} --> 커넥션 풀 생성 (최대 {})", "Database", max_connections);
        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// 트랜잭션 실행
    /// 클로저가 Ok 를 반환하면 커밋, Err 면 롤백
    pub async fn transaction<F, R, E>(&self, f: F) -> Result<R, E>
    where
        F: for<'c> FnOnce(
            &'c mut sqlx::Transaction<'_, sqlx::Postgres>,
        ) -> Pin<Box<dyn Future<Output = Result<R, E>> + Send + 'c>>,
        E: From<sqlx::Error>,
    {
        let mut tx = self.pool.begin().await?;
        let result = f(&mut tx).await;
        match result {
            Ok(r) => {
                tx.commit().await?;
                Ok(r)
            }
            Err(e) => {
                tx.rollback().await?;
                Err(e)
            }
        }
    }

    /// 데이터베이스 초기화
    /// reset 이면 기존 테이블을 모두 삭제 후 다시 생성한다.
    pub async fn initialize_database(&self, reset: bool) -> Result<(), sqlx::Error> {
        if reset {
            warn!("{:<12} --> 기존 테이블 삭제 후 재생성", "Database");
            let recreate_db_sql = include_str!("../sql/00-recreate-db.sql");
            self.execute_multi_query(recreate_db_sql).await?;
        }

        let create_schema_sql = include_str!("../sql/01-create-schema.sql");
        self.execute_multi_query(create_schema_sql).await?;

        Ok(())
    }

    /// 여러 쿼리 실행
    async fn execute_multi_query(&self, sql: &str) -> Result<(), sqlx::Error> {
        for query in sql.split(';') {
            let query = query.trim();
            if !query.is_empty() {
                sqlx::query(query).execute(&*self.pool).await?;
            }
        }
        Ok(())
    }

    /// 데이터베이스 풀 가져오기
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
