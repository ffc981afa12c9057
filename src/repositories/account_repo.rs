//! Account repository for async database operations.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::{AsyncDbPool, pool_error};
use crate::error::AppResult;
use crate::models::Account;

/// Read access to the account store.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Look up an account by key. `Ok(None)` when no joined row exists.
    async fn find_account(&self, account_key: &str) -> AppResult<Option<Account>>;

    /// Cheap round trip used by the health endpoints.
    async fn ping(&self) -> AppResult<()>;
}

/// PostgreSQL implementation backed by the shared bb8 pool.
///
/// Since `AsyncDbPool` (bb8::Pool) internally uses `Arc`, cloning is cheap.
#[derive(Clone)]
pub struct DieselAccountStore {
    pool: AsyncDbPool,
}

impl DieselAccountStore {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for DieselAccountStore {
    async fn find_account(&self, account_key: &str) -> AppResult<Option<Account>> {
        use crate::schema::{accounts, settings, stats};

        let mut conn = self.pool.get().await.map_err(pool_error)?;

        // Inner join on stats: accounts without a stats row are not found.
        let account = accounts::table
            .inner_join(settings::table)
            .inner_join(stats::table)
            .filter(accounts::akey.eq(account_key))
            .select((
                accounts::akey,
                accounts::token,
                settings::email,
                settings::push,
                settings::telegram,
                settings::lng,
            ))
            .first::<Account>(&mut conn)
            .await
            .optional()?;

        Ok(account)
    }

    async fn ping(&self) -> AppResult<()> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        diesel::sql_query("SELECT 1").execute(&mut conn).await?;

        Ok(())
    }
}
