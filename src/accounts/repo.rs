use async_trait::async_trait;
use sqlx::PgPool;

use super::errors::{StoreError, StoreResult, UniqueField};
use super::pagination::PageRequest;
use super::repo_types::{Account, AccountProfile, NewAccount};

/// Partial unique indexes created by the migration; their names identify the
/// conflicting field when an insert or update loses a race.
const USERNAME_INDEX: &str = "users_username_live_key";
const EMAIL_INDEX: &str = "users_email_live_key";

/// Durable storage for accounts. Deleted accounts are invisible to every method.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn create(&self, account: NewAccount) -> StoreResult<Account>;
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Account>>;
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<Account>>;
    /// Overwrites the whole profile. `None` when no live account has `id`.
    async fn update(&self, id: i64, profile: AccountProfile) -> StoreResult<Option<Account>>;
    /// `false` when there was no live account to delete.
    async fn soft_delete(&self, id: i64) -> StoreResult<bool>;
    /// One page of accounts, newest first, plus the total matching count.
    async fn list(
        &self,
        page: PageRequest,
        search: Option<&str>,
    ) -> StoreResult<(Vec<Account>, i64)>;
    async fn username_taken(&self, username: &str, exclude_id: Option<i64>) -> StoreResult<bool>;
    async fn email_taken(&self, email: &str, exclude_id: Option<i64>) -> StoreResult<bool>;
}

#[derive(Clone)]
pub struct PgAccountStore {
    db: PgPool,
}

impl PgAccountStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

/// Escapes LIKE metacharacters and wraps the text for a substring match.
pub(crate) fn like_pattern(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len() + 2);
    escaped.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn map_write_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            match db_err.constraint() {
                Some(USERNAME_INDEX) => return StoreError::Conflict(UniqueField::Username),
                Some(EMAIL_INDEX) => return StoreError::Conflict(UniqueField::Email),
                _ => {}
            }
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn create(&self, account: NewAccount) -> StoreResult<Account> {
        let NewAccount {
            profile,
            password_hash,
        } = account;
        let account = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO users (username, name, email, phone, mobile, image_url,
                               password_hash, is_active, role_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, username, name, email, phone, mobile, image_url,
                      password_hash, is_active, role_id, created_at, updated_at
            "#,
        )
        .bind(&profile.username)
        .bind(&profile.name)
        .bind(profile.email())
        .bind(&profile.phone)
        .bind(&profile.mobile)
        .bind(&profile.image_url)
        .bind(&password_hash)
        .bind(profile.is_active())
        .bind(profile.role_id)
        .fetch_one(&self.db)
        .await
        .map_err(map_write_error)?;
        Ok(account)
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, username, name, email, phone, mobile, image_url,
                   password_hash, is_active, role_id, created_at, updated_at
            FROM users
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(account)
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, username, name, email, phone, mobile, image_url,
                   password_hash, is_active, role_id, created_at, updated_at
            FROM users
            WHERE username = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;
        Ok(account)
    }

    async fn update(&self, id: i64, profile: AccountProfile) -> StoreResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            UPDATE users
               SET username = $2, name = $3, email = $4, phone = $5, mobile = $6,
                   image_url = $7, is_active = $8, role_id = $9, updated_at = now()
             WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, username, name, email, phone, mobile, image_url,
                      password_hash, is_active, role_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&profile.username)
        .bind(&profile.name)
        .bind(profile.email())
        .bind(&profile.phone)
        .bind(&profile.mobile)
        .bind(&profile.image_url)
        .bind(profile.is_active())
        .bind(profile.role_id)
        .fetch_optional(&self.db)
        .await
        .map_err(map_write_error)?;
        Ok(account)
    }

    async fn soft_delete(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users
               SET deleted_at = now(), updated_at = now()
             WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .execute(&self.db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list(
        &self,
        page: PageRequest,
        search: Option<&str>,
    ) -> StoreResult<(Vec<Account>, i64)> {
        let pattern = search.map(like_pattern);

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM users
            WHERE deleted_at IS NULL
              AND ($1::text IS NULL
                   OR username ILIKE $1 OR name ILIKE $1 OR email ILIKE $1)
            "#,
        )
        .bind(pattern.as_deref())
        .fetch_one(&self.db)
        .await?;

        let rows = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, username, name, email, phone, mobile, image_url,
                   password_hash, is_active, role_id, created_at, updated_at
            FROM users
            WHERE deleted_at IS NULL
              AND ($1::text IS NULL
                   OR username ILIKE $1 OR name ILIKE $1 OR email ILIKE $1)
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(pattern.as_deref())
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.db)
        .await?;

        Ok((rows, total))
    }

    async fn username_taken(&self, username: &str, exclude_id: Option<i64>) -> StoreResult<bool> {
        let taken: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM users
                WHERE username = $1 AND deleted_at IS NULL
                  AND ($2::bigint IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(username)
        .bind(exclude_id)
        .fetch_one(&self.db)
        .await?;
        Ok(taken)
    }

    async fn email_taken(&self, email: &str, exclude_id: Option<i64>) -> StoreResult<bool> {
        let taken: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM users
                WHERE email = $1 AND deleted_at IS NULL
                  AND ($2::bigint IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(email)
        .bind(exclude_id)
        .fetch_one(&self.db)
        .await?;
        Ok(taken)
    }
}
