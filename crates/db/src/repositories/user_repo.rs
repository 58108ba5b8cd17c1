//! Repository for the `users` table.

use parc_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, UpdateUser, User, UserFilter};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, password_hash, first_name, last_name, role, \
                        is_active, last_login_at, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, password_hash, first_name, last_name, role)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.role)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID. Inactive users are returned too; the
    /// caller decides what deactivation means for its flow.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-sensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List users with optional role / activity filters, newest first.
    pub async fn list(
        pool: &PgPool,
        filter: &UserFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<User>, sqlx::Error> {
        let (where_sql, next_idx) = filter_clause(filter);
        let query = format!(
            "SELECT {COLUMNS} FROM users{where_sql} \
             ORDER BY created_at DESC LIMIT ${next_idx} OFFSET ${}",
            next_idx + 1
        );
        let mut q = sqlx::query_as::<_, User>(&query);
        if let Some(role) = &filter.role {
            q = q.bind(role.clone());
        }
        if let Some(active) = filter.is_active {
            q = q.bind(active);
        }
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Count users matching the filter (for pagination envelopes).
    pub async fn count(pool: &PgPool, filter: &UserFilter) -> Result<i64, sqlx::Error> {
        let (where_sql, _) = filter_clause(filter);
        let query = format!("SELECT COUNT(*) FROM users{where_sql}");
        let mut q = sqlx::query_scalar::<_, i64>(&query);
        if let Some(role) = &filter.role {
            q = q.bind(role.clone());
        }
        if let Some(active) = filter.is_active {
            q = q.bind(active);
        }
        q.fetch_one(pool).await
    }

    /// Update a user. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                email = COALESCE($2, email),
                first_name = COALESCE($3, first_name),
                last_name = COALESCE($4, last_name),
                role = COALESCE($5, role),
                is_active = COALESCE($6, is_active),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.email)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.role)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Soft-deactivate a user by setting `is_active = false`.
    ///
    /// Returns `true` whenever the row exists; deactivating an already
    /// inactive user is a success, only absence is not-found.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE users SET is_active = false, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record a successful login.
    pub async fn record_successful_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Whether any admin account exists (operator bootstrap guard).
    pub async fn has_admin(pool: &PgPool) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE role = 'admin')")
            .fetch_one(pool)
            .await
    }
}

/// Build the WHERE clause for the list/count filters.
///
/// Returns the clause (possibly empty) and the next free placeholder index.
fn filter_clause(filter: &UserFilter) -> (String, usize) {
    let mut clauses = Vec::new();
    let mut idx = 0;
    if filter.role.is_some() {
        idx += 1;
        clauses.push(format!("role = ${idx}"));
    }
    if filter.is_active.is_some() {
        idx += 1;
        clauses.push(format!("is_active = ${idx}"));
    }
    let where_sql = if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    };
    (where_sql, idx + 1)
}
