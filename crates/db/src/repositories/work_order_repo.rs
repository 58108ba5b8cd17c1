//! Repository for the `work_orders` table.

use parc_core::types::DbId;
use sqlx::PgPool;

use crate::models::work_order::{CreateWorkOrder, UpdateWorkOrder, WorkOrder, WorkOrderFilter};

/// Column list with joined display labels (site name, assignee name).
const COLUMNS: &str = "w.id, w.titre, w.description, w.statut, w.priorite, w.tdl_id, \
                        w.assigned_to, w.created_by, w.date_echeance, w.created_at, w.updated_at, \
                        t.nom AS tdl_nom, \
                        u.first_name || ' ' || u.last_name AS assigned_to_name";

/// FROM clause with the label joins.
const FROM: &str = "work_orders w \
                     LEFT JOIN tdl t ON t.id = w.tdl_id \
                     LEFT JOIN users u ON u.id = w.assigned_to";

/// Provides CRUD operations for work orders.
pub struct WorkOrderRepo;

impl WorkOrderRepo {
    /// Insert a new work order, returning the generated id.
    ///
    /// Status and priority fall back to the column defaults when absent.
    pub async fn create(pool: &PgPool, input: &CreateWorkOrder) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO work_orders
                (titre, description, statut, priorite, tdl_id, assigned_to, created_by, date_echeance)
             VALUES ($1, $2, COALESCE($3, 'ouverte'), COALESCE($4, 'normale'), $5, $6, $7, $8)
             RETURNING id",
        )
        .bind(&input.titre)
        .bind(&input.description)
        .bind(&input.statut)
        .bind(&input.priorite)
        .bind(&input.tdl_id)
        .bind(input.assigned_to)
        .bind(input.created_by)
        .bind(input.date_echeance)
        .fetch_one(pool)
        .await
    }

    /// Find a work order by id, with joined labels.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<WorkOrder>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {FROM} WHERE w.id = $1");
        sqlx::query_as::<_, WorkOrder>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List work orders matching the filter, newest first.
    pub async fn list(
        pool: &PgPool,
        filter: &WorkOrderFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<WorkOrder>, sqlx::Error> {
        let (where_sql, next_idx) = filter_clause(filter);
        let query = format!(
            "SELECT {COLUMNS} FROM {FROM}{where_sql} \
             ORDER BY w.created_at DESC LIMIT ${next_idx} OFFSET ${}",
            next_idx + 1
        );
        let mut q = sqlx::query_as::<_, WorkOrder>(&query);
        if let Some(statut) = &filter.statut {
            q = q.bind(statut.clone());
        }
        if let Some(assigned_to) = filter.assigned_to {
            q = q.bind(assigned_to);
        }
        if let Some(tdl_id) = &filter.tdl_id {
            q = q.bind(tdl_id.clone());
        }
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Count work orders matching the filter (for pagination envelopes).
    pub async fn count(pool: &PgPool, filter: &WorkOrderFilter) -> Result<i64, sqlx::Error> {
        let (where_sql, _) = filter_clause(filter);
        let query = format!("SELECT COUNT(*) FROM work_orders w{where_sql}");
        let mut q = sqlx::query_scalar::<_, i64>(&query);
        if let Some(statut) = &filter.statut {
            q = q.bind(statut.clone());
        }
        if let Some(assigned_to) = filter.assigned_to {
            q = q.bind(assigned_to);
        }
        if let Some(tdl_id) = &filter.tdl_id {
            q = q.bind(tdl_id.clone());
        }
        q.fetch_one(pool).await
    }

    /// Update a work order. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `false` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateWorkOrder,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE work_orders SET
                titre = COALESCE($2, titre),
                description = COALESCE($3, description),
                statut = COALESCE($4, statut),
                priorite = COALESCE($5, priorite),
                tdl_id = COALESCE($6, tdl_id),
                assigned_to = COALESCE($7, assigned_to),
                date_echeance = COALESCE($8, date_echeance),
                updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(&input.titre)
        .bind(&input.description)
        .bind(&input.statut)
        .bind(&input.priorite)
        .bind(&input.tdl_id)
        .bind(input.assigned_to)
        .bind(input.date_echeance)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Hard-delete a work order. Returns `false` if the row was absent.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM work_orders WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Build the WHERE clause for the list/count filters.
///
/// Returns the clause (possibly empty) and the next free placeholder index.
fn filter_clause(filter: &WorkOrderFilter) -> (String, usize) {
    let mut clauses = Vec::new();
    let mut idx = 0;
    if filter.statut.is_some() {
        idx += 1;
        clauses.push(format!("w.statut = ${idx}"));
    }
    if filter.assigned_to.is_some() {
        idx += 1;
        clauses.push(format!("w.assigned_to = ${idx}"));
    }
    if filter.tdl_id.is_some() {
        idx += 1;
        clauses.push(format!("w.tdl_id = ${idx}"));
    }
    let where_sql = if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    };
    (where_sql, idx + 1)
}
