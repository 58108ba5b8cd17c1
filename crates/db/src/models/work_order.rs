//! Work order model and DTOs.

use chrono::NaiveDate;
use parc_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Allowed work order statuses. Must match the table CHECK constraint.
pub const STATUTS: &[&str] = &["ouverte", "en_cours", "terminee", "annulee"];

/// Allowed work order priorities. Must match the table CHECK constraint.
pub const PRIORITES: &[&str] = &["basse", "normale", "haute", "critique"];

/// Work order row with joined display labels (site name, assignee name).
///
/// Every repository query selects the joined columns, so `FromRow` can
/// always populate them.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkOrder {
    pub id: DbId,
    pub titre: String,
    pub description: Option<String>,
    pub statut: String,
    pub priorite: String,
    pub tdl_id: Option<String>,
    pub assigned_to: Option<DbId>,
    pub created_by: DbId,
    pub date_echeance: Option<NaiveDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Site name resolved from `tdl_id`.
    pub tdl_nom: Option<String>,
    /// Assignee full name resolved from `assigned_to`.
    pub assigned_to_name: Option<String>,
}

/// DTO for creating a work order. `created_by` is set by the server from
/// the authenticated caller, never from the request body.
#[derive(Debug)]
pub struct CreateWorkOrder {
    pub titre: String,
    pub description: Option<String>,
    pub statut: Option<String>,
    pub priorite: Option<String>,
    pub tdl_id: Option<String>,
    pub assigned_to: Option<DbId>,
    pub created_by: DbId,
    pub date_echeance: Option<NaiveDate>,
}

/// DTO for updating a work order. Only non-`None` fields are applied.
#[derive(Debug, Default)]
pub struct UpdateWorkOrder {
    pub titre: Option<String>,
    pub description: Option<String>,
    pub statut: Option<String>,
    pub priorite: Option<String>,
    pub tdl_id: Option<String>,
    pub assigned_to: Option<DbId>,
    pub date_echeance: Option<NaiveDate>,
}

/// Filters for the work order list endpoint.
#[derive(Debug, Default)]
pub struct WorkOrderFilter {
    pub statut: Option<String>,
    pub assigned_to: Option<DbId>,
    pub tdl_id: Option<String>,
}
