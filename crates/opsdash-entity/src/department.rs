//! Department entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use opsdash_core::types::id::DepartmentId;

/// A department of the enterprise. Static reference data seeded at
/// database initialization; immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Department {
    /// Unique department identifier.
    pub id: DepartmentId,
    /// Display name (e.g., "Production").
    pub name: String,
}
