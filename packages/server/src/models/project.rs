use chrono::{DateTime, Utc};
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};

use super::shared::{Pagination, validate_project_name};
use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateProjectRequest {
    /// Project name, unique among the caller's projects.
    #[schema(example = "Garage wiring")]
    pub name: String,
}

pub fn validate_create_project(payload: &CreateProjectRequest) -> Result<(), AppError> {
    validate_project_name(&payload.name)
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
}

pub fn validate_update_project(payload: &UpdateProjectRequest) -> Result<(), AppError> {
    if let Some(ref name) = payload.name {
        validate_project_name(name)?;
    }
    Ok(())
}

/// Request body for linking a component into a project.
///
/// Exactly one of `component_id` and `code` identifies the component.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct AddProjectComponentRequest {
    pub component_id: Option<i32>,
    #[schema(example = "CB-20A")]
    pub code: Option<String>,
    /// Units to add; defaults to 1.
    pub quantity: Option<i32>,
}

pub fn validate_add_project_component(
    payload: &AddProjectComponentRequest,
) -> Result<(), AppError> {
    match (payload.component_id, payload.code.as_deref()) {
        (Some(_), None) => {}
        (None, Some(code)) if !code.trim().is_empty() => {}
        _ => {
            return Err(AppError::Validation(
                "Provide exactly one of component_id and code".into(),
            ));
        }
    }
    if let Some(quantity) = payload.quantity
        && quantity < 1
    {
        return Err(AppError::Validation("Quantity must be at least 1".into()));
    }
    Ok(())
}

/// Query parameters for unlinking units of a component.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct RemoveComponentQuery {
    /// Units to remove. Omitted: the whole link is removed.
    pub quantity: Option<i32>,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct ProjectListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    /// Case-insensitive substring match on the project name.
    pub search: Option<String>,
    /// One of: created_at, updated_at, name.
    pub sort_by: Option<String>,
    /// asc or desc (default desc).
    pub sort_order: Option<String>,
}

// ---------------------------------------------------------------------------
// Response DTOs
// ---------------------------------------------------------------------------

#[derive(Serialize, utoipa::ToSchema)]
pub struct ProjectResponse {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<crate::entity::project::Model> for ProjectResponse {
    fn from(m: crate::entity::project::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Serialize, FromQueryResult, utoipa::ToSchema)]
pub struct ProjectListItem {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ProjectListResponse {
    pub data: Vec<ProjectListItem>,
    pub pagination: Pagination,
}

/// One component link inside a project.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ProjectComponentItem {
    pub component_id: i32,
    pub code: String,
    pub brand: String,
    pub name: String,
    pub amperage_rating: i32,
    pub quantity: i32,
    /// amperage_rating x quantity.
    pub total_amperage: i64,
}

/// Project detail including its component links and derived total.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ProjectDetailResponse {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub components: Vec<ProjectComponentItem>,
    /// Quantity-weighted sum of component current ratings.
    pub total_amperage: i64,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ProjectComponentListResponse {
    pub data: Vec<ProjectComponentItem>,
    pub total_amperage: i64,
}

/// Result of an add or partial-remove on a single link.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ProjectComponentResponse {
    pub project_id: i32,
    pub component_id: i32,
    pub code: String,
    pub name: String,
    pub quantity: i32,
    pub total_amperage: i64,
}
