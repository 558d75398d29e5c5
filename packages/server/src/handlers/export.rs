use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::handlers::project::{find_owned_project, load_link_items};
use crate::models::project::ProjectComponentItem;
use crate::state::AppState;

/// Failure while rendering the CSV summary.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("csv write error: {0}")]
    Csv(#[from] csv::Error),
    #[error("csv buffer error: {0}")]
    Buffer(String),
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        AppError::Internal(err.to_string())
    }
}

#[utoipa::path(
    get,
    path = "/{id}/export",
    tag = "Export",
    operation_id = "exportProject",
    summary = "Export a project's component summary as CSV",
    description = "Returns a CSV spreadsheet with one row per linked component and a trailing TOTAL row carrying the summed quantity and total amperage. A project without components exports nothing and reads as 404.",
    params(("id" = i32, Path, description = "Project ID")),
    responses(
        (status = 200, description = "CSV attachment", body = String, content_type = "text/csv"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Project not found or has no components (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(project_id))]
pub async fn export_project(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let project = find_owned_project(&state.db, auth_user.user_id, project_id).await?;

    let items = load_link_items(&state.db, project_id).await?;
    if items.is_empty() {
        return Err(AppError::NotFound("Project has no components".into()));
    }

    let body = build_csv(&items)?;

    tracing::info!(
        project_id,
        components = items.len(),
        user_id = auth_user.user_id,
        "Exported project summary"
    );

    let headers = [
        (
            header::CONTENT_TYPE,
            "text/csv; charset=utf-8".to_string(),
        ),
        (
            header::CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"{}.csv\"",
                export_filename(&project.name)
            ),
        ),
    ];
    Ok((headers, body))
}

/// Render the component rows plus the TOTAL summary row.
fn build_csv(items: &[ProjectComponentItem]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record([
        "code",
        "brand",
        "name",
        "amperage_rating",
        "quantity",
        "total_amperage",
    ])?;

    let mut total_quantity: i64 = 0;
    let mut total_amperage: i64 = 0;
    for item in items {
        total_quantity += i64::from(item.quantity);
        total_amperage += item.total_amperage;
        writer.write_record([
            item.code.as_str(),
            item.brand.as_str(),
            item.name.as_str(),
            &item.amperage_rating.to_string(),
            &item.quantity.to_string(),
            &item.total_amperage.to_string(),
        ])?;
    }

    writer.write_record([
        "TOTAL",
        "",
        "",
        "",
        &total_quantity.to_string(),
        &total_amperage.to_string(),
    ])?;

    writer
        .into_inner()
        .map_err(|e| ExportError::Buffer(e.to_string()))
}

/// Turn a project name into a safe attachment filename stem.
fn export_filename(name: &str) -> String {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() {
        "project".to_string()
    } else {
        stem
    }
}
