use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr};
use sea_orm::*;
use tracing::instrument;

use crate::entity::{component, project, project_component};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::project::*;
use crate::models::shared::{Pagination, escape_like};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/",
    tag = "Projects",
    operation_id = "createProject",
    summary = "Create a new project",
    description = "Creates a project owned by the caller. Project names are unique per owner.",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Project created", body = ProjectResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 409, description = "Name already used by the caller (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(name = %payload.name))]
pub async fn create_project(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateProjectRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_project(&payload)?;

    let name = payload.name.trim().to_string();

    if project::Entity::find()
        .filter(project::Column::OwnerId.eq(auth_user.user_id))
        .filter(project::Column::Name.eq(&name))
        .one(&state.db)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "A project with this name already exists".into(),
        ));
    }

    let now = chrono::Utc::now();
    let new_project = project::ActiveModel {
        name: Set(name),
        owner_id: Set(auth_user.user_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let model = new_project
        .insert(&state.db)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                AppError::Conflict("A project with this name already exists".into())
            }
            _ => AppError::from(e),
        })?;

    Ok((StatusCode::CREATED, Json(ProjectResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Projects",
    operation_id = "listProjects",
    summary = "List the caller's projects with pagination and search",
    description = "Returns only projects owned by the caller. Supports sorting by `created_at`, `updated_at`, or `name`.",
    params(ProjectListQuery),
    responses(
        (status = 200, description = "List of projects", body = ProjectListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query))]
pub async fn list_projects(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ProjectListQuery>,
) -> Result<Json<ProjectListResponse>, AppError> {
    let page = Ord::max(query.page.unwrap_or(1), 1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);

    let mut select =
        project::Entity::find().filter(project::Column::OwnerId.eq(auth_user.user_id));

    if let Some(ref search) = query.search {
        let term = escape_like(search.trim());
        if !term.is_empty() {
            select = select.filter(
                Expr::expr(Func::lower(Expr::col(project::Column::Name)))
                    .like(LikeExpr::new(format!("%{}%", term.to_lowercase())).escape('\\')),
            );
        }
    }

    let sort_by = query.sort_by.as_deref().unwrap_or("created_at");
    let sort_order = if query.sort_order.as_deref() == Some("asc") {
        Order::Asc
    } else {
        Order::Desc
    };
    let sort_column = match sort_by {
        "created_at" => project::Column::CreatedAt,
        "updated_at" => project::Column::UpdatedAt,
        "name" => project::Column::Name,
        _ => {
            return Err(AppError::Validation(
                "sort_by must be one of: created_at, updated_at, name".into(),
            ));
        }
    };

    let total = select
        .clone()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;
    let total_pages = total.div_ceil(per_page);

    let data = select
        .order_by(sort_column, sort_order)
        .select_only()
        .column(project::Column::Id)
        .column(project::Column::Name)
        .column(project::Column::CreatedAt)
        .column(project::Column::UpdatedAt)
        .offset(Some((page - 1) * per_page))
        .limit(Some(per_page))
        .into_model::<ProjectListItem>()
        .all(&state.db)
        .await?;

    Ok(Json(ProjectListResponse {
        data,
        pagination: Pagination {
            page,
            per_page,
            total,
            total_pages,
        },
    }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Projects",
    operation_id = "getProject",
    summary = "Get a project with its component links",
    description = "Returns the project, its component links, and the quantity-weighted total amperage. Another owner's project reads as 404 to prevent enumeration.",
    params(("id" = i32, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project details", body = ProjectDetailResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Project not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn get_project(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ProjectDetailResponse>, AppError> {
    let model = find_owned_project(&state.db, auth_user.user_id, id).await?;
    let components = load_link_items(&state.db, id).await?;
    let total_amperage = components.iter().map(|c| c.total_amperage).sum();

    Ok(Json(ProjectDetailResponse {
        id: model.id,
        name: model.name,
        created_at: model.created_at,
        updated_at: model.updated_at,
        components,
        total_amperage,
    }))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Projects",
    operation_id = "updateProject",
    summary = "Rename a project",
    description = "Partially updates a project using PATCH semantics. An empty payload returns the current resource unchanged.",
    params(("id" = i32, Path, description = "Project ID")),
    request_body = UpdateProjectRequest,
    responses(
        (status = 200, description = "Project updated", body = ProjectResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Project not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Name already used by the caller (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_project(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateProjectRequest>,
) -> Result<Json<ProjectResponse>, AppError> {
    validate_update_project(&payload)?;

    if payload == UpdateProjectRequest::default() {
        let existing = find_owned_project(&state.db, auth_user.user_id, id).await?;
        return Ok(Json(existing.into()));
    }

    let txn = state.db.begin().await?;
    let existing = find_owned_project(&txn, auth_user.user_id, id).await?;

    if let Some(ref name) = payload.name {
        let name = name.trim();
        if name != existing.name {
            let dup = project::Entity::find()
                .filter(project::Column::OwnerId.eq(auth_user.user_id))
                .filter(project::Column::Name.eq(name))
                .one(&txn)
                .await?;
            if dup.is_some() {
                return Err(AppError::Conflict(
                    "A project with this name already exists".into(),
                ));
            }
        }
    }

    let mut active: project::ActiveModel = existing.into();
    if let Some(ref name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&txn).await?;
    txn.commit().await?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Projects",
    operation_id = "deleteProject",
    summary = "Delete a project",
    description = "Deletes the project and its component links. The components themselves are kept.",
    params(("id" = i32, Path, description = "Project ID")),
    responses(
        (status = 204, description = "Project deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Project not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_project(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let txn = state.db.begin().await?;
    let _project = find_owned_project(&txn, auth_user.user_id, id).await?;

    project_component::Entity::delete_many()
        .filter(project_component::Column::ProjectId.eq(id))
        .exec(&txn)
        .await?;
    project::Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/{id}/components",
    tag = "Project Components",
    operation_id = "addProjectComponent",
    summary = "Link a component into a project",
    description = "Looks the component up by `component_id` or `code` among the caller's components and links it with the given quantity (default 1). If the link already exists, quantities are merged: 201 on a new link, 200 on a merge.",
    params(("id" = i32, Path, description = "Project ID")),
    request_body = AddProjectComponentRequest,
    responses(
        (status = 200, description = "Quantity merged into the existing link", body = ProjectComponentResponse),
        (status = 201, description = "Link created", body = ProjectComponentResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Project or component not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(project_id))]
pub async fn add_project_component(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<i32>,
    AppJson(payload): AppJson<AddProjectComponentRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_add_project_component(&payload)?;
    let quantity = payload.quantity.unwrap_or(1);

    let txn = state.db.begin().await?;
    let _project = find_owned_project(&txn, auth_user.user_id, project_id).await?;

    let component_model = match (payload.component_id, payload.code.as_deref()) {
        (Some(component_id), None) => {
            component::Entity::find_by_id(component_id)
                .filter(component::Column::OwnerId.eq(auth_user.user_id))
                .one(&txn)
                .await?
        }
        (None, Some(code)) => {
            component::Entity::find()
                .filter(component::Column::OwnerId.eq(auth_user.user_id))
                .filter(component::Column::Code.eq(code.trim()))
                .one(&txn)
                .await?
        }
        _ => {
            return Err(AppError::Validation(
                "Provide exactly one of component_id and code".into(),
            ));
        }
    }
    .ok_or_else(|| AppError::NotFound("Component not found".into()))?;

    let existing = project_component::Entity::find_by_id((project_id, component_model.id))
        .one(&txn)
        .await?;

    let (status, model) = match existing {
        Some(link) => {
            let merged = link
                .quantity
                .checked_add(quantity)
                .ok_or_else(|| AppError::Validation("Quantity is out of range".into()))?;
            let mut active: project_component::ActiveModel = link.into();
            active.quantity = Set(merged);
            (StatusCode::OK, active.update(&txn).await?)
        }
        None => {
            let new_link = project_component::ActiveModel {
                project_id: Set(project_id),
                component_id: Set(component_model.id),
                quantity: Set(quantity),
            };
            (StatusCode::CREATED, new_link.insert(&txn).await?)
        }
    };
    txn.commit().await?;

    tracing::info!(
        project_id,
        component_id = component_model.id,
        quantity = model.quantity,
        "Linked component into project"
    );

    Ok((
        status,
        Json(link_response(model, &component_model)),
    ))
}

#[utoipa::path(
    get,
    path = "/{id}/components",
    tag = "Project Components",
    operation_id = "listProjectComponents",
    summary = "List a project's component links",
    description = "Returns all links with their quantities, per-link total amperage, and the project-level total.",
    params(("id" = i32, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Component links", body = ProjectComponentListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Project not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(project_id))]
pub async fn list_project_components(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<i32>,
) -> Result<Json<ProjectComponentListResponse>, AppError> {
    let _project = find_owned_project(&state.db, auth_user.user_id, project_id).await?;

    let data = load_link_items(&state.db, project_id).await?;
    let total_amperage = data.iter().map(|c| c.total_amperage).sum();

    Ok(Json(ProjectComponentListResponse {
        data,
        total_amperage,
    }))
}

#[utoipa::path(
    delete,
    path = "/{id}/components/{component_id}",
    tag = "Project Components",
    operation_id = "removeProjectComponent",
    summary = "Unlink units of a component from a project",
    description = "Without `quantity` the link is removed outright. With `quantity`, removing fewer units than linked decrements the link (200 with the updated link); removing exactly the linked amount deletes it (204); removing more fails validation.",
    params(
        ("id" = i32, Path, description = "Project ID"),
        ("component_id" = i32, Path, description = "Component ID"),
        RemoveComponentQuery,
    ),
    responses(
        (status = 200, description = "Link decremented", body = ProjectComponentResponse),
        (status = 204, description = "Link removed"),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Project or link not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(project_id, component_id))]
pub async fn remove_project_component(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((project_id, component_id)): Path<(i32, i32)>,
    Query(query): Query<RemoveComponentQuery>,
) -> Result<Response, AppError> {
    if let Some(quantity) = query.quantity
        && quantity < 1
    {
        return Err(AppError::Validation("Quantity must be at least 1".into()));
    }

    let txn = state.db.begin().await?;
    let _project = find_owned_project(&txn, auth_user.user_id, project_id).await?;

    let link = project_component::Entity::find_by_id((project_id, component_id))
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Component is not linked to this project".into()))?;

    let response = match query.quantity {
        Some(quantity) if quantity > link.quantity => {
            return Err(AppError::Validation(format!(
                "Cannot remove {} units; only {} linked",
                quantity, link.quantity
            )));
        }
        Some(quantity) if quantity < link.quantity => {
            let remaining = link.quantity - quantity;
            let mut active: project_component::ActiveModel = link.into();
            active.quantity = Set(remaining);
            let model = active.update(&txn).await?;

            let component_model = component::Entity::find_by_id(component_id)
                .one(&txn)
                .await?
                .ok_or_else(|| AppError::NotFound("Component not found".into()))?;
            (StatusCode::OK, Json(link_response(model, &component_model))).into_response()
        }
        // Exact match or no quantity given: drop the link.
        _ => {
            let active: project_component::ActiveModel = link.into();
            active.delete(&txn).await?;
            StatusCode::NO_CONTENT.into_response()
        }
    };

    txn.commit().await?;
    Ok(response)
}

pub(crate) async fn find_owned_project<C: ConnectionTrait>(
    db: &C,
    owner_id: i32,
    id: i32,
) -> Result<project::Model, AppError> {
    project::Entity::find_by_id(id)
        .filter(project::Column::OwnerId.eq(owner_id))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".into()))
}

/// Load a project's links joined with their components, ordered by code.
pub(crate) async fn load_link_items<C: ConnectionTrait>(
    db: &C,
    project_id: i32,
) -> Result<Vec<ProjectComponentItem>, AppError> {
    let rows = project_component::Entity::find()
        .filter(project_component::Column::ProjectId.eq(project_id))
        .find_also_related(component::Entity)
        .order_by_asc(project_component::Column::ComponentId)
        .all(db)
        .await?;

    let items = rows
        .into_iter()
        .filter_map(|(link, comp)| {
            comp.map(|c| ProjectComponentItem {
                component_id: link.component_id,
                total_amperage: link.total_amperage(c.amperage_rating),
                quantity: link.quantity,
                code: c.code,
                brand: c.brand,
                name: c.name,
                amperage_rating: c.amperage_rating,
            })
        })
        .collect();

    Ok(items)
}

fn link_response(
    link: project_component::Model,
    component_model: &component::Model,
) -> ProjectComponentResponse {
    ProjectComponentResponse {
        project_id: link.project_id,
        component_id: link.component_id,
        code: component_model.code.clone(),
        name: component_model.name.clone(),
        quantity: link.quantity,
        total_amperage: link.total_amperage(component_model.amperage_rating),
    }
}
