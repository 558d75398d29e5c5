use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr};
use sea_orm::*;
use tracing::instrument;

use crate::entity::{component, project_component};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::component::*;
use crate::models::shared::{Pagination, escape_like};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/",
    tag = "Components",
    operation_id = "createComponent",
    summary = "Create a new component",
    description = "Creates a component owned by the caller. At least two of amperage_rating, voltage, and watts must be supplied; the third is derived.",
    request_body = CreateComponentRequest,
    responses(
        (status = 201, description = "Component created", body = ComponentResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 409, description = "Component code already in use (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(code = %payload.code))]
pub async fn create_component(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateComponentRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_component(&payload)?;
    let ratings = resolve_electrical(payload.amperage_rating, payload.voltage, payload.watts)?;

    let code = payload.code.trim().to_string();

    if component::Entity::find()
        .filter(component::Column::Code.eq(&code))
        .one(&state.db)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Component code is already in use".into()));
    }

    let new_component = component::ActiveModel {
        code: Set(code),
        brand: Set(payload.brand.trim().to_string()),
        name: Set(payload.name.trim().to_string()),
        amperage_rating: Set(ratings.amperage_rating),
        voltage: Set(ratings.voltage),
        watts: Set(ratings.watts),
        owner_id: Set(auth_user.user_id),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let model = new_component
        .insert(&state.db)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                AppError::Conflict("Component code is already in use".into())
            }
            _ => AppError::from(e),
        })?;

    Ok((StatusCode::CREATED, Json(ComponentResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Components",
    operation_id = "listComponents",
    summary = "List the caller's components with pagination and search",
    description = "Returns only components owned by the caller. Search matches code, name, or brand. Supports sorting by `created_at`, `code`, or `name`.",
    params(ComponentListQuery),
    responses(
        (status = 200, description = "List of components", body = ComponentListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query))]
pub async fn list_components(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ComponentListQuery>,
) -> Result<Json<ComponentListResponse>, AppError> {
    let page = Ord::max(query.page.unwrap_or(1), 1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);

    let mut select =
        component::Entity::find().filter(component::Column::OwnerId.eq(auth_user.user_id));

    if let Some(ref search) = query.search {
        let term = escape_like(search.trim());
        if !term.is_empty() {
            let pattern = format!("%{}%", term.to_lowercase());
            select = select.filter(
                Condition::any()
                    .add(
                        Expr::expr(Func::lower(Expr::col(component::Column::Code)))
                            .like(LikeExpr::new(pattern.clone()).escape('\\')),
                    )
                    .add(
                        Expr::expr(Func::lower(Expr::col(component::Column::Name)))
                            .like(LikeExpr::new(pattern.clone()).escape('\\')),
                    )
                    .add(
                        Expr::expr(Func::lower(Expr::col(component::Column::Brand)))
                            .like(LikeExpr::new(pattern).escape('\\')),
                    ),
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
        "created_at" => component::Column::CreatedAt,
        "code" => component::Column::Code,
        "name" => component::Column::Name,
        _ => {
            return Err(AppError::Validation(
                "sort_by must be one of: created_at, code, name".into(),
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
        .column(component::Column::Id)
        .column(component::Column::Code)
        .column(component::Column::Brand)
        .column(component::Column::Name)
        .column(component::Column::AmperageRating)
        .column(component::Column::Voltage)
        .column(component::Column::Watts)
        .column(component::Column::CreatedAt)
        .offset(Some((page - 1) * per_page))
        .limit(Some(per_page))
        .into_model::<ComponentListItem>()
        .all(&state.db)
        .await?;

    Ok(Json(ComponentListResponse {
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
    tag = "Components",
    operation_id = "getComponent",
    summary = "Get a component by ID",
    description = "Another owner's component reads as 404 to prevent enumeration.",
    params(("id" = i32, Path, description = "Component ID")),
    responses(
        (status = 200, description = "Component details", body = ComponentResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Component not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn get_component(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ComponentResponse>, AppError> {
    let model = find_owned_component(&state.db, auth_user.user_id, id).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Components",
    operation_id = "updateComponent",
    summary = "Update a component",
    description = "Partially updates a component using PATCH semantics. Touching any electrical attribute re-runs the two-of-three completion rule over the supplied attributes; the stored triple is replaced by its result.",
    params(("id" = i32, Path, description = "Component ID")),
    request_body = UpdateComponentRequest,
    responses(
        (status = 200, description = "Component updated", body = ComponentResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Component not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Component code already in use (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_component(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateComponentRequest>,
) -> Result<Json<ComponentResponse>, AppError> {
    validate_update_component(&payload)?;

    if payload == UpdateComponentRequest::default() {
        let existing = find_owned_component(&state.db, auth_user.user_id, id).await?;
        return Ok(Json(existing.into()));
    }

    let ratings = if payload.touches_electrical() {
        Some(resolve_electrical(
            payload.amperage_rating,
            payload.voltage,
            payload.watts,
        )?)
    } else {
        None
    };

    let txn = state.db.begin().await?;
    let existing = find_owned_component(&txn, auth_user.user_id, id).await?;

    if let Some(ref code) = payload.code {
        let code = code.trim();
        if code != existing.code {
            let dup = component::Entity::find()
                .filter(component::Column::Code.eq(code))
                .one(&txn)
                .await?;
            if dup.is_some() {
                return Err(AppError::Conflict("Component code is already in use".into()));
            }
        }
    }

    let mut active: component::ActiveModel = existing.into();

    if let Some(ref code) = payload.code {
        active.code = Set(code.trim().to_string());
    }
    if let Some(ref brand) = payload.brand {
        active.brand = Set(brand.trim().to_string());
    }
    if let Some(ref name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(ratings) = ratings {
        active.amperage_rating = Set(ratings.amperage_rating);
        active.voltage = Set(ratings.voltage);
        active.watts = Set(ratings.watts);
    }

    let model = active.update(&txn).await?;
    txn.commit().await?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Components",
    operation_id = "deleteComponent",
    summary = "Delete a component",
    description = "Deletion is blocked with a conflict while any project still links the component.",
    params(("id" = i32, Path, description = "Component ID")),
    responses(
        (status = 204, description = "Component deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Component not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Component has active links (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_component(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let txn = state.db.begin().await?;
    let existing = find_owned_component(&txn, auth_user.user_id, id).await?;

    let links = project_component::Entity::find()
        .filter(project_component::Column::ComponentId.eq(id))
        .count(&txn)
        .await?;
    if links > 0 {
        return Err(AppError::Conflict(
            "Component is linked to one or more projects".into(),
        ));
    }

    let active: component::ActiveModel = existing.into();
    active.delete(&txn).await?;
    txn.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn find_owned_component<C: ConnectionTrait>(
    db: &C,
    owner_id: i32,
    id: i32,
) -> Result<component::Model, AppError> {
    component::Entity::find_by_id(id)
        .filter(component::Column::OwnerId.eq(owner_id))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Component not found".into()))
}
