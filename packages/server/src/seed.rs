use sea_orm::*;
use sea_query::{Index, PostgresQueryBuilder};
use tracing::info;

use crate::entity::project;

/// Ensure required database indexes exist.
///
/// SeaORM's schema-sync doesn't support composite indexes, so the
/// per-owner uniqueness of project names is created manually on startup.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Backstop for the per-owner name check in the project handlers:
    // INSERT racing past the pre-check hits this unique index.
    let stmt = Index::create()
        .if_not_exists()
        .unique()
        .name("idx_project_owner_name")
        .table(project::Entity)
        .col(project::Column::OwnerId)
        .col(project::Column::Name)
        .to_string(PostgresQueryBuilder);

    match db.execute_unprepared(&stmt).await {
        Ok(_) => {
            info!("Ensured index idx_project_owner_name exists");
        }
        Err(e) => {
            tracing::warn!("Failed to create index idx_project_owner_name: {}", e);
        }
    }

    Ok(())
}
