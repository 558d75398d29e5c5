use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// An electrical component. The three ratings are stored fully resolved:
/// creation and update derive whichever of {amperage_rating, voltage, watts}
/// the client omitted (see `models::component::resolve_electrical`).
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "component")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub code: String,
    pub brand: String,
    pub name: String,

    pub amperage_rating: i32,
    pub voltage: i32,
    pub watts: i32,

    pub owner_id: i32,
    #[sea_orm(belongs_to, from = "owner_id", to = "id")]
    pub owner: HasOne<super::user::Entity>,

    #[sea_orm(has_many, via = "project_component")]
    pub projects: HasMany<super::project::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
