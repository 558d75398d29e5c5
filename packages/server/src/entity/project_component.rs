use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Association between a project and a component. Invariant: quantity >= 1;
/// a link whose quantity would reach zero is deleted instead.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "project_component")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub project_id: i32,
    #[sea_orm(primary_key)]
    pub component_id: i32,
    #[sea_orm(belongs_to, from = "project_id", to = "id")]
    pub project: Option<super::project::Entity>,
    #[sea_orm(belongs_to, from = "component_id", to = "id")]
    pub component: Option<super::component::Entity>,

    #[sea_orm(default_value = 1)]
    pub quantity: i32,
}

impl Model {
    /// Quantity-weighted current draw of this link, widened to avoid overflow.
    pub fn total_amperage(&self, amperage_rating: i32) -> i64 {
        i64::from(amperage_rating) * i64::from(self.quantity)
    }
}

impl ActiveModelBehavior for ActiveModel {}
