use chrono::{DateTime, Utc};
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};

use super::shared::{Pagination, validate_component_code, validate_text_field};
use crate::error::AppError;

/// A fully resolved set of electrical ratings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElectricalRatings {
    pub amperage_rating: i32,
    pub voltage: i32,
    pub watts: i32,
}

/// Complete a partial set of electrical attributes.
///
/// At least two of {amperage_rating, voltage, watts} must be supplied; the
/// missing one is derived with integer arithmetic (watts = amps x volts,
/// amps = watts / volts, volts = watts / amps, flooring the divisions).
/// Supplied values must be positive. When all three are supplied they are
/// kept as given.
pub fn resolve_electrical(
    amperage_rating: Option<i32>,
    voltage: Option<i32>,
    watts: Option<i32>,
) -> Result<ElectricalRatings, AppError> {
    for (value, field) in [
        (amperage_rating, "amperage_rating"),
        (voltage, "voltage"),
        (watts, "watts"),
    ] {
        if let Some(v) = value
            && v < 1
        {
            return Err(AppError::Validation(format!(
                "{field} must be a positive integer"
            )));
        }
    }

    match (amperage_rating, voltage, watts) {
        (Some(amperage_rating), Some(voltage), Some(watts)) => Ok(ElectricalRatings {
            amperage_rating,
            voltage,
            watts,
        }),
        (Some(amperage_rating), Some(voltage), None) => {
            let watts = amperage_rating.checked_mul(voltage).ok_or_else(|| {
                AppError::Validation("watts value is out of range".into())
            })?;
            Ok(ElectricalRatings {
                amperage_rating,
                voltage,
                watts,
            })
        }
        (None, Some(voltage), Some(watts)) => Ok(ElectricalRatings {
            amperage_rating: watts / voltage,
            voltage,
            watts,
        }),
        (Some(amperage_rating), None, Some(watts)) => Ok(ElectricalRatings {
            amperage_rating,
            voltage: watts / amperage_rating,
            watts,
        }),
        _ => Err(AppError::Validation(
            "Provide at least two of amperage_rating, voltage, and watts".into(),
        )),
    }
}

/// Request body for creating a component.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateComponentRequest {
    /// Unique component code (1-50 chars).
    #[schema(example = "CB-20A")]
    pub code: String,
    #[schema(example = "Siemens")]
    pub brand: String,
    #[schema(example = "20A circuit breaker")]
    pub name: String,
    /// Current rating in amperes. Derived when omitted.
    pub amperage_rating: Option<i32>,
    /// Rated voltage in volts. Derived when omitted.
    pub voltage: Option<i32>,
    /// Power rating in watts. Derived when omitted.
    pub watts: Option<i32>,
}

pub fn validate_create_component(payload: &CreateComponentRequest) -> Result<(), AppError> {
    validate_component_code(&payload.code)?;
    validate_text_field(&payload.brand, "brand")?;
    validate_text_field(&payload.name, "name")
}

/// Request body for partially updating a component.
///
/// Touching any electrical attribute re-runs the two-of-three completion
/// rule over just the supplied attributes.
#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateComponentRequest {
    pub code: Option<String>,
    pub brand: Option<String>,
    pub name: Option<String>,
    pub amperage_rating: Option<i32>,
    pub voltage: Option<i32>,
    pub watts: Option<i32>,
}

impl UpdateComponentRequest {
    pub fn touches_electrical(&self) -> bool {
        self.amperage_rating.is_some() || self.voltage.is_some() || self.watts.is_some()
    }
}

pub fn validate_update_component(payload: &UpdateComponentRequest) -> Result<(), AppError> {
    if let Some(ref code) = payload.code {
        validate_component_code(code)?;
    }
    if let Some(ref brand) = payload.brand {
        validate_text_field(brand, "brand")?;
    }
    if let Some(ref name) = payload.name {
        validate_text_field(name, "name")?;
    }
    Ok(())
}

/// Query parameters for listing components.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct ComponentListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    /// Case-insensitive substring match on code, name, or brand.
    pub search: Option<String>,
    /// One of: created_at, code, name.
    pub sort_by: Option<String>,
    /// asc or desc (default desc).
    pub sort_order: Option<String>,
}

// ---------------------------------------------------------------------------
// Response DTOs
// ---------------------------------------------------------------------------

#[derive(Serialize, utoipa::ToSchema)]
pub struct ComponentResponse {
    pub id: i32,
    pub code: String,
    pub brand: String,
    pub name: String,
    pub amperage_rating: i32,
    pub voltage: i32,
    pub watts: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, FromQueryResult, utoipa::ToSchema)]
pub struct ComponentListItem {
    pub id: i32,
    pub code: String,
    pub brand: String,
    pub name: String,
    pub amperage_rating: i32,
    pub voltage: i32,
    pub watts: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ComponentListResponse {
    pub data: Vec<ComponentListItem>,
    pub pagination: Pagination,
}

impl From<crate::entity::component::Model> for ComponentResponse {
    fn from(m: crate::entity::component::Model) -> Self {
        Self {
            id: m.id,
            code: m.code,
            brand: m.brand,
            name: m.name,
            amperage_rating: m.amperage_rating,
            voltage: m.voltage,
            watts: m.watts,
            created_at: m.created_at,
        }
    }
}
