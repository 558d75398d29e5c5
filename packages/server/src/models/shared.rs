use serde::Serialize;

use crate::error::AppError;

/// Pagination metadata included in list responses.
#[derive(Serialize, utoipa::ToSchema)]
pub struct Pagination {
    /// Current page number (1-based).
    #[schema(example = 1)]
    pub page: u64,
    /// Number of items per page.
    #[schema(example = 20)]
    pub per_page: u64,
    /// Total number of matching items across all pages.
    #[schema(example = 47)]
    pub total: u64,
    /// Total number of pages.
    #[schema(example = 3)]
    pub total_pages: u64,
}

/// Escape LIKE wildcard characters in a search string.
pub fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Validate a trimmed project name (1-100 Unicode characters).
pub fn validate_project_name(name: &str) -> Result<(), AppError> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > 100 {
        return Err(AppError::Validation(
            "Project name must be 1-100 characters".into(),
        ));
    }
    Ok(())
}

/// Validate a trimmed component code (1-50 Unicode characters).
pub fn validate_component_code(code: &str) -> Result<(), AppError> {
    let code = code.trim();
    if code.is_empty() || code.chars().count() > 50 {
        return Err(AppError::Validation(
            "Component code must be 1-50 characters".into(),
        ));
    }
    Ok(())
}

/// Validate a non-empty free-text field such as brand or component name.
pub fn validate_text_field(value: &str, field: &str) -> Result<(), AppError> {
    let value = value.trim();
    if value.is_empty() || value.chars().count() > 100 {
        return Err(AppError::Validation(format!(
            "{field} must be 1-100 characters"
        )));
    }
    Ok(())
}
