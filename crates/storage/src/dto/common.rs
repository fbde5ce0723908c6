use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    20
}

impl PaginationParams {
    pub fn validate(&self) -> Result<(), String> {
        if self.page < 1 {
            return Err("page must be >= 1".to_string());
        }
        if self.page_size < 1 || self.page_size > 100 {
            return Err("page_size must be between 1 and 100".to_string());
        }
        Ok(())
    }

    pub fn offset(&self) -> u32 {
        (self.page - 1) * self.page_size
    }

    pub fn limit(&self) -> u32 {
        self.page_size
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub page: u32,
    pub page_size: u32,
    pub total_items: i64,
    pub total_pages: u32,
}

impl PaginationMeta {
    pub fn new(page: u32, page_size: u32, total_items: i64) -> Self {
        let total_pages = ((total_items as f64) / (page_size as f64)).ceil() as u32;
        Self {
            page,
            page_size,
            total_items,
            total_pages,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, page: u32, page_size: u32, total_items: i64) -> Self {
        Self {
            data,
            pagination: PaginationMeta::new(page, page_size, total_items),
        }
    }
}

/// Distinguishes a key that is absent (`None`) from one explicitly set to
/// `null` (`Some(None)`). Pair with `#[serde(default)]`.
pub fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

pub fn decimal_to_f64(decimal: Decimal) -> f64 {
    decimal.to_string().parse().unwrap_or(0.0)
}

pub(crate) fn validate_rep_range(
    min_reps: Option<i32>,
    max_reps: Option<i32>,
) -> Result<(), validator::ValidationError> {
    if let (Some(min), Some(max)) = (min_reps, max_reps)
        && min > max
    {
        let mut error = validator::ValidationError::new("invalid_rep_range");
        error.message = Some("min_reps must not exceed max_reps".into());
        return Err(error);
    }

    Ok(())
}

/// Largest value a `NUMERIC(8, 2)` column holds
const MEASUREMENT_MAX: Decimal = Decimal::from_parts(99_999_999, 0, 0, false, 2);
const MEASUREMENT_SCALE: u32 = 2;

/// Reps and weights must fit `NUMERIC(8, 2)` exactly, without rounding.
pub(crate) fn validate_measurement(value: &Decimal) -> Result<(), validator::ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut error = validator::ValidationError::new("negative");
        error.message = Some("must not be negative".into());
        return Err(error);
    }

    if *value > MEASUREMENT_MAX {
        let mut error = validator::ValidationError::new("too_large");
        error.message = Some("must not exceed 999999.99".into());
        return Err(error);
    }

    if value.normalize().scale() > MEASUREMENT_SCALE {
        let mut error = validator::ValidationError::new("too_precise");
        error.message = Some("must have at most 2 decimal places".into());
        return Err(error);
    }

    Ok(())
}
