//! Query-string parsing shared by the list endpoints.

use pagination::PageRequest;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::ports::SortSpec;
use crate::inbound::http::error::{ApiError, ApiResult};

/// Pagination and sorting parameters accepted by every list endpoint.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "snake_case")]
pub struct ListParams {
    /// 1-based page number; defaults to 1.
    pub page: Option<u32>,
    /// Records per page; defaults to 10, capped at 100.
    pub limit: Option<u32>,
    /// Field to sort by; whitelisted per resource.
    pub sort_by: Option<String>,
    /// `asc` or `desc`; defaults to `asc`.
    pub sort_order: Option<String>,
}

impl ListParams {
    /// Validated page window.
    pub fn window(&self) -> ApiResult<PageRequest> {
        Ok(PageRequest::from_params(self.page, self.limit)?)
    }

    /// Validated sort spec against the resource's field whitelist.
    ///
    /// `default_field` is used when the caller does not sort explicitly
    /// and must itself appear in `allowed`.
    pub fn sort(&self, allowed: &[&str], default_field: &str) -> ApiResult<SortSpec> {
        let field = self.sort_by.as_deref().unwrap_or(default_field);
        if !allowed.contains(&field) {
            return Err(ApiError::invalid_request(format!(
                "sort_by must be one of: {}",
                allowed.join(", ")
            )));
        }
        let ascending = match self.sort_order.as_deref() {
            None | Some("asc") => true,
            Some("desc") => false,
            Some(other) => {
                return Err(ApiError::invalid_request(format!(
                    "sort_order must be `asc` or `desc`, got `{other}`"
                )));
            }
        };
        Ok(SortSpec {
            field: field.to_owned(),
            ascending,
        })
    }
}
