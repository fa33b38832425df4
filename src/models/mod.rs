pub mod service_request;
pub mod staff;

pub use service_request::*;
pub use staff::*;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationMetadata {
    pub page: i64,
    pub per_page: i64,
    pub total_count: i64,
    pub total_pages: i64,
}

impl PaginationMetadata {
    pub fn new(page: i64, per_page: i64, total_count: i64) -> Self {
        let total_pages = if per_page > 0 {
            (total_count as f64 / per_page as f64).ceil() as i64
        } else {
            0
        };
        Self {
            page,
            per_page,
            total_count,
            total_pages,
        }
    }
}
