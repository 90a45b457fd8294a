//! DTOs for listing stored responses.

use serde::Serialize;

use super::pagination::PaginationMeta;
use crate::domain::entities::ResponseRecord;

#[derive(Debug, Serialize)]
pub struct ResponseListResponse {
    pub pagination: PaginationMeta,
    pub items: Vec<ResponseRecord>,
}
