//! Claim records as seen from their creator

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::user::User;

/// Maximum page size for claim listings
pub const MAX_PAGE_SIZE: u32 = 100;

/// Claim entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Claim {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub created_by_id: i64,
    /// Only filled when the `creator` join is requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[sqlx(skip)]
    pub created_by: Option<User>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Query parameters for listing claims
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListClaimsQuery {
    /// Offset into the result set
    pub start: Option<u32>,
    /// Number of items per page
    pub limit: Option<u32>,
    /// Comma separated join names
    pub joins: Option<String>,
}

impl ListClaimsQuery {
    /// Whether the caller asked for a paged (wrapped) response
    pub fn is_paged(&self) -> bool {
        self.start.is_some() || self.limit.is_some()
    }

    /// Offset and limit to apply to the query
    pub fn paging(&self) -> Paging {
        if !self.is_paged() {
            return Paging::default();
        }

        Paging {
            offset: self.start.unwrap_or(0),
            limit: self.limit.map(|l| l.clamp(1, MAX_PAGE_SIZE)),
        }
    }

    /// Whether the named join was requested
    pub fn wants_join(&self, name: &str) -> bool {
        self.joins
            .as_deref()
            .map(|joins| joins.split(',').any(|j| j.trim().eq_ignore_ascii_case(name)))
            .unwrap_or(false)
    }
}

/// Resolved offset/limit pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Paging {
    pub offset: u32,
    /// `None` means no limit
    pub limit: Option<u32>,
}

/// Wrapped claim listing with the total count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimPage {
    pub ct: i64,
    pub start: u32,
    pub limit: Option<u32>,
    pub results: Vec<Claim>,
}

/// Either a bare list or a wrapped page, depending on the query
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ClaimListing {
    List(Vec<Claim>),
    Page(ClaimPage),
}
