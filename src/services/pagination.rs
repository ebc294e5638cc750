// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sorting and page-based pagination for listings.

use crate::db::{document_to_json, FindSpec, MongoDb};
use crate::error::{AppError, Result};
use crate::models::PaginationMeta;
use mongodb::bson::{doc, Document};
use serde_json::{json, Value};

/// Page size for challenge listings.
pub const DEFAULT_CHALLENGE_LIMIT: u64 = 12;
/// Page size for blog listings.
pub const DEFAULT_BLOG_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;

/// Listing sort order. Unknown selectors fall back to `Newest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    ParticipantsDesc,
    DurationAsc,
}

impl SortOrder {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("oldest") => SortOrder::Oldest,
            Some("participants_desc") => SortOrder::ParticipantsDesc,
            Some("duration_asc") => SortOrder::DurationAsc,
            _ => SortOrder::Newest,
        }
    }

    pub fn to_document(self) -> Document {
        match self {
            SortOrder::Newest => doc! { "createdAt": -1 },
            SortOrder::Oldest => doc! { "createdAt": 1 },
            SortOrder::ParticipantsDesc => doc! { "participants": -1 },
            SortOrder::DurationAsc => doc! { "duration": 1 },
        }
    }
}

/// A validated page request (1-indexed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    /// Parse `page` and `limit` query values.
    ///
    /// Non-numeric values fall back to the defaults. Zero is rejected, and
    /// `limit` is capped at [`MAX_LIMIT`].
    pub fn parse(page: Option<&str>, limit: Option<&str>, default_limit: u64) -> Result<Self> {
        let page = page
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .unwrap_or(1);
        let limit = limit
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .unwrap_or(default_limit);

        if page < 1 {
            return Err(AppError::Validation(
                "Page must be greater than 0".to_string(),
            ));
        }
        if limit < 1 {
            return Err(AppError::Validation(
                "Limit must be greater than 0".to_string(),
            ));
        }

        Ok(Self {
            page,
            limit: limit.min(MAX_LIMIT),
        })
    }

    /// Number of records before this page.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Offset to hand to the store, or `None` when it exceeds what the store
    /// accepts. No result set is that large, so such a page is always empty.
    pub fn store_skip(&self) -> Option<u64> {
        let offset = self.offset();
        (offset <= i64::MAX as u64).then_some(offset)
    }

    /// Metadata for this page given the total number of matches.
    pub fn meta(&self, total_items: u64) -> PaginationMeta {
        PaginationMeta {
            current_page: self.page,
            total_pages: total_items.div_ceil(self.limit),
            total_items,
            items_per_page: self.limit,
        }
    }
}

/// One page of documents plus its metadata.
#[derive(Debug)]
pub struct Page {
    pub items: Vec<Document>,
    pub meta: PaginationMeta,
}

impl Page {
    /// `{<key>: [...], pagination: {...}, totalPages}`
    pub fn into_json(self, key: &str) -> Value {
        let items: Vec<Value> = self.items.into_iter().map(document_to_json).collect();
        let mut body = json!({
            "pagination": self.meta,
            "totalPages": self.meta.total_pages,
        });
        body[key] = Value::Array(items);
        body
    }
}

/// Fetch one page of `filter` matches together with the total match count.
///
/// The bounded fetch and the count are independent queries and run
/// concurrently. A page past the end yields an empty list.
pub async fn fetch_page(
    db: &MongoDb,
    collection: &str,
    filter: Document,
    sort: SortOrder,
    request: PageRequest,
) -> Result<Page> {
    let Some(skip) = request.store_skip() else {
        let total_items = db.count_documents(collection, filter).await?;
        tracing::debug!(
            collection,
            page = request.page,
            total_items,
            "Page offset out of range"
        );
        return Ok(Page {
            items: Vec::new(),
            meta: request.meta(total_items),
        });
    };

    let spec = FindSpec {
        sort: Some(sort.to_document()),
        skip: Some(skip),
        limit: Some(i64::try_from(request.limit).unwrap_or(i64::MAX)),
    };

    let (items, total_items) = tokio::try_join!(
        db.find_documents(collection, filter.clone(), spec),
        db.count_documents(collection, filter),
    )?;

    tracing::debug!(
        collection,
        page = request.page,
        limit = request.limit,
        returned = items.len(),
        total_items,
        "Fetched page"
    );

    Ok(Page {
        items,
        meta: request.meta(total_items),
    })
}
