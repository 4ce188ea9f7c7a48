//! Query executor
//!
//! Composes the base scope, compiled filter, sort plan, and size controls
//! into one read. Execution flow:
//!
//! 1. Resolve the scoped collection
//! 2. Singleton collections bypass listing and return at most one entry
//! 3. Materialize entries admitted by the scope
//! 4. Apply the compiled filter constraints
//! 5. Apply the sort plan (stable, null-last)
//! 6. Apply the size control: page overrides limit/offset; a count request
//!    short-circuits to a cardinality, respecting limit/offset first
//! 7. Assemble read models

use crate::filter::{compile, parse_filter};
use crate::schema::SchemaRegistry;
use crate::sort::{plan, sort_entries};
use crate::store::{ContentEntry, ContentStore};

use super::errors::{QueryError, QueryResult};
use super::result::EntryDocument;
use super::scope::QueryScope;

/// Default number of entries returned when no size control is requested
pub const DEFAULT_LIMIT: usize = 100;

/// Hard ceiling applied to every limit and page size
pub const MAX_LIMIT: usize = 1000;

/// Limit policy the executor consults; callers may construct their own
#[derive(Debug, Clone, Copy)]
pub struct QueryLimits {
    pub default_limit: usize,
    pub max_limit: usize,
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_limit: MAX_LIMIT,
        }
    }
}

impl QueryLimits {
    fn clamp(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.default_limit).min(self.max_limit)
    }
}

/// Page-based pagination request (1-based page index)
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    pub page: usize,
    pub per_page: usize,
}

/// One list request
#[derive(Debug, Clone, Default)]
pub struct ListRequest {
    /// Nested filter object in the query-parameter DSL shape
    pub filter: Option<serde_json::Value>,
    /// Comma-separated `field[:dir]` sort spec
    pub sort: Option<String>,
    /// Page-based pagination; overrides limit/offset when present
    pub page: Option<PageRequest>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    /// Return a cardinality instead of rows
    pub count_only: bool,
}

impl ListRequest {
    pub fn with_filter(mut self, filter: serde_json::Value) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn with_page(mut self, page: usize, per_page: usize) -> Self {
        self.page = Some(PageRequest { page, per_page });
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn count(mut self) -> Self {
        self.count_only = true;
        self
    }
}

/// Result of one list execution
#[derive(Debug)]
pub enum ListOutcome {
    Entries(ListResult),
    Count(usize),
}

impl ListOutcome {
    /// Unwraps the document list; a count outcome yields an empty slice
    pub fn documents(&self) -> &[EntryDocument] {
        match self {
            ListOutcome::Entries(result) => &result.documents,
            ListOutcome::Count(_) => &[],
        }
    }
}

/// Ordered documents plus match bookkeeping
#[derive(Debug)]
pub struct ListResult {
    pub documents: Vec<EntryDocument>,
    /// Entries matching scope + filter before the size control
    pub matched_count: usize,
    pub limit_applied: bool,
}

/// Read-side handle over the content store
pub struct ContentQuery<'a> {
    store: &'a ContentStore,
    registry: &'a SchemaRegistry,
    limits: QueryLimits,
}

impl<'a> ContentQuery<'a> {
    pub fn new(store: &'a ContentStore, registry: &'a SchemaRegistry) -> Self {
        Self {
            store,
            registry,
            limits: QueryLimits::default(),
        }
    }

    /// Overrides the limit policy, builder-style
    pub fn with_limits(mut self, limits: QueryLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Lists entries inside the scope
    pub fn list(&self, scope: &QueryScope, request: &ListRequest) -> QueryResult<ListOutcome> {
        let collection = self
            .registry
            .collection(scope.collection_id)
            .ok_or(QueryError::CollectionNotFound(scope.collection_id))?;

        // Singletons bypass listing entirely: at most one entry, filters
        // and size controls notwithstanding
        if collection.singleton {
            let documents: Vec<EntryDocument> = self
                .store
                .entries
                .iter()
                .filter(|e| scope.admits(e))
                .take(1)
                .map(|e| EntryDocument::assemble(e, collection, self.store))
                .collect();
            let matched_count = documents.len();
            return Ok(ListOutcome::Entries(ListResult {
                documents,
                matched_count,
                limit_applied: false,
            }));
        }

        let mut matched: Vec<&ContentEntry> =
            self.store.entries.iter().filter(|e| scope.admits(e)).collect();

        if let Some(filter) = &request.filter {
            let tree = parse_filter(filter);
            let compiled = compile(&tree, self.registry, scope.collection_id);
            matched.retain(|entry| compiled.constraints.matches(entry, self.store, self.registry));
        }

        if let Some(spec) = &request.sort {
            let sort_plan = plan(spec, self.registry, scope.collection_id);
            sort_entries(&mut matched, &sort_plan, self.store);
        }

        let matched_count = matched.len();

        // Count short-circuits, respecting limit/offset first
        if request.count_only {
            let offset = request.offset.unwrap_or(0).min(matched_count);
            let remaining = matched_count - offset;
            let count = match request.limit {
                Some(limit) => remaining.min(limit.min(self.limits.max_limit)),
                None => remaining,
            };
            return Ok(ListOutcome::Count(count));
        }

        // Page-based pagination overrides limit/offset
        let (offset, limit) = match request.page {
            Some(page) => {
                let per_page = self.limits.clamp(Some(page.per_page.max(1)));
                (page.page.saturating_sub(1) * per_page, per_page)
            }
            None => (
                request.offset.unwrap_or(0),
                self.limits.clamp(request.limit),
            ),
        };

        let documents: Vec<EntryDocument> = matched
            .iter()
            .skip(offset)
            .take(limit)
            .map(|e| EntryDocument::assemble(e, collection, self.store))
            .collect();

        let limit_applied = offset + documents.len() < matched_count;
        Ok(ListOutcome::Entries(ListResult {
            documents,
            matched_count,
            limit_applied,
        }))
    }

    /// Resolves one entry by numeric id or public UUID inside the scope
    pub fn single(&self, scope: &QueryScope, identifier: &str) -> QueryResult<EntryDocument> {
        let collection = self
            .registry
            .collection(scope.collection_id)
            .ok_or(QueryError::CollectionNotFound(scope.collection_id))?;

        let entry = if let Ok(id) = identifier.parse::<i64>() {
            self.store.entries.get(id)
        } else {
            match identifier.parse::<uuid::Uuid>() {
                Ok(uuid) => self.store.entries.by_uuid(Some(scope.collection_id), &uuid),
                Err(_) => None,
            }
        };

        entry
            .filter(|e| scope.admits(e))
            .map(|e| EntryDocument::assemble(e, collection, self.store))
            .ok_or_else(|| QueryError::EntryNotFound(identifier.to_string()))
    }
}
