//! Index search: argument validation and query body construction.
//!
//! XIVAPI's `/search` endpoint takes an Elasticsearch-style body. The query
//! is a boolean OR over the four localized `NameCombined_*` fields, every
//! filter becomes a required numeric range clause, and an optional sort
//! appends a single-field order.

use serde_json::{json, Map, Value};

use crate::error::ApiError;
use crate::types::{Filter, Language, NameSet, Sort, StringAlgo};

/// Localized name fields searched by index search, in the order XIVAPI
/// expects them.
pub const NAME_FIELDS: [&str; 4] = [
    "NameCombined_en",
    "NameCombined_de",
    "NameCombined_fr",
    "NameCombined_ja",
];

const FUZZINESS: &str = "AUTO";
const PREFIX_LENGTH: u32 = 1;
const MAX_EXPANSIONS: u32 = 50;

/// Caller-facing options for `build_index_search`.
///
/// Language and algorithm stay raw strings here so an unknown code surfaces
/// as a typed error from the builder, not at struct construction.
#[derive(Debug, Clone)]
pub struct IndexSearch {
    pub filters: Vec<Filter>,
    pub sort: Option<Sort>,
    pub language: String,
    pub string_algo: String,
    pub page: u32,
}

impl Default for IndexSearch {
    fn default() -> Self {
        Self {
            filters: Vec::new(),
            sort: None,
            language: Language::En.as_str().to_string(),
            string_algo: StringAlgo::Match.as_str().to_string(),
            page: 1,
        }
    }
}

impl IndexSearch {
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn string_algo(mut self, string_algo: impl Into<String>) -> Self {
        self.string_algo = string_algo.into();
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }
}

/// A validated index search, ready to render as a request body.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: String,
    pub indexes: NameSet,
    pub columns: NameSet,
    pub filters: Vec<Filter>,
    pub sort: Option<Sort>,
    pub language: Language,
    pub string_algo: StringAlgo,
    pub page: u32,
}

impl SearchRequest {
    /// Validate in the order the checks are documented: indexes, language,
    /// columns, algorithm.
    pub fn new(
        query: &str,
        indexes: NameSet,
        columns: NameSet,
        options: &IndexSearch,
    ) -> Result<Self, ApiError> {
        if indexes.is_empty() {
            return Err(ApiError::InvalidIndex);
        }
        let language: Language = options.language.parse()?;
        if columns.is_empty() {
            return Err(ApiError::InvalidColumns);
        }
        let string_algo: StringAlgo = options.string_algo.parse()?;

        Ok(Self {
            query: query.to_string(),
            indexes,
            columns,
            filters: options.filters.clone(),
            sort: options.sort.clone(),
            language,
            string_algo,
            page: options.page,
        })
    }

    /// Render the JSON body for `POST /search`.
    pub fn body(&self) -> Value {
        let should: Vec<Value> = NAME_FIELDS
            .iter()
            .map(|field| self.name_clause(field))
            .collect();

        let mut bool_query = Map::new();
        bool_query.insert("should".to_string(), Value::Array(should));
        if !self.filters.is_empty() {
            let filters = self.filters.iter().map(range_clause).collect();
            bool_query.insert("filter".to_string(), Value::Array(filters));
        }

        let mut body = Map::new();
        body.insert("query".to_string(), json!({ "bool": bool_query }));
        if let Some(sort) = &self.sort {
            let order = if sort.is_ascending() { "asc" } else { "desc" };
            body.insert("sort".to_string(), json!([{ sort.field(): order }]));
        }

        json!({
            "indexes": self.indexes.join(),
            "columns": self.columns.join(),
            "body": body,
        })
    }

    fn name_clause(&self, field: &str) -> Value {
        json!({
            self.string_algo.as_str(): {
                field: {
                    "query": self.query,
                    "fuzziness": FUZZINESS,
                    "prefix_length": PREFIX_LENGTH,
                    "max_expansions": MAX_EXPANSIONS,
                }
            }
        })
    }
}

fn range_clause(filter: &Filter) -> Value {
    json!({
        "range": {
            filter.field(): { filter.comparison().as_str(): filter.value() }
        }
    })
}
