//! I/O-free request builder and response dispatcher for XIVAPI.
//!
//! # Overview
//! Builds `HttpRequest` values and dispatches `HttpResponse` values without
//! touching the network (host-does-IO pattern). The async `xivapi` crate
//! supplies the transport; tests can drive the same builders with any HTTP
//! library.
//!
//! # Design
//! - `XivApiClient` is stateless: it holds only the API key and base URL.
//! - Every `build_*` method validates its arguments first, so malformed calls
//!   fail with a specific `ApiError` before a request exists.
//! - `dispatch` is the single place HTTP statuses become errors.
//! - Named lists (indexes, columns, worlds) are `NameSet`s and deduplicate on
//!   construction.

pub mod client;
pub mod error;
pub mod http;
pub mod search;
pub mod types;

pub use client::{dispatch, XivApiClient, DEFAULT_BASE_URL, MAX_MARKET_WORLDS};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use search::{IndexSearch, SearchRequest};
pub use types::{
    CharacterOptions, Comparison, Filter, FreeCompanyOptions, Language, LodestoneFeed, NameSet,
    Sort, StringAlgo,
};
