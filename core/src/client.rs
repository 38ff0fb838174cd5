//! Stateless HTTP request builder and response dispatcher for XIVAPI.
//!
//! # Design
//! `XivApiClient` holds only the API key and base URL and carries no mutable
//! state between calls. Each endpoint has a `build_*` method that validates
//! its arguments and produces an `HttpRequest`; every response goes through
//! the single `dispatch` function. The caller executes the HTTP round-trip
//! in between, keeping this crate deterministic and free of I/O.

use serde_json::Value;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::search::{IndexSearch, SearchRequest};
use crate::types::{CharacterOptions, FreeCompanyOptions, Language, LodestoneFeed, NameSet};

pub const DEFAULT_BASE_URL: &str = "https://xivapi.com";

/// Market queries accept at most this many worlds.
pub const MAX_MARKET_WORLDS: usize = 15;

/// Synchronous, stateless request builder for XIVAPI.
#[derive(Debug, Clone)]
pub struct XivApiClient {
    base_url: String,
    api_key: String,
}

impl XivApiClient {
    pub fn new(api_key: &str) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: &str, base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get(&self, path: &str) -> HttpRequest {
        HttpRequest::get(format!("{}/{path}", self.base_url)).param("private_key", &self.api_key)
    }

    fn lodestone_search(&self, kind: &str, world: &str, name: &str, page: u32) -> HttpRequest {
        self.get(&format!("{kind}/search"))
            .param("name", name)
            .param("server", world)
            .param("page", page)
    }

    pub fn build_character_search(
        &self,
        world: &str,
        forename: &str,
        surname: &str,
        page: u32,
    ) -> HttpRequest {
        self.lodestone_search("character", world, &format!("{forename} {surname}"), page)
    }

    pub fn build_character_by_id(
        &self,
        lodestone_id: u64,
        options: &CharacterOptions,
    ) -> Result<HttpRequest, ApiError> {
        let language: Language = options.language.parse()?;
        let mut req = self
            .get(&format!("character/{lodestone_id}"))
            .param("language", language);
        if options.extended {
            req = req.param("extended", 1);
        }
        let data = options.data_codes();
        if !data.is_empty() {
            req = req.param("data", data.join(","));
        }
        Ok(req)
    }

    /// Check whether `token` appears on the character's Lodestone profile.
    pub fn build_character_verify(&self, lodestone_id: u64, token: &str) -> HttpRequest {
        self.get(&format!("character/{lodestone_id}/verification"))
            .param("token", token)
    }

    /// Ask XIVAPI to refresh a character as soon as possible.
    pub fn build_character_update(&self, lodestone_id: u64) -> HttpRequest {
        self.get(&format!("character/{lodestone_id}/update"))
    }

    pub fn build_freecompany_search(&self, world: &str, name: &str, page: u32) -> HttpRequest {
        self.lodestone_search("freecompany", world, name, page)
    }

    pub fn build_freecompany_by_id(
        &self,
        lodestone_id: u64,
        options: &FreeCompanyOptions,
    ) -> HttpRequest {
        let mut req = self.get(&format!("freecompany/{lodestone_id}"));
        if options.extended {
            req = req.param("extended", 1);
        }
        if options.members {
            req = req.param("data", "FCM");
        }
        req
    }

    pub fn build_linkshell_search(&self, world: &str, name: &str, page: u32) -> HttpRequest {
        self.lodestone_search("linkshell", world, name, page)
    }

    pub fn build_linkshell_by_id(&self, lodestone_id: u64) -> HttpRequest {
        self.get(&format!("linkshell/{lodestone_id}"))
    }

    pub fn build_pvpteam_search(&self, world: &str, name: &str, page: u32) -> HttpRequest {
        self.lodestone_search("pvpteam", world, name, page)
    }

    /// PvP team ids on the Lodestone are hex strings, not integers.
    pub fn build_pvpteam_by_id(&self, lodestone_id: &str) -> HttpRequest {
        self.get(&format!("pvpteam/{lodestone_id}"))
    }

    /// Fuzzy text search across one or more game-data indexes.
    pub fn build_index_search(
        &self,
        query: &str,
        indexes: impl Into<NameSet>,
        columns: impl Into<NameSet>,
        options: &IndexSearch,
    ) -> Result<HttpRequest, ApiError> {
        let search = SearchRequest::new(query, indexes.into(), columns.into(), options)?;
        let body = serde_json::to_string(&search.body())?;
        Ok(
            HttpRequest::post_json(format!("{}/search", self.base_url), body)
                .param("language", search.language)
                .param("private_key", &self.api_key)
                .param("page", search.page),
        )
    }

    pub fn build_index_by_id(
        &self,
        index: &str,
        content_id: u64,
        columns: impl Into<NameSet>,
        language: &str,
    ) -> Result<HttpRequest, ApiError> {
        // The name becomes a path segment.
        if index.is_empty() || index.contains(&['/', '?', '#'][..]) {
            return Err(ApiError::InvalidIndex);
        }
        let columns = columns.into();
        if columns.is_empty() {
            return Err(ApiError::InvalidColumns);
        }
        let language: Language = language.parse()?;
        Ok(self
            .get(&format!("{index}/{content_id}"))
            .param("language", language)
            .param("columns", columns.join()))
    }

    /// Search cutscene subtitles, quest dialog and item, achievement, mount
    /// and minion descriptions.
    pub fn build_lore_search(&self, query: &str, language: &str) -> Result<HttpRequest, ApiError> {
        let language: Language = language.parse()?;
        Ok(self
            .get("lore")
            .param("language", language)
            .param("string", query))
    }

    /// The 1..=15 limit applies to the names as given, before duplicates
    /// collapse.
    pub fn build_market_by_worlds<I, S>(
        &self,
        item_id: u64,
        worlds: I,
        max_history: u32,
    ) -> Result<HttpRequest, ApiError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let worlds: Vec<String> = worlds.into_iter().map(Into::into).collect();
        if worlds.is_empty() || worlds.len() > MAX_MARKET_WORLDS {
            return Err(ApiError::InvalidWorlds(worlds.len()));
        }
        let worlds: NameSet = worlds.into_iter().collect();
        Ok(self
            .get(&format!("market/item/{item_id}"))
            .param("servers", worlds.join())
            .param("max_history", max_history))
    }

    pub fn build_market_by_datacenter(
        &self,
        item_id: u64,
        datacenter: &str,
        max_history: u32,
    ) -> Result<HttpRequest, ApiError> {
        if datacenter.is_empty() {
            return Err(ApiError::InvalidDatacenter);
        }
        Ok(self
            .get(&format!("market/item/{item_id}"))
            .param("dc", datacenter)
            .param("max_history", max_history))
    }

    pub fn build_lodestone(&self, feed: LodestoneFeed) -> HttpRequest {
        self.get(feed.path())
    }
}

/// Map a response to its JSON payload or the matching `ApiError`.
///
/// 500 is a plain server error; Lodestone maintenance surfaces as 503.
pub fn dispatch(response: HttpResponse) -> Result<Value, ApiError> {
    match response.status {
        200 => serde_json::from_str(&response.body)
            .map_err(|e| ApiError::Deserialization(e.to_string())),
        400 => Err(ApiError::BadRequest),
        401 => Err(ApiError::Forbidden),
        404 => Err(ApiError::NotFound),
        500 => Err(ApiError::ServerError),
        503 => Err(ApiError::ServiceUnavailable),
        status => Err(ApiError::UnexpectedStatus {
            status,
            body: response.body,
        }),
    }
}
