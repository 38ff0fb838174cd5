//! Asynchronous XIVAPI client.
//!
//! # Design
//! `XivApi` pairs the stateless `XivApiClient` builder with a `Transport`.
//! Every public method has the same shape: build the request (validation
//! errors return here, before any I/O), execute it, dispatch the response.
//! The whole sequence runs inside `timed`, and, when one was injected,
//! under the client's own `tracing::Dispatch`.

use serde_json::Value;
use tracing::instrument::WithSubscriber;
use tracing::Dispatch;
use xivapi_core::{
    dispatch, ApiError, CharacterOptions, FreeCompanyOptions, HttpRequest, IndexSearch,
    LodestoneFeed, NameSet, XivApiClient,
};

use crate::config::Config;
use crate::timing::timed;
use crate::transport::Transport;

pub type ApiResult = Result<Value, ApiError>;

/// Async client over any `Transport`, `reqwest::Client` by default.
///
/// Operations share nothing but the transport, so one `XivApi` can serve
/// any number of concurrent calls.
pub struct XivApi<T = reqwest::Client> {
    requests: XivApiClient,
    transport: T,
    logger: Option<Dispatch>,
}

impl XivApi<reqwest::Client> {
    /// Client with a fresh reqwest connection pool.
    pub fn from_config(config: &Config) -> Self {
        Self::new(reqwest::Client::new(), config)
    }
}

impl<T: Transport> XivApi<T> {
    pub fn new(transport: T, config: &Config) -> Self {
        Self {
            requests: XivApiClient::with_base_url(&config.api_key, &config.base_url),
            transport,
            logger: None,
        }
    }

    /// Route this client's logs to `subscriber` instead of whatever
    /// subscriber is current where a call is awaited.
    pub fn with_subscriber(mut self, subscriber: impl Into<Dispatch>) -> Self {
        self.logger = Some(subscriber.into());
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn call(&self, operation: &'static str, request: Result<HttpRequest, ApiError>) -> ApiResult {
        let fut = timed(operation, self.round_trip(request));
        match &self.logger {
            Some(logger) => fut.with_subscriber(logger.clone()).await,
            None => fut.await,
        }
    }

    async fn round_trip(&self, request: Result<HttpRequest, ApiError>) -> ApiResult {
        let request = request?;
        let url = request.url.clone();
        let response = self.transport.execute(request).await?;
        tracing::info!("{} from {}", response.status, url);
        dispatch(response)
    }

    /// Search the Lodestone for characters by world and full name.
    pub async fn character_search(
        &self,
        world: &str,
        forename: &str,
        surname: &str,
        page: u32,
    ) -> ApiResult {
        let req = self
            .requests
            .build_character_search(world, forename, surname, page);
        self.call("character_search", Ok(req)).await
    }

    pub async fn character_by_id(&self, lodestone_id: u64, options: &CharacterOptions) -> ApiResult {
        let req = self.requests.build_character_by_id(lodestone_id, options);
        self.call("character_by_id", req).await
    }

    pub async fn character_verify(&self, lodestone_id: u64, token: &str) -> ApiResult {
        let req = self.requests.build_character_verify(lodestone_id, token);
        self.call("character_verify", Ok(req)).await
    }

    pub async fn character_update(&self, lodestone_id: u64) -> ApiResult {
        let req = self.requests.build_character_update(lodestone_id);
        self.call("character_update", Ok(req)).await
    }

    pub async fn freecompany_search(&self, world: &str, name: &str, page: u32) -> ApiResult {
        let req = self.requests.build_freecompany_search(world, name, page);
        self.call("freecompany_search", Ok(req)).await
    }

    pub async fn freecompany_by_id(
        &self,
        lodestone_id: u64,
        options: &FreeCompanyOptions,
    ) -> ApiResult {
        let req = self.requests.build_freecompany_by_id(lodestone_id, options);
        self.call("freecompany_by_id", Ok(req)).await
    }

    pub async fn linkshell_search(&self, world: &str, name: &str, page: u32) -> ApiResult {
        let req = self.requests.build_linkshell_search(world, name, page);
        self.call("linkshell_search", Ok(req)).await
    }

    pub async fn linkshell_by_id(&self, lodestone_id: u64) -> ApiResult {
        let req = self.requests.build_linkshell_by_id(lodestone_id);
        self.call("linkshell_by_id", Ok(req)).await
    }

    pub async fn pvpteam_search(&self, world: &str, name: &str, page: u32) -> ApiResult {
        let req = self.requests.build_pvpteam_search(world, name, page);
        self.call("pvpteam_search", Ok(req)).await
    }

    pub async fn pvpteam_by_id(&self, lodestone_id: &str) -> ApiResult {
        let req = self.requests.build_pvpteam_by_id(lodestone_id);
        self.call("pvpteam_by_id", Ok(req)).await
    }

    /// Fuzzy name search over game-data indexes, e.g. `["Recipe", "Item"]`.
    pub async fn index_search(
        &self,
        query: &str,
        indexes: impl Into<NameSet>,
        columns: impl Into<NameSet>,
        options: &IndexSearch,
    ) -> ApiResult {
        let req = self
            .requests
            .build_index_search(query, indexes, columns, options);
        self.call("index_search", req).await
    }

    pub async fn index_by_id(
        &self,
        index: &str,
        content_id: u64,
        columns: impl Into<NameSet>,
        language: &str,
    ) -> ApiResult {
        let req = self
            .requests
            .build_index_by_id(index, content_id, columns, language);
        self.call("index_by_id", req).await
    }

    pub async fn lore_search(&self, query: &str, language: &str) -> ApiResult {
        let req = self.requests.build_lore_search(query, language);
        self.call("lore_search", req).await
    }

    /// Current listings and sale history on up to 15 worlds.
    pub async fn market_by_worlds<I, S>(
        &self,
        item_id: u64,
        worlds: I,
        max_history: u32,
    ) -> ApiResult
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let req = self
            .requests
            .build_market_by_worlds(item_id, worlds, max_history);
        self.call("market_by_worlds", req).await
    }

    /// Current listings and sale history on every world of a datacenter.
    pub async fn market_by_datacenter(
        &self,
        item_id: u64,
        datacenter: &str,
        max_history: u32,
    ) -> ApiResult {
        let req = self
            .requests
            .build_market_by_datacenter(item_id, datacenter, max_history);
        self.call("market_by_datacenter", req).await
    }

    pub async fn lodestone(&self, feed: LodestoneFeed) -> ApiResult {
        let req = self.requests.build_lodestone(feed);
        self.call("lodestone", Ok(req)).await
    }

    /// All Lodestone categories in one cached response; prefer this over
    /// the individual feeds.
    pub async fn lodestone_all(&self) -> ApiResult {
        self.call("lodestone_all", Ok(self.requests.build_lodestone(LodestoneFeed::All)))
            .await
    }

    pub async fn lodestone_news(&self) -> ApiResult {
        self.call("lodestone_news", Ok(self.requests.build_lodestone(LodestoneFeed::News)))
            .await
    }

    pub async fn lodestone_notices(&self) -> ApiResult {
        let req = self.requests.build_lodestone(LodestoneFeed::Notices);
        self.call("lodestone_notices", Ok(req)).await
    }

    pub async fn lodestone_maintenance(&self) -> ApiResult {
        let req = self.requests.build_lodestone(LodestoneFeed::Maintenance);
        self.call("lodestone_maintenance", Ok(req)).await
    }

    pub async fn lodestone_updates(&self) -> ApiResult {
        let req = self.requests.build_lodestone(LodestoneFeed::Updates);
        self.call("lodestone_updates", Ok(req)).await
    }

    pub async fn lodestone_worldstatus(&self) -> ApiResult {
        let req = self.requests.build_lodestone(LodestoneFeed::WorldStatus);
        self.call("lodestone_worldstatus", Ok(req)).await
    }

    pub async fn lodestone_devblog(&self) -> ApiResult {
        let req = self.requests.build_lodestone(LodestoneFeed::DevBlog);
        self.call("lodestone_devblog", Ok(req)).await
    }

    pub async fn lodestone_devposts(&self) -> ApiResult {
        let req = self.requests.build_lodestone(LodestoneFeed::DevPosts);
        self.call("lodestone_devposts", Ok(req)).await
    }

    pub async fn lodestone_deepdungeon(&self) -> ApiResult {
        let req = self.requests.build_lodestone(LodestoneFeed::DeepDungeon);
        self.call("lodestone_deepdungeon", Ok(req)).await
    }

    pub async fn lodestone_feasts(&self) -> ApiResult {
        let req = self.requests.build_lodestone(LodestoneFeed::Feasts);
        self.call("lodestone_feasts", Ok(req)).await
    }
}
