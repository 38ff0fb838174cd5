//! Exercise `XivApi` over reqwest against the live mock server.

use std::io::Write;
use std::sync::{Arc, Mutex};

use mock_server::{MockState, DEFAULT_API_KEY, VERIFICATION_TOKEN};
use tracing_subscriber::fmt::MakeWriter;
use xivapi::{
    ApiError, CharacterOptions, Config, Filter, FreeCompanyOptions, IndexSearch, LodestoneFeed,
    NameSet, Sort, XivApi,
};

async fn start_server(state: Arc<MockState>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(mock_server::run_with_state(listener, state));
    format!("http://{addr}")
}

async fn api() -> XivApi {
    let base_url = start_server(Arc::new(MockState::default())).await;
    XivApi::from_config(&Config::new(DEFAULT_API_KEY).with_base_url(base_url))
}

/// Log sink for the injected subscriber.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Captured {
    type Writer = Captured;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

// --- lodestone ---

#[tokio::test]
async fn character_lookups() {
    let api = api().await;

    let found = api
        .character_search("Phoenix", "Lethys", "Luculentus", 1)
        .await
        .unwrap();
    assert_eq!(found["Results"][0]["Name"], "Lethys Luculentus");
    assert_eq!(found["Results"][0]["Server"], "Phoenix");

    let options = CharacterOptions {
        extended: true,
        free_company: true,
        free_company_members: true,
        ..Default::default()
    };
    let profile = api.character_by_id(730968, &options).await.unwrap();
    assert_eq!(profile["Character"]["Name"], "Lethys Luculentus");
    assert_eq!(profile["Query"]["data"], "FC,FCM");
    assert_eq!(profile["Query"]["extended"], "1");

    let verified = api
        .character_verify(730968, VERIFICATION_TOKEN)
        .await
        .unwrap();
    assert_eq!(verified["Pass"], true);

    assert_eq!(api.character_update(730968).await.unwrap(), 1);
    assert_eq!(api.character_update(2).await.unwrap_err(), ApiError::NotFound);
}

#[tokio::test]
async fn group_lookups() {
    let api = api().await;

    let fc = api.freecompany_search("Phoenix", "Moogle Mail", 1).await.unwrap();
    assert_eq!(fc["Results"][0]["Kind"], "freecompany");

    let options = FreeCompanyOptions {
        members: true,
        ..Default::default()
    };
    let fc = api.freecompany_by_id(9231253336202687179, &options).await.unwrap();
    assert_eq!(fc["Query"]["data"], "FCM");

    let ls = api.linkshell_search("Phoenix", "Moogles", 2).await.unwrap();
    assert_eq!(ls["Pagination"]["Page"], 2);
    assert!(api.linkshell_by_id(19984723346535274).await.is_ok());

    let pvp = api.pvpteam_search("Phoenix", "Wolves", 1).await.unwrap();
    assert_eq!(pvp["Results"][0]["Kind"], "pvpteam");
    let pvp = api.pvpteam_by_id("c7a8e4e6fbb5aa2a").await.unwrap();
    assert_eq!(pvp["ID"], "c7a8e4e6fbb5aa2a");
}

#[tokio::test]
async fn lodestone_feeds() {
    let api = api().await;

    let all = api.lodestone_all().await.unwrap();
    assert!(all.get("worldstatus").is_some());

    let status = api.lodestone_worldstatus().await.unwrap();
    assert_eq!(status["Feed"], "worldstatus");

    let feasts = api.lodestone(LodestoneFeed::Feasts).await.unwrap();
    assert_eq!(feasts["Feed"], "feasts");
}

// --- game data ---

#[tokio::test]
async fn index_search_round_trip() {
    let api = api().await;

    let options = IndexSearch::default()
        .string_algo("fuzzy")
        .filter(Filter::new("LevelItem", "gt", 10).unwrap())
        .sort(Sort::ascending("LevelItem"));
    let results = api
        .index_search("cider", ["Item", "Recipe", "Item"], ["ID", "Name"], &options)
        .await
        .unwrap();

    assert_eq!(results["Body"]["indexes"], "Item,Recipe");
    assert_eq!(results["Results"][0]["Name"], "Crimson Cider");
    assert_eq!(results["Results"][1]["Name"], "Cider Vinegar");
    assert_eq!(results["Query"]["language"], "en");
}

#[tokio::test]
async fn index_by_id_and_lore() {
    let api = api().await;

    let item = api.index_by_id("Item", 1675, ["ID", "Name"], "EN").await.unwrap();
    assert_eq!(item["Item"]["Name"], "Curtana");
    assert_eq!(item["Query"]["language"], "en");

    let err = api.index_by_id("Item", 9, ["ID"], "en").await.unwrap_err();
    assert_eq!(err, ApiError::NotFound);

    let lore = api.lore_search("Hydaelyn", "ja").await.unwrap();
    assert_eq!(lore["Results"][0]["Text"], "Hydaelyn");
    assert_eq!(lore["Query"]["language"], "ja");
}

#[tokio::test]
async fn market_queries() {
    let api = api().await;

    let by_worlds = api
        .market_by_worlds(4745, ["Tonberry", "Phoenix", "Tonberry"], 10)
        .await
        .unwrap();
    assert_eq!(by_worlds["Query"]["servers"], "Phoenix,Tonberry");
    assert_eq!(by_worlds["Query"]["max_history"], "10");

    let by_dc = api.market_by_datacenter(4745, "Chaos", 25).await.unwrap();
    assert_eq!(by_dc["Query"]["dc"], "Chaos");

    let sixteen: NameSet = (0..16).map(|i| format!("World{i}")).collect();
    let err = api.market_by_worlds(4745, sixteen, 25).await.unwrap_err();
    assert_eq!(err, ApiError::InvalidWorlds(16));
}

// --- errors ---

#[tokio::test]
async fn bad_key_is_forbidden() {
    let base_url = start_server(Arc::new(MockState::default())).await;
    let api = XivApi::from_config(&Config::new("wrong").with_base_url(base_url));
    assert_eq!(api.lodestone_news().await.unwrap_err(), ApiError::Forbidden);
}

#[tokio::test]
async fn server_statuses_map_to_errors() {
    let state = Arc::new(MockState::default());
    let base_url = start_server(state.clone()).await;
    let api = XivApi::from_config(&Config::new(DEFAULT_API_KEY).with_base_url(base_url));

    let cases = [
        (400, ApiError::BadRequest),
        (404, ApiError::NotFound),
        (500, ApiError::ServerError),
        (503, ApiError::ServiceUnavailable),
    ];
    for (status, expected) in cases {
        state.force_status(Some(status)).await;
        assert_eq!(api.lodestone_all().await.unwrap_err(), expected, "status {status}");
    }

    state.force_status(Some(301)).await;
    let err = api.lodestone_all().await.unwrap_err();
    assert!(matches!(err, ApiError::UnexpectedStatus { status: 301, .. }));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = XivApi::from_config(&Config::new("key").with_base_url(format!("http://{addr}")));
    let err = api.lodestone_all().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

// --- resources ---

#[tokio::test]
async fn shares_the_application_pool() {
    let base_url = start_server(Arc::new(MockState::default())).await;
    let http = reqwest::Client::new();
    let config = Config::new(DEFAULT_API_KEY).with_base_url(base_url.clone());
    let api = Arc::new(XivApi::new(http.clone(), &config));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let api = api.clone();
            tokio::spawn(async move { api.lodestone_news().await })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap()["Feed"], "news");
    }

    // The application's client is still usable after the API client is done.
    drop(api);
    let resp = http
        .get(format!("{base_url}/lodestone?private_key={DEFAULT_API_KEY}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
}

#[tokio::test]
async fn logs_go_to_the_injected_subscriber() {
    let base_url = start_server(Arc::new(MockState::default())).await;
    let logs = Captured::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .finish();

    let api = XivApi::from_config(&Config::new(DEFAULT_API_KEY).with_base_url(base_url.clone()))
        .with_subscriber(subscriber);
    api.character_search("Phoenix", "Lethys", "Luculentus", 1)
        .await
        .unwrap();
    api.lore_search("Hydaelyn", "xx").await.unwrap_err();

    let output = logs.contents();
    assert!(output.contains("character_search ran in"), "{output}");
    assert!(output.contains(&format!("200 from {base_url}/character/search")), "{output}");
    assert!(output.contains("lore_search ran in"), "{output}");
}
