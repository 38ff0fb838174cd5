//! Drive the core builders against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then executes built requests
//! over real HTTP using ureq and feeds the responses to `dispatch`. Validates
//! that the wire format the core produces is what the server understands.

use std::sync::Arc;

use mock_server::{MockState, DEFAULT_API_KEY};
use xivapi_core::{
    dispatch, ApiError, CharacterOptions, Filter, HttpMethod, HttpRequest, HttpResponse,
    IndexSearch, LodestoneFeed, XivApiClient,
};

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data rather than `Err`, letting `dispatch`
/// handle status interpretation.
fn execute(req: HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let url = req.full_url();
    let mut response = match (req.method, req.body) {
        (HttpMethod::Get, _) => agent.get(&url).call(),
        (HttpMethod::Post, Some(body)) => agent
            .post(&url)
            .content_type("application/json")
            .send(body.as_bytes()),
        (HttpMethod::Post, None) => agent.post(&url).send_empty(),
    }
    .expect("HTTP transport error");

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();

    HttpResponse {
        status,
        headers: Vec::new(),
        body,
    }
}

fn start_server(state: Arc<MockState>) -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run_with_state(listener, state).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

#[test]
fn lodestone_and_game_data_roundtrips() {
    let base_url = start_server(Arc::new(MockState::default()));
    let client = XivApiClient::with_base_url(DEFAULT_API_KEY, &base_url);

    // Step 1: character search, name is encoded and decoded intact.
    let req = client.build_character_search("Phoenix", "Lethys", "Luculentus", 1);
    let value = dispatch(execute(req)).unwrap();
    assert_eq!(value["Results"][0]["Name"], "Lethys Luculentus");

    // Step 2: character profile with data codes.
    let options = CharacterOptions {
        achievements: true,
        class_jobs: true,
        ..Default::default()
    };
    let req = client.build_character_by_id(730968, &options).unwrap();
    let value = dispatch(execute(req)).unwrap();
    assert_eq!(value["Character"]["ID"], 730968);
    assert_eq!(value["Query"]["data"], "AC,CJ");

    // Step 3: unknown character maps to NotFound.
    let req = client
        .build_character_by_id(1, &CharacterOptions::default())
        .unwrap();
    assert_eq!(dispatch(execute(req)).unwrap_err(), ApiError::NotFound);

    // Step 4: index search posts a body the server can read.
    let options = IndexSearch::default().filter(Filter::new("LevelItem", "gte", 1).unwrap());
    let req = client
        .build_index_search("cider", ["Item", "Item"], ["ID", "Name"], &options)
        .unwrap();
    let value = dispatch(execute(req)).unwrap();
    assert_eq!(value["Pagination"]["Results"], 2);
    assert_eq!(value["Body"]["indexes"], "Item");

    // Step 5: index by id.
    let req = client.build_index_by_id("Item", 1675, ["ID", "Name"], "en").unwrap();
    let value = dispatch(execute(req)).unwrap();
    assert_eq!(value["Item"]["Name"], "Curtana");

    // Step 6: market by worlds keeps the deduplicated list.
    let req = client
        .build_market_by_worlds(4745, ["Phoenix", "Phoenix", "Tonberry"], 5)
        .unwrap();
    let value = dispatch(execute(req)).unwrap();
    assert_eq!(value["Query"]["servers"], "Phoenix,Tonberry");

    // Step 7: every Lodestone feed resolves.
    for feed in [
        LodestoneFeed::All,
        LodestoneFeed::News,
        LodestoneFeed::Notices,
        LodestoneFeed::Maintenance,
        LodestoneFeed::Updates,
        LodestoneFeed::WorldStatus,
        LodestoneFeed::DevBlog,
        LodestoneFeed::DevPosts,
        LodestoneFeed::DeepDungeon,
        LodestoneFeed::Feasts,
    ] {
        let req = client.build_lodestone(feed);
        assert!(dispatch(execute(req)).is_ok(), "{feed:?}");
    }
}

#[test]
fn wrong_key_is_forbidden() {
    let base_url = start_server(Arc::new(MockState::default()));
    let client = XivApiClient::with_base_url("not-the-key", &base_url);

    let req = client.build_lodestone(LodestoneFeed::News);
    assert_eq!(dispatch(execute(req)).unwrap_err(), ApiError::Forbidden);
}

#[test]
fn forced_statuses_map_to_errors() {
    let state = Arc::new(MockState::default());
    let base_url = start_server(state.clone());
    let client = XivApiClient::with_base_url(DEFAULT_API_KEY, &base_url);
    let rt = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();

    let cases = [
        (400, ApiError::BadRequest),
        (500, ApiError::ServerError),
        (503, ApiError::ServiceUnavailable),
        (
            429,
            ApiError::UnexpectedStatus {
                status: 429,
                body: "forced 429".to_string(),
            },
        ),
    ];
    for (status, expected) in cases {
        rt.block_on(state.force_status(Some(status)));
        let req = client.build_linkshell_by_id(1);
        assert_eq!(dispatch(execute(req)).unwrap_err(), expected, "status {status}");
    }
}
