use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub const DEFAULT_API_KEY: &str = "test-key";

/// Token a character must carry on its profile for verification to pass.
pub const VERIFICATION_TOKEN: &str = "XIV-OK";

const LODESTONE_FEEDS: [&str; 9] = [
    "news",
    "notices",
    "maintenance",
    "updates",
    "worldstatus",
    "devblog",
    "devposts",
    "deepdungeon",
    "feasts",
];

pub type Params = HashMap<String, String>;

/// Fixture data plus knobs tests can turn.
pub struct MockState {
    api_key: String,
    forced_status: RwLock<Option<u16>>,
    characters: HashMap<u64, Value>,
    items: HashMap<u64, Value>,
}

pub type Db = Arc<MockState>;

impl MockState {
    pub fn new(api_key: &str) -> Self {
        let characters = HashMap::from([(
            730968,
            json!({ "ID": 730968, "Name": "Lethys Luculentus", "Server": "Phoenix" }),
        )]);
        let items = HashMap::from([
            (1675, json!({ "ID": 1675, "Name": "Curtana", "LevelItem": 50 })),
            (4745, json!({ "ID": 4745, "Name": "Crimson Cider", "LevelItem": 20 })),
            (4746, json!({ "ID": 4746, "Name": "Cider Vinegar", "LevelItem": 35 })),
        ]);
        Self {
            api_key: api_key.to_string(),
            forced_status: RwLock::new(None),
            characters,
            items,
        }
    }

    /// Make every subsequent request answer with `status` (or clear it).
    pub async fn force_status(&self, status: Option<u16>) {
        *self.forced_status.write().await = status;
    }
}

impl Default for MockState {
    fn default() -> Self {
        Self::new(DEFAULT_API_KEY)
    }
}

pub fn app() -> Router {
    app_with_state(Arc::new(MockState::default()))
}

pub fn app_with_state(db: Db) -> Router {
    Router::new()
        .route("/character/search", get(character_search))
        .route("/freecompany/search", get(freecompany_search))
        .route("/linkshell/search", get(linkshell_search))
        .route("/pvpteam/search", get(pvpteam_search))
        .route("/character/{id}", get(character_by_id))
        .route("/character/{id}/verification", get(character_verify))
        .route("/character/{id}/update", get(character_update))
        .route("/freecompany/{id}", get(profile_by_id))
        .route("/linkshell/{id}", get(profile_by_id))
        .route("/pvpteam/{id}", get(profile_by_id))
        .route("/search", post(index_search))
        .route("/lore", get(lore_search))
        .route("/market/item/{id}", get(market))
        .route("/lodestone", get(lodestone_all))
        .route("/lodestone/{id}", get(lodestone_feed))
        .route("/{index}/{id}", get(index_by_id))
        .layer(middleware::from_fn_with_state(db.clone(), guard))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_state(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(db)).await
}

/// Applies a forced status, then checks `private_key`.
async fn guard(
    State(db): State<Db>,
    Query(params): Query<Params>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(status) = *db.forced_status.read().await {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (status, format!("forced {}", status.as_u16())).into_response();
    }
    if params.get("private_key") != Some(&db.api_key) {
        return (StatusCode::UNAUTHORIZED, "invalid private_key").into_response();
    }
    next.run(request).await
}

/// Request parameters minus the key, echoed back so clients can assert on
/// what they sent.
fn echo(params: &Params) -> Value {
    let echoed: serde_json::Map<String, Value> = params
        .iter()
        .filter(|(k, _)| k.as_str() != "private_key")
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect();
    Value::Object(echoed)
}

fn page(params: &Params) -> u64 {
    params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1)
}

fn lodestone_search(kind: &str, params: &Params) -> Json<Value> {
    let name = params.get("name").cloned().unwrap_or_default();
    let server = params.get("server").cloned().unwrap_or_default();
    Json(json!({
        "Pagination": { "Page": page(params) },
        "Results": [{ "Kind": kind, "Name": name, "Server": server }],
        "Query": echo(params),
    }))
}

async fn character_search(Query(params): Query<Params>) -> Json<Value> {
    lodestone_search("character", &params)
}

async fn freecompany_search(Query(params): Query<Params>) -> Json<Value> {
    lodestone_search("freecompany", &params)
}

async fn linkshell_search(Query(params): Query<Params>) -> Json<Value> {
    lodestone_search("linkshell", &params)
}

async fn pvpteam_search(Query(params): Query<Params>) -> Json<Value> {
    lodestone_search("pvpteam", &params)
}

async fn character_by_id(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Query(params): Query<Params>,
) -> Result<Json<Value>, StatusCode> {
    let character = db.characters.get(&id).cloned().ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(json!({ "Character": character, "Query": echo(&params) })))
}

async fn character_verify(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Query(params): Query<Params>,
) -> Result<Json<Value>, StatusCode> {
    if !db.characters.contains_key(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    let pass = params.get("token").map(String::as_str) == Some(VERIFICATION_TOKEN);
    Ok(Json(json!({ "ID": id, "Pass": pass })))
}

async fn character_update(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Value>, StatusCode> {
    if db.characters.contains_key(&id) {
        Ok(Json(json!(1)))
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}

async fn profile_by_id(Path(id): Path<String>, Query(params): Query<Params>) -> Json<Value> {
    Json(json!({ "ID": id, "Query": echo(&params) }))
}

/// Matches item names against the English clause of the bool query.
async fn index_search(
    State(db): State<Db>,
    Query(params): Query<Params>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let indexes = body["indexes"].as_str().ok_or(StatusCode::BAD_REQUEST)?;
    let query = body["body"]["query"]["bool"]["should"][0]
        .as_object()
        .and_then(|clause| clause.values().next())
        .and_then(|fields| fields["NameCombined_en"]["query"].as_str())
        .ok_or(StatusCode::BAD_REQUEST)?
        .to_lowercase();

    let mut results: Vec<Value> = if indexes.split(',').any(|i| i == "Item") {
        db.items
            .values()
            .filter(|item| {
                item["Name"]
                    .as_str()
                    .is_some_and(|name| name.to_lowercase().contains(&query))
            })
            .cloned()
            .collect()
    } else {
        Vec::new()
    };
    results.sort_by_key(|item| item["ID"].as_u64());

    Ok(Json(json!({
        "Pagination": { "Page": page(&params), "Results": results.len() },
        "Results": results,
        "Query": echo(&params),
        "Body": body,
    })))
}

async fn index_by_id(
    State(db): State<Db>,
    Path((index, id)): Path<(String, u64)>,
    Query(params): Query<Params>,
) -> Result<Json<Value>, StatusCode> {
    if index != "Item" {
        return Err(StatusCode::NOT_FOUND);
    }
    let item = db.items.get(&id).cloned().ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(json!({ "Item": item, "Query": echo(&params) })))
}

async fn lore_search(Query(params): Query<Params>) -> Json<Value> {
    let text = params.get("string").cloned().unwrap_or_default();
    Json(json!({ "Results": [{ "Text": text }], "Query": echo(&params) }))
}

async fn market(Path(id): Path<u64>, Query(params): Query<Params>) -> Result<Json<Value>, StatusCode> {
    if !params.contains_key("servers") && !params.contains_key("dc") {
        return Err(StatusCode::BAD_REQUEST);
    }
    Ok(Json(json!({ "ItemID": id, "Query": echo(&params) })))
}

async fn lodestone_all() -> Json<Value> {
    let feeds: serde_json::Map<String, Value> = LODESTONE_FEEDS
        .iter()
        .map(|feed| (feed.to_string(), json!([])))
        .collect();
    Json(Value::Object(feeds))
}

async fn lodestone_feed(Path(feed): Path<String>) -> Result<Json<Value>, StatusCode> {
    if LODESTONE_FEEDS.contains(&feed.as_str()) {
        Ok(Json(json!({ "Feed": feed, "Posts": [] })))
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}
