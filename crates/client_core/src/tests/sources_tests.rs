use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::{extract::State, routing::get, Json, Router};
use list_view::{Phase, SortDirection};
use serde_json::{json, Value};
use shared::domain::{EntryId, MatchId};
use tokio::net::TcpListener;

#[derive(Clone, Default)]
struct Counter {
    hits: Arc<AtomicUsize>,
}

impl Counter {
    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

fn ladder_entry(id: &str, tier: &str, lp: i64) -> Value {
    json!({
        "_id": id,
        "tier": tier,
        "leaguePoints": lp,
        "player_ids_data": { "gameName": id, "tagLine": "NA1" }
    })
}

async fn counted_ladder(State(counter): State<Counter>) -> Json<Value> {
    counter.hits.fetch_add(1, Ordering::SeqCst);
    Json(json!([
        ladder_entry("e1", "MASTER", 50),
        ladder_entry("e2", "GRANDMASTER", 80),
        ladder_entry("e3", "master", 120)
    ]))
}

async fn counted_history(State(counter): State<Counter>) -> Json<Value> {
    counter.hits.fetch_add(1, Ordering::SeqCst);
    Json(json!([]))
}

async fn spawn_backend() -> (Arc<ApiClient>, Counter) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let counter = Counter::default();
    let router = Router::new()
        .route("/api/ladder", get(counted_ladder))
        .route("/api/player-match-history/:puuid", get(counted_history))
        .with_state(counter.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    let api = ApiClient::new(&format!("http://{addr}")).expect("client");
    (Arc::new(api), counter)
}

fn ladder_ids(entries: &[LadderEntry]) -> Vec<&str> {
    entries.iter().map(|entry| entry.id.0.as_str()).collect()
}

#[tokio::test]
async fn ladder_view_sorts_by_points_and_toggles_without_refetch() {
    let (api, counter) = spawn_backend().await;
    let view = ladder_view(api, None);

    let snapshot = view.initialize(None).await.expect("initialize");
    assert_eq!(snapshot.phase, Phase::Ready);
    assert_eq!(snapshot.sort_direction, SortDirection::Descending);
    assert_eq!(ladder_ids(&snapshot.items), vec!["e3", "e2", "e1"]);

    assert_eq!(view.toggle_sort().await, Ok(SortDirection::Ascending));
    let flipped = view.snapshot().await;
    assert_eq!(ladder_ids(&flipped.items), vec!["e1", "e2", "e3"]);

    assert_eq!(view.toggle_expand(&EntryId::from("e2")).await, Ok(true));
    assert!(view.snapshot().await.is_expanded(&EntryId::from("e2")));
    assert_eq!(counter.hits(), 1);
}

#[tokio::test]
async fn ladder_tier_filter_ignores_case() {
    let (api, _) = spawn_backend().await;
    let view = ladder_view(api, Some(" Master "));

    let snapshot = view.initialize(None).await.expect("initialize");

    assert_eq!(ladder_ids(&snapshot.items), vec!["e3", "e1"]);
}

#[tokio::test]
async fn match_history_without_player_never_hits_backend() {
    let (api, counter) = spawn_backend().await;
    let view = match_history_view(api);

    let snapshot = view.initialize(None).await.expect("initialize");

    assert_eq!(counter.hits(), 0);
    assert_eq!(snapshot.phase, Phase::Error);
    assert_eq!(snapshot.error_message.as_deref(), Some("invalid identifier"));
}

#[tokio::test]
async fn empty_match_history_is_ready_with_no_data() {
    let (api, counter) = spawn_backend().await;
    let view = match_history_view(api);

    let snapshot = view.initialize(Some("puuid-1")).await.expect("initialize");

    assert_eq!(counter.hits(), 1);
    assert_eq!(snapshot.phase, Phase::Ready);
    assert!(snapshot.has_no_data());
    assert_eq!(view.toggle_expand(&MatchId::from("NA1_1")).await, Ok(false));
}

#[tokio::test]
async fn match_history_source_rejects_missing_player() {
    let (api, counter) = spawn_backend().await;
    let source = MatchHistorySource::new(api);

    assert_eq!(source.fetch(None).await, Err(FetchError::InvalidParameter));
    assert_eq!(counter.hits(), 0);
}

#[test]
fn blank_tier_filter_keeps_every_entry() {
    let blank = ladder_view_config(Some("   "));
    let tier = ladder_view_config(Some("MASTER"));

    assert!(format!("{blank:?}").contains("filtered: false"));
    assert!(format!("{tier:?}").contains("filtered: true"));
    assert!(format!("{blank:?}").contains("sortable: true"));
}
