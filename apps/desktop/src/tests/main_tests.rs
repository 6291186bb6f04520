use super::*;

use axum::{extract::Path, http::StatusCode, routing::get, Json, Router};
use clap::Parser;
use serde_json::{json, Value};
use tokio::net::TcpListener;

async fn history(Path(puuid): Path<String>) -> (StatusCode, Json<Value>) {
    if puuid == "missing" {
        return (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not Found" })));
    }
    (
        StatusCode::OK,
        Json(json!([
            { "matchId": "NA1_2", "0": { "puuid": "p0", "championName": "Ahri" } },
            { "matchId": "NA1_1", "0": { "puuid": "p1", "championName": "Lux" } }
        ])),
    )
}

async fn spawn_backend() -> Arc<ApiClient> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let router = Router::new()
        .route(
            "/api/ladder",
            get(|| async {
                Json(json!([
                    { "_id": "a", "tier": "MASTER", "leaguePoints": 10,
                      "player_ids_data": { "gameName": "a", "tagLine": "t" } },
                    { "_id": "b", "tier": "MASTER", "leaguePoints": 70,
                      "player_ids_data": { "gameName": "b", "tagLine": "t" } }
                ]))
            }),
        )
        .route("/api/player-match-history/:puuid", get(history))
        .route(
            "/api/test/:n",
            get(|Path(n): Path<u32>| async move {
                Json(json!({ "message": format!("route {n}") }))
            }),
        );
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    Arc::new(ApiClient::new(&format!("http://{addr}")).expect("client"))
}

fn command(args: &[&str]) -> Command {
    let mut argv = vec!["ladder-view"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).expect("cli").command
}

#[test]
fn parses_global_flags_before_subcommand() {
    let cli = Cli::try_parse_from([
        "ladder-view",
        "--config",
        "custom.toml",
        "--api-url",
        "http://ladder:8001",
        "ladder",
        "--tier",
        "MASTER",
        "--ascending",
    ])
    .expect("cli");

    assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
    assert_eq!(cli.api_url.as_deref(), Some("http://ladder:8001"));
    assert!(matches!(
        cli.command,
        Command::Ladder { ascending: true, tier: Some(ref tier) } if tier == "MASTER"
    ));
}

#[test]
fn matches_accepts_repeated_expand() {
    let parsed = command(&["matches", "puuid-1", "--expand", "NA1_1", "--expand", "NA1_2"]);
    assert!(matches!(
        parsed,
        Command::Matches { puuid: Some(_), ref expand, expand_all: false } if expand.len() == 2
    ));
}

#[test]
fn subcommand_is_required() {
    assert!(Cli::try_parse_from(["ladder-view"]).is_err());
}

#[tokio::test]
async fn ladder_ascending_flips_order() {
    let api = spawn_backend().await;

    let (text, phase) = run(command(&["ladder", "--ascending"]), api, "http://cdn")
        .await
        .expect("run");

    assert_eq!(phase, Phase::Ready);
    let rows: Vec<&str> = text.lines().skip(1).collect();
    assert!(rows[0].starts_with("- a#t"));
    assert!(rows[1].starts_with("- b#t"));
}

#[tokio::test]
async fn expand_all_renders_every_match_detail() {
    let api = spawn_backend().await;

    let (text, phase) = run(command(&["matches", "puuid-1", "--expand-all"]), api, "")
        .await
        .expect("run");

    assert_eq!(phase, Phase::Ready);
    assert!(text.contains("Champion: Ahri"));
    assert!(text.contains("Champion: Lux"));
}

#[tokio::test]
async fn expand_only_named_match() {
    let api = spawn_backend().await;

    let (text, _) = run(
        command(&["matches", "puuid-1", "--expand", "NA1_1", "--expand", "NA1_9"]),
        api,
        "",
    )
    .await
    .expect("run");

    assert!(text.contains("Champion: Lux"));
    assert!(!text.contains("Champion: Ahri"));
}

#[tokio::test]
async fn missing_player_settles_in_error() {
    let api = spawn_backend().await;

    let (text, phase) = run(command(&["matches", "missing"]), api, "")
        .await
        .expect("run");

    assert_eq!(phase, Phase::Error);
    assert!(text.ends_with("Error: not found"));
}

#[tokio::test]
async fn ping_reports_backend_message() {
    let api = spawn_backend().await;

    let (text, phase) = run(command(&["ping", "--test-num", "3"]), api, "")
        .await
        .expect("run");

    assert_eq!(text, "route 3");
    assert_eq!(phase, Phase::Ready);
}
