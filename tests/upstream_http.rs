use axum::body::Body;
use axum::http::{Request, StatusCode};
use cinestream::app::{build_router, AppState};
use cinestream::config::Config;
use cinestream::models::MediaKind;
use cinestream::status::{ProbeTarget, Reachability, StatusProbe};
use cinestream::tmdb::{Source, TmdbApi, TmdbClient};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "test-key";

#[tokio::test]
async fn client_requests_page_with_key_and_reads_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movie/popular"))
        .and(query_param("api_key", API_KEY))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 2,
            "results": [
                { "id": 550, "title": "Fight Club", "popularity": 61.2, "adult": false },
                { "title": "missing id" }
            ],
            "total_pages": 500
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = TmdbClient::new(API_KEY, server.uri()).unwrap();
    let items = client
        .fetch_page(&Source::Popular(MediaKind::Movie), 2)
        .await
        .unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, 550);
    assert_eq!(items[0].extra.get("adult"), Some(&json!(false)));
}

#[tokio::test]
async fn client_sends_discover_and_search_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/discover/tv"))
        .and(query_param("with_genres", "16"))
        .and(query_param("sort_by", "popularity.desc"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "results": [{ "id": 1, "name": "Bleach" }] })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search/movie"))
        .and(query_param("query", "fast & furious"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let client = TmdbClient::new(API_KEY, format!("{}/", server.uri())).unwrap();
    let anime = client
        .fetch_page(
            &Source::Discover {
                kind: MediaKind::Tv,
                genre_id: 16,
            },
            1,
        )
        .await
        .unwrap();
    assert_eq!(anime[0].name.as_deref(), Some("Bleach"));

    let found = client
        .fetch_page(
            &Source::Search {
                kind: MediaKind::Movie,
                query: "fast & furious".to_string(),
            },
            1,
        )
        .await
        .unwrap();
    assert!(found.is_empty());
}

#[tokio::test]
async fn client_errors_on_upstream_failure_without_leaking_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tv/top_rated"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status_message": "Invalid API key"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tv/airing_today"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = TmdbClient::new(API_KEY, server.uri()).unwrap();
    let err = client
        .fetch_page(&Source::TopRated(MediaKind::Tv), 1)
        .await
        .unwrap_err();
    let msg = format!("{:#}", err);
    assert!(msg.contains("/tv/top_rated"));
    assert!(!msg.contains(API_KEY));

    assert!(client
        .fetch_page(&Source::AiringToday, 1)
        .await
        .is_err());
}

#[tokio::test]
async fn client_passes_genre_list_through() {
    let server = MockServer::start().await;
    let genres = json!({ "genres": [{ "id": 28, "name": "Action" }] });
    Mock::given(method("GET"))
        .and(path("/genre/movie/list"))
        .and(query_param("api_key", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(genres.clone()))
        .mount(&server)
        .await;

    let client = TmdbClient::new(API_KEY, server.uri()).unwrap();
    assert_eq!(client.fetch_genres().await.unwrap(), genres);
}

#[tokio::test]
async fn client_built_from_config_uses_configured_base_and_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/trending/all/week"))
        .and(query_param("api_key", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "id": 31, "name": "Tom Hanks", "media_type": "person" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let config = Config::from_lookup(|key| match key {
        "TMDB_API_KEY" => Some(API_KEY.to_string()),
        "TMDB_BASE_URL" => Some(uri.clone()),
        _ => None,
    })
    .unwrap();
    let client = TmdbClient::new(config.tmdb_api_key, config.tmdb_base_url).unwrap();
    let items = client.fetch_page(&Source::trending("all"), 1).await.unwrap();
    assert_eq!(items[0].media_type.as_ref().map(|t| t.as_str()), Some("person"));
}

#[tokio::test]
async fn status_probe_reports_each_mirror_independently() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/up"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let target = |name: &str, url: String| ProbeTarget {
        name: name.to_string(),
        url,
    };
    let probe = StatusProbe::new(
        vec![
            target("up", format!("{}/up", server.uri())),
            target("down", format!("{}/down", server.uri())),
            target("slow", format!("{}/slow", server.uri())),
            target("refused", "http://127.0.0.1:1".to_string()),
        ],
        Duration::from_millis(300),
    )
    .unwrap();

    let report = probe.check().await;
    let got: Vec<_> = report
        .servers
        .iter()
        .map(|s| (s.name.as_str(), s.status))
        .collect();
    assert_eq!(
        got,
        vec![
            ("up", Reachability::Online),
            ("down", Reachability::Offline),
            ("slow", Reachability::Offline),
            ("refused", Reachability::Offline),
        ]
    );
}

struct NoTmdb;

#[async_trait::async_trait]
impl TmdbApi for NoTmdb {
    async fn fetch_page(
        &self,
        _source: &Source,
        _page: u32,
    ) -> anyhow::Result<Vec<cinestream::models::MediaItem>> {
        Ok(Vec::new())
    }
    async fn fetch_genres(&self) -> anyhow::Result<Value> {
        Ok(json!({ "genres": [] }))
    }
}

#[tokio::test]
async fn server_status_route_serializes_report() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let probe = StatusProbe::new(
        vec![ProbeTarget {
            name: "vidsrc.cc".to_string(),
            url: server.uri(),
        }],
        Duration::from_secs(1),
    )
    .unwrap();
    let app = build_router(
        AppState {
            tmdb: Arc::new(NoTmdb),
            status: Arc::new(probe),
        },
        None,
    );

    let res = app
        .oneshot(
            Request::get("/api/server-status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(
        body,
        json!({ "servers": [{ "name": "vidsrc.cc", "status": "online" }] })
    );
}
