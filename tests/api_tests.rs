use anicat::api::{self, AppState};
use anicat::config::Config;
use anicat::db::Store;
use anicat::services::CatalogSeeder;
use anicat::state::SharedState;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;

/// A router over a fresh on-disk database that is removed on drop.
struct TestApp {
    router: Router,
    state: Arc<AppState>,
    db_path: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_path);
    }
}

impl TestApp {
    async fn spawn() -> Self {
        let db_path =
            std::env::temp_dir().join(format!("anicat-test-{}.db", uuid::Uuid::new_v4()));

        let mut config = Config::default();
        config.general.database_path = db_path.to_string_lossy().into_owned();

        let store = Store::new(&config.database_url())
            .await
            .expect("Failed to open test database");
        let shared = Arc::new(SharedState::with_connected_store(config, store));
        let state = api::create_app_state(shared, None);

        Self {
            router: api::router(state.clone()),
            state,
            db_path,
        }
    }

    async fn seeded() -> Self {
        let app = Self::spawn().await;
        let store = app.state.shared.store.get().await.unwrap();
        CatalogSeeder::new(store).run().await.unwrap();
        app
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, json)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("DELETE")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    async fn send_json(&self, method: &str, uri: &str, body: &Value) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(serde_json::to_string(body).unwrap()))
                .unwrap(),
        )
        .await
    }
}

fn anime_body(title: &str) -> Value {
    json!({
        "title": title,
        "description": "Bounty hunters drift through the solar system.",
        "posterUrl": "https://example.com/poster.jpg",
        "episodes": 26,
        "releaseDate": "1998-04-03",
        "rating": 8.9,
        "genres": ["Action", "action", " Sci-Fi "],
        "season": "spring"
    })
}

fn titles(items: &Value) -> Vec<&str> {
    items
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["title"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_root_and_health() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["health"], "/api/v1/health");

    let (status, body) = app.get("/api/v1/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ok": true}));

    let (status, body) = app.get("/api/v1/health/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], true);
}

#[tokio::test]
async fn test_unknown_route_returns_envelope() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get("/api/v1/unknown?x=1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({"error": {"message": "Not found - /api/v1/unknown?x=1", "statusCode": 404}})
    );
}

#[tokio::test]
async fn test_anime_crud() {
    let app = TestApp::spawn().await;

    let (status, created) = app
        .send_json("POST", "/api/v1/animes", &anime_body("Cowboy Bebop"))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["year"], 1998);
    assert_eq!(created["season"], "Primavera");
    assert_eq!(created["genres"], json!(["Action", "Sci-Fi"]));
    assert_eq!(created["isOngoing"], false);
    assert!(created["provider"].is_null());

    let id = created["id"].as_str().unwrap().to_string();
    let uri = format!("/api/v1/animes/{id}");

    let (status, fetched) = app.get(&uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], "Cowboy Bebop");

    let (status, updated) = app
        .send_json("PATCH", &uri, &json!({"rating": 9.1, "season": null}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["rating"], 9.1);
    assert!(updated["season"].is_null());
    assert_eq!(updated["title"], "Cowboy Bebop");
    assert_eq!(updated["episodes"], 26);

    let (status, body) = app.delete(&uri).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, body) = app.get(&uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Anime not found");
    assert_eq!(body["error"]["statusCode"], 404);
}

#[tokio::test]
async fn test_invalid_ids_are_rejected() {
    let app = TestApp::spawn().await;

    for uri in ["/api/v1/animes/123", "/api/v1/studios/not-an-id"] {
        let (status, body) = app.get(uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"error": {"message": "Invalid id", "statusCode": 400}})
        );
    }

    let (status, _) = app.delete("/api/v1/animes/123").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_validation_errors_are_aggregated() {
    let app = TestApp::spawn().await;

    let (status, body) = app.send_json("POST", "/api/v1/animes", &json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let message = body["error"]["message"].as_str().unwrap();
    assert!(message.starts_with("Anime title is required, "));
    assert!(message.contains("Rating is required"));
    assert_eq!(body["error"]["statusCode"], 400);

    let mut invalid = anime_body("Out of range");
    invalid["rating"] = json!(11);
    let (status, body) = app.send_json("POST", "/api/v1/animes", &invalid).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Rating must be at most 10");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .send(
            Request::builder()
                .method("POST")
                .uri("/api/v1/studios")
                .header("Content-Type", "application/json")
                .body(Body::from("{\"name\": "))
                .unwrap(),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["statusCode"], 400);
}

#[tokio::test]
async fn test_duplicate_title_conflicts() {
    let app = TestApp::spawn().await;

    let (status, _) = app
        .send_json("POST", "/api/v1/animes", &anime_body("Trigun"))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .send_json("POST", "/api/v1/animes", &anime_body("  TRIGUN "))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["error"]["message"],
        "Duplicated value for titleNormalized"
    );
}

#[tokio::test]
async fn test_studios_are_sorted_and_unique() {
    let app = TestApp::spawn().await;

    for name in ["Sunrise", "Bones", "Madhouse"] {
        let (status, body) = app
            .send_json("POST", "/api/v1/studios", &json!({"name": name, "country": "Japan"}))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["isActive"], true);
    }

    let (status, body) = app.get("/api/v1/studios").await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|studio| studio["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Bones", "Madhouse", "Sunrise"]);

    let (status, body) = app
        .send_json("POST", "/api/v1/studios", &json!({"name": "bones"}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["message"], "Duplicated value for nameNormalized");

    let (status, body) = app
        .send_json("POST", "/api/v1/studios", &json!({"country": "Japan"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Studio name is required");
}

#[tokio::test]
async fn test_deleted_studio_leaves_dangling_reference() {
    let app = TestApp::spawn().await;

    let (_, studio) = app
        .send_json("POST", "/api/v1/studios", &json!({"name": "Sunrise"}))
        .await;
    let studio_id = studio["id"].as_str().unwrap().to_string();

    let mut body = anime_body("Cowboy Bebop");
    body["provider"] = json!(studio_id);
    let (status, created) = app.send_json("POST", "/api/v1/animes", &body).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["provider"]["name"], "Sunrise");

    let (status, _) = app.delete(&format!("/api/v1/studios/{studio_id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, fetched) = app
        .get(&format!("/api/v1/animes/{}", created["id"].as_str().unwrap()))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(fetched["provider"].is_null());

    let (status, body) = app.get(&format!("/api/v1/studios/{studio_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Studio not found");
}

#[tokio::test]
async fn test_list_defaults_on_empty_catalog() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get("/api/v1/animes?page=0&limit=-5&year=abc").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"], json!([]));
    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 1);
    assert_eq!(body["total"], 0);
    assert_eq!(body["totalPages"], 1);
    assert_eq!(body["sortBy"], "createdAt");
    assert_eq!(body["order"], "desc");
}

#[tokio::test]
async fn test_list_filters_seeded_catalog() {
    let app = TestApp::seeded().await;

    let (status, body) = app.get("/api/v1/animes").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 21);
    assert_eq!(body["limit"], 10);
    assert_eq!(body["totalPages"], 3);
    assert_eq!(body["items"].as_array().unwrap().len(), 10);

    let (_, body) = app
        .get("/api/v1/animes?search=demon&minRating=8&sortBy=rating&order=asc")
        .await;
    assert_eq!(titles(&body["items"]), vec!["Demon Slayer"]);
    assert_eq!(body["items"][0]["provider"]["name"], "Ufotable");

    let (_, body) = app
        .get("/api/v1/animes?genre=Horror&sortBy=rating&order=desc")
        .await;
    assert_eq!(
        titles(&body["items"]),
        vec!["Chainsaw Man", "Parasyte The Maxim", "Kabaneri of the Iron Fortress"]
    );

    let (_, body) = app
        .get("/api/v1/animes?year=2014&sortBy=title&order=asc&limit=2&page=2")
        .await;
    assert_eq!(body["total"], 3);
    assert_eq!(body["totalPages"], 2);
    assert_eq!(titles(&body["items"]), vec!["Zankyou no Terror"]);

    let (_, body) = app
        .get("/api/v1/animes?minRating=nope&maxRating=&sortBy=unknown")
        .await;
    assert_eq!(body["total"], 21);
    assert_eq!(body["sortBy"], "createdAt");
}

#[tokio::test]
async fn test_discover_empty_catalog() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get("/api/v1/animes/discover").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["hero"].is_null());
    for section in ["topRated", "trending", "ongoing", "upcoming", "genres"] {
        assert_eq!(body[section], json!([]), "{section} should be empty");
    }
    assert_eq!(
        body["stats"],
        json!({"total": 0, "ongoing": 0, "upcoming": 0})
    );
}

#[tokio::test]
async fn test_discover_seeded_catalog() {
    let app = TestApp::seeded().await;

    let (status, body) = app.get("/api/v1/animes/discover").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hero"]["title"], "Fullmetal Alchemist Brotherhood");
    assert_eq!(body["topRated"].as_array().unwrap().len(), 6);
    assert_eq!(body["trending"][0]["title"], "Chainsaw Man");
    assert_eq!(body["ongoing"].as_array().unwrap().len(), 5);
    assert_eq!(body["upcoming"], json!([]));
    assert_eq!(
        body["stats"],
        json!({"total": 21, "ongoing": 5, "upcoming": 0})
    );

    let genres: Vec<&str> = body["genres"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g.as_str().unwrap())
        .collect();
    assert_eq!(genres.first(), Some(&"Action"));
    assert!(genres.contains(&"Slice of Life"));
}

async fn create_rated(app: &TestApp, title: &str, rating: f64) {
    let mut body = anime_body(title);
    body["rating"] = json!(rating);
    let (status, _) = app.send_json("POST", "/api/v1/animes", &body).await;
    assert_eq!(status, StatusCode::CREATED, "creating {title}");
}

#[tokio::test]
async fn test_search_with_min_rating_excludes_lower_rated() {
    let app = TestApp::spawn().await;
    create_rated(&app, "Demon Slayer", 8.6).await;
    create_rated(&app, "Demon Lord", 7.9).await;
    create_rated(&app, "Cowboy Bebop", 8.9).await;

    let (_, body) = app.get("/api/v1/animes?search=demon&sortBy=rating&order=asc").await;
    assert_eq!(titles(&body["items"]), vec!["Demon Lord", "Demon Slayer"]);

    let (status, body) = app
        .get("/api/v1/animes?search=demon&minRating=8&sortBy=rating&order=asc")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body["items"]), vec!["Demon Slayer"]);
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn test_equal_ratings_list_newest_first() {
    let app = TestApp::spawn().await;
    create_rated(&app, "First", 6.0).await;
    create_rated(&app, "Second", 6.0).await;
    create_rated(&app, "Third", 6.0).await;
    create_rated(&app, "Higher", 7.0).await;

    let (_, body) = app.get("/api/v1/animes?sortBy=rating&order=asc").await;
    assert_eq!(
        titles(&body["items"]),
        vec!["Third", "Second", "First", "Higher"]
    );

    let (_, body) = app.get("/api/v1/animes?sortBy=rating&order=desc").await;
    assert_eq!(
        titles(&body["items"]),
        vec!["Higher", "Third", "Second", "First"]
    );
}

#[tokio::test]
async fn test_repeated_query_keys_are_ignored() {
    let app = TestApp::seeded().await;

    let (status, body) = app
        .get("/api/v1/animes?genre=Action&genre=Drama&isOngoing=true&isOngoing=false")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 21);

    let (status, body) = app
        .get("/api/v1/animes?isOngoing=true&genre=Horror&genre=Horror")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 5);
}

#[tokio::test]
async fn test_page_past_the_end_is_empty() {
    let app = TestApp::seeded().await;

    let (status, body) = app.get("/api/v1/animes?page=99999999999").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 99_999_999_999_u64);
    assert_eq!(body["items"], json!([]));
    assert_eq!(body["total"], 21);
    assert_eq!(body["totalPages"], 3);

    let (_, body) = app.get("/api/v1/animes?limit=99999999999").await;
    assert_eq!(body["limit"], 100);
    assert_eq!(body["items"].as_array().unwrap().len(), 21);
}
