//! Router tests against the in-memory store.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use sauna_api::{build_router, AppState};
use sauna_common::{
    BookingType, HeatSource, NewSauna, NewSubmission, OpeningHours, Sauna, SaunaPatch,
    SaunaType, Setting, Submission,
};
use sauna_store::{MemorySaunaStore, SaunaFilter, SaunaStore, StoreError};

fn hours(entry: &str) -> OpeningHours {
    serde_json::from_value(json!({
        "monday": entry, "tuesday": entry, "wednesday": entry, "thursday": entry,
        "friday": entry, "saturday": entry, "sunday": entry
    }))
    .unwrap()
}

fn sauna(name: &str, address: &str, setting: Setting, entry: &str) -> Sauna {
    Sauna {
        id: Uuid::new_v4(),
        created_at: Utc::now(),
        name: name.to_string(),
        address: address.to_string(),
        gmaps_url: None,
        website: None,
        booking_url: None,
        phone: None,
        opening_hours: hours(entry),
        pricing_details: "150 SEK".to_string(),
        booking_type: if setting == Setting::CitySpa {
            BookingType::Required
        } else {
            BookingType::DropIn
        },
        heat_sources: vec![HeatSource::Wood],
        sauna_types: vec![SaunaType::Dry],
        setting,
        has_lake_access: setting == Setting::Lakeside,
        amenities: None,
        swimsuit_policy: None,
        avg_rating: None,
        review_count: None,
    }
}

/// Three saunas: one always open, two always closed.
fn fixtures() -> Vec<Sauna> {
    vec![
        sauna("Sturebadet", "Stureplan 4, Stockholm", Setting::CitySpa, "closed"),
        sauna("Högdalen Sjö Bastu", "Magelungsvägen 2, Bandhagen", Setting::Lakeside, "00:00-23:59"),
        sauna("Centralbadet", "Drottninggatan 88, Stockholm", Setting::CitySpa, "closed"),
    ]
}

fn app_with(store: Arc<dyn SaunaStore>) -> Router {
    app_with_timeout(store, Duration::from_secs(2))
}

fn app_with_timeout(store: Arc<dyn SaunaStore>, request_timeout: Duration) -> Router {
    let state = Arc::new(AppState {
        store,
        request_timeout,
        app_url: "https://saunas.example".to_string(),
    });
    build_router(state, &[])
}

fn app() -> (Router, Arc<MemorySaunaStore>, Vec<Sauna>) {
    let saunas = fixtures();
    let store = Arc::new(MemorySaunaStore::with_saunas(saunas.clone()));
    (app_with(store.clone()), store, saunas)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| json!(String::from_utf8_lossy(&bytes)))
    };
    (status, body)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

// --- Listing ---

#[tokio::test]
async fn health_check_answers_ok() {
    let (app, _, _) = app();
    let response = app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).unwrap(),
        "no-store"
    );
}

#[tokio::test]
async fn lists_all_saunas_by_name_with_count() {
    let (app, _, _) = app();
    let (status, body) = get(app, "/api/saunas").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 3);
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Centralbadet", "Högdalen Sjö Bastu", "Sturebadet"]);
}

#[tokio::test]
async fn listing_filters_by_setting_and_lake_access() {
    let (app, _, _) = app();
    let (status, body) = get(app.clone(), "/api/saunas?setting=City%20Spa").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);

    let (_, body) = get(app.clone(), "/api/saunas?has_lake_access=true").await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["name"], "Högdalen Sjö Bastu");

    let (_, body) = get(app, "/api/saunas?booking_type=Online%20booking%20required").await;
    assert_eq!(body["count"], 2);
}

#[tokio::test]
async fn open_now_filter_uses_opening_hours() {
    let (app, _, _) = app();
    let (_, open) = get(app.clone(), "/api/saunas?open_now=true").await;
    assert_eq!(open["count"], 1);
    assert_eq!(open["data"][0]["name"], "Högdalen Sjö Bastu");

    let (_, closed) = get(app, "/api/saunas?open_now=false").await;
    assert_eq!(closed["count"], 2);
}

#[tokio::test]
async fn bad_filter_values_are_rejected() {
    let (app, _, _) = app();
    let (status, body) = get(app.clone(), "/api/saunas?setting=Sauna%20boat").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Invalid filter");
    assert_eq!(body["message"], "unknown setting: Sauna boat");

    let (status, _) = get(app, "/api/saunas?has_lake_access=maybe").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// --- Detail by id ---

#[tokio::test]
async fn detail_by_id_returns_the_record() {
    let (app, _, saunas) = app();
    let target = &saunas[1];
    let (status, body) = get(app, &format!("/api/saunas/{}", target.id)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], target.id.to_string());
    assert_eq!(body["data"]["setting"], "Lakeside");
    assert!(body.get("count").is_none());
}

#[tokio::test]
async fn detail_by_unknown_id_is_not_found() {
    let (app, _, _) = app();
    let id = Uuid::new_v4();
    let (status, body) = get(app, &format!("/api/saunas/{id}")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Sauna not found");
    assert_eq!(body["message"], format!("No sauna found with ID: {id}"));
}

#[tokio::test]
async fn detail_by_malformed_or_blank_id_is_a_bad_request() {
    let (app, _, _) = app();
    let (status, body) = get(app.clone(), "/api/saunas/not-a-uuid").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please provide a valid sauna ID");

    let (status, body) = get(app, "/api/saunas/%20").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Sauna ID is required");
}

// --- Detail by slug ---

#[tokio::test]
async fn slug_resolves_to_the_matching_sauna() {
    let (app, _, _) = app();
    let (status, body) = get(app, "/api/saunas/slug/hogdalen-sjo-bastu").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Högdalen Sjö Bastu");
}

#[tokio::test]
async fn unmatched_slug_is_not_found() {
    let (app, _, _) = app();
    let (status, body) = get(app, "/api/saunas/slug/nonexistent-place").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "No sauna found with slug: nonexistent-place");
}

#[tokio::test]
async fn blank_slug_is_a_bad_request() {
    let (app, _, _) = app();
    let (status, body) = get(app, "/api/saunas/slug/%20").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Sauna slug is required");
}

#[tokio::test]
async fn slug_lookup_takes_the_first_plausible_name() {
    let saunas = vec![
        sauna("Flottsbro Bastu", "Flottsbrovägen 20, Huddinge", Setting::Lakeside, "closed"),
        sauna("Hellasgården Bastu", "Ältavägen 170, Nacka", Setting::Lakeside, "closed"),
    ];
    let app = app_with(Arc::new(MemorySaunaStore::with_saunas(saunas)));
    let (_, body) = get(app, "/api/saunas/slug/hellasgarden-bastu").await;

    // "bastu" in the alphabetically earlier name wins.
    assert_eq!(body["data"]["name"], "Flottsbro Bastu");
}

// --- Map ---

#[tokio::test]
async fn map_feed_is_geojson_with_detail_links() {
    let (app, _, _) = app();
    let (status, body) = get(app, "/api/saunas/map").await;

    assert_eq!(status, StatusCode::OK);
    let collection = &body["data"];
    assert_eq!(collection["type"], "FeatureCollection");
    let features = collection["features"].as_array().unwrap();
    assert_eq!(features.len(), 3);

    let central = &features[0];
    assert_eq!(central["properties"]["name"], "Centralbadet");
    assert_eq!(central["geometry"]["coordinates"], json!([18.0686, 59.3293]));
    assert_eq!(
        central["properties"]["url"],
        "https://saunas.example/sauna/centralbadet"
    );
    assert_eq!(central["properties"]["open_now"], false);

    let hogdalen = &features[1];
    assert_eq!(hogdalen["properties"]["slug"], "hogdalen-sjo-bastu");
    assert_eq!(hogdalen["properties"]["open_now"], true);
    assert!(hogdalen["properties"]["opening_hours"]
        .as_str()
        .unwrap()
        .starts_with("Mon: 00:00-23:59\n"));
}

// --- Submissions ---

#[tokio::test]
async fn suggestion_is_created_pending() {
    let (app, store, _) = app();
    let (status, body) = post_json(
        app,
        "/api/submissions",
        json!({
            "type": "new_suggestion",
            "submitted_data": { "name": "Skeppsholmen Bastu", "address": "Skeppsholmen" }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["type"], "new_suggestion");

    let stored = store.submissions().await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].submitted_data.name.as_deref(), Some("Skeppsholmen Bastu"));
}

#[tokio::test]
async fn correction_for_existing_sauna_is_accepted() {
    let (app, _, saunas) = app();
    let (status, body) = post_json(
        app,
        "/api/submissions",
        json!({
            "type": "correction_report",
            "sauna_id": saunas[0].id,
            "submitted_data": { "incorrect_fields": ["opening_hours"], "notes": "Open Sundays" }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["sauna_id"], saunas[0].id.to_string());
}

#[tokio::test]
async fn correction_for_unknown_sauna_is_not_found() {
    let (app, store, _) = app();
    let (status, body) = post_json(
        app,
        "/api/submissions",
        json!({ "type": "correction_report", "sauna_id": Uuid::new_v4() }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Sauna not found");
    assert!(store.submissions().await.is_empty());
}

#[tokio::test]
async fn invalid_submissions_are_bad_requests() {
    let (app, _, _) = app();
    let (status, body) = post_json(
        app.clone(),
        "/api/submissions",
        json!({ "type": "new_suggestion", "submitted_data": { "notes": "no name" } }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid submission");

    let (status, body) = post_json(app.clone(), "/api/submissions", json!({ "type": "praise" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let request = Request::post("/api/submissions")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, _) = send(app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// --- Store failures ---

/// A store whose every call fails or hangs.
struct BrokenStore {
    hang: bool,
}

impl BrokenStore {
    async fn fail<T>(&self) -> sauna_store::Result<T> {
        if self.hang {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
        Err(StoreError::Upstream {
            status: 503,
            message: "connection refused".to_string(),
        })
    }
}

#[async_trait]
impl SaunaStore for BrokenStore {
    async fn list(&self, _filter: &SaunaFilter) -> sauna_store::Result<Vec<Sauna>> {
        self.fail().await
    }

    async fn get_by_id(&self, _id: Uuid) -> sauna_store::Result<Option<Sauna>> {
        self.fail().await
    }

    async fn insert(&self, _sauna: NewSauna) -> sauna_store::Result<Sauna> {
        self.fail().await
    }

    async fn update(&self, _id: Uuid, _patch: SaunaPatch) -> sauna_store::Result<Sauna> {
        self.fail().await
    }

    async fn insert_submission(&self, _submission: NewSubmission) -> sauna_store::Result<Submission> {
        self.fail().await
    }

    async fn get_submission(&self, _id: Uuid) -> sauna_store::Result<Option<Submission>> {
        self.fail().await
    }
}

#[tokio::test]
async fn store_failure_is_a_500_with_the_cause() {
    let app = app_with(Arc::new(BrokenStore { hang: false }));
    let (status, body) = get(app.clone(), "/api/saunas").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to fetch saunas");
    assert!(body["message"].as_str().unwrap().contains("connection refused"));

    let (status, body) = get(app, "/api/saunas/slug/centralbadet").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to fetch sauna");
}

#[tokio::test]
async fn hung_store_hits_the_request_deadline() {
    let app = app_with_timeout(
        Arc::new(BrokenStore { hang: true }),
        Duration::from_millis(50),
    );
    let (status, body) = get(app, &format!("/api/saunas/{}", Uuid::new_v4())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["message"].as_str().unwrap().contains("timed out"));
}
