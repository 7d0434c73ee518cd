// HTTP tests for the API routes, served from an in-memory store

use actix_web::{http::StatusCode, test, web, App};
use chrono::NaiveDate;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use volunteer_match::auth::{Claims, JwtVerifier};
use volunteer_match::core::PreferenceLevel;
use volunteer_match::models::{Event, Volunteer, SAVE_MATCH_MESSAGE};
use volunteer_match::routes::{configure_routes, json_config, query_config, AppState};
use volunteer_match::services::{EventDirectory, InMemoryStore, MatchingOptions, VolunteerDirectory};

const SECRET: &str = "test-secret";
const EVENT_ID: &str = "64b8f9c01234567890abcdef";
const ALICE: &str = "64b8f9c01234567890abc001";
const BOB: &str = "64b8f9c01234567890abc002";

fn create_volunteer(id: &str, name: &str, skills: &[&str], prefs: &[(&str, &str)]) -> Volunteer {
    Volunteer {
        id: id.to_string(),
        first_name: name.to_string(),
        last_name: "Smith".to_string(),
        email: None,
        skills: skills.iter().map(|s| s.to_string()).collect(),
        volunteering_preferences: prefs
            .iter()
            .map(|(k, v)| (k.to_string(), PreferenceLevel::parse(v)))
            .collect::<BTreeMap<_, _>>(),
        availability: None,
        created_at: None,
    }
}

async fn seeded_store() -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());
    EventDirectory::insert(
        store.as_ref(),
        Event {
            id: EVENT_ID.to_string(),
            event_name: "Test Event".to_string(),
            event_description: "Community cleanup".to_string(),
            location: "Test Location".to_string(),
            event_date: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
            urgency: "High".to_string(),
            required_skills: vec!["Safety Awareness".to_string(), "Teamwork".to_string()],
        },
    )
    .await
    .unwrap();
    VolunteerDirectory::insert(
        store.as_ref(),
        create_volunteer(ALICE, "Alice", &["Teamwork"], &[("Teamwork", "Would like to.")]),
    )
    .await
    .unwrap();
    VolunteerDirectory::insert(
        store.as_ref(),
        create_volunteer(BOB, "Bob", &["Safety Awareness"], &[("Safety Awareness", "Would love to!")]),
    )
    .await
    .unwrap();
    store
}

fn token(user_id: &str) -> String {
    let claims = Claims {
        id: user_id.to_string(),
        exp: (chrono::Utc::now().timestamp() + 3600) as usize,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap()
}

macro_rules! init_app {
    ($store:expr) => {
        init_app!($store, MatchingOptions::default())
    };
    ($store:expr, $options:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::in_memory($store.clone(), $options)))
                .app_data(web::Data::new(JwtVerifier::new(SECRET)))
                .app_data(json_config())
                .app_data(query_config())
                .configure(configure_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn test_health() {
    let store = Arc::new(InMemoryStore::new());
    let app = init_app!(store);

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "healthy");
}

#[actix_web::test]
async fn test_match_by_event_ranks_volunteers() {
    let store = seeded_store().await;
    let app = init_app!(store);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/volunteerMatch/matchByEvent/{}", EVENT_ID))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let ranked = body.as_array().unwrap();
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0]["firstName"], "Bob");
    assert_eq!(ranked[0]["_id"], BOB);
    assert_eq!(ranked[0]["preferenceRank"], 1);
    assert_eq!(ranked[1]["firstName"], "Alice");
}

#[actix_web::test]
async fn test_match_by_event_invalid_id() {
    let store = seeded_store().await;
    let app = init_app!(store);

    let req = test::TestRequest::get()
        .uri("/api/v1/volunteerMatch/matchByEvent/invalidID")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Invalid event ID");
    assert_eq!(body["status_code"], 400);
}

#[actix_web::test]
async fn test_match_by_event_not_found() {
    let store = Arc::new(InMemoryStore::new());
    let app = init_app!(store);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/volunteerMatch/matchByEvent/{}", EVENT_ID))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Event not found");
}

#[actix_web::test]
async fn test_save_match() {
    let store = seeded_store().await;
    let app = init_app!(store);

    let req = test::TestRequest::post()
        .uri("/api/v1/volunteerMatch/saveMatch")
        .set_json(json!({ "eventId": EVENT_ID, "volunteerIds": [ALICE, BOB] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], SAVE_MATCH_MESSAGE);
    let matches = body["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0]["volunteerId"], BOB);
    assert_eq!(matches[0]["volunteerName"], "Bob Smith");
    assert_eq!(matches[0]["eventName"], "Test Event");
    assert_eq!(store.history_records().len(), 2);
}

#[actix_web::test]
async fn test_save_match_rejects_bad_input() {
    let store = seeded_store().await;
    let app = init_app!(store);

    let req = test::TestRequest::post()
        .uri("/api/v1/volunteerMatch/saveMatch")
        .set_json(json!({ "eventId": "invalidID", "volunteerIds": [ALICE] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Invalid event ID");

    let req = test::TestRequest::post()
        .uri("/api/v1/volunteerMatch/saveMatch")
        .set_json(json!({ "eventId": EVENT_ID, "volunteerIds": [] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/v1/volunteerMatch/saveMatch")
        .set_json(json!({ "eventId": EVENT_ID, "volunteerIds": ["64b8f9c01234567890abc0ff"] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    assert!(store.history_records().is_empty());
}

#[actix_web::test]
async fn test_save_match_store_failure() {
    let store = seeded_store().await;
    store.fail_history_inserts_after(0);
    let app = init_app!(store);

    let req = test::TestRequest::post()
        .uri("/api/v1/volunteerMatch/saveMatch")
        .set_json(json!({ "eventId": EVENT_ID, "volunteerIds": [ALICE, BOB] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Server error");
}

#[actix_web::test]
async fn test_save_match_partial_failure_reports_written() {
    let store = seeded_store().await;
    store.fail_history_inserts_after(1);
    let app = init_app!(store);

    let req = test::TestRequest::post()
        .uri("/api/v1/volunteerMatch/saveMatch")
        .set_json(json!({ "eventId": EVENT_ID, "volunteerIds": [ALICE, BOB] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "partial_commit");
    assert_eq!(body["written"].as_array().unwrap().len(), 1);
    assert_eq!(body["written"][0]["volunteerId"], BOB);
}

#[actix_web::test]
async fn test_event_crud() {
    let store = Arc::new(InMemoryStore::new());
    let app = init_app!(store);

    let payload = json!({
        "eventName": "Park Cleanup",
        "eventDescription": "Pick up litter",
        "location": "Hermann Park",
        "eventDate": "2024-07-04",
        "urgency": "Low",
        "requiredSkills": ["Teamwork"]
    });

    let req = test::TestRequest::post().uri("/api/v1/events").set_json(&payload).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    let id = created["_id"].as_str().unwrap().to_string();
    assert_eq!(id.len(), 24);

    let req = test::TestRequest::get().uri("/api/v1/events").to_request();
    let events: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(events.as_array().unwrap().len(), 1);

    let mut changed = payload.clone();
    changed["urgency"] = json!("High");
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/events/{}", id))
        .set_json(&changed)
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["urgency"], "High");

    let req = test::TestRequest::delete().uri(&format!("/api/v1/events/{}", id)).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::delete().uri(&format!("/api/v1/events/{}", id)).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_event_validation() {
    let store = Arc::new(InMemoryStore::new());
    let app = init_app!(store);

    let req = test::TestRequest::post()
        .uri("/api/v1/events")
        .set_json(json!({
            "eventName": "",
            "eventDescription": "Pick up litter",
            "location": "Hermann Park",
            "eventDate": "2024-07-04",
            "urgency": "Low",
            "requiredSkills": []
        }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get().uri("/api/v1/events").to_request();
    let events: Value = test::call_and_read_body_json(&app, req).await;
    assert!(events.as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn test_history_filter() {
    let store = seeded_store().await;
    let app = init_app!(store);

    let req = test::TestRequest::post()
        .uri("/api/v1/volunteerMatch/saveMatch")
        .set_json(json!({ "eventId": EVENT_ID, "volunteerIds": [ALICE, BOB] }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/volunteerHistory?volunteerId={}", ALICE))
        .to_request();
    let records: Value = test::call_and_read_body_json(&app, req).await;
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["volunteerName"], "Alice Smith");

    let req = test::TestRequest::get()
        .uri("/api/v1/volunteerHistory?eventId=bad")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_user_profile() {
    let store = Arc::new(InMemoryStore::new());
    let app = init_app!(store);

    let req = test::TestRequest::post()
        .uri("/api/v1/users")
        .set_json(json!({
            "firstName": "Dana",
            "lastName": "Lee",
            "email": "Dana@Example.com",
            "skills": ["Cooking"],
            "volunteeringPreferences": {"Cooking": "Would love to!"}
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    let id = created["_id"].as_str().unwrap().to_string();
    assert_eq!(created["email"], "dana@example.com");

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/users/{}/profile", id))
        .set_json(json!({ "skills": ["Cooking", "Teamwork"] }))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["skills"].as_array().unwrap().len(), 2);
    assert_eq!(updated["volunteeringPreferences"]["Cooking"], "Would love to!");

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/users/{}/profile", id))
        .set_json(json!({ "availability": {"startDate": "2024-07-01", "endDate": "2024-06-01"} }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get().uri(&format!("/api/v1/users/{}", id)).to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched["firstName"], "Dana");

    let req = test::TestRequest::get().uri("/api/v1/users/64b8f9c01234567890abc0ff").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "User not found");
}

#[actix_web::test]
async fn test_notifications_require_token() {
    let store = seeded_store().await;
    let app = init_app!(
        store,
        MatchingOptions {
            notify_on_commit: true,
            ..Default::default()
        }
    );

    let req = test::TestRequest::get().uri("/api/v1/notifications").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/v1/notifications")
        .insert_header(("Authorization", "Bearer not-a-token"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri("/api/v1/volunteerMatch/saveMatch")
        .set_json(json!({ "eventId": EVENT_ID, "volunteerIds": [BOB] }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri("/api/v1/notifications")
        .insert_header(("Authorization", format!("Bearer {}", token(BOB))))
        .to_request();
    let notifications: Value = test::call_and_read_body_json(&app, req).await;
    let notifications = notifications.as_array().unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0]["title"], "Assigned to Event: Test Event");
    assert_eq!(notifications[0]["isRead"], false);

    let id = notifications[0]["_id"].as_str().unwrap().to_string();
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/notifications/{}/read", id))
        .insert_header(("Authorization", format!("Bearer {}", token(BOB))))
        .to_request();
    let read: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(read["isRead"], true);

    // another user cannot see or mark it
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/notifications/{}/read", id))
        .insert_header(("Authorization", format!("Bearer {}", token(ALICE))))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_create_notification() {
    let store = Arc::new(InMemoryStore::new());
    let app = init_app!(store);

    let req = test::TestRequest::post()
        .uri("/api/v1/notifications")
        .insert_header(("Authorization", format!("Bearer {}", token(ALICE))))
        .set_json(json!({ "title": "Reminder", "message": "Bring gloves" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["userId"], ALICE);
    assert_eq!(body["isRead"], false);
}

#[actix_web::test]
async fn test_malformed_json_body() {
    let store = seeded_store().await;
    let app = init_app!(store);

    let req = test::TestRequest::post()
        .uri("/api/v1/volunteerMatch/saveMatch")
        .insert_header(("Content-Type", "application/json"))
        .set_payload(r#"{"eventId":"#)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_json");
    assert_eq!(body["status_code"], 400);
    assert!(store.history_records().is_empty());
}

#[actix_web::test]
async fn test_uppercase_ids_resolve_like_lowercase() {
    let store = seeded_store().await;
    let app = init_app!(store);

    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/v1/volunteerMatch/matchByEvent/{}",
            EVENT_ID.to_uppercase()
        ))
        .to_request();
    let ranked: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(ranked.as_array().unwrap().len(), 2);

    let req = test::TestRequest::post()
        .uri("/api/v1/volunteerMatch/saveMatch")
        .set_json(json!({ "eventId": EVENT_ID.to_uppercase(), "volunteerIds": [ALICE.to_uppercase()] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["matches"][0]["volunteerId"], ALICE);
    assert_eq!(body["matches"][0]["eventId"], EVENT_ID);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/volunteerHistory?volunteerId={}", ALICE.to_uppercase()))
        .to_request();
    let records: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(records.as_array().unwrap().len(), 1);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/users/{}", BOB.to_uppercase()))
        .to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched["_id"], BOB);
}

#[actix_web::test]
async fn test_duplicate_email_rejected() {
    let store = Arc::new(InMemoryStore::new());
    let app = init_app!(store);

    let profile = json!({
        "firstName": "Dana",
        "lastName": "Lee",
        "email": "dana@example.com"
    });

    let req = test::TestRequest::post().uri("/api/v1/users").set_json(&profile).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let mut shouting = profile.clone();
    shouting["email"] = json!("DANA@example.com");
    let req = test::TestRequest::post().uri("/api/v1/users").set_json(&shouting).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "email_in_use");
    assert_eq!(body["message"], "Email already in use");
}
