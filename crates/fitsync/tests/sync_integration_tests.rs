//! Integration tests for the reconciliation engine and its two HTTP
//! collaborators, using wiremock with recorded fixtures.

use chrono::NaiveDate;
use chrono_tz::Europe::Paris;
use fitsync::client::FitnessClient;
use fitsync::engine::{EngineOptions, SyncEngine};
use fitsync::store::WorkspaceStore;
use fitsync::SyncError;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ACTIVITY_DB: &str = "activity-db";
const SLEEP_DB: &str = "sleep-db";

fn test_client(server: &MockServer) -> FitnessClient {
    FitnessClient::new(&server.uri(), "source-token", "TestUser")
}

fn test_store(server: &MockServer) -> WorkspaceStore {
    WorkspaceStore::new(&server.uri(), "store-token", "2022-06-28", 100)
}

fn test_engine(source: &MockServer, store: &MockServer) -> SyncEngine {
    SyncEngine::new(
        test_client(source),
        test_store(store),
        EngineOptions {
            activity_database: ACTIVITY_DB.to_string(),
            sleep_database: SLEEP_DB.to_string(),
            timezone: Paris,
        },
    )
}

fn empty_query_response() -> Value {
    json!({"results": [], "has_more": false})
}

/// Page properties exactly as the store would echo them for the Parc
/// Monceau fixture after a successful sync.
fn parc_monceau_page(id: &str) -> Value {
    json!({
        "id": id,
        "archived": false,
        "properties": {
            "Date": {"date": {"start": "2026-07-28 06:12:00"}},
            "Activity Type": {"select": {"name": "Running"}},
            "Subactivity Type": {"select": {"name": "Running"}},
            "Activity Name": {"title": [{"plain_text": "Running"}]},
            "Distance (km)": {"number": 5.0},
            "Duration (min)": {"number": 25.0},
            "Calories": {"number": 320.0},
            "Avg Pace": {"rich_text": [{"plain_text": "5:00 min/km"}]},
            "Avg Power": {"number": 0.0},
            "Max Power": {"number": 0.0},
            "Training Effect": {"select": {"name": "Tempo"}},
            "Aerobic": {"number": 3.2},
            "Aerobic Effect": {"select": {"name": "Impacting"}},
            "Anaerobic": {"number": 0.4},
            "Anaerobic Effect": {"select": {"name": "No Benefit"}},
            "PR": {"checkbox": false},
            "Fav": {"checkbox": true},
            "Location": {"rich_text": [{"plain_text": "Parc Monceau"}]}
        }
    })
}

mod client_tests {
    use super::*;

    #[tokio::test]
    async fn test_list_activities_parses_fixture() {
        let server = MockServer::start().await;
        let fixture = include_str!("fixtures/activities.json");

        Mock::given(method("GET"))
            .and(path("/activitylist-service/activities/search/activities"))
            .and(query_param("limit", "20"))
            .and(query_param("start", "0"))
            .and(header("Authorization", "Bearer source-token"))
            .respond_with(ResponseTemplate::new(200).set_body_string(fixture))
            .mount(&server)
            .await;

        let activities = test_client(&server)
            .list_activities(0, 20)
            .await
            .expect("Failed to list activities");

        assert_eq!(activities.len(), 3);
        assert_eq!(activities[0].display_name(), "Parc Monceau Course à pied");
        assert_eq!(activities[0].type_key(), "running");
        assert_eq!(activities[1].average_power(), 212.4);
        assert_eq!(activities[2].speed_mps(), 0.0);
    }

    #[tokio::test]
    async fn test_sleep_session_parses_fixture() {
        let server = MockServer::start().await;
        let fixture = include_str!("fixtures/sleep_2026-07-28.json");

        Mock::given(method("GET"))
            .and(path("/wellness-service/wellness/dailySleepData/TestUser"))
            .and(query_param("date", "2026-07-28"))
            .respond_with(ResponseTemplate::new(200).set_body_string(fixture))
            .mount(&server)
            .await;

        let session = test_client(&server)
            .sleep_session(NaiveDate::from_ymd_opt(2026, 7, 28).unwrap())
            .await
            .expect("Failed to get sleep session")
            .expect("Expected sleep data");

        let daily = session.daily_sleep.as_ref().unwrap();
        assert_eq!(daily.deep_seconds(), 7000);
        assert_eq!(daily.total_sleep_seconds(), 27300);
        assert_eq!(session.resting_heart_rate(), 52);
    }

    #[tokio::test]
    async fn test_sleep_session_without_data_is_none() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/wellness-service/wellness/dailySleepData/TestUser"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"dailySleepDTO": null, "restingHeartRate": null})),
            )
            .mount(&server)
            .await;

        let session = test_client(&server)
            .sleep_session(NaiveDate::from_ymd_opt(2026, 7, 28).unwrap())
            .await
            .expect("Failed to get sleep session");
        assert!(session.is_none());
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_not_authenticated() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = test_client(&server).list_activities(0, 20).await.unwrap_err();
        assert!(matches!(err, SyncError::NotAuthenticated));
    }

    #[tokio::test]
    async fn test_rate_limit_maps_to_rate_limited() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let err = test_client(&server).list_activities(0, 20).await.unwrap_err();
        assert!(matches!(err, SyncError::RateLimited));
    }
}

mod store_tests {
    use super::*;

    #[tokio::test]
    async fn test_query_all_follows_cursor_and_drops_archived() {
        let server = MockServer::start().await;

        // Second page, requested with the cursor from the first
        Mock::given(method("POST"))
            .and(path(format!("/v1/databases/{}/query", ACTIVITY_DB)))
            .and(body_partial_json(json!({"start_cursor": "cursor-2"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    parc_monceau_page("page-2"),
                    {"id": "page-gone", "archived": true, "properties": {}}
                ],
                "has_more": false
            })))
            .mount(&server)
            .await;

        // First page
        Mock::given(method("POST"))
            .and(path(format!("/v1/databases/{}/query", ACTIVITY_DB)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [parc_monceau_page("page-1")],
                "has_more": true,
                "next_cursor": "cursor-2"
            })))
            .mount(&server)
            .await;

        let records = test_store(&server)
            .query_all(ACTIVITY_DB)
            .await
            .expect("Failed to query");

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "page-1");
        assert_eq!(records[1].id, "page-2");
    }

    #[tokio::test]
    async fn test_query_by_date_sends_equality_filter() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(format!("/v1/databases/{}/query", ACTIVITY_DB)))
            .and(body_partial_json(json!({
                "filter": {"property": "Date", "date": {"equals": "2026-07-28"}}
            })))
            .and(header("Notion-Version", "2022-06-28"))
            .respond_with(ResponseTemplate::new(200).set_body_json(empty_query_response()))
            .expect(1)
            .mount(&server)
            .await;

        let records = test_store(&server)
            .query_by_date(ACTIVITY_DB, "Date", NaiveDate::from_ymd_opt(2026, 7, 28).unwrap())
            .await
            .expect("Failed to query");
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_archive_record_soft_deletes() {
        let server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/v1/pages/page-9"))
            .and(body_partial_json(json!({"archived": true})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        test_store(&server)
            .archive_record("page-9")
            .await
            .expect("Failed to archive");
    }
}

mod engine_tests {
    use super::*;

    async fn mount_activity_list(source: &MockServer, fixture: &str) {
        Mock::given(method("GET"))
            .and(path("/activitylist-service/activities/search/activities"))
            .respond_with(ResponseTemplate::new(200).set_body_string(fixture.to_string()))
            .mount(source)
            .await;
    }

    #[tokio::test]
    async fn test_unmatched_activity_is_created() {
        let source = MockServer::start().await;
        let store = MockServer::start().await;
        mount_activity_list(&source, include_str!("fixtures/activity_parc_monceau.json")).await;

        Mock::given(method("POST"))
            .and(path(format!("/v1/databases/{}/query", ACTIVITY_DB)))
            .respond_with(ResponseTemplate::new(200).set_body_json(empty_query_response()))
            .mount(&store)
            .await;

        Mock::given(method("POST"))
            .and(path("/v1/pages"))
            .and(body_partial_json(json!({
                "parent": {"database_id": ACTIVITY_DB},
                "properties": {
                    "Activity Type": {"select": {"name": "Running"}},
                    "Activity Name": {"title": [{"text": {"content": "Running"}}]},
                    "Distance (km)": {"number": 5.0},
                    "Duration (min)": {"number": 25.0},
                    "Avg Pace": {"rich_text": [{"text": {"content": "5:00 min/km"}}]},
                    "Location": {"rich_text": [{"text": {"content": "Parc Monceau"}}]},
                    "Date": {"date": {"start": "2026-07-28 06:12:00"}}
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(parc_monceau_page("page-new")))
            .expect(1)
            .mount(&store)
            .await;

        let stats = test_engine(&source, &store)
            .sync_activities(50, false)
            .await
            .expect("Sync failed");

        assert_eq!(stats.created, 1);
        assert_eq!(stats.total(), 1);
    }

    #[tokio::test]
    async fn test_replay_of_synced_batch_is_skipped() {
        let source = MockServer::start().await;
        let store = MockServer::start().await;
        mount_activity_list(&source, include_str!("fixtures/activity_parc_monceau.json")).await;

        Mock::given(method("POST"))
            .and(path(format!("/v1/databases/{}/query", ACTIVITY_DB)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [parc_monceau_page("page-1")],
                "has_more": false
            })))
            .mount(&store)
            .await;

        // No create, no update on replay
        Mock::given(method("POST"))
            .and(path("/v1/pages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&store)
            .await;
        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&store)
            .await;

        let stats = test_engine(&source, &store)
            .sync_activities(50, false)
            .await
            .expect("Sync failed");

        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.created, 0);
        assert_eq!(stats.updated, 0);
    }

    #[tokio::test]
    async fn test_retroactive_change_is_updated_and_location_preserved() {
        let source = MockServer::start().await;
        let store = MockServer::start().await;
        mount_activity_list(&source, include_str!("fixtures/activity_parc_monceau.json")).await;

        // Stored record carries a stale training-effect score
        let mut stale = parc_monceau_page("page-1");
        stale["properties"]["Aerobic"] = json!({"number": 2.9});

        Mock::given(method("POST"))
            .and(path(format!("/v1/databases/{}/query", ACTIVITY_DB)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [stale],
                "has_more": false
            })))
            .mount(&store)
            .await;

        Mock::given(method("PATCH"))
            .and(path("/v1/pages/page-1"))
            .and(body_partial_json(json!({
                "properties": {
                    "Aerobic": {"number": 3.2},
                    "Location": {"rich_text": [{"text": {"content": "Parc Monceau"}}]}
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&store)
            .await;

        let stats = test_engine(&source, &store)
            .sync_activities(50, false)
            .await
            .expect("Sync failed");

        assert_eq!(stats.updated, 1);
        assert_eq!(stats.created, 0);
    }

    #[tokio::test]
    async fn test_failed_create_does_not_abort_the_pass() {
        let source = MockServer::start().await;
        let store = MockServer::start().await;
        // Three activities, every create rejected by the store
        mount_activity_list(&source, include_str!("fixtures/activities.json")).await;

        Mock::given(method("POST"))
            .and(path(format!("/v1/databases/{}/query", ACTIVITY_DB)))
            .respond_with(ResponseTemplate::new(200).set_body_json(empty_query_response()))
            .mount(&store)
            .await;

        Mock::given(method("POST"))
            .and(path("/v1/pages"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(3)
            .mount(&store)
            .await;

        let stats = test_engine(&source, &store)
            .sync_activities(50, false)
            .await
            .expect("Pass should survive per-record write failures");

        assert_eq!(stats.failed, 3);
        assert_eq!(stats.total(), 3);
    }

    #[tokio::test]
    async fn test_sleep_night_is_created_with_goal_flag() {
        let source = MockServer::start().await;
        let store = MockServer::start().await;
        let date = NaiveDate::from_ymd_opt(2026, 7, 28).unwrap();

        Mock::given(method("GET"))
            .and(path("/wellness-service/wellness/dailySleepData/TestUser"))
            .and(query_param("date", "2026-07-28"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(include_str!("fixtures/sleep_2026-07-28.json")),
            )
            .mount(&source)
            .await;

        Mock::given(method("POST"))
            .and(path(format!("/v1/databases/{}/query", SLEEP_DB)))
            .and(body_partial_json(json!({
                "filter": {"property": "Long Date", "date": {"equals": "2026-07-28"}}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(empty_query_response()))
            .mount(&store)
            .await;

        // 22:45 -> 06:55 local with 7h35m asleep meets the goal
        Mock::given(method("POST"))
            .and(path("/v1/pages"))
            .and(body_partial_json(json!({
                "parent": {"database_id": SLEEP_DB},
                "icon": {"type": "emoji", "emoji": "😴"},
                "properties": {
                    "Date": {"title": [{"text": {"content": "28.07.2026"}}]},
                    "Times": {"rich_text": [{"text": {"content": "22:45 → 06:55"}}]},
                    "Long Date": {"date": {"start": "2026-07-28"}},
                    "Total Sleep (h)": {"number": 7.6},
                    "Sleep Goal": {"checkbox": true}
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "sleep-page-1", "properties": {}
            })))
            .expect(1)
            .mount(&store)
            .await;

        let stats = test_engine(&source, &store)
            .sync_sleep(&[date], false)
            .await
            .expect("Sleep sync failed");

        assert_eq!(stats.created, 1);
    }

    #[tokio::test]
    async fn test_existing_sleep_night_is_skipped() {
        let source = MockServer::start().await;
        let store = MockServer::start().await;
        let date = NaiveDate::from_ymd_opt(2026, 7, 28).unwrap();

        Mock::given(method("GET"))
            .and(path("/wellness-service/wellness/dailySleepData/TestUser"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(include_str!("fixtures/sleep_2026-07-28.json")),
            )
            .mount(&source)
            .await;

        Mock::given(method("POST"))
            .and(path(format!("/v1/databases/{}/query", SLEEP_DB)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"id": "sleep-page-1", "properties": {}}],
                "has_more": false
            })))
            .mount(&store)
            .await;

        Mock::given(method("POST"))
            .and(path("/v1/pages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&store)
            .await;

        let stats = test_engine(&source, &store)
            .sync_sleep(&[date], false)
            .await
            .expect("Sleep sync failed");

        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.created, 0);
    }

    #[tokio::test]
    async fn test_dedup_retires_later_duplicates_only() {
        let source = MockServer::start().await;
        let store = MockServer::start().await;

        let mut other = parc_monceau_page("page-c");
        other["properties"]["Duration (min)"] = json!({"number": 40.0});
        other["properties"]["Activity Name"] = json!({"title": [{"plain_text": "Yoga"}]});

        Mock::given(method("POST"))
            .and(path(format!("/v1/databases/{}/query", ACTIVITY_DB)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    parc_monceau_page("page-a"),
                    parc_monceau_page("page-b"),
                    other
                ],
                "has_more": false
            })))
            .mount(&store)
            .await;

        Mock::given(method("PATCH"))
            .and(path("/v1/pages/page-b"))
            .and(body_partial_json(json!({"archived": true})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&store)
            .await;

        let retired = test_engine(&source, &store)
            .dedup_activities(false)
            .await
            .expect("Dedup failed");

        assert_eq!(retired, vec!["page-b".to_string()]);
    }
}
