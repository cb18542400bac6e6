//! Integration tests using wiremock to simulate a TeamCity server.

use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use teamcity_rest::types::{BuildState, Project, Properties, TestOccurrenceQuery, BUILD_FIELDS};
use teamcity_rest::{CancellationToken, Client, Error, Outcome};
use wiremock::matchers::{basic_auth, body_json, body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const REST: &str = "/app/rest/latest";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn client_for(server: &MockServer) -> Client {
    init_tracing();
    Client::builder()
        .host(server.uri())
        .credentials("admin", "secret")
        .max_attempts(3)
        .timeout(Duration::from_millis(500))
        .build()
        .unwrap()
}

async fn received(server: &MockServer) -> usize {
    server.received_requests().await.unwrap().len()
}

#[tokio::test]
async fn test_get_sends_auth_and_accept() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{REST}/projects/id:Widgets")))
        .and(basic_auth("admin", "secret"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "Widgets",
            "name": "Widgets",
            "parentProjectId": "_Root",
            "href": "/app/rest/projects/id:Widgets"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let project = client.project("Widgets").await.unwrap();

    let Outcome::Found(project) = project else {
        panic!("Expected project, got {project:?}");
    };
    assert_eq!(project.id.as_deref(), Some("Widgets"));
    assert_eq!(project.parent_project_id.as_deref(), Some("_Root"));

    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("content-type").is_none());
}

#[tokio::test]
async fn test_not_found_is_absent_for_get_and_list() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    assert_eq!(client.project("Missing").await.unwrap(), Outcome::Absent);
    assert_eq!(client.vcs_root("Missing").await.unwrap(), Outcome::Absent);
    assert_eq!(client.agent_pool_by_name("Missing").await.unwrap(), Outcome::Absent);
    assert!(client.projects().await.unwrap().is_empty());
    assert!(client.builds().await.unwrap().is_empty());

    // Absence is a definite answer, never retried.
    assert_eq!(received(&mock_server).await, 5);
}

#[tokio::test]
async fn test_list_returns_items_in_server_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{REST}/projects")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 7,
            "href": "/app/rest/projects",
            "project": [
                {"id": "B", "name": "Beta", "parentProjectId": "_Root"},
                {"id": "A", "name": "Alpha", "parentProjectId": "_Root"}
            ]
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    let projects = client.projects().await.unwrap();
    let ids: Vec<_> = projects.iter().map(|p| p.id.as_deref().unwrap()).collect();
    assert_eq!(ids, ["B", "A"]);

    let summaries = client.project_summaries().await.unwrap();
    assert_eq!(summaries[1].name, "Alpha");
}

#[tokio::test]
async fn test_create_returns_server_canonical_object() {
    let mock_server = MockServer::start().await;

    let input = Project::new("Widgets", "_Root");
    assert!(input.id.is_none());

    Mock::given(method("POST"))
        .and(path(format!("{REST}/projects")))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"name": "Widgets", "parentProject": {"locator": "id:_Root"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "Widgets",
            "name": "Widgets",
            "parentProjectId": "_Root",
            "href": "/app/rest/projects/id:Widgets",
            "webUrl": "http://localhost/project.html?projectId=Widgets"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let created = client.create_project(&input).await.unwrap();

    assert_eq!(created.id.as_deref(), Some("Widgets"));
    assert_eq!(created.href.as_deref(), Some("/app/rest/projects/id:Widgets"));
    assert_eq!(created.parent_project_id.as_deref(), Some("_Root"));
    assert!(created.parent_project.is_none());
}

#[tokio::test]
async fn test_create_without_echo_is_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{REST}/vcs-roots")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let root = teamcity_rest::types::VcsRoot::new("repo", "jetbrains.git", "Widgets", Properties::new());
    let result = client.create_vcs_root(&root).await;

    match result {
        Err(Error::NotCreated(resource)) => assert_eq!(resource, "VCS root"),
        _ => panic!("Expected NotCreated, got {result:?}"),
    }
}

#[tokio::test]
async fn test_create_rejected_with_json_body_is_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{REST}/projects")))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"message": "Project name cannot be empty"})),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("PUT"))
        .and(path(format!("{REST}/projects/id:Widgets/parameters")))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"property": []})))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    let result = client.create_project(&Project::new("", "_Root")).await;
    match result {
        Err(Error::Protocol { status, message }) => {
            assert_eq!(status.as_u16(), 400);
            assert!(message.contains("Project name cannot be empty"), "got {message}");
        }
        _ => panic!("Expected Protocol error, got {result:?}"),
    }

    let err = client
        .replace_project_parameters("Widgets", &Properties::new())
        .await
        .unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(500));

    // Rejections are not retried.
    assert_eq!(received(&mock_server).await, 2);
}

/// A payload whose encoding always fails.
struct Unencodable;

impl serde::Serialize for Unencodable {
    fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
        Err(serde::ser::Error::custom("nope"))
    }
}

#[tokio::test]
async fn test_serialization_failure_is_never_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let path = client.rest_path("projects");
    let attempts = AtomicUsize::new(0);

    let (client_ref, path_ref, payload, attempts_ref) = (&client, &path, &Unencodable, &attempts);
    let result = client
        .retrying(move || {
            attempts_ref.fetch_add(1, Ordering::SeqCst);
            client_ref.json::<_, serde_json::Value>(http::Method::POST, path_ref, Some(payload))
        })
        .await;

    match result {
        Err(Error::Serialization(message)) => assert!(message.contains("nope"), "got {message}"),
        _ => panic!("Expected Serialization error, got {result:?}"),
    }
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
    assert_eq!(received(&mock_server).await, 0);
}

#[tokio::test]
async fn test_text_error_body_becomes_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(format!("{REST}/buildTypes/id:App_Build/parameters/env.PORT")))
        .and(header("content-type", "text/plain"))
        .and(header("accept", "text/plain"))
        .and(body_string("not-a-port"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_raw("invalid value", "text/plain"),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .replace_build_configuration_parameter("App_Build", "env.PORT", "not-a-port")
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "invalid value");
    assert_eq!(err.status().map(|s| s.as_u16()), Some(400));
    assert!(!err.is_transient());
    assert_eq!(received(&mock_server).await, 1);
}

#[tokio::test]
async fn test_text_error_with_charset_is_recognised() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_raw("Responding with error, status code: 500", "text/plain;charset=UTF-8"),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.server().await;

    match result {
        Err(Error::Protocol { status, message }) => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(message, "Responding with error, status code: 500");
        }
        _ => panic!("Expected Protocol error, got {result:?}"),
    }
    assert_eq!(received(&mock_server).await, 1);
}

#[tokio::test]
async fn test_decode_error_truncates_body() {
    let mock_server = MockServer::start().await;
    let body = format!("<html>{}</html>", "a".repeat(3000));

    Mock::given(method("GET"))
        .and(path(format!("{REST}/server")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(body.clone(), "text/html"),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.server().await.unwrap_err();

    match &err {
        Error::Decode { status, body: excerpt, .. } => {
            assert_eq!(status.as_u16(), 200);
            assert_eq!(excerpt.chars().count(), 1000);
            assert!(body.starts_with(excerpt.as_str()));
        }
        _ => panic!("Expected Decode error, got {err:?}"),
    }
    assert!(!err.to_string().contains(&"a".repeat(1000)));
    assert_eq!(received(&mock_server).await, 1);
}

#[tokio::test]
async fn test_non_text_error_status_is_decoded_best_effort() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({"version": "maintenance"})))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let server = client.server().await.unwrap();

    assert_eq!(server.into_option().unwrap().version, "maintenance");
}

#[tokio::test]
async fn test_empty_success_body_is_absent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{REST}/builds/id:1234")))
        .and(body_json(json!({"comment": "stop", "readIntoQueue": true})))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    assert_eq!(client.cancel_build(1234, "stop").await.unwrap(), Outcome::Absent);
}

#[tokio::test]
async fn test_delete_reports_server_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!("{REST}/projects/id:Widgets")))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("{REST}/projects/id:Locked")))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_raw("<html>boom</html>", "text/html"),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    client.delete_project("Widgets").await.unwrap();
    client.delete_project("Gone").await.unwrap();

    let err = client.delete_project("Locked").await.unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(500));
}

#[tokio::test]
async fn test_build_configuration_text_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(format!("{REST}/buildTypes/id:App_Build/paused")))
        .and(body_string("true"))
        .respond_with(ResponseTemplate::new(200).set_body_string("true"))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("PUT"))
        .and(path(format!("{REST}/buildTypes/id:App_Build/template")))
        .and(header("accept", "application/json"))
        .and(header("content-type", "text/plain"))
        .and(body_string("id:Tpl"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "Tpl"})))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("{REST}/buildTypes/id:App_Build/template")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("PUT"))
        .and(path(format!("{REST}/projects/id:Widgets/description")))
        .and(body_string("All the widgets"))
        .respond_with(ResponseTemplate::new(200).set_body_string("All the widgets"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    client.set_build_configuration_paused("App_Build", true).await.unwrap();
    client
        .set_build_configuration_template("App_Build", Some("Tpl"))
        .await
        .unwrap();
    client
        .set_build_configuration_template("App_Build", None)
        .await
        .unwrap();
    client
        .set_project_field("Widgets", "Description", "All the widgets")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_replace_parameters_returns_server_copy() {
    let mock_server = MockServer::start().await;
    let parameters: Properties = [("env.A", "1")].into_iter().collect();

    Mock::given(method("PUT"))
        .and(path(format!("{REST}/projects/id:Widgets/parameters")))
        .and(body_json(json!({"count": 1, "property": [{"name": "env.A", "value": "1"}]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 2,
            "property": [
                {"name": "env.A", "value": "1"},
                {"name": "env.INHERITED", "value": "x", "inherited": true}
            ]
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("PUT"))
        .and(path(format!("{REST}/vcs-roots/id:Repo/properties")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    let updated = client
        .replace_project_parameters("Widgets", &parameters)
        .await
        .unwrap();
    assert_eq!(updated.len(), 2);
    assert_eq!(updated.get("env.INHERITED"), Some("x"));

    let err = client
        .replace_vcs_root_properties("Repo", &parameters)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotUpdated(_)));
}

#[tokio::test]
async fn test_queue_build_sends_branch_ref() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{REST}/buildQueue")))
        .and(body_json(json!({
            "buildTypeId": "App_Build",
            "properties": {"count": 1, "property": [{"name": "env.DEPLOY", "value": "true"}]},
            "branchName": "refs/heads/main"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 29,
            "buildTypeId": "App_Build",
            "state": "queued",
            "queuedDate": "20200119T190211+0000"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let properties: Properties = [("env.DEPLOY", "true")].into_iter().collect();
    let build = client
        .queue_build("App_Build", Some("main"), properties)
        .await
        .unwrap();

    assert_eq!(build.id, 29);
    assert_eq!(build.computed_state(), BuildState::Queued);
}

#[tokio::test]
async fn test_builds_listing_and_lookup() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{REST}/builds")))
        .and(query_param("fields", format!("count,build({BUILD_FIELDS})")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 2,
            "build": [
                {
                    "id": 2, "buildTypeId": "Plugin_Build", "number": "2", "status": "SUCCESS",
                    "state": "finished", "running": false, "href": "/app/rest/builds/id:2",
                    "buildType": {"id": "Plugin_Build", "name": "Build", "projectId": "Plugin"},
                    "tags": {"tag": []},
                    "queuedDate": "20200119T190211+0000",
                    "startDate": "20200119T190249+0000",
                    "finishDate": "20200119T190252+0000",
                    "triggered": {"type": "user", "user": {"username": "paul", "id": 1}},
                    "changes": {"count": 0, "href": "/app/rest/changes?locator=build:(id:2)", "change": []},
                    "agent": {"id": 1, "name": "ip_10.0.2.15", "typeId": 1}
                },
                {"id": 1, "buildTypeId": "Plugin_Build", "number": "1", "state": "finished"}
            ]
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{REST}/buildTypes/id:Plugin_Build/builds")))
        .and(query_param("locator", "branch:main,number:2,count:1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1, "build": [{"id": 2}]
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{REST}/buildTypes/id:Plugin_Build/builds")))
        .and(query_param("locator", "branch:main,number:99,count:1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 0, "build": []})))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{REST}/builds/id:2/resulting-properties")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "property": [{"name": "build.counter", "value": "12"}], "count": 1
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    let builds = client.builds().await.unwrap();
    assert_eq!(builds.len(), 2);
    assert_eq!(builds[0].id, 2);
    assert_eq!(builds[0].computed_state(), BuildState::Finished);
    assert_eq!(
        builds[0].triggered.as_ref().unwrap().user.as_ref().unwrap().username.as_deref(),
        Some("paul")
    );
    assert_eq!(builds[1].computed_state(), BuildState::Unknown);

    assert_eq!(
        client.find_build_id("Plugin_Build", "main", "2").await.unwrap(),
        Outcome::Found(2)
    );
    assert_eq!(
        client.find_build_id("Plugin_Build", "main", "99").await.unwrap(),
        Outcome::Absent
    );

    let properties = client.build_properties("2").await.unwrap();
    assert_eq!(properties.len(), 1);
    assert_eq!(properties[0].value, "12");
}

#[tokio::test]
async fn test_build_detail_collections_follow_hrefs() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/app/rest/changes"))
        .and(query_param("locator", "build:(id:2),count:99999"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1, "change": [{"id": 7, "version": "2691bc37", "username": "paul"}]
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/app/rest/testOccurrences"))
        .and(query_param("locator", "build:(id:2),currentlyMuted:false,status:FAILURE,count:5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1, "testOccurrence": [{"id": "t1", "name": "it_works", "status": "FAILURE"}]
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/app/rest/problemOccurrences"))
        .and(query_param("locator", "build:(id:2),count:3"))
        .and(query_param("fields", "*,problemOccurrence(*,details)"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1, "problemOccurrence": [{"id": "p1", "type": "TC_EXIT_CODE", "details": "exit 1"}]
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    let changes = client
        .changes("/app/rest/changes?locator=build:(id:2)")
        .await
        .unwrap();
    assert_eq!(changes[0].version.as_deref(), Some("2691bc37"));

    let query = TestOccurrenceQuery {
        count: 5,
        failing_only: true,
        ignore_muted: true,
    };
    let tests = client
        .test_occurrences("/app/rest/testOccurrences?locator=build:(id:2)", &query)
        .await
        .unwrap();
    assert_eq!(tests[0].name.as_deref(), Some("it_works"));

    let problems = client
        .problem_occurrences("/app/rest/problemOccurrences?locator=build:(id:2)", 3)
        .await
        .unwrap();
    assert_eq!(problems[0].kind.as_deref(), Some("TC_EXIT_CODE"));
}

#[tokio::test]
async fn test_agents_and_build_log() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{REST}/agents")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "agent": [{
                "id": 1,
                "name": "ip_10.0.2.15",
                "connected": true,
                "enabled": true,
                "authorized": true,
                "uptodate": true,
                "build": {"id": 31, "buildTypeId": "Plugin_TestBuild", "state": "running"}
            }]
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/httpAuth/downloadBuildLog.html"))
        .and(query_param("buildId", "31"))
        .and(header("accept", "text/plain"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[12:00:00] Step 1/1"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    let agents = client.agents().await.unwrap();
    assert_eq!(agents.len(), 1);
    assert!(agents[0].connected && agents[0].up_to_date);
    assert_eq!(
        agents[0].active_build.as_ref().unwrap().build_type_id.as_deref(),
        Some("Plugin_TestBuild")
    );

    let log = client.build_log("31").await.unwrap();
    assert_eq!(log, Outcome::Found("[12:00:00] Step 1/1".to_string()));
}

#[tokio::test]
async fn test_timeouts_are_retried_until_success() {
    let mock_server = MockServer::start().await;
    let attempt_count = Arc::new(AtomicUsize::new(0));
    let attempt_count_clone = attempt_count.clone();

    // First two attempts outlive the per-attempt timeout, third answers.
    Mock::given(method("GET"))
        .and(path(format!("{REST}/server")))
        .respond_with(move |_req: &wiremock::Request| {
            let count = attempt_count_clone.fetch_add(1, Ordering::SeqCst);
            let response = ResponseTemplate::new(200).set_body_json(json!({"version": "2023.11"}));
            if count < 2 {
                response.set_delay(Duration::from_secs(2))
            } else {
                response
            }
        })
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .host(mock_server.uri())
        .max_attempts(5)
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();

    let server = client.server().await.unwrap();
    assert_eq!(server.into_option().unwrap().version, "2023.11");
    assert_eq!(attempt_count.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_timeouts_exhaust_attempt_budget() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"version": "late"}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .host(mock_server.uri())
        .max_attempts(3)
        .timeout(Duration::from_millis(100))
        .build()
        .unwrap();

    let err = client.server().await.unwrap_err();
    assert!(matches!(err, Error::Transport { transient: true, .. }), "got {err:?}");
    assert_eq!(received(&mock_server).await, 3);
}

#[tokio::test]
async fn test_connection_refused_is_transient() {
    let client = Client::builder()
        .host("http://127.0.0.1:1")
        .max_attempts(2)
        .timeout(Duration::from_millis(500))
        .build()
        .unwrap();

    let err = client.project("Widgets").await.unwrap_err();
    assert!(err.is_transient(), "got {err:?}");
}

#[tokio::test]
async fn test_deadline_spans_attempts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .host(mock_server.uri())
        .max_attempts(100)
        .timeout(Duration::from_millis(100))
        .deadline(Duration::from_millis(350))
        .build()
        .unwrap();

    let err = client.server().await.unwrap_err();
    assert!(matches!(err, Error::DeadlineExceeded { .. }), "got {err:?}");
    assert!(received(&mock_server).await < 100);
}

#[tokio::test]
async fn test_cancellation_aborts_call() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .host(mock_server.uri())
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap();

    let token = CancellationToken::new();
    let scoped = client.with_cancellation(token.clone());
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        token.cancel();
    });

    let err = scoped.server().await.unwrap_err();
    assert!(matches!(err, Error::Cancelled), "got {err:?}");
}

#[tokio::test]
async fn test_concurrent_calls_share_client() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{REST}/server")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"version": "2023.11"})))
        .expect(4)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move { client.server().await })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().unwrap().is_found());
    }
}
