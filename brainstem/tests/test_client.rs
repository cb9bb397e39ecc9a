use brainstem::errors::{AggregateError, DeleteError, LoginError};
use brainstem::types::{StemUrl, Username};
use brainstem::{Account, Portal, Query, ResourceType, StemClient};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "secret-token";

fn api_url(server: &MockServer) -> StemUrl {
    format!("{}/api/", server.uri()).parse().unwrap()
}

fn client_for(server: &MockServer) -> StemClient {
    StemClient::new(api_url(server), TOKEN).unwrap()
}

/// Mount a GET mock for one record at its id-qualified path.
async fn mount_record(
    server: &MockServer,
    portal: &str,
    model: ResourceType,
    id: &str,
    record: Value,
) {
    let record_path = format!("/api/{}/{}/{}/{}/", portal, model.namespace(), model, id);
    let mut body = serde_json::Map::new();
    body.insert(model.singular_key().to_string(), record);
    Mock::given(method("GET"))
        .and(path(record_path))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::Object(body)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_load_by_id_sends_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/public/stem/dataset/abc/"))
        .and(header("authorization", format!("Bearer {}", TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"dataset": {"id": "abc"}})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let body = client
        .load(ResourceType::Dataset, Portal::Public, Some("abc"), &Query::new())
        .await
        .unwrap();
    assert_eq!(body["dataset"]["id"], "abc");
}

#[tokio::test]
async fn test_load_collection_serializes_modifiers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/public/stem/dataset/"))
        .and(query_param("filter{name}", "x"))
        .and(query_param("sort[]", "-name"))
        .and(query_param("include[]", "projects.*"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"datasets": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let query = Query::new()
        .filter("name", "x")
        .sort("-name")
        .include("projects");
    let records = client
        .load_list(ResourceType::Dataset, Portal::Public, &query)
        .await
        .unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_load_by_id_ignores_modifiers() {
    let server = MockServer::start().await;
    // the mock only matches the bare id path, with no query string
    Mock::given(method("GET"))
        .and(path("/api/public/stem/dataset/abc/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"dataset": {"id": "abc"}})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let query = Query::new().filter("name", "x");
    client
        .load(ResourceType::Dataset, Portal::Public, Some("abc"), &query)
        .await
        .unwrap();
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn test_load_untouched_record_round_trips_bytes() {
    let raw = r#"{"id":"abc","zeta":1,"alpha":{"b":2,"a":3},"extras":["x",null]}"#;
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/public/stem/dataset/abc/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(raw, "application/json"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let body = client
        .load(ResourceType::Dataset, Portal::Public, Some("abc"), &Query::new())
        .await
        .unwrap();
    assert_eq!(serde_json::to_string(&body).unwrap(), raw);
}

#[tokio::test]
async fn test_save_without_id_posts_to_collection() {
    let server = MockServer::start().await;
    let data = json!({"name": "new dataset"});
    Mock::given(method("POST"))
        .and(path("/api/private/stem/dataset/"))
        .and(body_json(&data))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"dataset": {"id": "new", "name": "new dataset"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let saved = client
        .save(ResourceType::Dataset, Portal::Private, None, &data)
        .await
        .unwrap();
    assert_eq!(saved["dataset"]["id"], "new");
}

#[tokio::test]
async fn test_save_with_id_patches_record() {
    let server = MockServer::start().await;
    let data = json!({"name": "renamed"});
    Mock::given(method("PATCH"))
        .and(path("/api/private/stem/dataset/abc/"))
        .and(body_json(&data))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"dataset": {"id": "abc", "name": "renamed"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .save(ResourceType::Dataset, Portal::Private, Some("abc"), &data)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_requires_id() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    let err = client
        .delete(ResourceType::Dataset, Portal::Private, "")
        .await
        .unwrap_err();
    assert!(matches!(err, DeleteError::MissingId));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_record() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/private/stem/dataset/abc/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .delete(ResourceType::Dataset, Portal::Private, "abc")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_get_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token/"))
        .and(body_json(json!({"username": "tester", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": TOKEN})))
        .mount(&server)
        .await;

    let account = Account::new(
        api_url(&server),
        Username::new("tester".to_string()),
        "pw".to_string(),
    );
    assert_eq!(account.get_token().await.unwrap(), TOKEN);
}

#[tokio::test]
async fn test_bad_credentials_fail_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token/"))
        .respond_with(ResponseTemplate::new(400))
        .expect(1)
        .mount(&server)
        .await;

    let account = Account::new(
        api_url(&server),
        Username::new("tester".to_string()),
        "wrong".to_string(),
    );
    let err = account.get_token().await.unwrap_err();
    assert!(matches!(err, LoginError::Failed(status) if status.as_u16() == 400));
}

async fn mount_full_graph(server: &MockServer) {
    mount_record(
        server,
        "public",
        ResourceType::Dataset,
        "d1",
        json!({
            "id": "d1",
            "name": "ds-2023-04-01",
            "date_time": "2023-04-01T12:00:00Z",
            "projects": ["p1"],
            "experimentdata": ["e1"],
            "datarepositories": ["r1"],
        }),
    )
    .await;
    mount_record(
        server,
        "public",
        ResourceType::Project,
        "p1",
        json!({
            "id": "p1",
            "name": "place cells",
            "description": "hippocampal recordings",
            "subjects": ["subj1"],
            "datasets": ["d1"],
        }),
    )
    .await;
    mount_record(
        server,
        "public",
        ResourceType::ExperimentData,
        "e1",
        json!({
            "id": "e1",
            "type": "Extracellular",
            "description": "probe in CA1",
            "hardware_device": "h1",
            "dataset": "d1",
            "actions": ["a1"],
        }),
    )
    .await;
    mount_record(
        server,
        "public",
        ResourceType::HardwareDevice,
        "h1",
        json!({"id": "h1", "name": "probe", "supplier": "sup1"}),
    )
    .await;
    mount_record(
        server,
        "public",
        ResourceType::Supplier,
        "sup1",
        json!({"id": "sup1", "name": "Open Ephys"}),
    )
    .await;
    mount_record(
        server,
        "public",
        ResourceType::DataRepository,
        "r1",
        json!({"id": "r1", "data_protocols_json": [{"path": "/data/session1"}]}),
    )
    .await;
    mount_record(
        server,
        "public",
        ResourceType::Action,
        "a1",
        json!({"id": "a1", "brain_region": "b1", "subject": "subj1"}),
    )
    .await;
    mount_record(
        server,
        "public",
        ResourceType::BrainRegion,
        "b1",
        json!({"id": "b1", "name": "CA1"}),
    )
    .await;
    mount_record(
        server,
        "public",
        ResourceType::Subject,
        "subj1",
        json!({
            "id": "subj1",
            "name": "mouse-07",
            "sex": "F",
            "birth_date": "2022-11-05",
            "strain": "st1",
            "projects": ["p1"],
            "actions": ["a1"],
        }),
    )
    .await;
    mount_record(
        server,
        "public",
        ResourceType::Strain,
        "st1",
        json!({"id": "st1", "name": "C57BL/6J", "species": "sp1"}),
    )
    .await;
    mount_record(
        server,
        "public",
        ResourceType::Species,
        "sp1",
        json!({"id": "sp1", "description": "mus musculus"}),
    )
    .await;
}

#[tokio::test]
async fn test_dataset_metadata_inlines_relations() {
    let server = MockServer::start().await;
    mount_full_graph(&server).await;

    let client = client_for(&server);
    let doc = client
        .dataset_metadata(Portal::Public, "d1")
        .await
        .unwrap();

    // raw id-list keys are replaced by inlined records
    assert!(doc.get("projects").is_none());
    assert!(doc.get("experimentdata").is_none());
    assert!(doc.get("datarepositories").is_none());

    assert_eq!(doc["project"]["name"], "place cells");
    assert!(doc["project"].get("subjects").is_none());
    assert!(doc["project"].get("datasets").is_none());

    let experiment_data = &doc["experiment_data"];
    assert_eq!(experiment_data["supplier"]["name"], "Open Ephys");
    assert_eq!(experiment_data["hardware_device"]["name"], "probe");
    assert!(experiment_data["hardware_device"].get("supplier").is_none());
    assert!(experiment_data.get("dataset").is_none());

    assert_eq!(doc["data_repository"]["id"], "r1");
    assert_eq!(doc["action"]["brain_region"]["name"], "CA1");

    let subject = &doc["subject"];
    assert_eq!(subject["strain"]["name"], "C57BL/6J");
    assert!(subject["strain"].get("species").is_none());
    assert_eq!(subject["species"]["description"], "mus musculus");
    assert!(subject.get("projects").is_none());
    assert!(subject.get("actions").is_none());
}

#[tokio::test]
async fn test_dataset_metadata_skips_empty_optional_branches() {
    let server = MockServer::start().await;
    mount_record(
        &server,
        "public",
        ResourceType::Dataset,
        "d2",
        json!({
            "id": "d2",
            "name": "bare",
            "projects": ["p1"],
            "experimentdata": ["e2"],
            "datarepositories": [],
        }),
    )
    .await;
    mount_record(
        &server,
        "public",
        ResourceType::Project,
        "p1",
        json!({"id": "p1", "name": "place cells"}),
    )
    .await;
    mount_record(
        &server,
        "public",
        ResourceType::ExperimentData,
        "e2",
        json!({
            "id": "e2",
            "type": "Extracellular",
            "hardware_device": "h1",
            "actions": [],
        }),
    )
    .await;
    mount_record(
        &server,
        "public",
        ResourceType::HardwareDevice,
        "h1",
        json!({"id": "h1", "supplier": "sup1"}),
    )
    .await;
    mount_record(
        &server,
        "public",
        ResourceType::Supplier,
        "sup1",
        json!({"id": "sup1", "name": "Open Ephys"}),
    )
    .await;

    let client = client_for(&server);
    let doc = client
        .dataset_metadata(Portal::Public, "d2")
        .await
        .unwrap();

    // absent, not null-filled
    assert!(doc.get("data_repository").is_none());
    assert!(doc.get("action").is_none());
    assert!(doc.get("subject").is_none());
}

#[tokio::test]
async fn test_dataset_metadata_aborts_on_missing_relation() {
    let server = MockServer::start().await;
    mount_record(
        &server,
        "public",
        ResourceType::Dataset,
        "d3",
        json!({"id": "d3", "name": "orphan", "projects": [], "experimentdata": ["e1"]}),
    )
    .await;

    let client = client_for(&server);
    let err = client
        .dataset_metadata(Portal::Public, "d3")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AggregateError::MissingRelation {
            model: ResourceType::Dataset,
            field: "projects"
        }
    ));
    // the traversal stops at the first unresolved relation
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_stored_token_skips_login() {
    use brainstem::store::{MemoryTokenStore, TokenStore};

    let server = MockServer::start().await;
    let account = Account::new(
        api_url(&server),
        Username::new("tester".to_string()),
        "pw".to_string(),
    );

    let mut store = MemoryTokenStore::default();
    store.store("stored-token").unwrap();
    let token = account.get_token_with(&mut store).await.unwrap();
    assert_eq!(token, "stored-token");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_fresh_token_is_handed_to_store() {
    use brainstem::store::{MemoryTokenStore, TokenStore};

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": TOKEN})))
        .expect(1)
        .mount(&server)
        .await;

    let account = Account::new(
        api_url(&server),
        Username::new("tester".to_string()),
        "pw".to_string(),
    );
    let mut store = MemoryTokenStore::default();
    let token = account.get_token_with(&mut store).await.unwrap();
    assert_eq!(token, TOKEN);
    assert_eq!(store.load().unwrap().as_deref(), Some(TOKEN));
}
