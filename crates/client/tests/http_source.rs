use pretty_assertions::assert_eq;
use recruit_client::{load_catalog, ApiConfig, ClientError, HttpSource, RecruitmentSource, SyncOrigin};
use recruit_engine::{CycleOutcome, EngineConfig, RecruitSession, TagCatalog};
use recruit_protocol::{MatchMode, SetupPayload};
use recruit_server::{apply_setup, serve_on, Database};
use recruit_store::LocalStore;
use tempfile::TempDir;
use tokio::net::TcpListener;

const PAYLOAD: &str = r#"{
    "tags": {"updatedAt": "2025-03-01T00:00:00Z", "data": [
        {"id": 9, "name_en": "Melee"},
        {"id": 10, "name_en": "Ranged"},
        {"id": 14, "name_en": "Senior Operator"},
        {"id": 20, "name_en": "DPS"}
    ]},
    "recruitment_list": {"updatedAt": "2025-03-01T00:00:00Z", "data": [
        {"id": "char_1", "appellation": "Melantha", "rarity": "TIER_3", "profession": "WARRIOR",
         "position": "MELEE", "tags": [9, 20]},
        {"id": "char_2", "appellation": "Kroos", "rarity": "TIER_3", "profession": "SNIPER",
         "position": "RANGED", "tags": [10, 20]},
        {"id": "char_3", "appellation": "Beagle", "rarity": "TIER_3", "profession": "TANK",
         "position": "MELEE", "tags": [9]}
    ]}
}"#;

async fn start() -> (HttpSource, TempDir) {
    let dir = TempDir::new().unwrap();
    let db = Database::new(dir.path().join("recruit.db"));
    let payload: SetupPayload = serde_json::from_str(PAYLOAD).unwrap();
    let mut conn = db.connect().unwrap();
    apply_setup(&mut conn, &payload).unwrap();
    drop(conn);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(serve_on(listener, db));

    let source = HttpSource::new(&ApiConfig::default().with_base_url(base)).unwrap();
    (source, dir)
}

#[tokio::test]
async fn fetches_tags_and_operators() {
    let (source, _dir) = start().await;

    let tags = source.fetch_tags().await.unwrap();
    assert_eq!(tags.len(), 4);
    assert_eq!(tags[0].display_name("en"), "Melee");

    let both = source.fetch_operators(&[9, 20], MatchMode::All).await.unwrap();
    assert_eq!(both.len(), 1);
    assert_eq!(both[0].name, "Melantha");
    assert_eq!(both[0].position.as_deref(), Some("MELEE"));

    let either = source.fetch_operators(&[9, 10], MatchMode::Any).await.unwrap();
    assert_eq!(either.len(), 3);

    let everyone = source.fetch_operators(&[], MatchMode::All).await.unwrap();
    assert_eq!(everyone.len(), 3);
}

#[tokio::test]
async fn catalog_sync_through_the_api() {
    let (source, _dir) = start().await;
    let store = LocalStore::in_memory();

    let sync = load_catalog(&source, &store, false).await.unwrap();
    assert_eq!(sync.origin, SyncOrigin::Refreshed);
    assert_eq!(sync.stored_operators, 3);

    let again = load_catalog(&source, &store, false).await.unwrap();
    assert_eq!(again.origin, SyncOrigin::UpToDate);
}

#[tokio::test]
async fn session_resolves_sections_over_http() {
    let (source, _dir) = start().await;
    let tags = source.fetch_tags().await.unwrap();
    let mut session = RecruitSession::new(TagCatalog::new(tags), EngineConfig::default()).unwrap();
    let fetcher: &dyn RecruitmentSource = &source;

    session.toggle_and_refresh(9, fetcher, &mut ()).await.unwrap();
    let outcome = session.toggle_and_refresh(20, fetcher, &mut ()).await.unwrap();

    let keys: Vec<&str> = match &outcome {
        CycleOutcome::Rendered(sections) => sections.iter().map(|s| s.key.as_str()).collect(),
        other => panic!("unexpected outcome {other:?}"),
    };
    assert_eq!(keys, vec!["DPS-Melee", "DPS", "Melee"]);
}

#[tokio::test]
async fn bundle_and_error_statuses() {
    let (source, _dir) = start().await;

    let bundle = source.fetch_bundle().await.unwrap();
    assert_eq!(bundle.tags.updated_at.as_deref(), Some("2025-03-01T00:00:00Z"));
    assert_eq!(bundle.recruitment_list.data.len(), 3);

    let misrouted = format!("{}/missing", source.base_url());
    let client = HttpSource::new(&ApiConfig::default().with_base_url(misrouted)).unwrap();
    match client.fetch_tags().await {
        Err(ClientError::Status { status, .. }) => assert_eq!(status, 404),
        other => panic!("expected a status error, got {other:?}"),
    }
}
