use async_trait::async_trait;
use pretty_assertions::assert_eq;
use recruit_engine::{
    filter_operators, sort_sections, CycleOutcome, EngineConfig, EngineError, FilterSpec,
    OperatorFetcher, RecruitSession, Section, SessionObserver, TagCatalog, Visibility,
    MAX_SELECTED_TAGS,
};
use recruit_model::{FilterKey, Operator, Rarity, Tag, TagId, TagRef};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

fn catalog() -> TagCatalog {
    TagCatalog::new(vec![
        Tag::new(28, "Robot").with_order(1),
        Tag::new(14, "Senior Operator").with_order(3),
        Tag::new(11, "Top Operator").with_order(4),
        Tag::new(9, "Melee"),
        Tag::new(10, "Ranged"),
        Tag::new(1, "Guard"),
        Tag::new(4, "Medic"),
        Tag::new(12, "Healing"),
        Tag::new(20, "DPS"),
        Tag::new(1012, "Female"),
    ])
}

fn op(id: &str, name: &str, rarity: u8, tags: &[TagId]) -> Operator {
    Operator::new(id, name, Rarity::new(rarity).unwrap(), "GUARD").with_tags(tags.iter().copied())
}

fn roster() -> Vec<Operator> {
    vec![
        op("c1", "Castle-3", 1, &[28, 9, 1]),
        op("c2", "Lancet-2", 1, &[28, 10, 4, 12]),
        op("c3", "Melantha", 3, &[9, 1, 20]),
        op("c4", "Ansel", 3, &[10, 4, 12]),
        op("c5", "Ptilopsis", 5, &[14, 10, 4, 12]),
        op("c6", "Siege", 6, &[11, 9, 20]),
        op("c7", "Blaze", 6, &[11, 9, 1, 20]),
    ]
}

/// Serves the roster like the data API in `any` mode and counts calls.
struct RosterFetcher {
    calls: Mutex<Vec<Vec<TagId>>>,
    failing: HashSet<TagId>,
}

impl RosterFetcher {
    fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failing: HashSet::new(),
        }
    }

    fn failing(ids: &[TagId]) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failing: ids.iter().copied().collect(),
        }
    }
}

#[async_trait]
impl OperatorFetcher for RosterFetcher {
    async fn fetch_operators(&self, tag_ids: &[TagId]) -> recruit_engine::Result<Vec<Operator>> {
        self.calls.lock().unwrap().push(tag_ids.to_vec());
        if tag_ids.iter().any(|id| self.failing.contains(id)) {
            return Err(EngineError::fetch("connection refused"));
        }
        Ok(roster()
            .into_iter()
            .filter(|op| tag_ids.iter().any(|id| op.has_tag(&TagRef::Id(*id))))
            .collect())
    }
}

#[derive(Default)]
struct Screen {
    frames: Vec<Vec<String>>,
    rollbacks: Vec<TagId>,
    notices: Vec<String>,
}

impl SessionObserver for Screen {
    fn on_render(&mut self, sections: &[Arc<Section>]) {
        self.frames.push(sections.iter().map(|s| s.key.clone()).collect());
    }

    fn on_rollback(&mut self, tag_ids: &[TagId]) {
        self.rollbacks.extend_from_slice(tag_ids);
    }

    fn on_notice(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }
}

fn keys(outcome: &CycleOutcome) -> Vec<String> {
    outcome.sections().iter().map(|s| s.key.clone()).collect()
}

#[tokio::test]
async fn toggling_fetches_only_new_tags() {
    let fetcher = RosterFetcher::new();
    let mut screen = Screen::default();
    let mut session = RecruitSession::new(catalog(), EngineConfig::default()).unwrap();

    session.toggle_and_refresh(9, &fetcher, &mut screen).await.unwrap();
    let outcome = session.toggle_and_refresh(20, &fetcher, &mut screen).await.unwrap();

    assert_eq!(*fetcher.calls.lock().unwrap(), vec![vec![9], vec![20]]);
    assert_eq!(keys(&outcome), vec!["DPS", "DPS-Melee", "Melee"]);
    assert_eq!(screen.frames.len(), 2);
}

#[tokio::test]
async fn top_operator_tag_unlocks_highest_tier() {
    let fetcher = RosterFetcher::new();
    let mut session = RecruitSession::new(catalog(), EngineConfig::default()).unwrap();

    let outcome = session.toggle_and_refresh(9, &fetcher, &mut ()).await.unwrap();
    let melee = &outcome.sections()[0];
    assert!(melee.members.iter().all(|op| !op.rarity.is_highest()));

    let outcome = session.toggle_and_refresh(11, &fetcher, &mut ()).await.unwrap();
    let top = outcome
        .sections()
        .iter()
        .find(|s| s.key == "Melee-Top Operator")
        .expect("combination section");
    let names: Vec<_> = top.members.iter().map(|op| op.name.as_str()).collect();
    assert_eq!(names, vec!["Blaze", "Siege"]);
}

#[tokio::test]
async fn fetch_failure_rolls_back_the_new_tag() {
    let fetcher = RosterFetcher::failing(&[12]);
    let mut screen = Screen::default();
    let mut session = RecruitSession::new(catalog(), EngineConfig::default()).unwrap();

    session.toggle_and_refresh(4, &fetcher, &mut screen).await.unwrap();
    let outcome = session.toggle_and_refresh(12, &fetcher, &mut screen).await.unwrap();

    assert!(matches!(outcome, CycleOutcome::RolledBack { .. }));
    assert_eq!(session.selection().ids(), vec![4]);
    assert_eq!(screen.rollbacks, vec![12]);
    assert_eq!(screen.notices, vec!["Fetch failed: connection refused"]);
    assert!(session
        .sections()
        .iter()
        .all(|s| !s.source_tag_ids.contains(&12)));

    // session stays usable
    let outcome = session.toggle_and_refresh(10, &fetcher, &mut screen).await.unwrap();
    assert_eq!(keys(&outcome), vec!["Medic", "Medic-Ranged", "Ranged"]);
}

#[tokio::test]
async fn guard_section_ignores_one_star_rarity() {
    let fetcher = RosterFetcher::new();
    let mut session = RecruitSession::new(catalog(), EngineConfig::default()).unwrap();
    session.toggle_and_refresh(28, &fetcher, &mut ()).await.unwrap();
    let outcome = session.toggle_and_refresh(1, &fetcher, &mut ()).await.unwrap();

    assert!(session.operators().get("c2").is_some());
    let members = |key: &str| -> Vec<String> {
        outcome
            .sections()
            .iter()
            .find(|s| s.key == key)
            .map(|s| s.members.iter().map(|op| op.name.clone()).collect())
            .unwrap_or_default()
    };
    assert_eq!(members("Guard"), vec!["Castle-3", "Melantha"]);
    assert_eq!(members("Guard-Robot"), vec!["Castle-3"]);
}

#[tokio::test]
async fn capacity_rejects_sixth_tag_without_mutation() {
    let fetcher = RosterFetcher::new();
    let mut screen = Screen::default();
    let mut session = RecruitSession::new(catalog(), EngineConfig::default()).unwrap();

    for id in [28, 9, 1, 20, 10] {
        session.toggle_and_refresh(id, &fetcher, &mut screen).await.unwrap();
    }
    assert_eq!(session.selection().selected_count(), MAX_SELECTED_TAGS);
    let before = session.selection().ids();
    let generation = session.generation();
    let calls = fetcher.calls.lock().unwrap().len();

    session.toggle_and_refresh(4, &fetcher, &mut screen).await.unwrap();
    assert_eq!(session.selection().ids(), before);
    assert_eq!(session.generation(), generation);
    assert_eq!(fetcher.calls.lock().unwrap().len(), calls);
    assert_eq!(screen.notices, vec!["Selection is full (5 tags)"]);
}

#[tokio::test]
async fn repeated_refresh_resolves_nothing_new() {
    let fetcher = RosterFetcher::new();
    let mut session = RecruitSession::new(catalog(), EngineConfig::default()).unwrap();
    for id in [9, 1, 20] {
        session.toggle_and_refresh(id, &fetcher, &mut ()).await.unwrap();
    }
    let first: Vec<String> = session.sections().iter().map(|s| s.key.clone()).collect();
    let resolutions = session.resolutions();

    let again = session.refresh(&fetcher, &mut ()).await;
    assert_eq!(keys(&again), first);
    assert_eq!(session.resolutions(), resolutions);
    assert_eq!(fetcher.calls.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn reserved_tags_cannot_be_selected() {
    let fetcher = RosterFetcher::new();
    let mut session = RecruitSession::new(catalog(), EngineConfig::default()).unwrap();
    let err = session
        .toggle_and_refresh(1012, &fetcher, &mut ())
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::UnknownTag(1012));
}

#[tokio::test]
async fn visibility_filters_rendered_sections() {
    let fetcher = RosterFetcher::new();
    let mut session = RecruitSession::new(catalog(), EngineConfig::default()).unwrap();
    session.toggle_and_refresh(28, &fetcher, &mut ()).await.unwrap();
    let outcome = session.toggle_and_refresh(12, &fetcher, &mut ()).await.unwrap();
    // Robot: lowest only; Healing: mixed; Healing-Robot: lowest only
    assert_eq!(outcome.sections().len(), 3);

    let hide_lowest = Visibility {
        hide_only_rarity_lowest: true,
        ..Default::default()
    };
    let visible: Vec<_> = hide_lowest
        .visible(outcome.sections())
        .iter()
        .map(|s| s.key.clone())
        .collect();
    assert_eq!(visible, vec!["Healing"]);
    assert_eq!(session.sections().len(), 3);
}

#[test]
fn ordering_example_from_mixed_rarities() {
    let single_small = Section::new(vec!["a".into()], vec![], vec![op("1", "x", 6, &[])]);
    let mixed = Section::new(
        vec!["b".into()],
        vec![],
        vec![op("2", "y", 4, &[]), op("3", "z", 6, &[])],
    );
    let single_large = Section::new(
        vec!["c".into()],
        vec![],
        vec![op("4", "p", 6, &[]), op("5", "q", 6, &[]), op("6", "r", 6, &[])],
    );
    let mut sections = vec![single_small, mixed, single_large];
    sort_sections(&mut sections);
    let order: Vec<_> = sections.iter().map(|s| (s.key.as_str(), s.len())).collect();
    assert_eq!(order, vec![("a", 1), ("c", 3), ("b", 2)]);
}

#[test]
fn matcher_example_from_json_spec() {
    let fang = Operator::new("v", "Fang", Rarity::new(3).unwrap(), "Vanguard").with_tags(["DPS", "Melee"]);
    let any: FilterSpec = serde_json::from_str(r#"{"any":{"profession":["Vanguard"]}}"#).unwrap();
    let all: FilterSpec = serde_json::from_str(r#"{"all":{"tagList":["Melee","Ranged"]}}"#).unwrap();
    assert_eq!(filter_operators([&fang], &any).len(), 1);
    assert!(filter_operators([&fang], &all).is_empty());
    assert!(any.any.contains_key(&FilterKey::Profession));
}
