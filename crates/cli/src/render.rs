use recruit_engine::{ClassifiedTags, Section, SessionObserver, Visibility};
use recruit_model::TagId;
use serde::Serialize;
use std::fmt::Write as _;
use std::sync::Arc;

/// Collects what a session reports so the command can print it at the end.
#[derive(Debug, Default)]
pub struct Presenter {
    pub sections: Vec<Arc<Section>>,
    pub notices: Vec<String>,
    pub rolled_back: Vec<TagId>,
    pub frames: usize,
}

impl SessionObserver for Presenter {
    fn on_render(&mut self, sections: &[Arc<Section>]) {
        self.frames += 1;
        self.sections = sections.to_vec();
    }

    fn on_rollback(&mut self, deselected: &[TagId]) {
        self.rolled_back.extend_from_slice(deselected);
    }

    fn on_notice(&mut self, message: &str) {
        log::warn!("{message}");
        self.notices.push(message.to_string());
    }
}

#[derive(Debug, Serialize)]
pub struct QueryReport<'a> {
    pub selected: Vec<SelectedName>,
    pub sections: Vec<&'a Section>,
    pub hidden: usize,
    pub notices: &'a [String],
}

#[derive(Debug, Serialize)]
pub struct SelectedName {
    pub id: TagId,
    pub name: String,
}

impl<'a> QueryReport<'a> {
    pub fn new(selected: Vec<SelectedName>, presenter: &'a Presenter, visibility: Visibility) -> Self {
        let sections: Vec<&Section> = visibility
            .visible(&presenter.sections)
            .into_iter()
            .map(|s| &**s)
            .collect();
        Self {
            hidden: presenter.sections.len() - sections.len(),
            selected,
            sections,
            notices: &presenter.notices,
        }
    }

    pub fn to_text(&self, locale: &str) -> String {
        let mut out = String::new();
        let names: Vec<&str> = self.selected.iter().map(|s| s.name.as_str()).collect();
        let _ = writeln!(out, "Selected: {}", names.join(", "));
        if self.sections.is_empty() {
            let _ = writeln!(out, "No matching operators.");
        }
        for section in &self.sections {
            let _ = writeln!(out);
            let _ = writeln!(out, "{} ({})", section.title.join(" + "), section.len());
            for op in &section.members {
                let _ = writeln!(out, "  {}* {}", op.rarity, op.display_name(locale));
            }
        }
        if self.hidden > 0 {
            let _ = writeln!(out);
            let _ = writeln!(out, "{} section(s) hidden by preferences", self.hidden);
        }
        out
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryListing<'a> {
    pub category: String,
    pub tags: Vec<TagLine<'a>>,
}

#[derive(Debug, Serialize)]
pub struct TagLine<'a> {
    pub id: TagId,
    pub name: std::borrow::Cow<'a, str>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub active: bool,
}

/// Catalog grouped by category; with `only`, just those tag ids.
/// `active` marks the finder's highlighted hit.
pub fn tag_listing<'a>(
    classified: &'a ClassifiedTags,
    locale: &str,
    only: Option<&[TagId]>,
    active: Option<TagId>,
) -> Vec<CategoryListing<'a>> {
    classified
        .iter()
        .map(|(category, tags)| CategoryListing {
            category: category.to_string(),
            tags: tags
                .iter()
                .filter(|t| only.map_or(true, |ids| ids.contains(&t.id)))
                .map(|t| TagLine {
                    id: t.id,
                    name: t.display_name(locale),
                    active: active == Some(t.id),
                })
                .collect(),
        })
        .filter(|group| !group.tags.is_empty())
        .collect()
}

pub fn listing_text(listing: &[CategoryListing<'_>]) -> String {
    let mut out = String::new();
    for group in listing {
        let _ = writeln!(out, "{}:", group.category);
        for tag in &group.tags {
            let marker = if tag.active { '>' } else { ' ' };
            let _ = writeln!(out, "{marker} {:>4}  {}", tag.id, tag.name);
        }
    }
    out
}
