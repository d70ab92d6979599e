use recruit_model::{FilterKey, Operator, Rarity, TagId, TagRef};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single value a filter compares against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Int(i64),
    Text(String),
}

impl From<TagId> for FilterValue {
    fn from(id: TagId) -> Self {
        Self::Int(i64::from(id))
    }
}

impl From<&str> for FilterValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Rarity> for FilterValue {
    fn from(rarity: Rarity) -> Self {
        Self::Int(i64::from(rarity.get()))
    }
}

/// One value or a list of values for a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Criterion {
    Many(Vec<FilterValue>),
    One(FilterValue),
}

impl Criterion {
    pub fn many<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FilterValue>,
    {
        Self::Many(values.into_iter().map(Into::into).collect())
    }

    pub fn one(value: impl Into<FilterValue>) -> Self {
        Self::One(value.into())
    }
}

/// AND/OR filter over operator fields.
///
/// `all` entries must every one hold; `any` needs a single hit unless empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    #[serde(default)]
    pub all: BTreeMap<FilterKey, Criterion>,

    #[serde(default)]
    pub any: BTreeMap<FilterKey, Criterion>,

    /// Exclude operators without the recruitment marker before anything else
    #[serde(default, rename = "requireRecruitable")]
    pub require_recruitable: bool,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add an AND condition
    #[must_use]
    pub fn all(mut self, key: FilterKey, criterion: Criterion) -> Self {
        self.all.insert(key, criterion);
        self
    }

    /// Builder: add an OR condition
    #[must_use]
    pub fn any(mut self, key: FilterKey, criterion: Criterion) -> Self {
        self.any.insert(key, criterion);
        self
    }

    /// Builder: require the recruitment marker
    #[must_use]
    pub const fn recruitable_only(mut self) -> Self {
        self.require_recruitable = true;
        self
    }
}

/// Decide whether `operator` satisfies `spec`.
#[must_use]
pub fn matches(operator: &Operator, spec: &FilterSpec) -> bool {
    if spec.require_recruitable && !operator.recruitable {
        return false;
    }

    let all_pass = spec.all.iter().all(|(key, criterion)| match criterion {
        Criterion::One(value) => field_holds(operator, *key, value),
        Criterion::Many(values) if is_sequence(*key) => {
            values.iter().all(|v| field_holds(operator, *key, v))
        }
        Criterion::Many(values) => values.iter().any(|v| field_holds(operator, *key, v)),
    });
    if !all_pass {
        return false;
    }

    if spec.any.is_empty() {
        return true;
    }
    spec.any.iter().any(|(key, criterion)| match criterion {
        Criterion::One(value) => field_holds(operator, *key, value),
        Criterion::Many(values) => values.iter().any(|v| field_holds(operator, *key, v)),
    })
}

/// Operators from `operators` that satisfy `spec`, in input order.
pub fn filter_operators<'a, I>(operators: I, spec: &FilterSpec) -> Vec<&'a Operator>
where
    I: IntoIterator<Item = &'a Operator>,
{
    operators.into_iter().filter(|op| matches(op, spec)).collect()
}

const fn is_sequence(key: FilterKey) -> bool {
    matches!(key, FilterKey::TagList)
}

/// Equality for scalar fields, containment for sequence fields.
fn field_holds(operator: &Operator, key: FilterKey, value: &FilterValue) -> bool {
    match key {
        FilterKey::Rarity => match value {
            FilterValue::Int(n) => i64::from(operator.rarity.get()) == *n,
            FilterValue::Text(s) => Rarity::parse(s).is_ok_and(|r| r == operator.rarity),
        },
        FilterKey::Position => text_eq(operator.position.as_deref(), value),
        FilterKey::Profession => text_eq(Some(&operator.profession), value),
        FilterKey::SubProfession => text_eq(Some(&operator.sub_profession_id), value),
        FilterKey::TagList => match value {
            FilterValue::Int(n) => TagId::try_from(*n)
                .map(|id| operator.has_tag(&TagRef::Id(id)))
                .unwrap_or(false),
            FilterValue::Text(s) => operator.tags.iter().any(|t| matches!(t, TagRef::Name(n) if n == s)),
        },
    }
}

fn text_eq(field: Option<&str>, value: &FilterValue) -> bool {
    match (field, value) {
        (Some(field), FilterValue::Text(s)) => field == s,
        _ => false,
    }
}
