use recruit_model::{Operator, Rarity, TagId};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::cmp::Ordering;

/// Operators matching one tag or one tag combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Canonical key: sorted titles joined with `-`
    pub key: String,

    /// Localized tag names in selection order
    pub title: Vec<String>,

    #[serde(rename = "sourceTagIds")]
    pub source_tag_ids: Vec<TagId>,

    /// Ascending rarity, then name
    pub members: Vec<Operator>,

    /// Some member is of a common tier (2 or 3)
    #[serde(rename = "rarityCommon")]
    pub rarity_common: bool,

    /// Every member is of the lowest tier
    #[serde(rename = "onlyRarityLowest")]
    pub only_rarity_lowest: bool,
}

impl Section {
    /// Build a section from already sorted members and compute its flags.
    pub fn new(title: Vec<String>, source_tag_ids: Vec<TagId>, members: Vec<Operator>) -> Self {
        let key = section_key(&title);
        let rarity_common = members.iter().any(|op| op.rarity.is_common());
        let only_rarity_lowest =
            !members.is_empty() && members.iter().all(|op| op.rarity.is_lowest());
        Self {
            key,
            title,
            source_tag_ids,
            members,
            rarity_common,
            only_rarity_lowest,
        }
    }

    /// Distinct member rarities, highest first.
    pub fn distinct_rarities(&self) -> Vec<Rarity> {
        let mut rarities: Vec<Rarity> = self.members.iter().map(|op| op.rarity).collect();
        rarities.sort_unstable_by(|a, b| b.cmp(a));
        rarities.dedup();
        rarities
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Canonical key for a title: independent of selection order.
pub fn section_key<S: AsRef<str>>(title: &[S]) -> String {
    let mut parts: Vec<&str> = title.iter().map(AsRef::as_ref).collect();
    parts.sort_unstable();
    parts.join("-")
}

/// Display ordering of two sections.
///
/// A section whose members share one rarity comes before a mixed one; two
/// single-rarity sections put the higher rarity first; otherwise the smaller
/// section comes first.
pub fn compare_sections(a: &Section, b: &Section) -> Ordering {
    let ra = a.distinct_rarities();
    let rb = b.distinct_rarities();

    match (ra.len(), rb.len()) {
        (1, n) if n > 1 => return Ordering::Less,
        (n, 1) if n > 1 => return Ordering::Greater,
        (1, 1) if ra[0] != rb[0] => return rb[0].cmp(&ra[0]),
        _ => {}
    }

    a.len().cmp(&b.len())
}

/// Stable sort by [`compare_sections`], ties broken by key.
pub fn sort_sections<S: Borrow<Section>>(sections: &mut [S]) {
    sections.sort_by(|a, b| {
        let (a, b) = (a.borrow(), b.borrow());
        compare_sections(a, b).then_with(|| a.key.cmp(&b.key))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn op(id: &str, rarity: u8) -> Operator {
        Operator::new(id, id, Rarity::new(rarity).unwrap(), "GUARD")
    }

    fn section(key: &str, rarities: &[u8]) -> Section {
        let members = rarities
            .iter()
            .enumerate()
            .map(|(i, r)| op(&format!("{key}{i}"), *r))
            .collect();
        Section::new(vec![key.to_string()], vec![], members)
    }

    #[test]
    fn key_ignores_title_order() {
        assert_eq!(section_key(&["Melee", "DPS"]), "DPS-Melee");
        assert_eq!(section_key(&["DPS", "Melee"]), "DPS-Melee");
        assert_eq!(section_key(&["Top Operator"]), "Top Operator");
    }

    #[test]
    fn flags_follow_member_rarities() {
        let common = section("a", &[3, 5]);
        assert!(common.rarity_common);
        assert!(!common.only_rarity_lowest);

        let robots = section("b", &[1, 1]);
        assert!(!robots.rarity_common);
        assert!(robots.only_rarity_lowest);

        let mixed = section("c", &[1, 4]);
        assert!(!mixed.only_rarity_lowest);
    }

    #[test]
    fn single_rarity_sections_come_first() {
        let sorted = {
            let mut v = vec![section("x", &[4, 6]), section("y", &[6]), section("z", &[6, 6, 6])];
            sort_sections(&mut v);
            v
        };
        let keys: Vec<_> = sorted.iter().map(|s| (s.key.as_str(), s.len())).collect();
        assert_eq!(keys, vec![("y", 1), ("z", 3), ("x", 2)]);
    }

    #[test]
    fn higher_single_rarity_wins() {
        assert_eq!(
            compare_sections(&section("a", &[5, 5]), &section("b", &[4])),
            Ordering::Less
        );
    }

    #[test]
    fn mixed_sections_order_by_size_then_key() {
        let mut v = vec![
            section("d", &[3, 4, 5]),
            section("c", &[3, 4]),
            section("b", &[4, 5]),
        ];
        sort_sections(&mut v);
        let keys: Vec<_> = v.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["b", "c", "d"]);
    }
}
