use crate::section::Section;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

/// Display filters over reconciled sections. Hidden sections stay cached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Visibility {
    /// Hide sections containing tier 2 or 3 operators
    pub hide_rarity_common: bool,
    /// Hide sections made only of tier 1 operators
    pub hide_only_rarity_lowest: bool,
}

impl Visibility {
    #[must_use]
    pub fn is_visible(&self, section: &Section) -> bool {
        !(self.hide_rarity_common && section.rarity_common
            || self.hide_only_rarity_lowest && section.only_rarity_lowest)
    }

    pub fn visible<'a, S: Borrow<Section>>(&self, sections: &'a [S]) -> Vec<&'a S> {
        sections
            .iter()
            .filter(|s| self.is_visible((*s).borrow()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recruit_model::{Operator, Rarity};

    fn section(rarities: &[u8]) -> Section {
        let members = rarities
            .iter()
            .map(|r| Operator::new(r.to_string(), "op", Rarity::new(*r).unwrap(), "GUARD"))
            .collect();
        Section::new(vec!["t".to_string()], vec![], members)
    }

    #[test]
    fn toggles_hide_flagged_sections() {
        let sections = vec![section(&[3, 4]), section(&[1]), section(&[5])];

        assert_eq!(Visibility::default().visible(&sections).len(), 3);

        let hide_common = Visibility {
            hide_rarity_common: true,
            ..Default::default()
        };
        assert_eq!(hide_common.visible(&sections).len(), 2);

        let hide_both = Visibility {
            hide_rarity_common: true,
            hide_only_rarity_lowest: true,
        };
        let left = hide_both.visible(&sections);
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].members[0].rarity.get(), 5);
    }
}
