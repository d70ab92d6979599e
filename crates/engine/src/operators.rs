use recruit_model::Operator;
use std::collections::BTreeMap;

/// Resolved operators keyed by id.
///
/// `revision` increases whenever the contents change; reconciliation uses it
/// to know when remembered empty resolutions are no longer trustworthy.
#[derive(Debug, Clone, Default)]
pub struct OperatorCache {
    by_id: BTreeMap<String, Operator>,
    revision: u64,
}

impl OperatorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace operators by id. Returns how many records changed.
    pub fn merge<I>(&mut self, operators: I) -> usize
    where
        I: IntoIterator<Item = Operator>,
    {
        let mut changed = 0;
        for op in operators {
            match self.by_id.get(&op.id) {
                Some(existing) if *existing == op => {}
                _ => {
                    self.by_id.insert(op.id.clone(), op);
                    changed += 1;
                }
            }
        }
        if changed > 0 {
            self.revision += 1;
            log::debug!(
                "Operator cache: {changed} records changed ({} total, revision {})",
                self.by_id.len(),
                self.revision
            );
        }
        changed
    }

    pub fn get(&self, id: &str) -> Option<&Operator> {
        self.by_id.get(id)
    }

    /// Operators in id order.
    pub fn values(&self) -> impl Iterator<Item = &Operator> {
        self.by_id.values()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub const fn revision(&self) -> u64 {
        self.revision
    }
}
