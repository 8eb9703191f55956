pub mod fallback;
pub mod filters;
pub mod page;
pub mod sort;

use std::collections::BTreeSet;

use itertools::Itertools;
use serde::Serialize;
use tracing::debug;

use crate::record::InfractionRecord;

pub use fallback::fallback_records;
pub use filters::ExplorerFilters;
pub use page::{paginate, total_pages, ExplorerPage};
pub use sort::{sort_records, SortDirection, SortField};

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExplorerCriteria {
    pub filters: ExplorerFilters,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
    /// 1-based.
    pub page: usize,
    pub page_size: usize,
}

impl Default for ExplorerCriteria {
    fn default() -> Self {
        Self {
            filters: ExplorerFilters::default(),
            sort_field: SortField::Code,
            sort_direction: SortDirection::Ascending,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Filtered and sorted copy of the snapshot. The snapshot itself is never
/// reordered.
pub fn derive_view(snapshot: &[InfractionRecord], criteria: &ExplorerCriteria) -> Vec<InfractionRecord> {
    let mut derived: Vec<InfractionRecord> = snapshot
        .iter()
        .filter(|r| criteria.filters.matches(r))
        .cloned()
        .collect();
    sort_records(&mut derived, criteria.sort_field, criteria.sort_direction);
    derived
}

pub fn explore(snapshot: &[InfractionRecord], criteria: &ExplorerCriteria) -> ExplorerPage {
    let derived = derive_view(snapshot, criteria);
    paginate(&derived, criteria.page, criteria.page_size)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotSource {
    Backend,
    Fallback,
}

/// Distinct values present in a snapshot, used as filter choices.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Facets {
    pub severities: Vec<String>,
    pub responsible_parties: Vec<String>,
    pub points: Vec<u32>,
}

impl Facets {
    pub fn from_records(records: &[InfractionRecord]) -> Self {
        let severities = records
            .iter()
            .map(|r| r.severity.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let responsible_parties = records
            .iter()
            .map(|r| r.responsible_party.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let points = records.iter().map(|r| r.points).sorted().dedup().collect();
        Self {
            severities,
            responsible_parties,
            points,
        }
    }
}

/// An explorer session: the fetched snapshot, the active criteria and the
/// derived view they produce.
#[derive(Clone, Debug)]
pub struct ExplorerState {
    snapshot: Vec<InfractionRecord>,
    source: SnapshotSource,
    criteria: ExplorerCriteria,
    derived: Vec<InfractionRecord>,
    default_page_size: usize,
}

impl ExplorerState {
    pub fn new(snapshot: Vec<InfractionRecord>, source: SnapshotSource, page_size: usize) -> Self {
        let criteria = ExplorerCriteria {
            page_size: page_size.max(1),
            ..ExplorerCriteria::default()
        };
        let derived = derive_view(&snapshot, &criteria);
        Self {
            snapshot,
            source,
            criteria,
            derived,
            default_page_size: page_size.max(1),
        }
    }

    pub fn snapshot(&self) -> &[InfractionRecord] {
        &self.snapshot
    }

    pub fn derived(&self) -> &[InfractionRecord] {
        &self.derived
    }

    pub fn criteria(&self) -> &ExplorerCriteria {
        &self.criteria
    }

    pub fn source(&self) -> SnapshotSource {
        self.source
    }

    pub fn is_degraded(&self) -> bool {
        self.source == SnapshotSource::Fallback
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.derived.len(), self.criteria.page_size)
    }

    /// Replaces filters and sort and recomputes the derived view. Like any
    /// filter change this goes back to the first page.
    pub fn apply(&mut self, criteria: ExplorerCriteria) {
        self.criteria = ExplorerCriteria {
            page: 1,
            page_size: criteria.page_size.max(1),
            ..criteria
        };
        self.derived = derive_view(&self.snapshot, &self.criteria);
        debug!(
            filtered = self.derived.len(),
            total = self.snapshot.len(),
            sort = %self.criteria.sort_field,
            direction = %self.criteria.sort_direction,
            "explorer view recomputed"
        );
    }

    pub fn reset(&mut self) {
        self.apply(ExplorerCriteria {
            page_size: self.default_page_size,
            ..ExplorerCriteria::default()
        });
    }

    pub fn go_to(&mut self, page: usize) -> bool {
        if page < 1 || page > self.total_pages() {
            return false;
        }
        self.criteria.page = page;
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.go_to(self.criteria.page + 1)
    }

    pub fn previous_page(&mut self) -> bool {
        if self.criteria.page <= 1 {
            return false;
        }
        self.go_to(self.criteria.page - 1)
    }

    pub fn current_page(&self) -> ExplorerPage {
        paginate(&self.derived, self.criteria.page, self.criteria.page_size)
    }

    pub fn facets(&self) -> Facets {
        Facets::from_records(&self.snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(code: &str, severity: &str, points: u32) -> InfractionRecord {
        InfractionRecord {
            code: code.to_string(),
            severity: severity.to_string(),
            responsible_party: "Condutor".to_string(),
            points,
            ..InfractionRecord::default()
        }
    }

    fn snapshot() -> Vec<InfractionRecord> {
        vec![
            rec("c", "Grave", 5),
            rec("a", "Leve", 3),
            rec("b", "Gravíssima", 7),
        ]
    }

    #[test]
    fn derive_view_does_not_touch_snapshot() {
        let snap = snapshot();
        let derived = derive_view(&snap, &ExplorerCriteria::default());
        assert_eq!(derived[0].code, "a");
        assert_eq!(snap[0].code, "c");
    }

    #[test]
    fn navigation_stays_in_range() {
        let records = (0..25).map(|i| rec(&format!("{i:02}"), "Leve", 3)).collect();
        let mut state = ExplorerState::new(records, SnapshotSource::Backend, 10);
        assert_eq!(state.total_pages(), 3);
        assert!(!state.previous_page());
        assert!(state.next_page());
        assert!(state.next_page());
        assert!(!state.next_page());
        assert_eq!(state.current_page().records.len(), 5);
        assert!(!state.go_to(0));
        assert!(!state.go_to(4));
        assert!(state.go_to(1));
        assert_eq!(state.current_page().current_page, 1);
    }

    #[test]
    fn apply_returns_to_first_page() {
        let records = (0..25).map(|i| rec(&format!("{i:02}"), "Leve", 3)).collect();
        let mut state = ExplorerState::new(records, SnapshotSource::Backend, 10);
        state.go_to(3);
        state.apply(ExplorerCriteria {
            sort_direction: SortDirection::Descending,
            page: 3,
            ..ExplorerCriteria::default()
        });
        assert_eq!(state.criteria().page, 1);
        assert_eq!(state.current_page().records[0].code, "24");
    }

    #[test]
    fn facets_are_sorted_and_distinct() {
        let mut records = snapshot();
        records.push(rec("d", "Grave", 5));
        records.push(rec("e", " ", 0));
        let facets = Facets::from_records(&records);
        assert_eq!(facets.severities, vec!["Grave", "Gravíssima", "Leve"]);
        assert_eq!(facets.responsible_parties, vec!["Condutor"]);
        assert_eq!(facets.points, vec![0, 3, 5, 7]);
    }

    #[test]
    fn fallback_source_is_degraded() {
        let state = ExplorerState::new(fallback_records(), SnapshotSource::Fallback, 10);
        assert!(state.is_degraded());
        assert_eq!(state.source(), SnapshotSource::Fallback);
    }
}
