use crate::record::InfractionRecord;

/// One page of the derived explorer view.
#[derive(Clone, Debug, PartialEq)]
pub struct ExplorerPage {
    pub records: Vec<InfractionRecord>,
    pub filtered_count: usize,
    pub total_pages: usize,
    pub current_page: usize,
    pub page_size: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

pub fn total_pages(filtered: usize, page_size: usize) -> usize {
    let size = page_size.max(1);
    ((filtered + size - 1) / size).max(1)
}

/// Slices `derived` into the requested 1-based page. The page number is not
/// clamped: a page past the end yields no records, and page 0 is read as
/// page 1.
pub fn paginate(derived: &[InfractionRecord], page: usize, page_size: usize) -> ExplorerPage {
    let page = page.max(1);
    let size = page_size.max(1);
    let pages = total_pages(derived.len(), size);
    let start = page.saturating_sub(1).saturating_mul(size);
    let records = if start >= derived.len() {
        Vec::new()
    } else {
        let end = start.saturating_add(size).min(derived.len());
        derived[start..end].to_vec()
    };
    ExplorerPage {
        records,
        filtered_count: derived.len(),
        total_pages: pages,
        current_page: page,
        page_size: size,
        has_previous: page > 1,
        has_next: page < pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(n: usize) -> Vec<InfractionRecord> {
        (0..n)
            .map(|i| InfractionRecord {
                code: format!("{i:03}"),
                ..InfractionRecord::default()
            })
            .collect()
    }

    #[test]
    fn empty_view_still_has_one_page() {
        let page = paginate(&[], 1, 10);
        assert_eq!(page.total_pages, 1);
        assert!(page.records.is_empty());
        assert!(!page.has_previous);
        assert!(!page.has_next);
    }

    #[test]
    fn last_page_is_partial() {
        let all = records(23);
        let page = paginate(&all, 3, 10);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.records.len(), 3);
        assert_eq!(page.records[0].code, "020");
        assert!(page.has_previous);
        assert!(!page.has_next);
    }

    #[test]
    fn out_of_range_page_is_empty_not_clamped() {
        let all = records(5);
        let page = paginate(&all, 4, 10);
        assert_eq!(page.current_page, 4);
        assert!(page.records.is_empty());
        assert_eq!(page.filtered_count, 5);
    }

    #[test]
    fn page_zero_reports_the_first_page() {
        let all = records(15);
        let page = paginate(&all, 0, 10);
        assert_eq!(page.current_page, 1);
        assert_eq!(page.records.len(), 10);
        assert_eq!(page.records[0].code, "000");
        assert!(!page.has_previous);
        assert!(page.has_next);
    }

    #[test]
    fn zero_page_size_is_treated_as_one() {
        let all = records(3);
        let page = paginate(&all, 2, 0);
        assert_eq!(page.page_size, 1);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.records[0].code, "001");
    }
}
