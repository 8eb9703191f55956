
use std::collections::HashSet;

use crate::explorer::{
    derive_view, explore, paginate, ExplorerCriteria, ExplorerFilters, ExplorerState,
    SnapshotSource, SortDirection, SortField,
};
use crate::query::{QueryRejection, QueryValidator};
use crate::record::InfractionRecord;

fn record(code: &str, severity: &str, responsible: &str, points: u32, fine: f64) -> InfractionRecord {
    InfractionRecord {
        code: code.to_string(),
        description: format!("infração {code}"),
        responsible_party: responsible.to_string(),
        points,
        fine_amount: fine,
        severity: severity.to_string(),
        issuing_authority: "Órgão de trânsito".to_string(),
        legal_articles: "165".to_string(),
    }
}

fn catalog() -> Vec<InfractionRecord> {
    vec![
        record("6050-1", "Gravíssima", "Condutor", 7, 293.47),
        record("5185-1", "Grave", "Condutor", 5, 195.23),
        record("7030-0", "Leve", "Condutor", 3, 88.38),
        record("5452-0", "Grave", "Proprietário", 5, 195.23),
        record("7455-0", "Média", "Condutor", 4, 130.16),
        record("5576-0", "nan", "Proprietário", 0, 0.0),
        record("5169-1", "Gravíssima", "Condutor", 7, 2934.70),
        record("6637-1", "Média", "Condutor", 4, 130.16),
        record("5010-0", "Gravíssima", "Condutor", 7, 880.41),
        record("7366-2", "Gravíssima", "Condutor", 7, 293.47),
        record("5800-0", "Grave", "Proprietário", 5, 195.23),
        record("6920-1", "Leve", "Condutor", 3, 88.38),
    ]
}

fn codes(records: &[InfractionRecord]) -> Vec<&str> {
    records.iter().map(|r| r.code.as_str()).collect()
}

#[test]
fn points_filter_keeps_only_matching_records() {
    let snapshot = vec![
        record("a", "Grave", "Condutor", 5, 1.0),
        record("b", "Grave", "Condutor", 5, 1.0),
        record("c", "Gravíssima", "Condutor", 7, 1.0),
        record("d", "Média", "Condutor", 4, 1.0),
    ];
    let criteria = ExplorerCriteria {
        filters: ExplorerFilters {
            points: Some(5),
            ..ExplorerFilters::default()
        },
        ..ExplorerCriteria::default()
    };
    let page = explore(&snapshot, &criteria);
    assert_eq!(page.filtered_count, 2);
    assert_eq!(page.total_pages, 1);
    assert_eq!(codes(&page.records), vec!["a", "b"]);
}

#[test]
fn no_criteria_returns_full_snapshot() {
    let snapshot = catalog();
    let derived = derive_view(&snapshot, &ExplorerCriteria::default());
    assert_eq!(derived.len(), snapshot.len());
    let all: HashSet<_> = snapshot.iter().map(|r| r.code.clone()).collect();
    let seen: HashSet<_> = derived.iter().map(|r| r.code.clone()).collect();
    assert_eq!(all, seen);
}

#[test]
fn every_criterion_is_honored() {
    let criteria = ExplorerCriteria {
        filters: ExplorerFilters {
            severity: Some("GRAVE".to_string()),
            responsible_party: Some(" proprietário ".to_string()),
            points: Some(5),
        },
        ..ExplorerCriteria::default()
    };
    let derived = derive_view(&catalog(), &criteria);
    assert_eq!(codes(&derived), vec!["5452-0", "5800-0"]);
    assert!(derived.iter().all(|r| {
        r.severity == "Grave" && r.responsible_party == "Proprietário" && r.points == 5
    }));
}

#[test]
fn pages_reconstruct_the_derived_view() {
    let snapshot = catalog();
    for size in [1, 3, 5, 10, 12, 50] {
        let criteria = ExplorerCriteria {
            sort_field: SortField::FineAmount,
            page_size: size,
            ..ExplorerCriteria::default()
        };
        let derived = derive_view(&snapshot, &criteria);
        let expected_pages = std::cmp::max(1, (derived.len() + size - 1) / size);
        let mut rebuilt = Vec::new();
        for page_no in 1..=expected_pages {
            let page = paginate(&derived, page_no, size);
            assert_eq!(page.total_pages, expected_pages);
            assert_eq!(page.has_previous, page_no > 1);
            assert_eq!(page.has_next, page_no < expected_pages);
            rebuilt.extend(page.records);
        }
        assert_eq!(rebuilt, derived, "page size {size}");
    }
}

#[test]
fn reversing_direction_reverses_non_equal_pairs() {
    let snapshot = catalog();
    for field in [
        SortField::Code,
        SortField::Points,
        SortField::FineAmount,
        SortField::Severity,
        SortField::ResponsibleParty,
    ] {
        let asc = derive_view(
            &snapshot,
            &ExplorerCriteria {
                sort_field: field,
                ..ExplorerCriteria::default()
            },
        );
        let desc = derive_view(
            &snapshot,
            &ExplorerCriteria {
                sort_field: field,
                sort_direction: SortDirection::Descending,
                ..ExplorerCriteria::default()
            },
        );
        let position = |list: &[InfractionRecord], code: &str| {
            list.iter().position(|r| r.code == code).unwrap()
        };
        for a in &snapshot {
            for b in &snapshot {
                let ord = crate::explorer::sort::compare(a, b, field);
                if ord == std::cmp::Ordering::Less {
                    assert!(position(&asc, &a.code) < position(&asc, &b.code));
                    assert!(position(&desc, &a.code) > position(&desc, &b.code));
                }
            }
        }
    }
}

#[test]
fn stable_sort_keeps_snapshot_order_for_ties() {
    let derived = derive_view(
        &catalog(),
        &ExplorerCriteria {
            sort_field: SortField::Points,
            sort_direction: SortDirection::Descending,
            ..ExplorerCriteria::default()
        },
    );
    let sevens: Vec<_> = derived.iter().filter(|r| r.points == 7).collect();
    let sevens: Vec<&str> = sevens.iter().map(|r| r.code.as_str()).collect();
    assert_eq!(sevens, vec!["6050-1", "5169-1", "5010-0", "7366-2"]);
}

#[test]
fn reset_is_idempotent_and_restores_initial_state() {
    let mut state = ExplorerState::new(catalog(), SnapshotSource::Backend, 5);
    let initial_criteria = state.criteria().clone();
    let initial_view = state.derived().to_vec();

    state.apply(ExplorerCriteria {
        filters: ExplorerFilters {
            severity: Some("Gravíssima".to_string()),
            ..ExplorerFilters::default()
        },
        sort_field: SortField::FineAmount,
        sort_direction: SortDirection::Descending,
        page: 1,
        page_size: 5,
    });
    assert_eq!(state.derived().len(), 4);

    state.reset();
    assert_eq!(state.criteria(), &initial_criteria);
    assert_eq!(state.derived(), initial_view.as_slice());
    assert_eq!(state.current_page().current_page, 1);

    state.go_to(2);
    state.reset();
    state.reset();
    assert_eq!(state.criteria(), &initial_criteria);
    assert_eq!(state.derived(), initial_view.as_slice());
    assert_eq!(state.snapshot(), catalog().as_slice());
}

#[test]
fn nan_severity_is_not_applicable() {
    let r = record("5576-0", "nan", "Proprietário", 0, 0.0);
    assert_eq!(r.severity_label(), "not applicable");
    let rendered = crate::output::render_record(crate::output::OutputFormat::Json, &r);
    let value: serde_json::Value = serde_json::from_slice(&rendered).unwrap();
    assert_eq!(value["severity_label"], "not applicable");
    assert_eq!(value["severity"], "nan");
}

#[test]
fn numeric_code_is_always_a_valid_query() {
    assert_eq!(QueryValidator::default().validate("123456"), Ok("123456"));
}

#[test]
fn two_word_keyword_query_is_rejected() {
    let err = QueryValidator::default()
        .validate("sinal vermelho")
        .unwrap_err();
    assert_eq!(err, QueryRejection::MultipleWords);
    assert!(err.to_string().contains("single word or an infraction code"));
}
