use crate::core::types::Record;
use crate::query::types::{Query, QueryLineage, OVERVIEW_AREA};

/// Key of the first lineage in `lineages` the record belongs to.
///
/// Order matters: callers sort with `sort_lineages_for_query` so a
/// mutation-qualified or deeper rollup wins over its ancestors. Clades carry
/// a trailing separator, so the prefix test stops at level boundaries
/// ("B.1." matches "B.1.2." but not "B.11.").
pub fn match_lineages<'q>(record: &Record, lineages: &'q [QueryLineage]) -> Option<&'q str> {
    position_lineage(record, lineages).map(|i| lineages[i].key.as_str())
}

/// Same as `match_lineages`, returning the position in `lineages`.
pub fn position_lineage(record: &Record, lineages: &[QueryLineage]) -> Option<usize> {
    lineages.iter().position(|ql| matches_lineage(record, ql))
}

pub fn matches_lineage(record: &Record, lineage: &QueryLineage) -> bool {
    record.pango_clade().starts_with(&lineage.pango_clade)
        && lineage.mutations.iter().all(|m| record.has_mutation(m))
}

/// Area and date-range filters. ISO dates compare correctly as strings.
pub fn match_metadata(record: &Record, query: &Query) -> bool {
    if let Some(area) = &query.area {
        if area != OVERVIEW_AREA && record.area() != area {
            return false;
        }
    }
    if let Some(from) = &query.date_from {
        if record.date() < from.as_str() {
            return false;
        }
    }
    if let Some(to) = &query.date_to {
        if record.date() > to.as_str() {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::database::Database;
    use crate::core::types::Mutation;

    fn mutation(s: &str) -> Mutation {
        Mutation::parse(s, ":").unwrap()
    }

    fn records() -> Database {
        let mut builder = Database::builder(":");
        builder.add_record("A", "2020-09-01", "B.", &["A:A"], 1).unwrap();
        builder.add_record("B", "2020-10-01", "B.1.", &["A:A", "B:B"], 2).unwrap();
        builder.add_record("C", "2020-11-01", "B.1.2.", &["A:A", "B:B", "C:C"], 3).unwrap();
        builder.add_record("C", "2020-11-01", "B.11.", &["S:X"], 4).unwrap();
        builder.finish()
    }

    #[test]
    fn prefix_stops_at_level_boundary() {
        let db = records();
        let lineages = vec![QueryLineage::new("B.1", "B.1.")];

        assert_eq!(match_lineages(&db.records()[2], &lineages), Some("B.1"));
        assert_eq!(match_lineages(&db.records()[3], &lineages), None);
        assert_eq!(match_lineages(&db.records()[0], &lineages), None);
    }

    #[test]
    fn required_mutations_are_conjunctive() {
        let db = records();
        let both = vec![
            QueryLineage::new("B+A:A+B:B", "B.")
                .with_mutation(mutation("B:B"))
                .with_mutation(mutation("A:A")),
        ];

        assert_eq!(match_lineages(&db.records()[0], &both), None);
        assert_eq!(match_lineages(&db.records()[1], &both), Some("B+A:A+B:B"));
        assert_eq!(match_lineages(&db.records()[2], &both), Some("B+A:A+B:B"));

        let missing = vec![
            QueryLineage::new("B+A:A+X:X", "B.")
                .with_mutation(mutation("A:A"))
                .with_mutation(mutation("X:X")),
        ];
        assert_eq!(match_lineages(&db.records()[2], &missing), None);
    }

    #[test]
    fn first_match_wins() {
        let db = records();
        let lineages = vec![
            QueryLineage::new("B.1", "B.1."),
            QueryLineage::new("B", "B."),
        ];
        assert_eq!(match_lineages(&db.records()[0], &lineages), Some("B"));
        assert_eq!(match_lineages(&db.records()[2], &lineages), Some("B.1"));
    }

    #[test]
    fn metadata_filters() {
        let db = records();
        let r = &db.records()[1];

        assert!(match_metadata(r, &Query::default()));
        assert!(match_metadata(r, &Query { area: Some("B".into()), ..Query::default() }));
        assert!(match_metadata(r, &Query { area: Some(OVERVIEW_AREA.into()), ..Query::default() }));
        assert!(!match_metadata(r, &Query { area: Some("A".into()), ..Query::default() }));

        let inclusive = Query {
            date_from: Some("2020-10-01".into()),
            date_to: Some("2020-10-01".into()),
            ..Query::default()
        };
        assert!(match_metadata(r, &inclusive));
        assert!(!match_metadata(r, &Query { date_from: Some("2020-10-02".into()), ..Query::default() }));
        assert!(!match_metadata(r, &Query { date_to: Some("2020-09-30".into()), ..Query::default() }));
    }
}
