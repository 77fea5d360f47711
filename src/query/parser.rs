use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;
use chrono::NaiveDate;
use regex::Regex;
use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::core::types::{Mutation, MUT_SEPARATOR, PANGO_SEPARATOR};
use crate::query::sort::sort_lineages_for_query;
use crate::query::types::{GrowthWindow, Query, QueryLineage, SearchOpts, SortDirection, SortProperty, OVERVIEW_AREA};

static PANGO_LINEAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{1,3}(\.[0-9]+)*$").unwrap());
static DATE_STRING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap());

/// At most this many mutations qualify one lineage; extra ones are ignored
pub const MAX_LINEAGE_MUTATIONS: usize = 2;
pub const MAX_FILTER_LEN: usize = 24;

/// Request parameters in arrival order; keys may repeat
pub type Params = [(String, String)];

fn first<'p>(params: &'p Params, key: &str) -> Option<&'p str> {
    params.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
}

fn all<'p>(params: &'p Params, key: &str) -> Vec<&'p str> {
    params.iter().filter(|(k, _)| k == key).map(|(_, v)| v.as_str()).collect()
}

/// Turns request parameters into validated `Query` and `SearchOpts` values.
pub struct QueryParser<'a> {
    genes: &'a BTreeSet<String>,
    max_lineages: usize,
    mutation_separator: &'a str,
}

impl<'a> QueryParser<'a> {
    pub fn new(genes: &'a BTreeSet<String>, config: &'a Config) -> Self {
        QueryParser {
            genes,
            max_lineages: config.max_lineages,
            mutation_separator: &config.mutation_separator,
        }
    }

    pub fn parse_query(&self, params: &Params) -> Result<Query> {
        let mut query = Query::default();

        let lineage = all(params, "lineage");
        if !lineage.is_empty() {
            query.lineages = self.parse_lineages(&lineage)?;
        } else if let Some(lineages) = first(params, "lineages") {
            let lineages: Vec<&str> = lineages.split(',').collect();
            if lineages.len() > self.max_lineages {
                return Err(Error::invalid_input(format!(
                    "too many lineages, maximum is {}",
                    self.max_lineages
                )));
            }
            query.lineages = self.parse_lineages(&lineages)?;
        }

        if let Some(area) = first(params, "area") {
            if area != OVERVIEW_AREA {
                query.area = Some(area.to_string());
            }
        }
        query.date_from = parse_date(first(params, "from"))?;
        query.date_to = parse_date(first(params, "to"))?;

        if let Some(excluding) = first(params, "excluding") {
            let excluding: Vec<&str> = excluding.split(',').collect();
            query.excluding = self.parse_lineages(&excluding)?;
        }

        if let Some(gene) = first(params, "gene").filter(|g| !g.is_empty()) {
            if !self.genes.contains(gene) {
                return Err(Error::invalid_input("gene not recognised"));
            }
            query.prefix = Some(gene.to_string());
        }

        if let Some(filter) = first(params, "filter").filter(|f| !f.is_empty()) {
            if filter.len() > MAX_FILTER_LEN {
                return Err(Error::invalid_input("filter string too long"));
            }
            query.suffix_filter = Some(filter.to_string());
        }

        Ok(query)
    }

    /// Parses entries like "B.1.617.2" or "B.1+S:E484K+S:N501Y".
    /// Duplicates collapse; the result is sorted most specific first.
    pub fn parse_lineages(&self, values: &[&str]) -> Result<Vec<QueryLineage>> {
        let mut seen = HashSet::new();
        let mut lineages = Vec::new();

        for &v in values {
            if v.is_empty() || !seen.insert(v) {
                continue;
            }
            let mut parts = v.split(MUT_SEPARATOR);
            let clade = parts.next().unwrap_or_default();
            if !PANGO_LINEAGE.is_match(clade) {
                return Err(Error::invalid_input("invalid lineages"));
            }

            let mutations = parts
                .take(MAX_LINEAGE_MUTATIONS)
                .map(|m| self.parse_mutation(m))
                .collect::<Result<Vec<_>>>()?;

            lineages.push(QueryLineage {
                key: v.to_string(),
                pango_clade: format!("{}{}", clade, PANGO_SEPARATOR),
                mutations,
            });
        }

        sort_lineages_for_query(&mut lineages);
        Ok(lineages)
    }

    fn parse_mutation(&self, s: &str) -> Result<Mutation> {
        match Mutation::parse(s, self.mutation_separator) {
            Some(m) if self.genes.contains(&m.prefix) => Ok(m),
            _ => Err(Error::invalid_input(format!("invalid gene for input: {}", s))),
        }
    }

    /// Unparseable numbers and unknown sort names fall back to defaults.
    pub fn parse_search_opts(&self, params: &Params, config: &Config) -> SearchOpts {
        let mut opts = SearchOpts {
            limit: config.max_search_results,
            suppression_min: config.suppression_min,
            parallelism: config.parallelism,
            ..SearchOpts::default()
        };

        if let Some(parent) = first(params, "parent") {
            opts.lineage = parent.to_string();
        }
        if let Some(skip) = first(params, "skip").and_then(|s| s.parse().ok()) {
            opts.skip = skip;
        }
        if let Some(limit) = first(params, "limit").and_then(|s| s.parse::<usize>().ok()) {
            opts.limit = limit.min(config.max_page_size);
        }
        if let Some(sort) = first(params, "sort") {
            opts.sort_property = SortProperty::from_name(sort);
        }
        if first(params, "direction") == Some("asc") {
            opts.sort_direction = SortDirection::Asc;
        }
        if let (Some(start), Some(end)) = (first(params, "growthStart"), first(params, "growthEnd")) {
            opts.growth = GrowthWindow::new(start, end);
        }

        opts
    }
}

fn parse_date(value: Option<&str>) -> Result<Option<String>> {
    match value {
        None | Some("") => Ok(None),
        Some(d) => {
            if !DATE_STRING.is_match(d) || NaiveDate::parse_from_str(d, "%Y-%m-%d").is_err() {
                return Err(Error::invalid_input("invalid date"));
            }
            Ok(Some(d.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn genes() -> BTreeSet<String> {
        ["S", "ORF1ab"].iter().map(|g| g.to_string()).collect()
    }

    #[test]
    fn parses_mutation_qualified_lineages() {
        let genes = genes();
        let config = Config::default();
        let parser = QueryParser::new(&genes, &config);

        let q = parser.parse_query(&params(&[("lineages", "B,B+S:V36F,B.1.1")])).unwrap();
        let keys: Vec<_> = q.lineages.iter().map(|l| l.key.as_str()).collect();
        assert_eq!(keys, vec!["B+S:V36F", "B.1.1", "B"]);

        let qualified = &q.lineages[0];
        assert_eq!(qualified.pango_clade, "B.");
        assert_eq!(qualified.mutations.len(), 1);
        assert_eq!(qualified.mutations[0].prefix, "S");
        assert_eq!(qualified.mutations[0].suffix, "V36F");
    }

    #[test]
    fn ignores_mutations_beyond_two() {
        let genes = genes();
        let config = Config::default();
        let parser = QueryParser::new(&genes, &config);

        let q = parser.parse_query(&params(&[("lineage", "B+S:A+S:B+S:C")])).unwrap();
        assert_eq!(q.lineages[0].mutations.len(), 2);
    }

    #[test]
    fn empty_and_duplicate_lineages() {
        let genes = genes();
        let config = Config::default();
        let parser = QueryParser::new(&genes, &config);

        let q = parser.parse_query(&params(&[("lineages", "")])).unwrap();
        assert!(q.lineages.is_empty());

        let q = parser.parse_query(&params(&[("lineages", "B.1,B.1")])).unwrap();
        assert_eq!(q.lineages.len(), 1);
    }

    #[test]
    fn rejects_invalid_input() {
        let genes = genes();
        let config = Config { max_lineages: 2, ..Config::default() };
        let parser = QueryParser::new(&genes, &config);

        let cases = [
            params(&[("lineages", "B,C,D")]),
            params(&[("lineage", "b.1")]),
            params(&[("lineage", "B+N:P13L")]),
            params(&[("lineage", "B+S")]),
            params(&[("from", "2020-1-01")]),
            params(&[("to", "2020-02-30")]),
            params(&[("gene", "N")]),
            params(&[("filter", "abcdefghijklmnopqrstuvwxy")]),
            params(&[("excluding", "B.1,x")]),
        ];
        for case in cases {
            let err = parser.parse_query(&case).unwrap_err();
            assert_eq!(err.kind, ErrorKind::InvalidInput, "{:?}", case);
        }
    }

    #[test]
    fn metadata_and_filters() {
        let genes = genes();
        let config = Config::default();
        let parser = QueryParser::new(&genes, &config);

        let q = parser
            .parse_query(&params(&[
                ("area", "overview"),
                ("from", "2021-01-01"),
                ("to", ""),
                ("excluding", "B.1.1.7,B.1.351"),
                ("gene", "S"),
                ("filter", "E484"),
            ]))
            .unwrap();
        assert_eq!(q.area, None);
        assert_eq!(q.date_from.as_deref(), Some("2021-01-01"));
        assert_eq!(q.date_to, None);
        assert_eq!(q.excluding.len(), 2);
        assert_eq!(q.prefix.as_deref(), Some("S"));
        assert_eq!(q.suffix_filter.as_deref(), Some("E484"));

        let q = parser.parse_query(&params(&[("area", "E07000008")])).unwrap();
        assert_eq!(q.area.as_deref(), Some("E07000008"));
    }

    #[test]
    fn search_opts_defaults_and_overrides() {
        let genes = genes();
        let config = Config { max_search_results: 10, suppression_min: 3, parallelism: 4, ..Config::default() };
        let parser = QueryParser::new(&genes, &config);

        let opts = parser.parse_search_opts(&params(&[]), &config);
        assert_eq!(opts.limit, 10);
        assert_eq!(opts.skip, 0);
        assert_eq!(opts.sort_property, SortProperty::Count);
        assert_eq!(opts.sort_direction, SortDirection::Desc);
        assert_eq!(opts.suppression_min, 3);
        assert_eq!(opts.parallelism, 4);
        assert_eq!(opts.growth, GrowthWindow::default());

        let opts = parser.parse_search_opts(
            &params(&[
                ("parent", "B.1"),
                ("skip", "20"),
                ("limit", "x"),
                ("sort", "change"),
                ("direction", "asc"),
                ("growthStart", "2021-01-01"),
            ]),
            &config,
        );
        assert_eq!(opts.lineage, "B.1");
        assert_eq!(opts.skip, 20);
        assert_eq!(opts.limit, 10);
        assert_eq!(opts.sort_property, SortProperty::Change);
        assert_eq!(opts.sort_direction, SortDirection::Asc);
        assert_eq!(opts.growth, GrowthWindow::default());

        let opts = parser.parse_search_opts(&params(&[("limit", "1000000")]), &config);
        assert_eq!(opts.limit, config.max_page_size);
    }
}
