use serde::{Serialize, Deserialize};
use crate::core::types::{Mutation, PANGO_SEPARATOR};

/// Area value that means "no area filter"
pub const OVERVIEW_AREA: &str = "overview";

/// One rollup target: a clade and its descendants, optionally narrowed to
/// records carrying every listed mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryLineage {
    pub key: String,          // Label used in results, e.g. "B.1+S:E484K"
    pub pango_clade: String,  // Always ends with '.', e.g. "B.1."
    pub mutations: Vec<Mutation>,
}

impl QueryLineage {
    pub fn new(key: &str, pango_clade: &str) -> Self {
        QueryLineage {
            key: key.to_string(),
            pango_clade: pango_clade.to_string(),
            mutations: Vec::new(),
        }
    }

    pub fn with_mutation(mut self, mutation: Mutation) -> Self {
        self.mutations.push(mutation);
        self
    }

    /// Number of hierarchy levels, "B.1." is 2
    pub fn depth(&self) -> usize {
        self.pango_clade.matches(PANGO_SEPARATOR).count()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub lineages: Vec<QueryLineage>,
    pub excluding: Vec<QueryLineage>,
    pub area: Option<String>,
    pub date_from: Option<String>,  // Inclusive, YYYY-MM-DD
    pub date_to: Option<String>,    // Inclusive, YYYY-MM-DD
    pub prefix: Option<String>,     // Gene filter for mutation search
    pub suffix_filter: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortProperty {
    #[default]
    Count,
    Name,
    Change,
}

impl SortProperty {
    /// Unknown names fall back to `Count`
    pub fn from_name(name: &str) -> Self {
        match name {
            "name" => SortProperty::Name,
            "change" => SortProperty::Change,
            _ => SortProperty::Count,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Reference dates between which growth is measured
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrowthWindow {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl GrowthWindow {
    pub fn new(start: &str, end: &str) -> Self {
        GrowthWindow {
            start: Some(start.to_string()),
            end: Some(end.to_string()),
        }
    }
}

/// Paging, ranking and scoping of a mutation search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOpts {
    pub skip: usize,
    pub limit: usize,
    pub sort_property: SortProperty,
    pub sort_direction: SortDirection,
    pub growth: GrowthWindow,
    pub lineage: String,
    pub suppression_min: u64,
    pub parallelism: usize,
}

impl Default for SearchOpts {
    fn default() -> Self {
        SearchOpts {
            skip: 0,
            limit: 32,
            sort_property: SortProperty::Count,
            sort_direction: SortDirection::Desc,
            growth: GrowthWindow::default(),
            lineage: String::new(),
            suppression_min: 0,
            parallelism: 1,
        }
    }
}
