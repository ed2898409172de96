use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::record::Record;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub key: String,
    pub weight: u64,
}

impl CategoryCount {
    pub fn new(key: impl Into<String>, weight: u64) -> Self {
        Self {
            key: key.into(),
            weight,
        }
    }
}

/// Which keys a record contributes to an aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSelector {
    /// Every depicts tag, duplicates included.
    Depicts,
    /// The creator country, if the record has one.
    CreatorCountry,
}

impl FieldSelector {
    pub fn keys<'a>(&self, record: &'a Record) -> Vec<&'a str> {
        match self {
            FieldSelector::Depicts => record.depicts.iter().map(String::as_str).collect(),
            FieldSelector::CreatorCountry => record.country().into_iter().collect(),
        }
    }
}

pub fn aggregate<'a, I>(records: I, selector: FieldSelector) -> Vec<CategoryCount>
where
    I: IntoIterator<Item = &'a Record>,
{
    aggregate_by(records, |record| selector.keys(record))
}

/// Counts every key the selector yields across all records. Output keeps
/// first-seen order.
pub fn aggregate_by<'a, I, F, K>(records: I, mut selector: F) -> Vec<CategoryCount>
where
    I: IntoIterator<Item = &'a Record>,
    F: FnMut(&'a Record) -> K,
    K: IntoIterator<Item = &'a str>,
{
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut counts: Vec<CategoryCount> = Vec::new();
    for record in records {
        for key in selector(record) {
            match index.get(key) {
                Some(&slot) => counts[slot].weight += 1,
                None => {
                    index.insert(key, counts.len());
                    counts.push(CategoryCount::new(key, 1));
                }
            }
        }
    }
    counts
}

/// Tag policy: one-off categories are clutter in the treemap.
pub fn drop_singletons(counts: Vec<CategoryCount>) -> Vec<CategoryCount> {
    counts.into_iter().filter(|count| count.weight != 1).collect()
}

pub fn count_by_country<'a, I>(records: I) -> BTreeMap<String, u64>
where
    I: IntoIterator<Item = &'a Record>,
{
    aggregate(records, FieldSelector::CreatorCountry)
        .into_iter()
        .map(|count| (count.key, count.weight))
        .collect()
}
