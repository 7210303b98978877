//! Labelled dataset records, CSV loading and the seeded train/validation split.

use crate::bigfive::{Trait, TraitMap};
use crate::error::{Error, Result};
use csv::ReaderBuilder;
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Name of the text column.
pub const TEXT_COLUMN: &str = "text";

/// A single labelled chat sample.
#[derive(Debug, Clone, PartialEq)]
pub struct TraitRecord {
    pub text: String,
    /// 0/1 label per trait
    pub labels: TraitMap<u8>,
}

impl TraitRecord {
    pub fn new(text: impl Into<String>, labels: [u8; 5]) -> Self {
        TraitRecord {
            text: text.into(),
            labels: TraitMap::from(labels),
        }
    }

    /// The 5-label combination packed into bits, openness lowest.
    pub fn label_key(&self) -> u8 {
        self.labels
            .iter()
            .fold(0, |key, (t, &y)| key | ((y & 1) << t.index()))
    }
}

/// Load the dataset CSV. Columns are located by header name; extra columns
/// are ignored.
pub fn load_dataset(path: impl AsRef<Path>) -> Result<Vec<TraitRecord>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let records = read_dataset(file)?;
    info!(path = %path.display(), records = records.len(), "dataset loaded");
    Ok(records)
}

/// Parse dataset CSV from any reader.
pub fn read_dataset<R: Read>(reader: R) -> Result<Vec<TraitRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let column = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::MissingColumn(name.to_string()))
    };
    let text_idx = column(TEXT_COLUMN)?;
    let mut label_idx = [0usize; 5];
    for t in Trait::ALL {
        label_idx[t.index()] = column(t.name())?;
    }

    let mut records = Vec::new();
    for (i, row) in rdr.records().enumerate() {
        let row = row?;
        let row_number = i + 1;
        let text = row.get(text_idx).unwrap_or_default().to_string();
        let mut labels = TraitMap::<u8>::default();
        for t in Trait::ALL {
            let raw = row.get(label_idx[t.index()]).unwrap_or_default();
            labels[t] = parse_label(raw).ok_or_else(|| Error::InvalidLabel {
                row: row_number,
                column: t.name().to_string(),
                value: raw.to_string(),
            })?;
        }
        records.push(TraitRecord { text, labels });
    }

    if records.is_empty() {
        return Err(Error::EmptyDataset);
    }
    Ok(records)
}

fn parse_label(raw: &str) -> Option<u8> {
    match raw.trim() {
        "0" => Some(0),
        "1" => Some(1),
        _ => None,
    }
}

/// Stack record labels into an `(n, 5)` matrix in canonical trait order.
pub fn label_matrix(records: &[TraitRecord]) -> Array2<u8> {
    Array2::from_shape_fn((records.len(), Trait::ALL.len()), |(i, j)| {
        records[i].labels.values()[j]
    })
}

/// Record indices of each partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub validation: Vec<usize>,
    /// Whether the split preserved label-combination proportions
    pub stratified: bool,
}

/// Number of validation samples: `ceil(n * fraction)`, leaving at least one
/// training sample.
fn validation_size(n: usize, fraction: f64) -> usize {
    if n < 2 || fraction <= 0.0 {
        return 0;
    }
    let size = (n as f64 * fraction).ceil() as usize;
    size.clamp(1, n - 1)
}

/// Seeded train/validation split.
///
/// Stratifies on the full 5-label combination when every combination occurs
/// at least twice and there are no more combinations than samples in either
/// partition; otherwise falls back to a plain shuffle.
pub fn split_indices(records: &[TraitRecord], validation_fraction: f64, seed: u64) -> Split {
    let n = records.len();
    let n_val = validation_size(n, validation_fraction);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut strata: BTreeMap<u8, Vec<usize>> = BTreeMap::new();
    for (i, record) in records.iter().enumerate() {
        strata.entry(record.label_key()).or_default().push(i);
    }

    let can_stratify = n_val > 0
        && strata.values().all(|members| members.len() >= 2)
        && strata.len() <= n_val
        && strata.len() <= n - n_val;

    if !can_stratify {
        debug!(strata = strata.len(), n_val, "plain shuffled split");
        let mut indices: Vec<usize> = (0..n).collect();
        indices.shuffle(&mut rng);
        let train = indices.split_off(n_val);
        return Split {
            train,
            validation: indices,
            stratified: false,
        };
    }

    let allocation = allocate(&strata, n, n_val);
    let mut train = Vec::with_capacity(n - n_val);
    let mut validation = Vec::with_capacity(n_val);
    for ((_, members), take) in strata.iter().zip(allocation) {
        let mut members = members.clone();
        members.shuffle(&mut rng);
        let rest = members.split_off(take);
        validation.extend(members);
        train.extend(rest);
    }
    train.shuffle(&mut rng);
    validation.shuffle(&mut rng);

    Split {
        train,
        validation,
        stratified: true,
    }
}

/// Largest-remainder allocation of `n_val` validation slots across strata.
/// Every stratum gets at least one slot and keeps at least one training member.
fn allocate(strata: &BTreeMap<u8, Vec<usize>>, n: usize, n_val: usize) -> Vec<usize> {
    let exact: Vec<f64> = strata
        .values()
        .map(|m| m.len() as f64 * n_val as f64 / n as f64)
        .collect();
    let mut take: Vec<usize> = strata
        .values()
        .zip(&exact)
        .map(|(m, &e)| (e.floor() as usize).clamp(1, m.len() - 1))
        .collect();

    let mut order: Vec<usize> = (0..take.len()).collect();
    order.sort_by(|&a, &b| {
        let ra = exact[a] - exact[a].floor();
        let rb = exact[b] - exact[b].floor();
        rb.total_cmp(&ra).then(a.cmp(&b))
    });

    let capacity = |i: usize, take: &[usize]| {
        strata.values().nth(i).map_or(0, |m| m.len() - 1) > take[i]
    };

    let mut assigned: usize = take.iter().sum();
    // Grow by remainder order, then shrink the largest takers if over budget
    while assigned < n_val {
        let Some(&i) = order.iter().find(|&&i| capacity(i, &take)) else {
            break;
        };
        take[i] += 1;
        assigned += 1;
        order.retain(|&j| j != i);
        if order.is_empty() {
            order = (0..take.len()).collect();
        }
    }
    while assigned > n_val {
        let Some(i) = (0..take.len()).filter(|&i| take[i] > 1).max_by_key(|&i| take[i]) else {
            break;
        };
        take[i] -= 1;
        assigned -= 1;
    }
    take
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const CSV: &str = "\
id,text,openness,conscientiousness,extraversion,agreeableness,neuroticism
1,saya suka ide baru,1,0,0,0,0
2,aku cemas terus,0,0,0,0,1
";

    #[test]
    fn test_read_dataset() {
        let records = read_dataset(CSV.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].text, "saya suka ide baru");
        assert_eq!(records[0].labels[Trait::Openness], 1);
        assert_eq!(records[1].labels[Trait::Neuroticism], 1);
        assert_eq!(records[1].label_key(), 0b10000);
    }

    #[test]
    fn test_missing_column() {
        let csv = "text,openness,conscientiousness,extraversion,agreeableness\nhalo,0,0,0,0\n";
        match read_dataset(csv.as_bytes()) {
            Err(Error::MissingColumn(name)) => assert_eq!(name, "neuroticism"),
            other => panic!("expected missing column, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_dataset() {
        let csv = "text,openness,conscientiousness,extraversion,agreeableness,neuroticism\n";
        assert!(matches!(read_dataset(csv.as_bytes()), Err(Error::EmptyDataset)));
    }

    #[test]
    fn test_invalid_label() {
        let csv = "text,openness,conscientiousness,extraversion,agreeableness,neuroticism\n\
                   halo,0,2,0,0,0\n";
        match read_dataset(csv.as_bytes()) {
            Err(Error::InvalidLabel { row, column, value }) => {
                assert_eq!(row, 1);
                assert_eq!(column, "conscientiousness");
                assert_eq!(value, "2");
            }
            other => panic!("expected invalid label, got {:?}", other),
        }
    }

    #[test]
    fn test_label_matrix() {
        let records = read_dataset(CSV.as_bytes()).unwrap();
        let m = label_matrix(&records);
        assert_eq!(m.dim(), (2, 5));
        assert_eq!(m[[0, 0]], 1);
        assert_eq!(m[[1, 4]], 1);
        assert_eq!(m.sum(), 2);
    }

    fn records_with_keys(keys: &[[u8; 5]], copies: usize) -> Vec<TraitRecord> {
        let mut records = Vec::new();
        for c in 0..copies {
            for (k, labels) in keys.iter().enumerate() {
                records.push(TraitRecord::new(format!("doc {} {}", k, c), *labels));
            }
        }
        records
    }

    fn assert_partition(split: &Split, n: usize) {
        let mut all: Vec<usize> = split.train.iter().chain(&split.validation).copied().collect();
        all.sort();
        assert_eq!(all, (0..n).collect::<Vec<_>>());
    }

    #[test]
    fn test_stratified_split() {
        let keys = [[1, 0, 0, 0, 0], [0, 0, 0, 0, 1]];
        let records = records_with_keys(&keys, 10);
        let split = split_indices(&records, 0.2, 42);
        assert!(split.stratified);
        assert_eq!(split.validation.len(), 4);
        assert_partition(&split, records.len());

        let val_keys: Vec<u8> = split.validation.iter().map(|&i| records[i].label_key()).collect();
        assert_eq!(val_keys.iter().filter(|&&k| k == 0b00001).count(), 2);
        assert_eq!(val_keys.iter().filter(|&&k| k == 0b10000).count(), 2);
    }

    #[test]
    fn test_plain_split_when_a_combination_is_unique() {
        let mut records = records_with_keys(&[[1, 0, 0, 0, 0]], 10);
        records.push(TraitRecord::new("rare", [1, 1, 1, 1, 1]));
        let split = split_indices(&records, 0.15, 42);
        assert!(!split.stratified);
        assert_eq!(split.validation.len(), 2);
        assert_partition(&split, records.len());
    }

    #[test]
    fn test_split_is_seeded() {
        let records = records_with_keys(&[[1, 0, 0, 0, 0], [0, 1, 0, 0, 0]], 8);
        let a = split_indices(&records, 0.15, 42);
        let b = split_indices(&records, 0.15, 42);
        assert_eq!(a, b);
        let c = split_indices(&records, 0.15, 7);
        assert_partition(&c, records.len());
    }

    #[test]
    fn test_tiny_datasets() {
        let one = records_with_keys(&[[0, 0, 0, 0, 0]], 1);
        let split = split_indices(&one, 0.15, 42);
        assert_eq!(split.train, vec![0]);
        assert!(split.validation.is_empty());

        let two = records_with_keys(&[[0, 0, 0, 0, 0]], 2);
        let split = split_indices(&two, 0.15, 42);
        assert_eq!(split.train.len(), 1);
        assert_eq!(split.validation.len(), 1);
    }

    #[test]
    fn test_validation_size() {
        assert_eq!(validation_size(100, 0.15), 15);
        assert_eq!(validation_size(10, 0.15), 2);
        assert_eq!(validation_size(10, 0.0), 0);
        assert_eq!(validation_size(3, 0.99), 2);
    }

    #[test]
    fn test_allocation_matches_budget() {
        let keys = [[1, 0, 0, 0, 0], [0, 1, 0, 0, 0], [0, 0, 1, 0, 0]];
        let records = records_with_keys(&keys, 7);
        let split = split_indices(&records, 0.3, 1);
        assert!(split.stratified);
        assert_eq!(split.validation.len(), validation_size(21, 0.3));
        let distinct: HashSet<u8> = split.validation.iter().map(|&i| records[i].label_key()).collect();
        assert_eq!(distinct.len(), 3);
    }
}
