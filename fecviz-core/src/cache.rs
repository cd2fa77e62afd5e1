use crate::bins::HistogramBin;
use crate::scale::ScaleState;
use fecviz_common::{CachePolicy, ContributionRecord};
use std::collections::{HashMap, VecDeque};
use xxhash_rust::xxh3::Xxh3;

/// Entries kept before the oldest signature is evicted.
pub const SCALE_CACHE_CAPACITY: usize = 32;

#[derive(Debug, Clone, PartialEq)]
pub struct CachedScale {
    pub scales: ScaleState,
    /// Bounds and counts only; member records are not retained.
    pub bins: Vec<HistogramBin>,
}

impl CachedScale {
    pub fn new(scales: ScaleState, bins: &[HistogramBin]) -> Self {
        Self { scales, bins: bins.iter().map(HistogramBin::summary).collect() }
    }
}

/// Scales already computed, keyed by dataset signature. Holds at most
/// `capacity` entries, evicting in insertion order.
#[derive(Debug, Clone)]
pub struct ScaleCache {
    policy: CachePolicy,
    capacity: usize,
    entries: HashMap<String, CachedScale>,
    order: VecDeque<String>,
}

impl Default for ScaleCache {
    fn default() -> Self {
        Self::new(CachePolicy::default())
    }
}

impl ScaleCache {
    pub fn new(policy: CachePolicy) -> Self {
        Self::with_capacity(policy, SCALE_CACHE_CAPACITY)
    }

    pub fn with_capacity(policy: CachePolicy, capacity: usize) -> Self {
        Self { policy, capacity: capacity.max(1), entries: HashMap::new(), order: VecDeque::new() }
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    pub fn signature(&self, records: &[ContributionRecord]) -> String {
        signature(records, self.policy)
    }

    pub fn get(&self, signature: &str) -> Option<&CachedScale> {
        self.entries.get(signature)
    }

    pub fn insert(&mut self, signature: String, entry: CachedScale) {
        if self.entries.insert(signature.clone(), entry).is_some() {
            return;
        }
        self.order.push_back(signature);
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn signature(records: &[ContributionRecord], policy: CachePolicy) -> String {
    match policy {
        CachePolicy::ContentHash => {
            let mut h = Xxh3::new();
            h.update(&(records.len() as u64).to_le_bytes());
            for r in records {
                h.update(r.category.as_bytes());
                h.update(&[0xff]); // category bytes never contain 0xff in valid UTF-8
                h.update(&r.amount.to_bits().to_le_bytes());
            }
            format!("xxh3:{:016x}", h.digest())
        }
        CachePolicy::FirstRecord => match records.first() {
            Some(r) => format!("{},{},{}", r.category, r.amount, records.len()),
            None => format!(",{}", records.len()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::{LinearScale, ThresholdScale};

    fn scales() -> ScaleState {
        ScaleState {
            x_scale: ThresholdScale::evenly_spaced(&[50.0, 200.0], 330.0),
            y_scale: LinearScale::new((0.0, 10.0), (0.0, 450.0)),
        }
    }

    fn recs(amounts: &[f64]) -> Vec<ContributionRecord> {
        amounts.iter().map(|&a| ContributionRecord::new("NY", a)).collect()
    }

    #[test]
    fn first_record_policy_collides() {
        let a = signature(&recs(&[10.0, 20.0, 30.0]), CachePolicy::FirstRecord);
        let b = signature(&recs(&[10.0, 9000.0, 1e6]), CachePolicy::FirstRecord);
        assert_eq!(a, b);
        assert_eq!(a, "NY,10,3");
    }

    #[test]
    fn content_hash_tells_them_apart() {
        let a = signature(&recs(&[10.0, 20.0, 30.0]), CachePolicy::ContentHash);
        let b = signature(&recs(&[10.0, 9000.0, 1e6]), CachePolicy::ContentHash);
        assert_ne!(a, b);
        assert_eq!(a, signature(&recs(&[10.0, 20.0, 30.0]), CachePolicy::ContentHash));
    }

    #[test]
    fn content_hash_sees_categories() {
        let a = vec![ContributionRecord::new("NY", 5.0)];
        let b = vec![ContributionRecord::new("CA", 5.0)];
        assert_ne!(signature(&a, CachePolicy::ContentHash), signature(&b, CachePolicy::ContentHash));
    }

    #[test]
    fn evicts_oldest_past_capacity() {
        let mut cache = ScaleCache::with_capacity(CachePolicy::ContentHash, 2);
        let entry = || CachedScale::new(scales(), &[]);
        cache.insert("a".into(), entry());
        cache.insert("b".into(), entry());
        cache.insert("a".into(), entry());
        assert_eq!(cache.len(), 2);
        cache.insert("c".into(), entry());
        assert_eq!(cache.len(), 2);
        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_some() && cache.get("c").is_some());
    }

    #[test]
    fn cached_bins_drop_records() {
        let boundaries = crate::bins::BinBoundaries::default();
        let bins = crate::bins::bucket(&recs(&[10.0, 10.0, 600.0]), &boundaries);
        let cached = CachedScale::new(scales(), &bins);
        assert_eq!(cached.bins[0].count, 2);
        assert_eq!(cached.bins[3].upper_bound, 1000.0);
        assert!(cached.bins.iter().all(|b| b.records.is_empty()));
    }

    #[test]
    fn empty_signatures() {
        assert_eq!(signature(&[], CachePolicy::FirstRecord), ",0");
        assert!(signature(&[], CachePolicy::ContentHash).starts_with("xxh3:"));
    }
}
