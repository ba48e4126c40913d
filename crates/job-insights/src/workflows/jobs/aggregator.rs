use super::aggregate::{
    self, GroupCountEntry, GroupCounts, GroupExclusions, GroupShareEntry, GroupShares,
};
use super::domain::{FilterSelection, JobAttribute, JobRecord, MissingSalaryPolicy};
use super::filters::{self, FilterOptions};
use serde::Serialize;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// Filtered listings plus the grouped counts a chart renders from them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationResult {
    pub group_by: JobAttribute,
    pub filtered: Vec<JobRecord>,
    pub groups: GroupCounts,
    pub ordered_groups: Vec<GroupCountEntry>,
    pub shares: Vec<GroupShareEntry>,
    pub visible_groups: Vec<GroupCountEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Pure filtering and grouping over an in-memory listing snapshot.
///
/// Every operation is total: absent collections behave as empty ones and
/// absent fields fall back to "Unknown ..." labels. [`aggregate`] memoizes its
/// most recent result so repeated renders with unchanged inputs reuse it.
///
/// [`aggregate`]: JobDataAggregator::aggregate
#[derive(Debug, Default)]
pub struct JobDataAggregator {
    policy: MissingSalaryPolicy,
    last: Mutex<Option<CachedAggregation>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

#[derive(Debug)]
struct CachedAggregation {
    fingerprint: u64,
    records: Vec<JobRecord>,
    selection: FilterSelection,
    group_by: JobAttribute,
    exclusions: GroupExclusions,
    result: Arc<AggregationResult>,
}

impl CachedAggregation {
    fn matches(
        &self,
        fingerprint: u64,
        records: &[JobRecord],
        selection: &FilterSelection,
        group_by: JobAttribute,
        exclusions: &GroupExclusions,
    ) -> bool {
        self.fingerprint == fingerprint
            && self.group_by == group_by
            && self.records == records
            && &self.selection == selection
            && &self.exclusions == exclusions
    }
}

impl JobDataAggregator {
    pub fn new(policy: MissingSalaryPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> MissingSalaryPolicy {
        self.policy
    }

    pub fn derive_filter_options(&self, records: &[JobRecord]) -> FilterOptions {
        filters::derive_filter_options(records)
    }

    pub fn apply_filters(
        &self,
        records: &[JobRecord],
        selection: &FilterSelection,
    ) -> Vec<JobRecord> {
        filters::apply_filters(records, selection, self.policy)
    }

    pub fn aggregate_by_key(&self, records: &[JobRecord], group_by: JobAttribute) -> GroupCounts {
        aggregate::aggregate_by_key(records, group_by)
    }

    pub fn compute_group_share(&self, groups: &GroupCounts) -> GroupShares {
        aggregate::compute_group_share(groups)
    }

    /// Runs the whole pipeline: filter, group, share, hide excluded groups.
    pub fn aggregate(
        &self,
        records: Option<&[JobRecord]>,
        selection: &FilterSelection,
        group_by: JobAttribute,
        exclusions: &GroupExclusions,
    ) -> Arc<AggregationResult> {
        let records = records.unwrap_or_default();
        let fingerprint = fingerprint(records, selection, group_by, exclusions);

        if let Some(result) = self.cached(fingerprint, records, selection, group_by, exclusions) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(fingerprint, "aggregation cache hit");
            return result;
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let result = Arc::new(self.compute(records, selection, group_by, exclusions));
        debug!(
            fingerprint,
            records = records.len(),
            filtered = result.filtered.len(),
            groups = result.groups.len(),
            "aggregation recomputed"
        );

        let entry = CachedAggregation {
            fingerprint,
            records: records.to_vec(),
            selection: selection.clone(),
            group_by,
            exclusions: exclusions.clone(),
            result: Arc::clone(&result),
        };
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some(entry);

        result
    }

    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// The lock is held only for the lookup; computation runs unlocked.
    fn cached(
        &self,
        fingerprint: u64,
        records: &[JobRecord],
        selection: &FilterSelection,
        group_by: JobAttribute,
        exclusions: &GroupExclusions,
    ) -> Option<Arc<AggregationResult>> {
        let last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        let hit = last
            .as_ref()
            .filter(|cached| {
                cached.matches(fingerprint, records, selection, group_by, exclusions)
            })
            .map(|cached| Arc::clone(&cached.result));
        hit
    }

    fn compute(
        &self,
        records: &[JobRecord],
        selection: &FilterSelection,
        group_by: JobAttribute,
        exclusions: &GroupExclusions,
    ) -> AggregationResult {
        let filtered = self.apply_filters(records, selection);
        let groups = self.aggregate_by_key(&filtered, group_by);
        let ordered_groups = groups.ordered();
        let shares = self.compute_group_share(&groups).ordered(&groups);
        let visible_groups = exclusions.visible(&ordered_groups);

        AggregationResult {
            group_by,
            filtered,
            groups,
            ordered_groups,
            shares,
            visible_groups,
        }
    }
}

fn fingerprint(
    records: &[JobRecord],
    selection: &FilterSelection,
    group_by: JobAttribute,
    exclusions: &GroupExclusions,
) -> u64 {
    let mut hasher = DefaultHasher::new();

    records.len().hash(&mut hasher);
    for record in records {
        record.id.hash(&mut hasher);
        record.job_title.hash(&mut hasher);
        record.company_name.hash(&mut hasher);
        record.location.hash(&mut hasher);
        record.job_type.hash(&mut hasher);
        record.experience.hash(&mut hasher);
        record.salary.map(f64::to_bits).hash(&mut hasher);
        record.posted_on.hash(&mut hasher);
    }

    selection.attributes.hash(&mut hasher);
    selection
        .salary
        .map(|range| (range.min.to_bits(), range.max.to_bits()))
        .hash(&mut hasher);
    selection.query.hash(&mut hasher);
    group_by.hash(&mut hasher);
    exclusions.hash(&mut hasher);

    hasher.finish()
}
