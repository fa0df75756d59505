//! Income allocator
//!
//! Splits an incoming amount across the active buckets. Two policies are
//! supported and selected by configuration:
//!
//! - `NormalizeAll`: every weight is rescaled so the set sums to 100 and each
//!   bucket receives its rescaled percent of the total.
//! - `PriorityTier`: skim-first buckets take their stated percent of the full
//!   amount, then the remainder is shared among the other buckets in
//!   proportion to their weights.
//!
//! Each share is rounded half-up to the cent independently. The difference
//! between the total and the sum of shares (the drift) is at most one cent
//! per bucket and is reported, or absorbed by the largest share when the
//! `LargestShare` residual policy is selected.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use crate::error::{CashplanError, CashplanResult};
use crate::models::{Bucket, BucketId, Money};

/// Slack allowed on percent sums before they count as off 100
const SKIM_TOLERANCE: f64 = 0.01;

/// How income is split across buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SplitPolicy {
    /// Rescale every weight so the set sums to 100
    NormalizeAll,
    /// Fund skim-first buckets from the full amount, share the rest
    #[default]
    PriorityTier,
}

impl SplitPolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "normalize_all" | "normalize" => Some(Self::NormalizeAll),
            "priority_tier" | "priority" | "skim" => Some(Self::PriorityTier),
            _ => None,
        }
    }
}

impl fmt::Display for SplitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NormalizeAll => write!(f, "normalize_all"),
            Self::PriorityTier => write!(f, "priority_tier"),
        }
    }
}

/// What to do with the cents lost or gained by per-bucket rounding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResidualPolicy {
    /// Report the drift, leave the shares as rounded
    #[default]
    Keep,
    /// Move the drift onto the largest share so the split is exact
    LargestShare,
}

impl ResidualPolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "keep" => Some(Self::Keep),
            "largest_share" | "largest" => Some(Self::LargestShare),
            _ => None,
        }
    }
}

impl fmt::Display for ResidualPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keep => write!(f, "keep"),
            Self::LargestShare => write!(f, "largest_share"),
        }
    }
}

/// Policy pair passed to [`split_by_buckets`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SplitOptions {
    pub policy: SplitPolicy,
    pub residual: ResidualPolicy,
}

impl SplitOptions {
    pub fn new(policy: SplitPolicy, residual: ResidualPolicy) -> Self {
        Self { policy, residual }
    }
}

/// The part of an income split that lands in one bucket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketShare {
    pub bucket_id: BucketId,
    pub bucket_name: String,
    /// Percent of the total actually applied, after normalization and skims
    pub effective_percent: f64,
    pub amount: Money,
}

/// Result of splitting one amount across buckets
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Allocation {
    pub total: Money,
    pub policy: SplitPolicy,
    /// One share per active bucket, in input order
    pub shares: Vec<BucketShare>,
    /// Money no bucket could take (all-zero weights, no proportional buckets)
    pub unallocated: Money,
}

impl Allocation {
    fn empty(total: Money, policy: SplitPolicy) -> Self {
        Self {
            total,
            policy,
            shares: Vec::new(),
            unallocated: total,
        }
    }

    /// Sum of all shares
    pub fn allocated(&self) -> Money {
        self.shares.iter().map(|s| s.amount).sum()
    }

    /// Rounding drift: what the shares and the unallocated amount miss the
    /// total by. Positive means cents were lost, negative means created.
    pub fn drift(&self) -> Money {
        self.total - self.allocated() - self.unallocated
    }

    /// True when the drift stays within one cent per share
    pub fn within_tolerance(&self) -> bool {
        self.drift().abs().cents() <= self.shares.len() as i64
    }

    /// True when some of the income could not be placed in any bucket
    pub fn has_unallocated(&self) -> bool {
        self.unallocated.is_positive()
    }

    pub fn share_for(&self, bucket_id: BucketId) -> Option<&BucketShare> {
        self.shares.iter().find(|s| s.bucket_id == bucket_id)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn check_percents(buckets: &[&Bucket]) -> CashplanResult<()> {
    for bucket in buckets {
        if !bucket.percent.is_finite() || bucket.percent < 0.0 {
            return Err(CashplanError::InvalidInput(format!(
                "bucket '{}' has invalid percent {}",
                bucket.name, bucket.percent
            )));
        }
    }
    Ok(())
}

/// Rescale bucket weights so they sum to 100, rounded to two decimals
///
/// A zero sum yields all-zero percents. A negative weight is rejected.
pub fn normalize_percentages(buckets: &[Bucket]) -> CashplanResult<Vec<f64>> {
    let refs: Vec<&Bucket> = buckets.iter().collect();
    normalized(&refs)
}

fn normalized(buckets: &[&Bucket]) -> CashplanResult<Vec<f64>> {
    check_percents(buckets)?;

    let sum: f64 = buckets.iter().map(|b| b.percent).sum();
    if sum <= 0.0 {
        return Ok(vec![0.0; buckets.len()]);
    }

    // Weights already summing to 100 (within a cent) are kept as entered
    let factor = if (sum - 100.0).abs() <= SKIM_TOLERANCE + 1e-9 {
        1.0
    } else {
        100.0 / sum
    };

    Ok(buckets.iter().map(|b| round2(b.percent * factor)).collect())
}

/// Split `total` across the active buckets
///
/// Inactive buckets are skipped. An empty bucket set yields no shares and
/// reports the whole total as unallocated. A non-positive total, a negative
/// weight, or skim buckets claiming more than 100% are rejected.
pub fn split_by_buckets(
    buckets: &[Bucket],
    total: Money,
    options: SplitOptions,
) -> CashplanResult<Allocation> {
    if !total.is_positive() {
        return Err(CashplanError::InvalidInput(format!(
            "amount to split must be positive, got {}",
            total
        )));
    }

    let active: Vec<&Bucket> = buckets.iter().filter(|b| b.active).collect();
    check_percents(&active)?;

    if active.is_empty() {
        debug!(%total, "no active buckets, nothing to split");
        return Ok(Allocation::empty(total, options.policy));
    }

    let mut allocation = match options.policy {
        SplitPolicy::NormalizeAll => split_normalized(&active, total)?,
        SplitPolicy::PriorityTier => split_priority_tier(&active, total)?,
    };

    if options.residual == ResidualPolicy::LargestShare {
        absorb_residual(&mut allocation);
    }

    debug!(
        %total,
        policy = %allocation.policy,
        buckets = allocation.shares.len(),
        allocated = %allocation.allocated(),
        unallocated = %allocation.unallocated,
        drift = %allocation.drift(),
        "split income"
    );

    Ok(allocation)
}

fn split_normalized(buckets: &[&Bucket], total: Money) -> CashplanResult<Allocation> {
    let percents = normalized(buckets)?;
    let weight_sum: f64 = buckets.iter().map(|b| b.percent).sum();

    // Amounts come from the exact weight ratio; the rounded percent is for reporting
    let shares = buckets
        .iter()
        .zip(percents)
        .map(|(bucket, percent)| BucketShare {
            bucket_id: bucket.id,
            bucket_name: bucket.name.clone(),
            effective_percent: percent,
            amount: total.proportion(bucket.percent, weight_sum),
        })
        .collect();

    let unallocated = if weight_sum <= 0.0 {
        warn!(%total, "all bucket weights are zero, income left unallocated");
        total
    } else {
        Money::zero()
    };

    Ok(Allocation {
        total,
        policy: SplitPolicy::NormalizeAll,
        shares,
        unallocated,
    })
}

fn split_priority_tier(buckets: &[&Bucket], total: Money) -> CashplanResult<Allocation> {
    let skim_percent: f64 = buckets
        .iter()
        .filter(|b| b.priority_pre)
        .map(|b| b.percent)
        .sum();

    if skim_percent > 100.0 + SKIM_TOLERANCE {
        return Err(CashplanError::InvalidInput(format!(
            "skim-first buckets claim {:.2}% of income, more than 100%",
            skim_percent
        )));
    }

    let skimmed: Money = buckets
        .iter()
        .filter(|b| b.priority_pre)
        .map(|b| total.percent_of(b.percent))
        .sum();
    let remaining = (total - skimmed).clamp_zero();

    // Weights of the proportional tier, renormalized among themselves only
    let pool: f64 = buckets
        .iter()
        .filter(|b| !b.priority_pre)
        .map(|b| b.percent)
        .sum();
    let pool_percent = (100.0 - skim_percent).max(0.0);

    let shares = buckets
        .iter()
        .map(|bucket| {
            let (effective_percent, amount) = if bucket.priority_pre {
                (bucket.percent, total.percent_of(bucket.percent))
            } else if pool > 0.0 {
                (
                    round2(bucket.percent / pool * pool_percent),
                    remaining.proportion(bucket.percent, pool),
                )
            } else {
                (0.0, Money::zero())
            };

            BucketShare {
                bucket_id: bucket.id,
                bucket_name: bucket.name.clone(),
                effective_percent,
                amount,
            }
        })
        .collect();

    let unallocated = if pool > 0.0 {
        Money::zero()
    } else {
        if remaining.is_positive() {
            warn!(
                %remaining,
                "no proportional bucket has weight, remainder left unallocated"
            );
        }
        remaining
    };

    Ok(Allocation {
        total,
        policy: SplitPolicy::PriorityTier,
        shares,
        unallocated,
    })
}

/// Move the rounding drift onto the largest share, one cent at a time
fn absorb_residual(allocation: &mut Allocation) {
    let drift = allocation.drift().cents();
    let step = Money::from_cents(drift.signum());

    for _ in 0..drift.abs() {
        match largest_share(&allocation.shares, drift < 0) {
            Some(index) => allocation.shares[index].amount += step,
            None => break,
        }
    }
}

/// Index of the share with the largest amount (earliest on ties), ranked by
/// effective percent when amounts are equal. Only shares that can give back
/// a cent qualify when `taking` is set.
fn largest_share(shares: &[BucketShare], taking: bool) -> Option<usize> {
    let mut best: Option<usize> = None;

    for (index, share) in shares.iter().enumerate() {
        if share.effective_percent <= 0.0 || (taking && !share.amount.is_positive()) {
            continue;
        }
        let better = match best {
            None => true,
            Some(b) => {
                let current = &shares[b];
                share.amount > current.amount
                    || (share.amount == current.amount
                        && share.effective_percent > current.effective_percent)
            }
        };
        if better {
            best = Some(index);
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buckets(weights: &[f64]) -> Vec<Bucket> {
        weights
            .iter()
            .enumerate()
            .map(|(i, w)| Bucket::new(format!("B{}", i), *w))
            .collect()
    }

    fn amounts(allocation: &Allocation) -> Vec<i64> {
        allocation.shares.iter().map(|s| s.amount.cents()).collect()
    }

    fn normalize_all() -> SplitOptions {
        SplitOptions::new(SplitPolicy::NormalizeAll, ResidualPolicy::Keep)
    }

    fn priority_tier() -> SplitOptions {
        SplitOptions::new(SplitPolicy::PriorityTier, ResidualPolicy::Keep)
    }

    #[test]
    fn test_normalize_keeps_weights_summing_to_100() {
        let percents = normalize_percentages(&buckets(&[50.0, 30.0, 20.0])).unwrap();
        assert_eq!(percents, vec![50.0, 30.0, 20.0]);

        let percents = normalize_percentages(&buckets(&[33.33, 33.33, 33.33])).unwrap();
        assert_eq!(percents, vec![33.33, 33.33, 33.33]);
    }

    #[test]
    fn test_normalize_rescales() {
        let percents = normalize_percentages(&buckets(&[1.0, 1.0, 2.0])).unwrap();
        assert_eq!(percents, vec![25.0, 25.0, 50.0]);

        let percents = normalize_percentages(&buckets(&[1.0, 1.0, 1.0])).unwrap();
        assert_eq!(percents, vec![33.33, 33.33, 33.33]);
    }

    #[test]
    fn test_normalize_zero_sum() {
        let percents = normalize_percentages(&buckets(&[0.0, 0.0])).unwrap();
        assert_eq!(percents, vec![0.0, 0.0]);
    }

    #[test]
    fn test_normalize_rejects_negative() {
        let err = normalize_percentages(&buckets(&[50.0, -10.0])).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_split_rejects_non_positive_total() {
        let set = buckets(&[100.0]);
        assert!(split_by_buckets(&set, Money::zero(), normalize_all())
            .unwrap_err()
            .is_invalid_input());
        assert!(split_by_buckets(&set, Money::from_cents(-100), priority_tier())
            .unwrap_err()
            .is_invalid_input());
    }

    #[test]
    fn test_split_empty_bucket_set() {
        let allocation =
            split_by_buckets(&[], Money::from_cents(10000), normalize_all()).unwrap();
        assert!(allocation.shares.is_empty());
        assert_eq!(allocation.unallocated.cents(), 10000);
        assert!(allocation.drift().is_zero());
    }

    #[test]
    fn test_normalize_all_split() {
        let set = buckets(&[2.0, 1.0, 1.0]);
        let allocation =
            split_by_buckets(&set, Money::from_cents(100000), normalize_all()).unwrap();

        assert_eq!(amounts(&allocation), vec![50000, 25000, 25000]);
        let percents: Vec<f64> = allocation.shares.iter().map(|s| s.effective_percent).collect();
        assert_eq!(percents, vec![50.0, 25.0, 25.0]);
        assert!(allocation.drift().is_zero());
    }

    #[test]
    fn test_normalize_all_reports_drift() {
        let set = buckets(&[1.0, 1.0, 1.0]);
        let allocation =
            split_by_buckets(&set, Money::from_cents(10000), normalize_all()).unwrap();

        assert_eq!(amounts(&allocation), vec![3333, 3333, 3333]);
        assert_eq!(allocation.drift().cents(), 1);
        assert!(allocation.within_tolerance());
    }

    #[test]
    fn test_normalize_all_amounts_use_exact_weight_ratio() {
        // 10000.00 at a rounded 33.33% would leave a whole 1.00 unplaced
        let set = buckets(&[1.0, 1.0, 1.0]);
        let allocation =
            split_by_buckets(&set, Money::from_cents(1_000_000), normalize_all()).unwrap();

        assert_eq!(amounts(&allocation), vec![333333, 333333, 333333]);
        assert!(allocation.shares.iter().all(|s| s.effective_percent == 33.33));
        assert_eq!(allocation.drift().cents(), 1);
        assert!(allocation.within_tolerance());
    }

    #[test]
    fn test_largest_share_absorbs_drift() {
        let set = buckets(&[1.0, 1.0, 1.0]);
        let options = SplitOptions::new(SplitPolicy::NormalizeAll, ResidualPolicy::LargestShare);
        let allocation = split_by_buckets(&set, Money::from_cents(10000), options).unwrap();

        assert_eq!(amounts(&allocation), vec![3334, 3333, 3333]);
        assert!(allocation.drift().is_zero());
        assert_eq!(allocation.allocated().cents(), 10000);
    }

    #[test]
    fn test_largest_share_returns_created_cents() {
        // 0.02 split four ways rounds every share up to a cent
        let set = buckets(&[25.0, 25.0, 25.0, 25.0]);
        let kept = split_by_buckets(&set, Money::from_cents(2), normalize_all()).unwrap();
        assert_eq!(kept.drift().cents(), -2);

        let options = SplitOptions::new(SplitPolicy::NormalizeAll, ResidualPolicy::LargestShare);
        let exact = split_by_buckets(&set, Money::from_cents(2), options).unwrap();
        assert!(exact.drift().is_zero());
        assert!(exact.shares.iter().all(|s| !s.amount.is_negative()));
        assert_eq!(exact.allocated().cents(), 2);
    }

    #[test]
    fn test_normalize_all_zero_weights_left_unallocated() {
        let set = buckets(&[0.0, 0.0]);
        let allocation =
            split_by_buckets(&set, Money::from_cents(5000), normalize_all()).unwrap();

        assert_eq!(amounts(&allocation), vec![0, 0]);
        assert_eq!(allocation.unallocated.cents(), 5000);
        assert!(allocation.has_unallocated());
        assert!(allocation.drift().is_zero());
    }

    #[test]
    fn test_normalize_all_sum_within_tolerance() {
        let weight_sets: [&[f64]; 5] = [
            &[1.0, 1.0, 1.0],
            &[10.0, 20.0, 30.0, 40.0],
            &[7.0, 13.0, 17.5],
            &[33.3, 33.3, 33.3],
            &[0.5, 99.0, 0.25, 0.25],
        ];
        let totals = [1, 7, 999, 10001, 1024999, 123456789];

        for weights in weight_sets {
            let set = buckets(weights);
            for total in totals {
                let allocation =
                    split_by_buckets(&set, Money::from_cents(total), normalize_all()).unwrap();
                assert!(
                    allocation.within_tolerance(),
                    "weights {:?} total {} drift {}",
                    weights,
                    total,
                    allocation.drift()
                );
            }
        }
    }

    #[test]
    fn test_priority_tier_skims_first() {
        let set = vec![
            Bucket::skim("Tithe", 10.0),
            Bucket::new("Operations", 60.0),
            Bucket::new("Reserve", 30.0),
        ];
        let allocation =
            split_by_buckets(&set, Money::from_cents(100000), priority_tier()).unwrap();

        assert_eq!(amounts(&allocation), vec![10000, 60000, 30000]);
        let percents: Vec<f64> = allocation.shares.iter().map(|s| s.effective_percent).collect();
        assert_eq!(percents, vec![10.0, 60.0, 30.0]);
        assert!(allocation.unallocated.is_zero());
    }

    #[test]
    fn test_priority_tier_renormalizes_remainder_only() {
        // The skim is taken from the original amount, the rest split 50/50
        let set = vec![
            Bucket::skim("Tithe", 10.0),
            Bucket::new("A", 50.0),
            Bucket::new("B", 50.0),
        ];
        let allocation =
            split_by_buckets(&set, Money::from_cents(100000), priority_tier()).unwrap();

        assert_eq!(amounts(&allocation), vec![10000, 45000, 45000]);
        assert_eq!(allocation.shares[1].effective_percent, 45.0);
        assert!(allocation.drift().is_zero());
    }

    #[test]
    fn test_priority_tier_skim_matches_full_amount_percent() {
        let set = vec![
            Bucket::skim("Tithe", 10.0),
            Bucket::skim("Tax", 7.5),
            Bucket::new("Rest", 1.0),
        ];
        let total = Money::from_cents(1024999);
        let allocation = split_by_buckets(&set, total, priority_tier()).unwrap();

        let skimmed: i64 = allocation.shares[..2].iter().map(|s| s.amount.cents()).sum();
        let expected = total.cents() as f64 * 17.5 / 100.0;
        assert!((skimmed as f64 - expected).abs() <= 2.0);
        assert_eq!(
            allocation.shares[2].amount.cents(),
            total.cents() - skimmed
        );
    }

    #[test]
    fn test_priority_tier_zero_pool_surfaces_remainder() {
        let set = vec![Bucket::skim("Tithe", 10.0), Bucket::new("Idle", 0.0)];
        let allocation =
            split_by_buckets(&set, Money::from_cents(100000), priority_tier()).unwrap();

        assert_eq!(amounts(&allocation), vec![10000, 0]);
        assert_eq!(allocation.unallocated.cents(), 90000);
        assert!(allocation.drift().is_zero());
    }

    #[test]
    fn test_priority_tier_only_skim_buckets() {
        let set = vec![Bucket::skim("Tithe", 10.0)];
        let allocation =
            split_by_buckets(&set, Money::from_cents(5000), priority_tier()).unwrap();

        assert_eq!(amounts(&allocation), vec![500]);
        assert_eq!(allocation.unallocated.cents(), 4500);
    }

    #[test]
    fn test_priority_tier_rejects_over_claimed_skims() {
        let set = vec![Bucket::skim("A", 70.0), Bucket::skim("B", 40.0)];
        let err = split_by_buckets(&set, Money::from_cents(100), priority_tier()).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_inactive_buckets_skipped() {
        let mut idle = Bucket::new("Idle", 50.0);
        idle.deactivate();
        let set = vec![Bucket::new("Live", 50.0), idle];

        let allocation =
            split_by_buckets(&set, Money::from_cents(1000), normalize_all()).unwrap();
        assert_eq!(allocation.shares.len(), 1);
        assert_eq!(allocation.shares[0].amount.cents(), 1000);
        assert_eq!(allocation.shares[0].effective_percent, 100.0);
    }

    #[test]
    fn test_split_rejects_negative_weight() {
        let set = buckets(&[10.0, -5.0]);
        assert!(split_by_buckets(&set, Money::from_cents(100), priority_tier())
            .unwrap_err()
            .is_invalid_input());
    }

    #[test]
    fn test_split_is_idempotent() {
        let set = vec![
            Bucket::skim("Tithe", 10.0),
            Bucket::new("A", 33.0),
            Bucket::new("B", 67.0),
        ];
        let total = Money::from_cents(77777);

        for options in [normalize_all(), priority_tier()] {
            let first = split_by_buckets(&set, total, options).unwrap();
            let second = split_by_buckets(&set, total, options).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(SplitPolicy::parse("normalize-all"), Some(SplitPolicy::NormalizeAll));
        assert_eq!(SplitPolicy::parse("priority_tier"), Some(SplitPolicy::PriorityTier));
        assert_eq!(SplitPolicy::parse("even"), None);
        assert_eq!(
            ResidualPolicy::parse("largest-share"),
            Some(ResidualPolicy::LargestShare)
        );
        assert_eq!(SplitPolicy::PriorityTier.to_string(), "priority_tier");
    }
}
