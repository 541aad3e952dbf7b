//! Distances between value distributions and between URI sets

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt::Debug;

/// Distance between two bags of numbers
///
/// Implementations must be symmetric and never negative.
pub trait NumericDistance: Debug + Send + Sync {
    /// Distance between `a` and `b`
    fn compute(&self, a: &[f64], b: &[f64]) -> f64;
}

/// Two-sample Kolmogorov-Smirnov statistic
///
/// The largest gap between the two empirical distribution functions, in
/// [0, 1]. Non-finite values are ignored; an empty side is at distance 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct KolmogorovSmirnov;

impl KolmogorovSmirnov {
    fn sorted(values: &[f64]) -> Vec<f64> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        sorted.sort_by(|x, y| x.total_cmp(y));
        sorted
    }
}

impl NumericDistance for KolmogorovSmirnov {
    fn compute(&self, a: &[f64], b: &[f64]) -> f64 {
        let a = Self::sorted(a);
        let b = Self::sorted(b);
        if a.is_empty() || b.is_empty() {
            return 1.0;
        }

        let (n, m) = (a.len() as f64, b.len() as f64);
        let (mut i, mut j) = (0, 0);
        let mut statistic: f64 = 0.0;

        while i < a.len() && j < b.len() {
            let x = match a[i].total_cmp(&b[j]) {
                Ordering::Greater => b[j],
                _ => a[i],
            };
            while i < a.len() && a[i] <= x {
                i += 1;
            }
            while j < b.len() && b[j] <= x {
                j += 1;
            }
            statistic = statistic.max((i as f64 / n - j as f64 / m).abs());
        }

        statistic
    }
}

/// Jaccard dissimilarity `1 - |A ∩ B| / |A ∪ B|`, and 1 when both sets are empty
pub fn jaccard_dissimilarity<T: Ord>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 1.0;
    }
    let intersection = a.intersection(b).count();
    1.0 - intersection as f64 / union as f64
}
