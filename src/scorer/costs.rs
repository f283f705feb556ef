use super::CostBreakdown;
use crate::consts::CONTINUOUS_WEIGHT;
use crate::partition::PartitionView;

/// Per-group tallies needed by every cost term.
pub struct GroupTally {
    pub sizes: Vec<usize>,
    /// `positives[c][g]`: members of `g` with categorical attribute `c`.
    pub positives: Vec<Vec<usize>>,
    /// `sums[v][g]`: sum of continuous attribute `v` over members of `g`.
    pub sums: Vec<Vec<f64>>,
}

impl GroupTally {
    pub fn collect(view: &PartitionView<'_>) -> Self {
        let k = view.group_count;
        let pop = view.population;
        let mut sizes = vec![0usize; k];
        let mut positives = vec![vec![0usize; k]; pop.categorical_names().len()];
        let mut sums = vec![vec![0.0f64; k]; pop.continuous_names().len()];

        for (entity, &g) in pop.entities().iter().zip(view.assignment) {
            sizes[g] += 1;
            for (c, &present) in entity.categorical.iter().enumerate() {
                if present {
                    positives[c][g] += 1;
                }
            }
            for (v, &value) in entity.continuous.iter().enumerate() {
                sums[v][g] += value;
            }
        }

        Self {
            sizes,
            positives,
            sums,
        }
    }

    pub fn population(&self) -> usize {
        self.sizes.iter().sum()
    }
}

/// Division that yields 0 for an empty denominator.
#[inline(always)]
pub fn ratio(num: f64, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num / den as f64
    }
}

/// Every group's share of the cost, indexed by group.
pub fn group_breakdowns(view: &PartitionView<'_>) -> Vec<CostBreakdown> {
    let tally = GroupTally::collect(view);
    let n = tally.population();

    let total_rates: Vec<f64> = tally
        .positives
        .iter()
        .map(|per_group| ratio(per_group.iter().sum::<usize>() as f64, n))
        .collect();
    let total_means: Vec<f64> = tally
        .sums
        .iter()
        .map(|per_group| ratio(per_group.iter().sum(), n))
        .collect();

    let separate_overlaps: Vec<Vec<usize>> =
        view.separate.iter().map(|s| view.overlap_counts(s)).collect();
    let together_overlaps: Vec<Vec<usize>> =
        view.together.iter().map(|s| view.overlap_counts(s)).collect();

    (0..view.group_count)
        .map(|g| {
            let size = tally.sizes[g];

            // Groups without members are not part of the partition.
            let (categorical, continuous) = if size == 0 {
                (0.0, 0.0)
            } else {
                let categorical: f64 = tally
                    .positives
                    .iter()
                    .zip(&total_rates)
                    .map(|(per_group, &rate)| (ratio(per_group[g] as f64, size) - rate).abs())
                    .sum();
                let continuous: f64 = tally
                    .sums
                    .iter()
                    .zip(&total_means)
                    .map(|(per_group, &mean)| (ratio(per_group[g], size) - mean).abs())
                    .sum();
                (categorical, CONTINUOUS_WEIGHT * continuous)
            };

            let separate: f64 = separate_overlaps
                .iter()
                .map(|counts| square(counts[g]))
                .sum();
            let together: f64 = -together_overlaps
                .iter()
                .map(|counts| square(counts[g]))
                .sum::<f64>();

            CostBreakdown::new(categorical, continuous, separate, together)
        })
        .collect()
}

pub fn breakdown(view: &PartitionView<'_>) -> CostBreakdown {
    let mut total = CostBreakdown::default();
    for b in group_breakdowns(view) {
        total += b;
    }
    total
}

#[inline(always)]
fn square(count: usize) -> f64 {
    let c = count as f64;
    c * c
}
