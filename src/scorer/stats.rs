use super::costs::{ratio, GroupTally};
use crate::partition::PartitionView;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsRow {
    /// `None` for the totals row.
    pub group: Option<usize>,
    pub n: usize,
    /// Members with each categorical attribute present.
    pub categorical_counts: Vec<usize>,
    pub continuous_means: Vec<f64>,
    /// Largest number of one separate set's members in this row's group.
    pub max_separate_overlap: Option<usize>,
    pub max_together_overlap: Option<usize>,
}

impl StatsRow {
    pub fn label(&self) -> String {
        match self.group {
            Some(g) => g.to_string(),
            None => "total".to_string(),
        }
    }
}

/// Per-group rows followed by a single totals row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsTable {
    pub categorical: Vec<String>,
    pub continuous: Vec<String>,
    pub rows: Vec<StatsRow>,
}

impl StatsTable {
    pub fn groups(&self) -> &[StatsRow] {
        &self.rows[..self.rows.len() - 1]
    }

    pub fn total(&self) -> &StatsRow {
        &self.rows[self.rows.len() - 1]
    }
}

pub fn compute(view: &PartitionView<'_>) -> StatsTable {
    let tally = GroupTally::collect(view);
    let n = tally.population();

    let separate: Vec<Vec<usize>> = view.separate.iter().map(|s| view.overlap_counts(s)).collect();
    let together: Vec<Vec<usize>> = view.together.iter().map(|s| view.overlap_counts(s)).collect();

    let max_overlap = |overlaps: &[Vec<usize>], g: usize| -> Option<usize> {
        overlaps.iter().map(|counts| counts[g]).max()
    };

    let mut rows: Vec<StatsRow> = (0..view.group_count)
        .map(|g| {
            let size = tally.sizes[g];
            StatsRow {
                group: Some(g),
                n: size,
                categorical_counts: tally.positives.iter().map(|p| p[g]).collect(),
                continuous_means: tally.sums.iter().map(|s| ratio(s[g], size)).collect(),
                max_separate_overlap: max_overlap(&separate, g),
                max_together_overlap: max_overlap(&together, g),
            }
        })
        .collect();

    rows.push(StatsRow {
        group: None,
        n,
        categorical_counts: tally.positives.iter().map(|p| p.iter().sum()).collect(),
        continuous_means: tally.sums.iter().map(|s| ratio(s.iter().sum(), n)).collect(),
        max_separate_overlap: view.separate.iter().map(Vec::len).max(),
        max_together_overlap: view.together.iter().map(Vec::len).max(),
    });

    StatsTable {
        categorical: view.population.categorical_names().to_vec(),
        continuous: view.population.continuous_names().to_vec(),
        rows,
    }
}
