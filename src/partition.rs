use crate::config::Config;
use crate::error::{TeamForgeError, TfResult};
use crate::population::{loader, ColumnSchema, Population, RawTable};
use crate::scorer::stats::{self, StatsTable};
use crate::scorer::{CostBreakdown, CostFunction, FairnessCost};
use std::collections::BTreeSet;
use tracing::debug;

/// Population plus the mutable partition: one group per entity and one
/// fixed flag per entity.
///
/// Constraint sets are kept as row indices and remapped whenever the rows
/// are shuffled.
#[derive(Debug, Clone)]
pub struct PartitionState {
    population: Population,
    together: Vec<Vec<usize>>,
    separate: Vec<Vec<usize>>,
    assignment: Option<Vec<usize>>,
    group_count: usize,
    fixed: Vec<bool>,
}

/// Borrowed view of a (possibly candidate) partition, handed to cost
/// functions.
#[derive(Debug, Clone, Copy)]
pub struct PartitionView<'a> {
    pub population: &'a Population,
    pub assignment: &'a [usize],
    pub group_count: usize,
    pub together: &'a [Vec<usize>],
    pub separate: &'a [Vec<usize>],
}

impl PartitionView<'_> {
    pub fn group_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0usize; self.group_count];
        for &g in self.assignment {
            sizes[g] += 1;
        }
        sizes
    }

    /// Members of `set` per group.
    pub fn overlap_counts(&self, set: &[usize]) -> Vec<usize> {
        let mut counts = vec![0usize; self.group_count];
        for &i in set {
            counts[self.assignment[i]] += 1;
        }
        counts
    }
}

impl PartitionState {
    pub fn new(
        population: Population,
        together: Vec<Vec<String>>,
        separate: Vec<Vec<String>>,
    ) -> TfResult<Self> {
        let together = resolve_sets(&population, &together, "together")?;
        let separate = resolve_sets(&population, &separate, "separate")?;
        let fixed = vec![false; population.len()];
        Ok(Self {
            population,
            together,
            separate,
            assignment: None,
            group_count: 0,
            fixed,
        })
    }

    /// Builds the population from `table` and applies the schema's fixed
    /// column, if any.
    pub fn from_table(
        table: &RawTable,
        schema: &ColumnSchema,
        together: Vec<Vec<String>>,
        separate: Vec<Vec<String>>,
    ) -> TfResult<Self> {
        let population = Population::from_table(table, schema)?;
        let mut state = Self::new(population, together, separate)?;

        if let Some(name) = &schema.fixed {
            let col = table.require_column(name)?;
            for row in 0..table.rows.len() {
                if loader::parse_flag(table.cell(row, col)?, row, name)? {
                    state.fixed[row] = true;
                }
            }
            debug!(
                "   -> {} entities fixed via column '{}'",
                state.fixed.iter().filter(|f| **f).count(),
                name
            );
        }

        Ok(state)
    }

    pub fn from_config(table: &RawTable, config: &Config) -> TfResult<Self> {
        Self::from_table(
            table,
            &config.columns.to_schema(),
            config.constraints.get_together()?,
            config.constraints.get_separate()?,
        )
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn len(&self) -> usize {
        self.population.len()
    }

    pub fn is_empty(&self) -> bool {
        self.population.is_empty()
    }

    pub fn together_sets(&self) -> &[Vec<usize>] {
        &self.together
    }

    pub fn separate_sets(&self) -> &[Vec<usize>] {
        &self.separate
    }

    pub fn is_initialized(&self) -> bool {
        self.assignment.is_some()
    }

    pub fn assignment(&self) -> Option<&[usize]> {
        self.assignment.as_deref()
    }

    pub fn group_count(&self) -> usize {
        self.group_count
    }

    /// `None` when `idx` is not a row of the population.
    pub fn is_fixed(&self, idx: usize) -> Option<bool> {
        self.fixed.get(idx).copied()
    }

    pub fn fixed_flags(&self) -> &[bool] {
        &self.fixed
    }

    /// Randomly reorders the rows. Each entity keeps its group and fixed
    /// flag; only positions change.
    pub fn shuffle(&mut self, seed: Option<u64>) {
        let mut rng = match seed {
            Some(s) => fastrand::Rng::with_seed(s),
            None => fastrand::Rng::new(),
        };

        let mut order: Vec<usize> = (0..self.population.len()).collect();
        rng.shuffle(&mut order);

        let mut new_pos = vec![0usize; order.len()];
        for (new_idx, &old_idx) in order.iter().enumerate() {
            new_pos[old_idx] = new_idx;
        }

        self.population.reorder(&order);
        self.fixed = order.iter().map(|&i| self.fixed[i]).collect();
        if let Some(assignment) = self.assignment.take() {
            self.assignment = Some(order.iter().map(|&i| assignment[i]).collect());
        }
        for set in self.together.iter_mut().chain(self.separate.iter_mut()) {
            for i in set.iter_mut() {
                *i = new_pos[*i];
            }
            set.sort_unstable();
        }
    }

    /// Assigns contiguous runs of rows, in current order, to groups
    /// `0..group_sizes.len()`.
    pub fn initialize(&mut self, group_sizes: &[usize]) -> TfResult<()> {
        if group_sizes.is_empty() {
            return Err(TeamForgeError::Configuration(
                "group sizes must not be empty".to_string(),
            ));
        }
        if let Some(pos) = group_sizes.iter().position(|&s| s == 0) {
            return Err(TeamForgeError::Configuration(format!(
                "group {} has size 0; every group size must be positive",
                pos
            )));
        }
        let total: usize = group_sizes.iter().sum();
        if total != self.population.len() {
            return Err(TeamForgeError::Configuration(format!(
                "the sum of group sizes ({}) must equal the population size ({})",
                total,
                self.population.len()
            )));
        }

        let mut assignment = Vec::with_capacity(total);
        for (group, &size) in group_sizes.iter().enumerate() {
            assignment.extend(std::iter::repeat(group).take(size));
        }

        self.assignment = Some(assignment);
        self.group_count = group_sizes.len();
        debug!("Initialized {} groups: {:?}", self.group_count, group_sizes);
        Ok(())
    }

    /// Installs an externally computed assignment, one group index per row.
    /// Indices must be dense: every group in `0..=max` needs a member, so no
    /// index can reach the population size.
    pub fn assign(&mut self, groups: Vec<usize>) -> TfResult<()> {
        if groups.len() != self.population.len() {
            return Err(TeamForgeError::Configuration(format!(
                "assignment has {} entries for a population of {}",
                groups.len(),
                self.population.len()
            )));
        }
        if let Some(&g) = groups.iter().find(|&&g| g >= groups.len()) {
            return Err(TeamForgeError::Configuration(format!(
                "group index {} out of range for {} entities",
                g,
                groups.len()
            )));
        }
        let group_count = groups.iter().max().map_or(0, |m| m + 1);
        let mut seen = vec![false; group_count];
        for &g in &groups {
            seen[g] = true;
        }
        if let Some(missing) = seen.iter().position(|s| !s) {
            return Err(TeamForgeError::Configuration(format!(
                "group {} has no members; group indices must be contiguous from 0",
                missing
            )));
        }

        self.assignment = Some(groups);
        self.group_count = group_count;
        Ok(())
    }

    pub fn mark_fixed(&mut self, id: &str) -> TfResult<()> {
        let idx = self.require_index(id)?;
        self.fixed[idx] = true;
        Ok(())
    }

    pub fn group_sizes(&self) -> Vec<usize> {
        self.view().map(|v| v.group_sizes()).unwrap_or_default()
    }

    /// Identifiers currently assigned to `group`. Unknown groups are empty.
    pub fn members(&self, group: usize) -> TfResult<BTreeSet<String>> {
        let assignment = self.require_assignment()?;
        Ok(self
            .population
            .entities()
            .iter()
            .zip(assignment)
            .filter(|(_, &g)| g == group)
            .map(|(e, _)| e.id.clone())
            .collect())
    }

    pub fn group_of(&self, id: &str) -> TfResult<usize> {
        let idx = self.require_index(id)?;
        Ok(self.require_assignment()?[idx])
    }

    pub fn view(&self) -> TfResult<PartitionView<'_>> {
        Ok(self.view_of(self.require_assignment()?))
    }

    /// View of a candidate assignment that shares this state's population
    /// and constraint sets.
    pub fn view_of<'a>(&'a self, assignment: &'a [usize]) -> PartitionView<'a> {
        PartitionView {
            population: &self.population,
            assignment,
            group_count: self.group_count,
            together: &self.together,
            separate: &self.separate,
        }
    }

    pub(crate) fn commit(&mut self, assignment: Vec<usize>) {
        debug_assert_eq!(assignment.len(), self.population.len());
        self.assignment = Some(assignment);
    }

    pub fn cost(&self) -> TfResult<f64> {
        self.cost_with(&FairnessCost)
    }

    pub fn cost_with<C: CostFunction + ?Sized>(&self, cost_fn: &C) -> TfResult<f64> {
        Ok(cost_fn.evaluate(&self.view()?))
    }

    pub fn cost_breakdown(&self) -> TfResult<CostBreakdown> {
        Ok(FairnessCost::breakdown(&self.view()?))
    }

    /// Contribution of `group` to the built-in cost. Summing over all
    /// groups gives [`PartitionState::cost`].
    pub fn group_cost(&self, group: usize) -> TfResult<f64> {
        let breakdowns = FairnessCost::group_breakdowns(&self.view()?);
        breakdowns
            .get(group)
            .map(|b| b.total)
            .ok_or_else(|| TeamForgeError::Configuration(format!("unknown group {}", group)))
    }

    pub fn stats(&self) -> TfResult<StatsTable> {
        let view = self.view().map_err(|_| {
            TeamForgeError::Precondition(
                "the partition must be initialized before statistics can be computed".to_string(),
            )
        })?;
        Ok(stats::compute(&view))
    }

    fn require_assignment(&self) -> TfResult<&[usize]> {
        self.assignment.as_deref().ok_or_else(|| {
            TeamForgeError::Precondition("no group assignment exists yet".to_string())
        })
    }

    fn require_index(&self, id: &str) -> TfResult<usize> {
        self.population
            .index_of(id)
            .ok_or_else(|| TeamForgeError::Configuration(format!("unknown identifier '{}'", id)))
    }
}

fn resolve_sets(
    population: &Population,
    sets: &[Vec<String>],
    kind: &str,
) -> TfResult<Vec<Vec<usize>>> {
    sets.iter()
        .enumerate()
        .map(|(n, set)| {
            if set.is_empty() {
                return Err(TeamForgeError::Configuration(format!(
                    "{} set #{} is empty",
                    kind, n
                )));
            }
            let mut indices = set
                .iter()
                .map(|id| {
                    population.index_of(id).ok_or_else(|| {
                        TeamForgeError::Configuration(format!(
                            "{} set #{} names unknown identifier '{}'",
                            kind, n, id
                        ))
                    })
                })
                .collect::<TfResult<Vec<_>>>()?;
            indices.sort_unstable();
            indices.dedup();
            Ok(indices)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::population::Entity;

    fn population(ids: &[&str]) -> Population {
        let entities = ids
            .iter()
            .map(|id| Entity {
                id: id.to_string(),
                categorical: vec![],
                continuous: vec![],
            })
            .collect();
        Population::new("name", vec![], vec![], entities).unwrap()
    }

    fn strings(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_initialize_chunks_in_table_order() {
        let mut state = PartitionState::new(population(&["a", "b", "c", "d", "e"]), vec![], vec![])
            .unwrap();
        state.initialize(&[3, 2]).unwrap();
        assert_eq!(state.assignment().unwrap(), &[0, 0, 0, 1, 1]);
        assert_eq!(state.group_sizes(), vec![3, 2]);
        let expected: BTreeSet<String> = strings(&["d", "e"]).into_iter().collect();
        assert_eq!(state.members(1).unwrap(), expected);
    }

    #[test]
    fn test_initialize_rejects_bad_sizes() {
        let mut state =
            PartitionState::new(population(&["a", "b", "c"]), vec![], vec![]).unwrap();
        for sizes in [vec![], vec![2, 2], vec![3, 0], vec![1]] {
            let err = state.initialize(&sizes).unwrap_err();
            assert!(matches!(err, TeamForgeError::Configuration(_)), "{:?}", sizes);
        }
        assert!(!state.is_initialized());
    }

    #[test]
    fn test_unknown_constraint_member_rejected() {
        let err = PartitionState::new(
            population(&["a", "b"]),
            vec![strings(&["a", "zz"])],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, TeamForgeError::Configuration(_)));

        let err = PartitionState::new(population(&["a", "b"]), vec![], vec![vec![]]).unwrap_err();
        assert!(matches!(err, TeamForgeError::Configuration(_)));
    }

    #[test]
    fn test_constraint_duplicates_collapse() {
        let state = PartitionState::new(
            population(&["a", "b", "c"]),
            vec![strings(&["c", "a", "c"])],
            vec![],
        )
        .unwrap();
        assert_eq!(state.together_sets(), &[vec![0, 2]]);
    }

    #[test]
    fn test_shuffle_keeps_entity_groups_and_constraints() {
        let ids = ["a", "b", "c", "d", "e", "f", "g", "h"];
        let mut state = PartitionState::new(
            population(&ids),
            vec![strings(&["a", "h"])],
            vec![strings(&["b", "c", "d"])],
        )
        .unwrap();
        state.initialize(&[4, 4]).unwrap();
        state.mark_fixed("g").unwrap();
        let before: Vec<usize> = ids.iter().map(|id| state.group_of(id).unwrap()).collect();

        state.shuffle(Some(3));

        let after: Vec<usize> = ids.iter().map(|id| state.group_of(id).unwrap()).collect();
        assert_eq!(before, after);
        let g = state.population().index_of("g").unwrap();
        assert_eq!(state.is_fixed(g), Some(true));
        assert_eq!(state.is_fixed(ids.len()), None);
        assert_eq!(state.fixed_flags().iter().filter(|f| **f).count(), 1);

        let together: BTreeSet<String> = state.together_sets()[0]
            .iter()
            .map(|&i| state.population().entity(i).unwrap().id.clone())
            .collect();
        let expected: BTreeSet<String> = strings(&["a", "h"]).into_iter().collect();
        assert_eq!(together, expected);
    }

    #[test]
    fn test_shuffle_is_seeded() {
        let ids = ["a", "b", "c", "d", "e", "f"];
        let mut s1 = PartitionState::new(population(&ids), vec![], vec![]).unwrap();
        let mut s2 = s1.clone();
        s1.shuffle(Some(11));
        s2.shuffle(Some(11));
        let order1: Vec<&str> = s1.population().entities().iter().map(|e| e.id.as_str()).collect();
        let order2: Vec<&str> = s2.population().entities().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(order1, order2);
    }

    #[test]
    fn test_assign_requires_dense_groups() {
        let mut state =
            PartitionState::new(population(&["a", "b", "c"]), vec![], vec![]).unwrap();
        assert!(state.assign(vec![0, 2, 2]).is_err());
        assert!(state.assign(vec![0, 1]).is_err());
        state.assign(vec![1, 0, 1]).unwrap();
        assert_eq!(state.group_count(), 2);
        assert_eq!(state.group_of("a").unwrap(), 1);
    }

    #[test]
    fn test_assign_rejects_huge_group_index() {
        let mut state =
            PartitionState::new(population(&["a", "b", "c", "d"]), vec![], vec![]).unwrap();
        for huge in [usize::MAX, 1_000_000_000_000, 4] {
            let err = state.assign(vec![0, 1, 0, huge]).unwrap_err();
            assert!(matches!(err, TeamForgeError::Configuration(_)));
        }
        assert!(!state.is_initialized());
        state.assign(vec![0, 1, 2, 3]).unwrap();
        assert_eq!(state.group_count(), 4);
    }

    #[test]
    fn test_accessors_before_initialize() {
        let mut state = PartitionState::new(population(&["a", "b"]), vec![], vec![]).unwrap();
        assert!(matches!(state.members(0), Err(TeamForgeError::Precondition(_))));
        assert!(matches!(state.stats(), Err(TeamForgeError::Precondition(_))));
        assert!(matches!(state.cost(), Err(TeamForgeError::Precondition(_))));
        assert!(state.group_sizes().is_empty());
        assert!(matches!(state.mark_fixed("x"), Err(TeamForgeError::Configuration(_))));
    }
}
