pub mod costs;
pub mod stats;
pub mod types;

pub use self::types::CostBreakdown;
use crate::partition::PartitionView;

/// Scores a partition. Lower is better; the value may be negative.
pub trait CostFunction {
    fn evaluate(&self, view: &PartitionView<'_>) -> f64;
}

impl<F> CostFunction for F
where
    F: Fn(&PartitionView<'_>) -> f64,
{
    fn evaluate(&self, view: &PartitionView<'_>) -> f64 {
        self(view)
    }
}

/// The built-in cost: categorical rate imbalance, weighted continuous mean
/// imbalance, squared separate-set overlaps and negated squared
/// together-set overlaps, summed over groups.
#[derive(Debug, Default, Clone, Copy)]
pub struct FairnessCost;

impl FairnessCost {
    pub fn breakdown(view: &PartitionView<'_>) -> CostBreakdown {
        costs::breakdown(view)
    }

    pub fn group_breakdowns(view: &PartitionView<'_>) -> Vec<CostBreakdown> {
        costs::group_breakdowns(view)
    }
}

impl CostFunction for FairnessCost {
    fn evaluate(&self, view: &PartitionView<'_>) -> f64 {
        costs::breakdown(view).total
    }
}
