use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

/// The built-in cost split into its terms. `total` is always the sum of
/// the other four.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    // Imbalance (>= 0)
    pub categorical: f64,
    pub continuous: f64,

    // Constraints
    pub separate: f64,
    /// Bonus for co-located together-sets (<= 0).
    pub together: f64,

    pub total: f64,
}

impl CostBreakdown {
    pub fn new(categorical: f64, continuous: f64, separate: f64, together: f64) -> Self {
        Self {
            categorical,
            continuous,
            separate,
            together,
            total: categorical + continuous + separate + together,
        }
    }
}

impl AddAssign for CostBreakdown {
    fn add_assign(&mut self, rhs: Self) {
        self.categorical += rhs.categorical;
        self.continuous += rhs.continuous;
        self.separate += rhs.separate;
        self.together += rhs.together;
        self.total += rhs.total;
    }
}
