use crate::error::{TeamForgeError, TfResult};
use fastrand::Rng;

/// True when at least two unfixed entities sit in different groups.
pub fn has_swappable_pair(assignment: &[usize], fixed: &[bool]) -> bool {
    let mut first_group = None;
    for (&g, &is_fixed) in assignment.iter().zip(fixed) {
        if is_fixed {
            continue;
        }
        match first_group {
            None => first_group = Some(g),
            Some(f) if f != g => return true,
            Some(_) => {}
        }
    }
    false
}

/// Draws index pairs uniformly over the whole population until both are
/// unfixed and in different groups.
pub fn sample_swap_pair(
    rng: &mut Rng,
    assignment: &[usize],
    fixed: &[bool],
    max_attempts: usize,
) -> TfResult<(usize, usize)> {
    if !has_swappable_pair(assignment, fixed) {
        return Err(TeamForgeError::ResourceExhausted(
            "every unfixed entity is in the same group; no swap can be proposed".to_string(),
        ));
    }

    let n = assignment.len();
    for _ in 0..max_attempts {
        let a = rng.usize(0..n);
        let b = rng.usize(0..n);
        if assignment[a] != assignment[b] && !fixed[a] && !fixed[b] {
            return Ok((a, b));
        }
    }

    Err(TeamForgeError::ResourceExhausted(format!(
        "no valid swap pair found after {} attempts",
        max_attempts
    )))
}
