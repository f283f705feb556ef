use super::RawTable;
use fastrand::Rng;

pub const SYNTHETIC_MIN: u32 = 45;
pub const SYNTHETIC_MAX: u32 = 90;

/// Builds a random population table: a `name` column of `person-{i}`,
/// one 0/1 column per categorical name and one integer column in
/// `SYNTHETIC_MIN..=SYNTHETIC_MAX` per continuous name.
pub fn generate(
    rng: &mut Rng,
    count: usize,
    categorical: &[String],
    continuous: &[String],
) -> RawTable {
    let mut headers = Vec::with_capacity(1 + categorical.len() + continuous.len());
    headers.push("name".to_string());
    headers.extend(categorical.iter().cloned());
    headers.extend(continuous.iter().cloned());

    let rows = (0..count)
        .map(|i| {
            let mut row = Vec::with_capacity(headers.len());
            row.push(format!("person-{}", i));
            for _ in categorical {
                row.push(rng.u32(0..=1).to_string());
            }
            for _ in continuous {
                row.push(rng.u32(SYNTHETIC_MIN..=SYNTHETIC_MAX).to_string());
            }
            row
        })
        .collect();

    RawTable { headers, rows }
}
