use crate::consts::{DEFAULT_MAX_SWAP_ATTEMPTS, PROGRESS_INTERVAL};
use crate::error::{TeamForgeError, TfResult};
use crate::population::ColumnSchema;
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    #[command(flatten)]
    pub columns: ColumnDefinitions,
    #[command(flatten)]
    pub constraints: ConstraintDefinitions,
    #[command(flatten)]
    pub search: SearchParams,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnDefinitions {
    /// Column holding the unique entity identifier
    #[arg(long, default_value = "name")]
    pub identifier: String,
    /// Comma separated binary columns to balance
    #[arg(long, default_value = "")]
    pub categorical: String,
    /// Comma separated real-valued columns whose means should match
    #[arg(long, default_value = "")]
    pub continuous: String,
    /// Optional boolean column marking entities that must not move
    #[arg(long)]
    pub fixed_column: Option<String>,
}

impl Default for ColumnDefinitions {
    fn default() -> Self {
        Self {
            identifier: "name".to_string(),
            categorical: String::new(),
            continuous: String::new(),
            fixed_column: None,
        }
    }
}

/// Constraint sets are written as `a,b;c,d,e`: sets split on `;`,
/// members on `,`.
#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ConstraintDefinitions {
    #[arg(long, default_value = "")]
    pub together: String,
    #[arg(long, default_value = "")]
    pub separate: String,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    /// Explicit group sizes, e.g. `5,5,4`
    #[arg(long, default_value = "")]
    pub groups: String,
    /// Split the population into this many near-equal groups instead
    #[arg(long)]
    pub group_count: Option<usize>,
    #[arg(long, default_value_t = 10_000)]
    pub iterations: usize,
    #[arg(long)]
    pub seed: Option<u64>,
    /// Seed for the pre-initialization shuffle (falls back to `--seed`)
    #[arg(long)]
    pub shuffle_seed: Option<u64>,
    #[arg(long, default_value_t = false)]
    pub skip_shuffle: bool,
    #[arg(long, default_value_t = PROGRESS_INTERVAL)]
    pub progress_interval: usize,
    #[arg(long, default_value_t = DEFAULT_MAX_SWAP_ATTEMPTS)]
    pub max_swap_attempts: usize,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            groups: String::new(),
            group_count: None,
            iterations: 10_000,
            seed: None,
            shuffle_seed: None,
            skip_shuffle: false,
            progress_interval: PROGRESS_INTERVAL,
            max_swap_attempts: DEFAULT_MAX_SWAP_ATTEMPTS,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> TfResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn validate(&self) -> TfResult<()> {
        if self.columns.identifier.trim().is_empty() {
            return Err(TeamForgeError::Configuration(
                "identifier column name must not be empty".to_string(),
            ));
        }
        if self.search.progress_interval == 0 {
            return Err(TeamForgeError::Configuration(
                "--progress-interval must be at least 1".to_string(),
            ));
        }
        if self.search.max_swap_attempts == 0 {
            return Err(TeamForgeError::Configuration(
                "--max-swap-attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Overwrites fields of `self` (usually loaded from a file) with the
    /// values the user typed on the command line.
    pub fn merge_from_cli(&mut self, cli: &Config, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($section:ident . $field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$section.$field = cli.$section.$field.clone();
                }
            };
        }

        update_if_present!(columns.identifier);
        update_if_present!(columns.categorical);
        update_if_present!(columns.continuous);
        update_if_present!(columns.fixed_column);

        update_if_present!(constraints.together);
        update_if_present!(constraints.separate);

        update_if_present!(search.groups);
        update_if_present!(search.group_count);
        update_if_present!(search.iterations);
        update_if_present!(search.seed);
        update_if_present!(search.shuffle_seed);
        update_if_present!(search.skip_shuffle);
        update_if_present!(search.progress_interval);
        update_if_present!(search.max_swap_attempts);
    }
}

impl ColumnDefinitions {
    pub fn to_schema(&self) -> ColumnSchema {
        ColumnSchema {
            identifier: self.identifier.trim().to_string(),
            categorical: split_list(&self.categorical),
            continuous: split_list(&self.continuous),
            fixed: self
                .fixed_column
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        }
    }
}

impl ConstraintDefinitions {
    pub fn get_together(&self) -> TfResult<Vec<Vec<String>>> {
        parse_constraint_sets(&self.together, "together")
    }

    pub fn get_separate(&self) -> TfResult<Vec<Vec<String>>> {
        parse_constraint_sets(&self.separate, "separate")
    }
}

impl SearchParams {
    /// Resolves `--groups` or `--group-count` against the population size.
    /// Explicit sizes win when both are given.
    pub fn resolve_group_sizes(&self, population: usize) -> TfResult<Vec<usize>> {
        if !self.groups.trim().is_empty() {
            return parse_group_sizes(&self.groups);
        }
        match self.group_count {
            Some(k) => even_group_sizes(population, k),
            None => Err(TeamForgeError::Configuration(
                "either --groups or --group-count is required".to_string(),
            )),
        }
    }

    pub fn effective_shuffle_seed(&self) -> Option<u64> {
        self.shuffle_seed.or(self.seed)
    }
}

pub fn parse_group_sizes(s: &str) -> TfResult<Vec<usize>> {
    s.split(',')
        .map(|part| {
            let part = part.trim();
            part.parse::<usize>().map_err(|_| {
                TeamForgeError::Configuration(format!("invalid group size '{}' in --groups", part))
            })
        })
        .collect()
}

/// Splits `population` into `count` sizes differing by at most one,
/// larger groups first.
pub fn even_group_sizes(population: usize, count: usize) -> TfResult<Vec<usize>> {
    if count == 0 || count > population {
        return Err(TeamForgeError::Configuration(format!(
            "cannot split {} entities into {} non-empty groups",
            population, count
        )));
    }
    let base = population / count;
    let remainder = population % count;
    Ok((0..count)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect())
}

/// Comma separated names, trimmed, with empty entries dropped.
pub fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_constraint_sets(s: &str, name: &str) -> TfResult<Vec<Vec<String>>> {
    let mut sets = Vec::new();
    for segment in s.split(';') {
        if segment.trim().is_empty() {
            continue;
        }
        let members = split_list(segment);
        if members.is_empty() {
            return Err(TeamForgeError::Configuration(format!(
                "--{} contains an empty set: '{}'",
                name, segment
            )));
        }
        sets.push(members);
    }
    Ok(sets)
}
