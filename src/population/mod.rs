pub mod loader;
pub mod synthetic;

use crate::error::{TeamForgeError, TfResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub use self::loader::RawTable;

/// Which table columns carry which role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub identifier: String,
    pub categorical: Vec<String>,
    pub continuous: Vec<String>,
    pub fixed: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: String,
    /// One flag per categorical attribute, in schema order.
    pub categorical: Vec<bool>,
    /// One value per continuous attribute, in schema order.
    pub continuous: Vec<f64>,
}

/// The immutable attribute table being partitioned.
///
/// Only the row order may change after construction (see
/// [`crate::partition::PartitionState::shuffle`]).
#[derive(Debug, Clone)]
pub struct Population {
    identifier: String,
    categorical_names: Vec<String>,
    continuous_names: Vec<String>,
    entities: Vec<Entity>,
    index: HashMap<String, usize>,
}

impl Population {
    pub fn new(
        identifier: impl Into<String>,
        categorical_names: Vec<String>,
        continuous_names: Vec<String>,
        entities: Vec<Entity>,
    ) -> TfResult<Self> {
        for e in &entities {
            if e.categorical.len() != categorical_names.len()
                || e.continuous.len() != continuous_names.len()
            {
                return Err(TeamForgeError::Validation(format!(
                    "entity '{}' has {} categorical / {} continuous values, expected {} / {}",
                    e.id,
                    e.categorical.len(),
                    e.continuous.len(),
                    categorical_names.len(),
                    continuous_names.len()
                )));
            }
            if let Some(v) = e.continuous.iter().find(|v| !v.is_finite()) {
                return Err(TeamForgeError::Validation(format!(
                    "entity '{}' has non-finite continuous value {}",
                    e.id, v
                )));
            }
        }

        let index = build_index(&entities)?;
        Ok(Self {
            identifier: identifier.into(),
            categorical_names,
            continuous_names,
            entities,
            index,
        })
    }

    /// Extracts the schema's columns from a raw table.
    pub fn from_table(table: &RawTable, schema: &ColumnSchema) -> TfResult<Self> {
        let id_col = table.require_column(&schema.identifier)?;
        let cat_cols = schema
            .categorical
            .iter()
            .map(|c| table.require_column(c))
            .collect::<TfResult<Vec<_>>>()?;
        let cont_cols = schema
            .continuous
            .iter()
            .map(|c| table.require_column(c))
            .collect::<TfResult<Vec<_>>>()?;

        let mut entities = Vec::with_capacity(table.rows.len());
        for row_idx in 0..table.rows.len() {
            let id = table.cell(row_idx, id_col)?.trim().to_string();

            let categorical = cat_cols
                .iter()
                .zip(&schema.categorical)
                .map(|(&col, name)| loader::parse_flag(table.cell(row_idx, col)?, row_idx, name))
                .collect::<TfResult<Vec<_>>>()?;

            let continuous = cont_cols
                .iter()
                .zip(&schema.continuous)
                .map(|(&col, name)| loader::parse_real(table.cell(row_idx, col)?, row_idx, name))
                .collect::<TfResult<Vec<_>>>()?;

            entities.push(Entity {
                id,
                categorical,
                continuous,
            });
        }

        Self::new(
            schema.identifier.clone(),
            schema.categorical.clone(),
            schema.continuous.clone(),
            entities,
        )
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn categorical_names(&self) -> &[String] {
        &self.categorical_names
    }

    pub fn continuous_names(&self) -> &[String] {
        &self.continuous_names
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity(&self, idx: usize) -> Option<&Entity> {
        self.entities.get(idx)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Reorders rows so that new row `i` is old row `order[i]`.
    pub(crate) fn reorder(&mut self, order: &[usize]) {
        debug_assert_eq!(order.len(), self.entities.len());
        let mut old: Vec<Option<Entity>> = self.entities.drain(..).map(Some).collect();
        self.entities = order
            .iter()
            .filter_map(|&i| old[i].take())
            .collect();
        self.index = self
            .entities
            .iter()
            .enumerate()
            .map(|(i, e)| (e.id.clone(), i))
            .collect();
    }
}

fn build_index(entities: &[Entity]) -> TfResult<HashMap<String, usize>> {
    let mut index = HashMap::with_capacity(entities.len());
    for (i, e) in entities.iter().enumerate() {
        if index.insert(e.id.clone(), i).is_some() {
            return Err(TeamForgeError::Configuration(format!(
                "duplicate identifier '{}'",
                e.id
            )));
        }
    }
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_table() -> RawTable {
        RawTable {
            headers: vec!["name".into(), "ctg1".into(), "cnt1".into()],
            rows: vec![
                vec!["a".into(), "False".into(), "40".into()],
                vec!["b".into(), "0".into(), "0".into()],
                vec!["c".into(), "True".into(), "60".into()],
                vec!["d".into(), "1".into(), "100".into()],
            ],
        }
    }

    fn toy_schema() -> ColumnSchema {
        ColumnSchema {
            identifier: "name".into(),
            categorical: vec!["ctg1".into()],
            continuous: vec!["cnt1".into()],
            fixed: None,
        }
    }

    #[test]
    fn test_from_table_extracts_columns() {
        let pop = Population::from_table(&toy_table(), &toy_schema()).unwrap();
        assert_eq!(pop.len(), 4);
        assert_eq!(pop.entity(2).unwrap().id, "c");
        assert_eq!(pop.entity(2).unwrap().categorical, vec![true]);
        assert_eq!(pop.entity(3).unwrap().continuous, vec![100.0]);
        assert_eq!(pop.index_of("b"), Some(1));
        assert_eq!(pop.index_of("z"), None);
    }

    #[test]
    fn test_missing_column_is_configuration_error() {
        let mut schema = toy_schema();
        schema.continuous.push("age".into());
        let err = Population::from_table(&toy_table(), &schema).unwrap_err();
        assert!(matches!(err, TeamForgeError::Configuration(_)));
    }

    #[test]
    fn test_duplicate_identifier_rejected() {
        let mut table = toy_table();
        table.rows[1][0] = "a".into();
        let err = Population::from_table(&table, &toy_schema()).unwrap_err();
        assert!(matches!(err, TeamForgeError::Configuration(_)));
    }

    #[test]
    fn test_bad_cell_is_validation_error() {
        let mut table = toy_table();
        table.rows[0][2] = "forty".into();
        let err = Population::from_table(&table, &toy_schema()).unwrap_err();
        assert!(matches!(err, TeamForgeError::Validation(_)));
    }

    #[test]
    fn test_reorder_rebuilds_index() {
        let mut pop = Population::from_table(&toy_table(), &toy_schema()).unwrap();
        pop.reorder(&[3, 2, 1, 0]);
        assert_eq!(pop.entity(0).unwrap().id, "d");
        assert_eq!(pop.index_of("a"), Some(3));
    }
}
