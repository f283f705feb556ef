#![allow(dead_code)]

use std::io::Cursor;
use teamforge::partition::PartitionState;
use teamforge::population::loader::{self, RawTable};
use teamforge::population::ColumnSchema;

pub const TOY_CSV: &str = "name,ctg1,cnt1\na,0,40\nb,0,0\nc,1,60\nd,1,100\n";

pub fn toy_schema() -> ColumnSchema {
    ColumnSchema {
        identifier: "name".to_string(),
        categorical: vec!["ctg1".to_string()],
        continuous: vec!["cnt1".to_string()],
        fixed: None,
    }
}

pub fn table(csv: &str) -> RawTable {
    loader::load_table_from_reader(Cursor::new(csv.as_bytes().to_vec()))
        .expect("inline csv should parse")
}

pub fn sets(raw: &[&[&str]]) -> Vec<Vec<String>> {
    raw.iter()
        .map(|set| set.iter().map(|id| id.to_string()).collect())
        .collect()
}

pub fn toy_state(together: &[&[&str]], separate: &[&[&str]]) -> PartitionState {
    PartitionState::from_table(&table(TOY_CSV), &toy_schema(), sets(together), sets(separate))
        .expect("toy state should build")
}

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
