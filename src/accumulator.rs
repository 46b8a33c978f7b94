//! Per-run accumulation of cumulative rows
//!
//! Groups rows by normalized behavior across all videos of a run. Tables keep
//! the order in which behaviors were first seen, and rows within a table keep
//! the order in which videos were processed.

use crate::adapter::normalize_behavior;
use crate::types::{BehaviorTable, CumulativeRow};
use std::collections::HashMap;

/// Behavior -> ordered rows for one aggregation run
#[derive(Debug, Clone, Default)]
pub struct RunAccumulator {
    tables: Vec<BehaviorTable>,
    index: HashMap<String, usize>,
}

impl RunAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add rows from one video, merging on the case-folded behavior name
    pub fn push_rows(&mut self, rows: impl IntoIterator<Item = CumulativeRow>) {
        for mut row in rows {
            let key = normalize_behavior(&row.behavior);
            row.behavior.clone_from(&key);

            let slot = match self.index.get(&key) {
                Some(&slot) => slot,
                None => {
                    self.tables.push(BehaviorTable {
                        behavior: key.clone(),
                        rows: Vec::new(),
                    });
                    self.index.insert(key, self.tables.len() - 1);
                    self.tables.len() - 1
                }
            };
            self.tables[slot].rows.push(row);
        }
    }

    /// Tables accumulated so far
    pub fn tables(&self) -> &[BehaviorTable] {
        &self.tables
    }

    /// Table for one behavior, looked up case-insensitively
    pub fn table(&self, behavior: &str) -> Option<&BehaviorTable> {
        self.index
            .get(&normalize_behavior(behavior))
            .map(|&slot| &self.tables[slot])
    }

    pub fn into_tables(self) -> Vec<BehaviorTable> {
        self.tables
    }

    pub fn behavior_count(&self) -> usize {
        self.tables.len()
    }

    pub fn row_count(&self) -> usize {
        self.tables.iter().map(|t| t.rows.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn clear(&mut self) {
        self.tables.clear();
        self.index.clear();
    }
}
