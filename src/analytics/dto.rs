use std::collections::BTreeMap;

use serde::Serialize;

use crate::tasks::repo_types::{Category, Priority};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Breakdown {
    pub total: u64,
    pub completed: u64,
}

impl Breakdown {
    pub fn record(&mut self, completed: bool) {
        self.total += 1;
        if completed {
            self.completed += 1;
        }
    }
}

/// Completion summary. Categories and priorities with no tasks are absent
/// from the maps rather than zero-filled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_tasks: u64,
    pub completed_tasks: u64,
    pub pending_tasks: u64,
    pub completion_rate: f64,
    pub by_category: BTreeMap<Category, Breakdown>,
    pub by_priority: BTreeMap<Priority, Breakdown>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekTrend {
    pub week: String,
    pub created: u64,
    pub completed: u64,
}

#[derive(Debug, Serialize)]
pub struct TrendsResponse {
    pub trends: Vec<WeekTrend>,
}
