//! In-memory solution queue.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use grader_core::result::AppResult;
use grader_entity::solution::{NewSolution, Solution, SolutionStatus};

use crate::traits::SolutionQueue;

/// Solution queue held in process memory.
#[derive(Debug, Clone)]
pub struct MemorySolutionQueue {
    solutions: Arc<DashMap<i64, Solution>>,
    next_id: Arc<AtomicI64>,
}

impl MemorySolutionQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            solutions: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }

    /// Solutions still waiting for the worker, oldest first.
    pub fn pending(&self) -> Vec<Solution> {
        let mut pending: Vec<Solution> = self
            .solutions
            .iter()
            .filter(|s| s.status == SolutionStatus::New)
            .map(|s| s.value().clone())
            .collect();
        pending.sort_by_key(|s| s.id);
        pending
    }
}

impl Default for MemorySolutionQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SolutionQueue for MemorySolutionQueue {
    async fn enqueue(&self, solution: NewSolution) -> AppResult<Solution> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let queued = Solution {
            id,
            task_id: solution.task_id,
            user_id: solution.user_id,
            payload: solution.payload,
            status: SolutionStatus::New,
            created_at: Utc::now(),
        };
        self.solutions.insert(id, queued.clone());
        Ok(queued)
    }
}
