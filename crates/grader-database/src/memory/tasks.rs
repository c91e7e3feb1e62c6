//! In-memory task catalog.

use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use grader_core::result::AppResult;
use grader_entity::task::{NewTask, Task};

use crate::traits::TaskCatalog;

/// Task catalog held in process memory.
#[derive(Debug, Clone)]
pub struct MemoryTaskCatalog {
    tasks: Arc<DashMap<i32, Task>>,
    next_id: Arc<AtomicI32>,
}

impl MemoryTaskCatalog {
    /// Create an empty catalog. Ids start at 1.
    pub fn new() -> Self {
        Self {
            tasks: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicI32::new(1)),
        }
    }
}

impl Default for MemoryTaskCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskCatalog for MemoryTaskCatalog {
    async fn list(&self) -> AppResult<Vec<Task>> {
        let mut tasks: Vec<Task> = self.tasks.iter().map(|t| t.value().clone()).collect();
        tasks.sort_by_key(|t| t.id);
        Ok(tasks)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Task>> {
        Ok(self.tasks.get(&id).map(|t| t.value().clone()))
    }

    async fn create(&self, task: NewTask) -> AppResult<Task> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let created = Task {
            id,
            name: task.name,
            description: task.description,
        };
        self.tasks.insert(id, created.clone());
        Ok(created)
    }
}
