//! In-memory pathway store.
//!
//! Backs development and tests. Records live in a `Vec` behind an async
//! `RwLock`; ids and creation timestamps are assigned here. A failure
//! switch lets tests exercise the plan-survives-storage-failure path.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{PathwayId, Timestamp};
use crate::domain::pathway::{PathwayPlan, PathwayRecord};
use crate::ports::{NewPathwayRecord, PathwayStore, SortOrder, StoreError};

/// In-memory implementation of [`PathwayStore`].
#[derive(Clone, Default)]
pub struct InMemoryPathwayStore {
    records: Arc<RwLock<Vec<PathwayRecord>>>,
    fail_creates: Arc<AtomicBool>,
}

impl InMemoryPathwayStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// When set, `create` fails with `StoreError::Unavailable`.
    pub fn set_fail_creates(&self, fail: bool) {
        self.fail_creates.store(fail, Ordering::SeqCst);
    }

    /// Number of stored records.
    pub async fn count(&self) -> usize {
        self.records.read().await.len()
    }

    /// Removes all records.
    pub async fn clear(&self) {
        self.records.write().await.clear();
    }
}

#[async_trait]
impl PathwayStore for InMemoryPathwayStore {
    async fn create(&self, record: NewPathwayRecord) -> Result<PathwayRecord, StoreError> {
        if self.fail_creates.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "simulated storage failure".to_string(),
            ));
        }

        let stored = PathwayRecord {
            id: PathwayId::new(),
            created_date: Timestamp::now(),
            career_goal: record.career_goal,
            current_education: record.current_education,
            target_education: record.target_education,
            two_year_college: record.two_year_college,
            four_year_college: record.four_year_college,
            conversation: record.conversation,
            pathway_data: record.pathway_data,
        };

        self.records.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn get(&self, id: PathwayId) -> Result<PathwayRecord, StoreError> {
        self.records
            .read()
            .await
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn list(&self, sort: SortOrder) -> Result<Vec<PathwayRecord>, StoreError> {
        let mut records = self.records.read().await.clone();
        match sort {
            SortOrder::CreatedAsc => {
                records.sort_by(|a, b| a.created_date.cmp(&b.created_date));
            }
            SortOrder::CreatedDesc => {
                records.sort_by(|a, b| b.created_date.cmp(&a.created_date));
            }
        }
        Ok(records)
    }

    async fn update_pathway_data(
        &self,
        id: PathwayId,
        plan: PathwayPlan,
    ) -> Result<PathwayRecord, StoreError> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::NotFound(id))?;
        record.pathway_data = Some(plan);
        Ok(record.clone())
    }
}
