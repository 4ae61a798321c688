//! Pathway store port.
//!
//! Persistence for generated pathway records, keyed by an opaque
//! store-assigned identifier. The core depends only on this contract and
//! never assumes a particular storage medium.

use async_trait::async_trait;

use crate::domain::conversation::ConversationTurn;
use crate::domain::foundation::PathwayId;
use crate::domain::pathway::{PathwayPlan, PathwayRecord};

/// Sort order for [`PathwayStore::list`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Newest records first.
    #[default]
    CreatedDesc,
    /// Oldest records first.
    CreatedAsc,
}

/// Errors from pathway store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("pathway not found: {0}")]
    NotFound(PathwayId),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Fields for a record the store has not yet assigned an id to.
#[derive(Debug, Clone)]
pub struct NewPathwayRecord {
    pub career_goal: String,
    pub current_education: String,
    pub target_education: String,
    pub two_year_college: Option<String>,
    pub four_year_college: Option<String>,
    pub conversation: Vec<ConversationTurn>,
    pub pathway_data: Option<PathwayPlan>,
}

/// Port for persisting and querying pathway records.
#[async_trait]
pub trait PathwayStore: Send + Sync {
    /// Appends a new record; the store assigns `id` and `created_date`.
    async fn create(&self, record: NewPathwayRecord) -> Result<PathwayRecord, StoreError>;

    /// Fetches a record by id.
    ///
    /// # Errors
    /// Returns `StoreError::NotFound` if no record exists.
    async fn get(&self, id: PathwayId) -> Result<PathwayRecord, StoreError>;

    /// Lists all records in the given order.
    async fn list(&self, sort: SortOrder) -> Result<Vec<PathwayRecord>, StoreError>;

    /// Replaces `pathway_data` on an existing record.
    ///
    /// The only mutation allowed after creation; used when a pathway is
    /// regenerated for a saved conversation.
    async fn update_pathway_data(
        &self,
        id: PathwayId,
        plan: PathwayPlan,
    ) -> Result<PathwayRecord, StoreError>;
}
