//! Ports: interfaces consumed by the core.

mod gateway;
mod pathway_store;

pub use gateway::{GatewayError, GatewayRequest, GatewayResponse, LlmGateway};
pub use pathway_store::{NewPathwayRecord, PathwayStore, SortOrder, StoreError};
