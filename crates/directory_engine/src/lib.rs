//! Directory engine: backend IO and effect execution.
mod engine;
mod fetch;
mod types;

pub use engine::EngineHandle;
pub use fetch::{listing_url, Backend, FetchSettings, ReqwestBackend};
pub use types::{
    CategoryEntry, Collection, DetailPayload, EngineEvent, FailureKind, FetchError, ListingPage,
    ListingRequest, RequestSeq, WireCategory, WireItem,
};
