//! Shared context threaded through the router.

use crate::services::{hotel_repo::HotelRepo, object_store::ObjectStore};

/// Per-process handles shared by all handlers. Cheap to clone; the repo wraps
/// a pooled connection set and the store is a couple of strings.
#[derive(Clone, Debug)]
pub struct AppState {
    pub repo: HotelRepo,
    pub store: ObjectStore,
}

impl AppState {
    pub fn new(repo: HotelRepo, store: ObjectStore) -> Self {
        Self { repo, store }
    }
}
