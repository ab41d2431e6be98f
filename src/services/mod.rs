pub mod claims;
pub mod hotel_repo;
pub mod object_store;
