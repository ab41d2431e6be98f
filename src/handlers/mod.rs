pub mod health_handlers;
pub mod hotel_handlers;
