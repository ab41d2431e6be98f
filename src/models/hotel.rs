//! Represents a hotel record owned by a user.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A single hotel listing.
///
/// Records are create-only: once written they are never updated or deleted.
/// The JSON wire format uses PascalCase field names (`UserId`, `CityName`,
/// ...), which is what the frontend consumes.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct Hotel {
    /// Owner username. All listing queries partition on this value.
    pub user_id: String,

    /// Unique identifier, generated at creation and immutable afterwards.
    pub id: Uuid,

    /// Hotel name.
    pub name: String,

    /// City the hotel is located in.
    pub city_name: String,

    /// Nightly price. Parsed from the submitted form string; no range checks.
    pub price: i32,

    /// Star rating. Parsed from the submitted form string; no range checks.
    pub rating: i32,

    /// Key of the associated image in the object store.
    pub file_name: String,
}
