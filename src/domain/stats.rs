use serde::{Deserialize, Serialize};

/// Dashboard aggregates. Every field is optional on the wire.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderStats {
    pub total_bookings: u64,
    pub pending_bookings: u64,
    pub completed_bookings: u64,
    pub total_revenue: f64,
    pub average_rating: f64,
    pub total_reviews: u64,
}
