use crate::domain::stats::ProviderStats;

use super::contracts::RemoteError;

pub trait StatsSource {
    fn fetch_stats(&self) -> Result<ProviderStats, RemoteError>;
}

pub fn dashboard_stats(source: &dyn StatsSource) -> Result<ProviderStats, RemoteError> {
    source.fetch_stats()
}
