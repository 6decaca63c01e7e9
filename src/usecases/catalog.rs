use crate::domain::catalog::{DraftError, Service, ServiceDraft};

use super::contracts::RemoteError;

pub trait CatalogSource {
    fn list_services(&self) -> Result<Vec<Service>, RemoteError>;
    fn create_service(&self, draft: &ServiceDraft) -> Result<Service, RemoteError>;
    fn update_service(&self, service_id: &str, draft: &ServiceDraft) -> Result<Service, RemoteError>;
    fn delete_service(&self, service_id: &str) -> Result<(), RemoteError>;
    fn set_service_active(&self, service_id: &str, active: bool) -> Result<(), RemoteError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("service name must not be blank")]
    BlankName,
    #[error("price must be zero or more")]
    InvalidPrice,
    #[error("duration must be at least one minute")]
    ZeroDuration,
    #[error("service {0} not found")]
    NotFound(String),
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

impl From<DraftError> for CatalogError {
    fn from(error: DraftError) -> Self {
        match error {
            DraftError::BlankName => Self::BlankName,
            DraftError::InvalidPrice => Self::InvalidPrice,
            DraftError::ZeroDuration => Self::ZeroDuration,
        }
    }
}

pub fn list_services(source: &dyn CatalogSource) -> Result<Vec<Service>, CatalogError> {
    Ok(source.list_services()?)
}

pub fn create_service(
    source: &dyn CatalogSource,
    draft: ServiceDraft,
) -> Result<Service, CatalogError> {
    draft.validate()?;
    Ok(source.create_service(&draft)?)
}

pub fn update_service(
    source: &dyn CatalogSource,
    service_id: &str,
    draft: ServiceDraft,
) -> Result<Service, CatalogError> {
    draft.validate()?;
    source
        .update_service(service_id, &draft)
        .map_err(|error| not_found_as(error, service_id))
}

pub fn delete_service(source: &dyn CatalogSource, service_id: &str) -> Result<(), CatalogError> {
    source
        .delete_service(service_id)
        .map_err(|error| not_found_as(error, service_id))
}

/// Flips `isActive` based on the current catalog and returns the new value.
pub fn toggle_service(source: &dyn CatalogSource, service_id: &str) -> Result<bool, CatalogError> {
    let service = source
        .list_services()?
        .into_iter()
        .find(|service| service.id == service_id)
        .ok_or_else(|| CatalogError::NotFound(service_id.to_owned()))?;

    let active = !service.is_active;
    source
        .set_service_active(service_id, active)
        .map_err(|error| not_found_as(error, service_id))?;

    Ok(active)
}

fn not_found_as(error: RemoteError, service_id: &str) -> CatalogError {
    match error {
        RemoteError::NotFound => CatalogError::NotFound(service_id.to_owned()),
        other => CatalogError::Remote(other),
    }
}
