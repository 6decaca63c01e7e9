//! KYC submission: every selected document is uploaded in order, one
//! request per document.

use std::path::Path;

use crate::domain::kyc::{KycDocument, KycDocumentType};

use super::contracts::RemoteError;

pub trait KycSource {
    fn upload_document(&self, doc_type: KycDocumentType, path: &Path) -> Result<(), RemoteError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KycError {
    #[error("select at least one document")]
    NoDocuments,
    #[error("file not found: {0}")]
    MissingFile(String),
    #[error("upload of {doc_type} failed after {uploaded} document(s): {source}")]
    UploadFailed {
        doc_type: KycDocumentType,
        uploaded: usize,
        #[source]
        source: RemoteError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KycSubmission {
    pub uploaded: Vec<KycDocumentType>,
}

/// Uploads `documents` sequentially and stops at the first failure. Every
/// file is checked before the first request, so a missing file uploads
/// nothing.
pub fn submit_documents(
    source: &dyn KycSource,
    documents: &[KycDocument],
) -> Result<KycSubmission, KycError> {
    if documents.is_empty() {
        return Err(KycError::NoDocuments);
    }

    if let Some(missing) = documents.iter().find(|doc| !doc.path.is_file()) {
        return Err(KycError::MissingFile(missing.path.display().to_string()));
    }

    let mut uploaded = Vec::with_capacity(documents.len());
    for document in documents {
        source
            .upload_document(document.doc_type, &document.path)
            .map_err(|source| KycError::UploadFailed {
                doc_type: document.doc_type,
                uploaded: uploaded.len(),
                source,
            })?;
        tracing::info!(doc_type = %document.doc_type, file = %document.file_name(), "KYC document uploaded");
        uploaded.push(document.doc_type);
    }

    Ok(KycSubmission { uploaded })
}
