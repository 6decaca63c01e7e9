use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KycDocumentType {
    IdCardFront,
    IdCardBack,
    BusinessLicense,
    Certificate,
    Portrait,
}

impl KycDocumentType {
    /// Value of the multipart `type` field.
    pub fn as_wire(self) -> &'static str {
        match self {
            Self::IdCardFront => "ID_CARD_FRONT",
            Self::IdCardBack => "ID_CARD_BACK",
            Self::BusinessLicense => "BUSINESS_LICENSE",
            Self::Certificate => "CERTIFICATE",
            Self::Portrait => "PORTRAIT",
        }
    }
}

impl fmt::Display for KycDocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl FromStr for KycDocumentType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "ID_CARD_FRONT" => Ok(Self::IdCardFront),
            "ID_CARD_BACK" => Ok(Self::IdCardBack),
            "BUSINESS_LICENSE" => Ok(Self::BusinessLicense),
            "CERTIFICATE" => Ok(Self::Certificate),
            "PORTRAIT" => Ok(Self::Portrait),
            other => Err(format!("unknown KYC document type: {other}")),
        }
    }
}

/// One selected document waiting for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KycDocument {
    pub doc_type: KycDocumentType,
    pub path: PathBuf,
}

impl KycDocument {
    pub fn file_name(&self) -> String {
        file_name_of(&self.path)
    }
}

impl FromStr for KycDocument {
    type Err = String;

    /// Parses `TYPE=path`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (doc_type, path) = value
            .split_once('=')
            .ok_or_else(|| format!("expected TYPE=path, got: {value}"))?;
        let path = path.trim();
        if path.is_empty() {
            return Err(format!("missing file path for {doc_type}"));
        }

        Ok(Self {
            doc_type: doc_type.parse()?,
            path: PathBuf::from(path),
        })
    }
}

pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
