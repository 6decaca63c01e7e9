use serde::{Deserialize, Serialize};

use super::id;

/// A bookable service offered by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[serde(deserialize_with = "id::deserialize")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub duration_minutes: u32,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Body of create/update calls.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    pub duration_minutes: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftError {
    BlankName,
    InvalidPrice,
    ZeroDuration,
}

impl ServiceDraft {
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.name.trim().is_empty() {
            return Err(DraftError::BlankName);
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(DraftError::InvalidPrice);
        }
        if self.duration_minutes == 0 {
            return Err(DraftError::ZeroDuration);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ServiceDraft {
        ServiceDraft {
            name: "Gel nails".to_owned(),
            description: None,
            price: 250_000.0,
            duration_minutes: 60,
            category: Some("NAILS".to_owned()),
        }
    }

    #[test]
    fn valid_draft_passes() {
        assert_eq!(draft().validate(), Ok(()));
    }

    #[test]
    fn rejects_blank_name_negative_price_and_zero_duration() {
        let blank = ServiceDraft {
            name: "  ".to_owned(),
            ..draft()
        };
        let negative = ServiceDraft {
            price: -1.0,
            ..draft()
        };
        let instant = ServiceDraft {
            duration_minutes: 0,
            ..draft()
        };

        assert_eq!(blank.validate(), Err(DraftError::BlankName));
        assert_eq!(negative.validate(), Err(DraftError::InvalidPrice));
        assert_eq!(instant.validate(), Err(DraftError::ZeroDuration));
    }

    #[test]
    fn draft_serializes_camel_case_without_empty_options() {
        let body = serde_json::to_value(draft()).expect("draft should serialize");

        assert_eq!(body["durationMinutes"], 60);
        assert!(body.get("description").is_none());
    }

    #[test]
    fn service_defaults_to_active() {
        let service: Service =
            serde_json::from_str(r#"{"id": 1, "name": "Facial", "price": 100}"#)
                .expect("service should decode");

        assert!(service.is_active);
        assert_eq!(service.duration_minutes, 0);
    }
}
