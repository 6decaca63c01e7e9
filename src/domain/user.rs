use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::id;

/// Marketplace role of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[default]
    User,
    Provider,
    #[serde(other)]
    Other,
}

impl Role {
    pub fn as_label(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Provider => "PROVIDER",
            Self::Other => "OTHER",
        }
    }
}

/// Peer as it appears in conversation rows, thread headers and bookings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    #[serde(deserialize_with = "id::deserialize")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub full_name: String,
    #[serde(default)]
    pub business_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: Role,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub last_active_at: Option<DateTime<Utc>>,
}

impl UserSummary {
    /// Name shown wherever this peer is rendered.
    pub fn display_name(&self) -> &str {
        resolve_name(self.role, self.business_name.as_deref(), &self.full_name)
    }
}

/// Reads an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Providers are shown under their business name when they have one.
pub fn resolve_name<'a>(role: Role, business_name: Option<&'a str>, full_name: &'a str) -> &'a str {
    match (role, business_name) {
        (Role::Provider, Some(business)) if !business.trim().is_empty() => business,
        _ => full_name,
    }
}

/// Profile of the authenticated account, persisted with the session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    #[serde(deserialize_with = "id::deserialize")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: Role,
    #[serde(default)]
    pub business_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl SessionUser {
    pub fn display_name(&self) -> &str {
        resolve_name(self.role, self.business_name.as_deref(), &self.full_name)
    }
}

/// Partial profile update. `None` fields are left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserPatch {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub business_name: Option<String>,
    pub avatar: Option<String>,
    pub phone: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.email.is_none()
            && self.business_name.is_none()
            && self.avatar.is_none()
            && self.phone.is_none()
    }

    pub fn apply_to(self, user: &mut SessionUser) {
        if let Some(full_name) = self.full_name {
            user.full_name = full_name;
        }
        if let Some(email) = self.email {
            user.email = Some(email);
        }
        if let Some(business_name) = self.business_name {
            user.business_name = Some(business_name);
        }
        if let Some(avatar) = self.avatar {
            user.avatar = Some(avatar);
        }
        if let Some(phone) = self.phone {
            user.phone = Some(phone);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(role: Role, business_name: Option<&str>) -> UserSummary {
        UserSummary {
            id: "1".to_owned(),
            full_name: "Nguyen A".to_owned(),
            business_name: business_name.map(str::to_owned),
            avatar: None,
            role,
            phone: None,
            last_active_at: None,
        }
    }

    #[test]
    fn provider_with_business_name_shows_business_name() {
        assert_eq!(
            summary(Role::Provider, Some("Shop X")).display_name(),
            "Shop X"
        );
    }

    #[test]
    fn regular_user_shows_full_name_even_with_business_name() {
        assert_eq!(summary(Role::User, None).display_name(), "Nguyen A");
        assert_eq!(
            summary(Role::User, Some("Shop X")).display_name(),
            "Nguyen A"
        );
    }

    #[test]
    fn provider_without_business_name_falls_back_to_full_name() {
        assert_eq!(summary(Role::Provider, None).display_name(), "Nguyen A");
        assert_eq!(summary(Role::Provider, Some("  ")).display_name(), "Nguyen A");
    }

    #[test]
    fn decodes_wire_summary_with_unknown_role() {
        let user: UserSummary = serde_json::from_str(
            r#"{"id": 9, "fullName": "Tran B", "role": "ADMIN", "lastActiveAt": "2026-01-01T10:00:00Z"}"#,
        )
        .expect("summary should decode");

        assert_eq!(user.id, "9");
        assert_eq!(user.role, Role::Other);
        assert!(user.last_active_at.is_some());
    }

    #[test]
    fn null_name_and_role_fall_back_to_defaults() {
        let rows: Vec<UserSummary> = serde_json::from_str(
            r#"[{"id": 1, "fullName": null, "role": null}, {"id": 2, "fullName": "Lan"}]"#,
        )
        .expect("rows with nulls should decode");

        assert_eq!(rows[0].full_name, "");
        assert_eq!(rows[0].role, Role::User);
        assert_eq!(rows[1].display_name(), "Lan");

        let me: SessionUser =
            serde_json::from_str(r#"{"id": "p1", "fullName": null, "role": null, "email": null}"#)
                .expect("profile with nulls should decode");
        assert_eq!(me.role, Role::User);
        assert_eq!(me.email, None);
    }

    #[test]
    fn patch_only_touches_provided_fields() {
        let mut user = SessionUser {
            id: "1".to_owned(),
            full_name: "Nguyen A".to_owned(),
            email: Some("a@example.com".to_owned()),
            role: Role::Provider,
            business_name: None,
            avatar: None,
            phone: None,
        };

        UserPatch {
            business_name: Some("Shop X".to_owned()),
            ..UserPatch::default()
        }
        .apply_to(&mut user);

        assert_eq!(user.business_name.as_deref(), Some("Shop X"));
        assert_eq!(user.full_name, "Nguyen A");
        assert_eq!(user.email.as_deref(), Some("a@example.com"));
        assert_eq!(user.display_name(), "Shop X");
    }
}
