// Calendar module
// A named, colored container of events, optionally shared with other users

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::event::is_hex_color;

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 500;
pub const DEFAULT_CALENDAR_NAME: &str = "Default Calendar";
pub const DEFAULT_CALENDAR_COLOR: &str = "#3B82F6";
/// Id of the default calendar used when the server cannot provide one.
pub const LOCAL_DEFAULT_CALENDAR_ID: &str = "default-local";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SharePermission {
    #[default]
    Read,
    Write,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarShare {
    /// User id. Populated user objects from the API are reduced to their id.
    #[serde(deserialize_with = "deserialize_share_user")]
    pub user: String,
    #[serde(default)]
    pub permission: SharePermission,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarSettings {
    #[serde(default = "default_true")]
    pub allow_event_creation: bool,
    /// Minutes
    #[serde(default = "default_duration")]
    pub event_default_duration: u32,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ShareUser {
    Id(String),
    Profile {
        #[serde(alias = "_id")]
        id: Option<String>,
        email: Option<String>,
    },
}

fn deserialize_share_user<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match ShareUser::deserialize(deserializer)? {
        ShareUser::Id(id) => Ok(id),
        ShareUser::Profile { id, email } => id
            .or(email)
            .ok_or_else(|| serde::de::Error::custom("shared user has neither id nor email")),
    }
}

fn default_true() -> bool {
    true
}

fn default_duration() -> u32 {
    60
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            allow_event_creation: true,
            event_default_duration: default_duration(),
            timezone: default_timezone(),
        }
    }
}

impl CalendarSettings {
    pub fn tz(&self) -> Option<Tz> {
        self.timezone.parse().ok()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Calendar {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub color: String,
    /// Rendered by the UI as the "completed" toggle.
    #[serde(default)]
    pub visible: bool,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default, skip_serializing)]
    pub owner: Option<String>,
    #[serde(default = "default_true", skip_serializing)]
    pub is_owned: bool,
    #[serde(default, skip_serializing)]
    pub shared_with: Vec<CalendarShare>,
    #[serde(default)]
    pub settings: CalendarSettings,
    #[serde(default, skip_serializing)]
    pub is_archived: bool,
    #[serde(default, skip_serializing)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Calendar {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Result<Self, String> {
        let calendar = Self {
            id: Uuid::new_v4().to_string(),
            name: name.into().trim().to_string(),
            description: None,
            color: color.into(),
            visible: false,
            is_default: false,
            owner: None,
            is_owned: true,
            shared_with: Vec::new(),
            settings: CalendarSettings::default(),
            is_archived: false,
            created_at: None,
            updated_at: None,
        };
        calendar.validate()?;
        Ok(calendar)
    }

    /// Local stand-in default calendar.
    pub fn local_default() -> Self {
        Self {
            id: LOCAL_DEFAULT_CALENDAR_ID.to_string(),
            name: DEFAULT_CALENDAR_NAME.to_string(),
            description: Some(DEFAULT_CALENDAR_NAME.to_string()),
            color: DEFAULT_CALENDAR_COLOR.to_string(),
            visible: false,
            is_default: true,
            owner: None,
            is_owned: true,
            shared_with: Vec::new(),
            settings: CalendarSettings::default(),
            is_archived: false,
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Calendar name cannot be empty".to_string());
        }

        if name.chars().count() > MAX_NAME_LEN {
            return Err(format!(
                "Calendar name cannot be more than {} characters",
                MAX_NAME_LEN
            ));
        }

        if let Some(ref description) = self.description {
            if description.chars().count() > MAX_DESCRIPTION_LEN {
                return Err(format!(
                    "Description cannot be more than {} characters",
                    MAX_DESCRIPTION_LEN
                ));
            }
        }

        if !is_hex_color(&self.color) {
            return Err("Please provide a valid hex color".to_string());
        }

        if self.settings.tz().is_none() {
            return Err(format!("Unknown timezone '{}'", self.settings.timezone));
        }

        if self.settings.event_default_duration == 0 {
            return Err("Default event duration must be greater than 0 minutes".to_string());
        }

        Ok(())
    }

    /// A completed calendar accepts no new or edited events.
    pub fn is_completed(&self) -> bool {
        self.visible
    }

    pub fn permission_for(&self, user_id: &str) -> Option<SharePermission> {
        self.shared_with
            .iter()
            .find(|share| share.user == user_id)
            .map(|share| share.permission)
    }

    pub fn is_owner(&self, user_id: Option<&str>) -> bool {
        match (self.owner.as_deref(), user_id) {
            (Some(owner), Some(user)) => owner == user,
            _ => self.is_owned,
        }
    }

    /// Owners and `write` collaborators may mutate the calendar's events.
    pub fn can_write(&self, user_id: Option<&str>) -> bool {
        if self.is_owner(user_id) {
            return true;
        }
        user_id
            .and_then(|user| self.permission_for(user))
            .is_some_and(|permission| permission == SharePermission::Write)
    }

    pub fn can_read(&self, user_id: Option<&str>) -> bool {
        self.is_owner(user_id) || user_id.is_some_and(|user| self.permission_for(user).is_some())
    }
}

/// Partial update for a calendar; see [`crate::models::event::EventPatch`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<CalendarSettings>,
}

impl CalendarPatch {
    pub fn apply(&self, calendar: &mut Calendar) {
        if let Some(ref name) = self.name {
            calendar.name = name.trim().to_string();
        }
        if let Some(ref description) = self.description {
            calendar.description = description.clone();
        }
        if let Some(ref color) = self.color {
            calendar.color = color.clone();
        }
        if let Some(visible) = self.visible {
            calendar.visible = visible;
        }
        if let Some(ref settings) = self.settings {
            calendar.settings = settings.clone();
        }
    }

    pub fn applied_to(&self, calendar: &Calendar) -> Result<Calendar, String> {
        let mut updated = calendar.clone();
        self.apply(&mut updated);
        updated.validate()?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shared_calendar() -> Calendar {
        Calendar {
            owner: Some("owner-1".to_string()),
            is_owned: false,
            shared_with: vec![
                CalendarShare {
                    user: "reader".to_string(),
                    permission: SharePermission::Read,
                },
                CalendarShare {
                    user: "writer".to_string(),
                    permission: SharePermission::Write,
                },
            ],
            ..Calendar::new("Team", "#10B981").unwrap()
        }
    }

    #[test]
    fn test_new_calendar_valid() {
        let calendar = Calendar::new("Work", "#FF5733").unwrap();
        assert!(!calendar.is_default);
        assert!(!calendar.is_completed());
        assert_eq!(calendar.settings.event_default_duration, 60);
    }

    #[test]
    fn test_validate_rejects_bad_color_and_name() {
        assert!(Calendar::new("", "#FF5733").is_err());
        assert!(Calendar::new("Work", "blue").is_err());
        assert!(Calendar::new("x".repeat(101), "#FF5733").is_err());
    }

    #[test]
    fn test_validate_timezone() {
        let mut calendar = Calendar::new("Work", "#FF5733").unwrap();
        calendar.settings.timezone = "Europe/Kyiv".to_string();
        assert!(calendar.validate().is_ok());

        calendar.settings.timezone = "Mars/Olympus".to_string();
        assert!(calendar.validate().is_err());
    }

    #[test]
    fn test_write_permissions() {
        let calendar = shared_calendar();
        assert!(calendar.can_write(Some("owner-1")));
        assert!(calendar.can_write(Some("writer")));
        assert!(!calendar.can_write(Some("reader")));
        assert!(!calendar.can_write(Some("stranger")));
        assert!(calendar.can_read(Some("reader")));
        assert!(!calendar.can_read(Some("stranger")));
    }

    #[test]
    fn test_owned_calendar_without_owner_field() {
        let calendar = Calendar::new("Mine", "#FF5733").unwrap();
        assert!(calendar.can_write(None));
        assert!(calendar.can_write(Some("anyone-logged-in")));
    }

    #[test]
    fn test_local_default() {
        let calendar = Calendar::local_default();
        assert!(calendar.is_default);
        assert_eq!(calendar.id, LOCAL_DEFAULT_CALENDAR_ID);
        assert!(calendar.validate().is_ok());
    }

    #[test]
    fn test_patch_apply() {
        let calendar = Calendar::new("Work", "#FF5733").unwrap();
        let patch = CalendarPatch {
            name: Some("Office".to_string()),
            visible: Some(true),
            ..CalendarPatch::default()
        };
        let updated = patch.applied_to(&calendar).unwrap();
        assert_eq!(updated.name, "Office");
        assert!(updated.is_completed());
        assert_eq!(updated.color, calendar.color);
    }

    #[test]
    fn test_deserialize_minimal_server_payload() {
        let json = r##"{"id":"c1","name":"Home","color":"#112233","isDefault":true}"##;
        let calendar: Calendar = serde_json::from_str(json).unwrap();
        assert!(calendar.is_default);
        assert!(calendar.is_owned);
        assert_eq!(calendar.settings.timezone, "UTC");
    }

    #[test]
    fn test_deserialize_populated_share_user() {
        let json = r##"{
            "id": "c2",
            "name": "Team",
            "color": "#112233",
            "owner": "owner-1",
            "isOwned": false,
            "sharedWith": [
                {"user": {"_id": "u-7", "name": "Sam", "email": "sam@example.com"}, "permission": "write"},
                {"user": "u-8"}
            ]
        }"##;
        let calendar: Calendar = serde_json::from_str(json).unwrap();
        assert_eq!(calendar.shared_with[0].user, "u-7");
        assert_eq!(calendar.shared_with[1].permission, SharePermission::Read);
        assert!(calendar.can_write(Some("u-7")));
        assert!(!calendar.can_write(Some("u-8")));
    }
}
