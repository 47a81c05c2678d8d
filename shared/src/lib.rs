use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Login-capable account. One user belongs to exactly one family; users are
/// created at registration and never mutated or deleted afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    /// Opaque credential, stored exactly as supplied.
    pub password: String,
    /// Normalized phone number (+91... shape).
    pub phone: String,
    pub role: Role,
    pub family_id: String,
}

/// Privilege level of a user within their family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "HEAD_OF_FAMILY")]
    HeadOfFamily,
    #[serde(rename = "ADULT")]
    Adult,
}

/// A family partition. `heads` is the ordered list of user ids holding the
/// head-of-family role; the first registering head creates the family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Family {
    pub id: String,
    pub heads: Vec<String>,
}

/// A tracked individual (patient) within a family, distinct from a
/// login-capable User.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub family_id: String,
    pub name: String,
    pub age_group: AgeGroup,
    pub phone: String,
    pub medications: Vec<Medication>,
}

/// Age bracket of a member. Drives the reminder call flow: minors are never
/// called directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeGroup {
    Minor,
    Adult,
    Senior,
}

impl AgeGroup {
    pub fn is_minor(&self) -> bool {
        matches!(self, AgeGroup::Minor)
    }

    /// Vocabulary the external voice service expects for `user_type`.
    pub fn call_user_type(&self) -> &'static str {
        match self {
            AgeGroup::Minor => "kid",
            AgeGroup::Adult => "adult",
            AgeGroup::Senior => "senior",
        }
    }
}

/// One prescription tracked for a member.
///
/// Invariant: `dose_times.len() == times_per_day`, enforced by the schedule
/// normalizer on every write path. `time` is a legacy single-time field kept
/// only so older persisted documents can seed an empty `dose_times`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub id: String,
    pub name: String,
    /// Free text, e.g. "1 tablet" or "5ml".
    pub dosage: String,
    /// Remaining doses, floored at 0.
    pub supply: i64,
    /// Cumulative count of doses taken.
    pub consumed_count: i64,
    pub times_per_day: u32,
    /// Ordered HH:MM clock times, one per scheduled daily dose.
    pub dose_times: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

/// One activity log line for a family. Append-only, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: String,
    pub family_id: String,
    /// RFC 3339 timestamp.
    pub timestamp: String,
    pub message: String,
}

/// Projection of a user safe to return to clients (no credential).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub username: String,
    pub phone: String,
    pub role: Role,
    pub family_id: String,
}

impl User {
    pub fn generate_id() -> String {
        format!("user::{}", Uuid::new_v4())
    }

    pub fn view(&self) -> UserView {
        UserView {
            id: self.id.clone(),
            username: self.username.clone(),
            phone: self.phone.clone(),
            role: self.role,
            family_id: self.family_id.clone(),
        }
    }
}

impl Family {
    pub fn generate_id() -> String {
        format!("family::{}", Uuid::new_v4())
    }
}

impl Member {
    pub fn generate_id() -> String {
        format!("member::{}", Uuid::new_v4())
    }
}

impl Medication {
    pub fn generate_id() -> String {
        format!("medication::{}", Uuid::new_v4())
    }
}

impl LogEntry {
    pub fn generate_id() -> String {
        format!("log::{}", Uuid::new_v4())
    }
}

/// Request to register a new user account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub is_head: bool,
    /// Joins an existing family when present; otherwise a fresh family is
    /// created for the registrant.
    pub family_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Response after a successful register or login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: UserView,
}

/// Medication as supplied by a client on member create/update. Loose on
/// purpose: the schedule normalizer fills in whatever is missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MedicationInput {
    pub id: Option<String>,
    pub name: Option<String>,
    pub dosage: Option<String>,
    pub supply: Option<i64>,
    pub consumed_count: Option<i64>,
    pub times_per_day: Option<i64>,
    #[serde(default)]
    pub dose_times: Vec<String>,
    pub time: Option<String>,
}

/// Request to create a member of the caller's family.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateMemberRequest {
    pub name: Option<String>,
    pub age_group: Option<AgeGroup>,
    pub phone: Option<String>,
    #[serde(default)]
    pub medications: Vec<MedicationInput>,
}

/// Request to update an existing member. Absent fields are left unchanged;
/// a present `medications` list replaces the member's list wholesale.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberRequest {
    pub name: Option<String>,
    pub age_group: Option<AgeGroup>,
    pub phone: Option<String>,
    pub medications: Option<Vec<MedicationInput>>,
}

/// Request to record a dose taken (negative change) or a restock (positive).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConsumeRequest {
    /// Supply adjustment; defaults to -1 (one dose taken).
    pub change: Option<i64>,
}

/// Snapshot of a medication after a consume/restock operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConsumeResponse {
    pub member_id: String,
    pub med_id: String,
    pub supply: i64,
    pub consumed_count: i64,
    pub times_per_day: u32,
    pub dose_times: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateLogRequest {
    pub message: Option<String>,
}

/// Request to trigger the reminder call flow for one medication dose.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TriggerReminderRequest {
    pub member_id: Option<String>,
    pub medication_id: Option<String>,
    /// Optional HH:MM override for the dose being reminded about.
    pub dose_time: Option<String>,
}

/// Result of a triggered reminder: a member/medication summary plus the
/// ordered list of display strings describing the simulated call flow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReminderResponse {
    pub member_id: String,
    pub member_name: String,
    pub age_group: AgeGroup,
    pub medication_id: String,
    pub medication_name: String,
    pub dosage: String,
    /// The dose time the reminder resolved to.
    pub dose_time: String,
    /// Informational spacing between daily doses; nothing is scheduled off it.
    pub interval_minutes: i64,
    pub events: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_ids_are_prefixed_and_unique() {
        let a = User::generate_id();
        let b = User::generate_id();
        assert!(a.starts_with("user::"));
        assert_ne!(a, b);
        assert!(Family::generate_id().starts_with("family::"));
        assert!(Member::generate_id().starts_with("member::"));
        assert!(Medication::generate_id().starts_with("medication::"));
        assert!(LogEntry::generate_id().starts_with("log::"));
    }

    #[test]
    fn test_user_view_drops_password() {
        let user = User {
            id: "user::1".to_string(),
            username: "priya".to_string(),
            password: "secret".to_string(),
            phone: "+919876543210".to_string(),
            role: Role::HeadOfFamily,
            family_id: "family::1".to_string(),
        };
        let view = serde_json::to_value(user.view()).unwrap();
        assert!(view.get("password").is_none());
        assert_eq!(view["username"], "priya");
        assert_eq!(view["role"], "HEAD_OF_FAMILY");
    }

    #[test]
    fn test_entities_serialize_camel_case() {
        let med = Medication {
            id: "medication::1".to_string(),
            name: "Metformin".to_string(),
            dosage: "500mg".to_string(),
            supply: 10,
            consumed_count: 2,
            times_per_day: 2,
            dose_times: vec!["08:00".to_string(), "20:00".to_string()],
            time: None,
        };
        let value = serde_json::to_value(&med).unwrap();
        assert_eq!(value["timesPerDay"], 2);
        assert_eq!(value["consumedCount"], 2);
        assert_eq!(value["doseTimes"][1], "20:00");
        // Legacy field stays off the wire unless set.
        assert!(value.get("time").is_none());
    }

    #[test]
    fn test_medication_tolerates_legacy_document() {
        // Older documents carried a single `time` and no doseTimes.
        let raw = r#"{
            "id": "medication::legacy",
            "name": "Aspirin",
            "dosage": "1 tablet",
            "supply": 4,
            "consumedCount": 0,
            "timesPerDay": 1,
            "doseTimes": [],
            "time": "21:30"
        }"#;
        let med: Medication = serde_json::from_str(raw).unwrap();
        assert!(med.dose_times.is_empty());
        assert_eq!(med.time.as_deref(), Some("21:30"));
    }

    #[test]
    fn test_age_group_call_vocabulary() {
        assert_eq!(AgeGroup::Minor.call_user_type(), "kid");
        assert_eq!(AgeGroup::Adult.call_user_type(), "adult");
        assert_eq!(AgeGroup::Senior.call_user_type(), "senior");
        assert!(AgeGroup::Minor.is_minor());
        assert!(!AgeGroup::Senior.is_minor());
    }

    #[test]
    fn test_register_request_defaults() {
        let request: RegisterRequest =
            serde_json::from_str(r#"{"username":"a","password":"b","phone":"c"}"#).unwrap();
        assert!(!request.is_head);
        assert!(request.family_id.is_none());
    }
}
