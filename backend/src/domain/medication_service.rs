//! Supply and consumption tracking.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::error::{Result, ServiceError};
use crate::storage::JsonStore;
use shared::{ConsumeResponse, LogEntry, User};

/// Supply level at or below which a warning log entry is written.
pub const LOW_SUPPLY_THRESHOLD: i64 = 5;

/// Service for recording doses taken and restocks.
#[derive(Clone)]
pub struct MedicationService {
    store: Arc<JsonStore>,
}

impl MedicationService {
    pub fn new(store: Arc<JsonStore>) -> Self {
        Self { store }
    }

    /// Adjust a medication's supply by `change` (default -1) and log the
    /// event for the family.
    ///
    /// Supply is floored at 0. `consumed_count` grows by the magnitude of
    /// negative changes only; restocks never touch it. A low-supply warning
    /// is logged exactly when this adjustment crosses the threshold from
    /// above, so staying below it does not warn again.
    pub async fn consume(
        &self,
        caller: &User,
        member_id: &str,
        med_id: &str,
        change: Option<i64>,
    ) -> Result<ConsumeResponse> {
        let change = change.unwrap_or(-1);
        let family_id = caller.family_id.clone();

        info!(
            "Consume request: member={}, med={}, change={}",
            member_id, med_id, change
        );

        self.store.mutate(move |data| {
            let member = data
                .members
                .iter_mut()
                .find(|m| m.id == member_id && m.family_id == family_id)
                .ok_or_else(|| ServiceError::NotFound("member".to_string()))?;
            let member_name = member.name.clone();

            let med = member
                .medications
                .iter_mut()
                .find(|m| m.id == med_id)
                .ok_or_else(|| ServiceError::NotFound("medication".to_string()))?;

            let before = med.supply;
            med.supply = (med.supply + change).max(0);
            if change < 0 {
                med.consumed_count += change.abs();
            }

            let response = ConsumeResponse {
                member_id: member_id.to_string(),
                med_id: med_id.to_string(),
                supply: med.supply,
                consumed_count: med.consumed_count,
                times_per_day: med.times_per_day,
                dose_times: med.dose_times.clone(),
            };
            let med_name = med.name.clone();
            let after = med.supply;

            let timestamp = Utc::now().to_rfc3339();
            let message = if change < 0 {
                format!(
                    "{} took a dose of {} ({} left)",
                    member_name, med_name, after
                )
            } else {
                format!(
                    "Restocked {} for {} ({} left)",
                    med_name, member_name, after
                )
            };
            data.logs.insert(
                0,
                LogEntry {
                    id: LogEntry::generate_id(),
                    family_id: family_id.clone(),
                    timestamp: timestamp.clone(),
                    message,
                },
            );

            if before > LOW_SUPPLY_THRESHOLD && after <= LOW_SUPPLY_THRESHOLD {
                data.logs.insert(
                    0,
                    LogEntry {
                        id: LogEntry::generate_id(),
                        family_id: family_id.clone(),
                        timestamp,
                        message: format!(
                            "Low supply warning: only {} doses of {} left for {}",
                            after, med_name, member_name
                        ),
                    },
                );
            }

            Ok(response)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{AgeGroup, Family, Medication, Member, Role};
    use tempfile::TempDir;

    fn setup_test(supply: i64) -> (MedicationService, User, String, String, TempDir) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = Arc::new(JsonStore::open(dir.path().join("state.json")).unwrap());

        let head = User {
            id: User::generate_id(),
            username: "priya".to_string(),
            password: "pw".to_string(),
            phone: "+919876543210".to_string(),
            role: Role::HeadOfFamily,
            family_id: Family::generate_id(),
        };
        let med = Medication {
            id: Medication::generate_id(),
            name: "Metformin".to_string(),
            dosage: "500mg".to_string(),
            supply,
            consumed_count: 0,
            times_per_day: 2,
            dose_times: vec!["08:00".to_string(), "20:00".to_string()],
            time: None,
        };
        let member = Member {
            id: Member::generate_id(),
            family_id: head.family_id.clone(),
            name: "Amma".to_string(),
            age_group: AgeGroup::Senior,
            phone: "+919876500000".to_string(),
            medications: vec![med.clone()],
        };

        let member_id = member.id.clone();
        let med_id = med.id.clone();
        store
            .mutate(|data| {
                data.members.push(member);
                Ok(())
            })
            .unwrap();

        (MedicationService::new(store), head, member_id, med_id, dir)
    }

    fn low_supply_entries(service: &MedicationService) -> usize {
        service.store.read(|d| {
            d.logs
                .iter()
                .filter(|l| l.message.starts_with("Low supply warning"))
                .count()
        })
    }

    #[tokio::test]
    async fn test_default_change_takes_one_dose() {
        let (service, head, member_id, med_id, _dir) = setup_test(10);

        let response = service
            .consume(&head, &member_id, &med_id, None)
            .await
            .expect("Failed to consume");

        assert_eq!(response.supply, 9);
        assert_eq!(response.consumed_count, 1);
        assert_eq!(service.store.read(|d| d.logs.len()), 1);
    }

    #[tokio::test]
    async fn test_low_supply_warning_fires_only_on_crossing() {
        let (service, head, member_id, med_id, _dir) = setup_test(6);

        // 6 -> 5 crosses the threshold: dose entry + warning entry.
        let response = service
            .consume(&head, &member_id, &med_id, Some(-1))
            .await
            .unwrap();
        assert_eq!(response.supply, 5);
        assert_eq!(low_supply_entries(&service), 1);
        assert_eq!(service.store.read(|d| d.logs.len()), 2);

        // 5 -> 4 stays below: one more dose entry, no second warning.
        let response = service
            .consume(&head, &member_id, &med_id, Some(-1))
            .await
            .unwrap();
        assert_eq!(response.supply, 4);
        assert_eq!(low_supply_entries(&service), 1);
        assert_eq!(service.store.read(|d| d.logs.len()), 3);
    }

    #[tokio::test]
    async fn test_supply_floors_at_zero() {
        let (service, head, member_id, med_id, _dir) = setup_test(2);

        let response = service
            .consume(&head, &member_id, &med_id, Some(-5))
            .await
            .unwrap();

        assert_eq!(response.supply, 0);
        // consumed_count tracks the requested magnitude, not the clamp.
        assert_eq!(response.consumed_count, 5);
    }

    #[tokio::test]
    async fn test_restock_does_not_touch_consumed_count() {
        let (service, head, member_id, med_id, _dir) = setup_test(3);

        let response = service
            .consume(&head, &member_id, &med_id, Some(10))
            .await
            .unwrap();

        assert_eq!(response.supply, 13);
        assert_eq!(response.consumed_count, 0);
        let restock_logged = service
            .store
            .read(|d| d.logs[0].message.starts_with("Restocked"));
        assert!(restock_logged);
    }

    #[tokio::test]
    async fn test_unknown_member_or_medication_is_not_found() {
        let (service, head, member_id, _med_id, _dir) = setup_test(10);

        let err = service
            .consume(&head, "member::nope", "med::nope", None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        let err = service
            .consume(&head, &member_id, "med::nope", None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_cross_family_member_is_not_found() {
        let (service, head, member_id, med_id, _dir) = setup_test(10);

        let mut stranger = head.clone();
        stranger.family_id = Family::generate_id();

        let err = service
            .consume(&stranger, &member_id, &med_id, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
