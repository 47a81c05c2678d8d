//! Member management for a family.
//!
//! All operations are restricted to the caller's family, and mutations to
//! the head-of-family role. Medication schedules are normalized on every
//! write so the `dose_times`/`times_per_day` invariant holds.

use std::sync::Arc;

use tracing::info;

use crate::domain::phone::normalize_phone;
use crate::domain::schedule::{coerce_times_per_day, normalize_dose_times};
use crate::error::{Result, ServiceError};
use crate::storage::JsonStore;
use shared::{
    CreateMemberRequest, Medication, MedicationInput, Member, Role, UpdateMemberRequest, User,
};

/// Service for managing family members and their prescriptions.
#[derive(Clone)]
pub struct MemberService {
    store: Arc<JsonStore>,
}

impl MemberService {
    pub fn new(store: Arc<JsonStore>) -> Self {
        Self { store }
    }

    /// List the members of the caller's family. Head-of-family only.
    pub async fn list_members(&self, caller: &User) -> Result<Vec<Member>> {
        require_head(caller)?;
        Ok(self.store.read(|data| {
            data.members
                .iter()
                .filter(|m| m.family_id == caller.family_id)
                .cloned()
                .collect()
        }))
    }

    /// Create a member in the caller's family. Head-of-family only.
    pub async fn create_member(
        &self,
        caller: &User,
        request: CreateMemberRequest,
    ) -> Result<Member> {
        require_head(caller)?;

        let name = match request.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => return Err(ServiceError::Validation("name is required".to_string())),
        };
        let age_group = request
            .age_group
            .ok_or_else(|| ServiceError::Validation("ageGroup is required".to_string()))?;

        info!("Creating member: name={}, ageGroup={:?}", name, age_group);

        let member = Member {
            id: Member::generate_id(),
            family_id: caller.family_id.clone(),
            name,
            age_group,
            phone: normalize_phone(request.phone.as_deref().unwrap_or("")),
            medications: request
                .medications
                .into_iter()
                .map(build_medication)
                .collect(),
        };

        let created = member.clone();
        self.store.mutate(move |data| {
            data.members.push(member);
            Ok(())
        })?;

        info!("Created member {} with ID {}", created.name, created.id);
        Ok(created)
    }

    /// Update a member of the caller's family. Head-of-family only; a member
    /// belonging to another family is indistinguishable from a missing one.
    pub async fn update_member(
        &self,
        caller: &User,
        member_id: &str,
        request: UpdateMemberRequest,
    ) -> Result<Member> {
        require_head(caller)?;

        if let Some(name) = request.name.as_deref() {
            if name.trim().is_empty() {
                return Err(ServiceError::Validation("name cannot be empty".to_string()));
            }
        }

        info!("Updating member: {}", member_id);

        let family_id = caller.family_id.clone();
        self.store.mutate(move |data| {
            let member = data
                .members
                .iter_mut()
                .find(|m| m.id == member_id && m.family_id == family_id)
                .ok_or_else(|| ServiceError::NotFound("member".to_string()))?;

            if let Some(name) = request.name {
                member.name = name.trim().to_string();
            }
            if let Some(age_group) = request.age_group {
                member.age_group = age_group;
            }
            if let Some(phone) = request.phone {
                member.phone = normalize_phone(&phone);
            }
            if let Some(medications) = request.medications {
                member.medications = medications.into_iter().map(build_medication).collect();
            }

            Ok(member.clone())
        })
    }
}

fn require_head(caller: &User) -> Result<()> {
    if caller.role != Role::HeadOfFamily {
        return Err(ServiceError::Forbidden(
            "only the head of family can manage members".to_string(),
        ));
    }
    Ok(())
}

/// Build a stored medication from loose client input, normalizing the
/// schedule. The legacy single `time` serves as a candidate when no
/// explicit dose times were given.
fn build_medication(input: MedicationInput) -> Medication {
    let times_per_day = coerce_times_per_day(input.times_per_day);
    let mut candidates = input.dose_times;
    if candidates.is_empty() {
        if let Some(time) = &input.time {
            candidates.push(time.clone());
        }
    }
    let dose_times = normalize_dose_times(times_per_day, &candidates);

    Medication {
        id: input.id.unwrap_or_else(Medication::generate_id),
        name: input.name.map(|n| n.trim().to_string()).unwrap_or_default(),
        dosage: input.dosage.unwrap_or_default(),
        supply: input.supply.unwrap_or(0).max(0),
        consumed_count: input.consumed_count.unwrap_or(0).max(0),
        times_per_day,
        dose_times,
        time: None,
    }
}
