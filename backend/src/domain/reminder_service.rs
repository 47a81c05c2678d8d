//! Reminder escalation events.
//!
//! Triggering a reminder produces an ordered list of display strings
//! describing the simulated call flow, plus activity log entries for the
//! family. Nothing waits between events and no call is placed here; the
//! actual calling is delegated to the voice service through the call
//! gateway, fire-and-forget.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::call_gateway::{CallGateway, CallReminderPayload, MedicineInfo};
use crate::domain::schedule::{normalize_single_time, DEFAULT_DOSE_TIME};
use crate::error::{Result, ServiceError};
use crate::storage::JsonStore;
use shared::{LogEntry, ReminderResponse, TriggerReminderRequest, User};

/// How the simulated call flow unfolds for a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CallPlan {
    /// Minors are never called directly; the heads of family are called
    /// immediately on their behalf.
    HeadsImmediately,
    /// Adults and seniors are called first, with escalation to the heads
    /// after two missed calls.
    DirectThenEscalate,
}

impl CallPlan {
    fn for_age_group(age_group: shared::AgeGroup) -> Self {
        if age_group.is_minor() {
            CallPlan::HeadsImmediately
        } else {
            CallPlan::DirectThenEscalate
        }
    }
}

/// Everything the event templates need, resolved up front.
struct EscalationContext {
    member_name: String,
    member_phone: String,
    med_name: String,
    dosage: String,
    dose_time: String,
    head_names: String,
    backup_names: String,
}

/// Compose the display events and log messages for one triggered reminder.
/// Pure; kept separate from storage so the branch table is testable on its
/// own.
fn compose_flow(
    plan: CallPlan,
    multi_head: bool,
    ctx: &EscalationContext,
) -> (Vec<String>, Vec<String>) {
    let mut events = Vec::new();
    let mut log_messages = Vec::new();

    match plan {
        CallPlan::HeadsImmediately => {
            events.push(format!(
                "Calling head of family ({}) immediately: {} is a minor and needs {} ({}) at {}.",
                ctx.head_names, ctx.member_name, ctx.med_name, ctx.dosage, ctx.dose_time
            ));
            log_messages.push(format!(
                "Reminder: called head of family for {}'s {} dose at {}",
                ctx.member_name, ctx.med_name, ctx.dose_time
            ));
        }
        CallPlan::DirectThenEscalate => {
            events.push(format!(
                "Placing reminder call to {} ({}) for {} ({}) at {}.",
                ctx.member_name, ctx.member_phone, ctx.med_name, ctx.dosage, ctx.dose_time
            ));
            events.push(format!("Waiting for {} to pick up...", ctx.member_name));
            events.push(format!(
                "No answer from {}. Waiting briefly before calling again.",
                ctx.member_name
            ));
            events.push(format!(
                "Second call missed. Escalating to head of family ({}).",
                ctx.head_names
            ));
            log_messages.push(format!(
                "Reminder call placed to {} for {} at {}",
                ctx.member_name, ctx.med_name, ctx.dose_time
            ));
            log_messages.push(format!(
                "Escalated {}'s {} reminder to head of family",
                ctx.member_name, ctx.med_name
            ));
        }
    }

    if multi_head {
        events.push(format!(
            "Backup heads of family will be tried next: {}.",
            ctx.backup_names
        ));
        log_messages.push(format!(
            "Backup heads of family notified for {}'s {} reminder",
            ctx.member_name, ctx.med_name
        ));
    }

    (events, log_messages)
}

/// Service that turns a trigger request into escalation events, log
/// entries, and an outbound call dispatch.
#[derive(Clone)]
pub struct ReminderService {
    store: Arc<JsonStore>,
    gateway: Arc<CallGateway>,
}

impl ReminderService {
    pub fn new(store: Arc<JsonStore>, gateway: Arc<CallGateway>) -> Self {
        Self { store, gateway }
    }

    pub async fn trigger(
        &self,
        caller: &User,
        request: TriggerReminderRequest,
    ) -> Result<ReminderResponse> {
        let member_id = request
            .member_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .ok_or_else(|| ServiceError::Validation("memberId is required".to_string()))?;
        let medication_id = request
            .medication_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .ok_or_else(|| ServiceError::Validation("medicationId is required".to_string()))?;

        info!(
            "Triggering reminder: member={}, medication={}",
            member_id, medication_id
        );

        let family_id = caller.family_id.clone();
        let requested_time = request.dose_time.clone();

        let (response, payload) = self.store.mutate(move |data| {
            let (member_name, member_phone, age_group, med) = {
                let member = data
                    .members
                    .iter_mut()
                    .find(|m| m.id == member_id && m.family_id == family_id)
                    .ok_or_else(|| ServiceError::NotFound("member".to_string()))?;

                let med = member
                    .medications
                    .iter_mut()
                    .find(|m| m.id == medication_id)
                    .ok_or_else(|| ServiceError::NotFound("medication".to_string()))?;

                // Legacy documents may carry a single `time` and an empty
                // schedule; seed the schedule from it before anything else.
                if med.dose_times.is_empty() {
                    let seeded = normalize_single_time(med.time.as_deref());
                    med.dose_times = vec![seeded];
                    med.times_per_day = med.dose_times.len() as u32;
                }

                (
                    member.name.clone(),
                    member.phone.clone(),
                    member.age_group,
                    med.clone(),
                )
            };

            let dose_time = match requested_time.as_deref() {
                Some(t) => normalize_single_time(Some(t)),
                None => med
                    .dose_times
                    .first()
                    .cloned()
                    .unwrap_or_else(|| DEFAULT_DOSE_TIME.to_string()),
            };
            let interval_minutes = (1440.0 / med.times_per_day.max(1) as f64).round() as i64;

            let heads: Vec<&User> = data
                .families
                .iter()
                .find(|f| f.id == family_id)
                .map(|family| {
                    family
                        .heads
                        .iter()
                        .filter_map(|id| data.users.iter().find(|u| &u.id == id))
                        .collect()
                })
                .unwrap_or_default();
            let head_names = if heads.is_empty() {
                "no registered head".to_string()
            } else {
                heads
                    .iter()
                    .map(|h| h.username.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            let backup_names = heads
                .iter()
                .skip(1)
                .map(|h| h.username.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            let head_phones: Vec<String> = heads.iter().map(|h| h.phone.clone()).collect();
            let multi_head = heads.len() > 1;

            let ctx = EscalationContext {
                member_name: member_name.clone(),
                member_phone: member_phone.clone(),
                med_name: med.name.clone(),
                dosage: med.dosage.clone(),
                dose_time: dose_time.clone(),
                head_names,
                backup_names,
            };
            let plan = CallPlan::for_age_group(age_group);
            let (events, log_messages) = compose_flow(plan, multi_head, &ctx);

            // All entries from one trigger share one timestamp.
            let timestamp = Utc::now().to_rfc3339();
            for message in log_messages {
                data.logs.insert(
                    0,
                    LogEntry {
                        id: LogEntry::generate_id(),
                        family_id: family_id.clone(),
                        timestamp: timestamp.clone(),
                        message,
                    },
                );
            }

            let payload = CallReminderPayload {
                phone_number: member_phone,
                user_name: member_name.clone(),
                user_type: age_group.call_user_type().to_string(),
                medicine: MedicineInfo {
                    name: med.name.clone(),
                    dosage: med.dosage.clone(),
                    next_dose_time: dose_time.clone(),
                    instructions: None,
                },
                head_of_family_phones: head_phones,
                is_head_of_family_call: false,
                patient_name: None,
            };

            let response = ReminderResponse {
                member_id,
                member_name,
                age_group,
                medication_id,
                medication_name: med.name,
                dosage: med.dosage,
                dose_time,
                interval_minutes,
                events,
            };

            Ok((response, payload))
        })?;

        // Fire-and-forget: the response never waits on, or reflects, the
        // outcome of the outbound call request.
        let gateway = Arc::clone(&self.gateway);
        tokio::spawn(async move {
            gateway.dispatch_reminder(payload).await;
        });

        Ok(response)
    }
}
