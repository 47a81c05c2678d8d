//! Outbound client for the external call-placement service.
//!
//! The voice service actually places calls; this backend only describes
//! them. Dispatch is fire-and-forget relative to the HTTP response: every
//! transport failure and non-2xx status is logged here and never surfaced
//! to the caller or persisted.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};

/// Medication details the voice service reads out on the call.
#[derive(Debug, Clone, Serialize)]
pub struct MedicineInfo {
    pub name: String,
    pub dosage: String,
    pub next_dose_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

/// Payload for `POST {base}/call-reminder` on the voice service.
#[derive(Debug, Clone, Serialize)]
pub struct CallReminderPayload {
    pub phone_number: String,
    pub user_name: String,
    /// Voice-service vocabulary: "kid", "adult", or "senior".
    pub user_type: String,
    pub medicine: MedicineInfo,
    pub head_of_family_phones: Vec<String>,
    pub is_head_of_family_call: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
}

pub struct CallGateway {
    client: reqwest::Client,
    base_url: Option<String>,
}

impl CallGateway {
    /// Build a gateway pointed at `VOICE_SERVER_URL`. Unset leaves the
    /// gateway unconfigured: dispatches are logged and skipped.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("VOICE_SERVER_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());
        Self::with_base_url(base_url)
    }

    pub fn with_base_url(base_url: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("failed to build HTTP client for call gateway")?;

        match &base_url {
            Some(url) => info!("Call gateway configured for {}", url),
            None => info!("VOICE_SERVER_URL not set; reminder calls will be logged and skipped"),
        }

        Ok(Self { client, base_url })
    }

    /// Ask the voice service to place a reminder call. Never fails from the
    /// caller's perspective.
    pub async fn dispatch_reminder(&self, payload: CallReminderPayload) {
        let Some(base) = &self.base_url else {
            info!(
                "Call gateway not configured, skipping reminder call to {}",
                payload.phone_number
            );
            return;
        };

        let url = format!("{}/call-reminder", base.trim_end_matches('/'));
        match self.client.post(&url).json(&payload).send().await {
            Ok(response) if response.status().is_success() => {
                info!(
                    "Dispatched reminder call to {} for {}",
                    payload.phone_number, payload.medicine.name
                );
            }
            Ok(response) => {
                warn!(
                    "Call service returned {} for reminder to {}",
                    response.status(),
                    payload.phone_number
                );
            }
            Err(e) => {
                warn!("Failed to reach call service at {}: {}", url, e);
            }
        }
    }
}
