//! # Domain Layer
//!
//! Business logic for the med reminder backend, independent of the HTTP
//! surface:
//! - pure normalizers (`phone`, `schedule`)
//! - services over the shared state store
//! - the outbound call gateway

pub mod auth_service;
pub mod call_gateway;
pub mod log_service;
pub mod medication_service;
pub mod member_service;
pub mod phone;
pub mod reminder_service;
pub mod schedule;

pub use auth_service::AuthService;
pub use call_gateway::CallGateway;
pub use log_service::LogService;
pub use medication_service::MedicationService;
pub use member_service::MemberService;
pub use reminder_service::ReminderService;
