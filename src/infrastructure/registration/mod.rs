//! Registration workflow - the verification-gated team linkage state machine

pub mod service;

pub use service::{ParticipantPage, ParticipantUpdate, RegistrationService};
