//! Application state shared across handlers

use std::sync::Arc;

use crate::infrastructure::admin::AdminService;
use crate::infrastructure::registration::RegistrationService;
use crate::infrastructure::team::TeamService;

/// Shared services, constructed once at startup and injected everywhere
#[derive(Clone)]
pub struct AppState {
    pub registration_service: Arc<RegistrationService>,
    pub team_service: Arc<TeamService>,
    pub admin_service: Arc<AdminService>,
}

impl AppState {
    pub fn new(
        registration_service: Arc<RegistrationService>,
        team_service: Arc<TeamService>,
        admin_service: Arc<AdminService>,
    ) -> Self {
        Self {
            registration_service,
            team_service,
            admin_service,
        }
    }
}
