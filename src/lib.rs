//! Hackathon Registration API
//!
//! Participants register individually or against a team code, verify their
//! email, and are grouped into teams of at most four. Admins review teams,
//! check participants in at the event and trigger bulk notifications.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use rand::Rng;
use tracing::info;

use api::AppState;
use domain::admin::AdminRepository;
use domain::participant::ParticipantRepository;
use domain::team::TeamRepository;
use infrastructure::admin::{AdminService, InMemoryAdminRepository, PostgresAdminRepository};
use infrastructure::auth::{Argon2PasswordHasher, JwtConfig, JwtSigner, TokenSigner};
use infrastructure::email::{HttpApiMailer, Mailer, TracingMailer};
use infrastructure::participant::{InMemoryParticipantRepository, PostgresParticipantRepository};
use infrastructure::registration::RegistrationService;
use infrastructure::team::{InMemoryTeamRepository, PostgresTeamRepository, TeamService};

/// Create the application state with all services wired up
///
/// The store handle is constructed here and injected everywhere; nothing
/// else opens connections.
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let (participants, teams, admins) = create_repositories(config).await?;

    let mailer = create_mailer(config);
    let signer: Arc<dyn TokenSigner> = Arc::new(JwtSigner::new(JwtConfig::new(jwt_secret(config))));
    let hasher = Arc::new(Argon2PasswordHasher::new());

    let team_service = Arc::new(TeamService::new(Arc::clone(&teams)));

    let registration_service = Arc::new(RegistrationService::new(
        Arc::clone(&participants),
        Arc::clone(&team_service),
        Arc::clone(&mailer),
        &config.email.base_url,
    ));

    let admin_service = Arc::new(AdminService::new(
        admins,
        participants,
        teams,
        hasher,
        signer,
        mailer,
        &config.email.client_url,
    ));

    Ok(AppState::new(registration_service, team_service, admin_service))
}

type Repositories = (
    Arc<dyn ParticipantRepository>,
    Arc<dyn TeamRepository>,
    Arc<dyn AdminRepository>,
);

async fn create_repositories(config: &AppConfig) -> anyhow::Result<Repositories> {
    match config.storage.backend.as_str() {
        "postgres" => {
            let database_url = std::env::var("DATABASE_URL").map_err(|_| {
                anyhow::anyhow!("DATABASE_URL is required for the postgres backend")
            })?;

            info!("Connecting to PostgreSQL...");
            let pool = sqlx::PgPool::connect(&database_url)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to connect to PostgreSQL: {}", e))?;

            sqlx::migrate!("./migrations").run(&pool).await?;
            info!("PostgreSQL connection established");

            Ok((
                Arc::new(PostgresParticipantRepository::new(pool.clone())),
                Arc::new(PostgresTeamRepository::new(pool.clone())),
                Arc::new(PostgresAdminRepository::new(pool)),
            ))
        }
        other => {
            if other != "memory" {
                tracing::warn!(backend = other, "Unknown storage backend, using in-memory");
            } else {
                info!("Using in-memory storage");
            }

            Ok((
                Arc::new(InMemoryParticipantRepository::new()),
                Arc::new(InMemoryTeamRepository::new()),
                Arc::new(InMemoryAdminRepository::new()),
            ))
        }
    }
}

fn create_mailer(config: &AppConfig) -> Arc<dyn Mailer> {
    match config.email.provider.as_str() {
        "http" => {
            info!(api_url = %config.email.api_url, "Using HTTP email API");
            Arc::new(HttpApiMailer::new(
                &config.email.api_url,
                config.email.api_key.clone().unwrap_or_default(),
                &config.email.from,
            ))
        }
        _ => {
            info!("Using log-only mailer (no email leaves the process)");
            Arc::new(TracingMailer::new())
        }
    }
}

fn jwt_secret(config: &AppConfig) -> String {
    config
        .auth
        .jwt_secret
        .clone()
        .or_else(|| std::env::var("JWT_SECRET").ok())
        .unwrap_or_else(|| {
            tracing::warn!(
                "No JWT_SECRET configured. Generating a random secret; \
                 admin sessions will NOT survive a restart."
            );
            generate_random_secret()
        })
}

fn generate_random_secret() -> String {
    use rand::distributions::Alphanumeric;

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}
