mod config;
mod repos;
mod services;
mod system;

pub use config::{Config, NotificationConfig};
pub use repos::{IAppointmentRepo, IReminderRepo, IUserRepo, InsertAppointmentResult, Repos};
pub use services::*;
use std::sync::Arc;
pub use system::{ISys, RealSys, StaticTimeSys};
use tracing::{info, warn};

#[derive(Clone)]
pub struct SalonContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub notifications: Arc<dyn INotificationSender>,
}

struct ContextParams {
    pub postgres_connection_string: Option<String>,
}

fn create_notification_sender(config: &Config) -> anyhow::Result<Arc<dyn INotificationSender>> {
    match &config.notifications.gateway_url {
        Some(url) => {
            info!("Reminders are delivered through the gateway at {}", url);
            let sender = HttpNotificationSender::new(url, &config.notifications, &config.business.name)?;
            Ok(Arc::new(sender))
        }
        None => Ok(Arc::new(LogNotificationSender {})),
    }
}

impl SalonContext {
    async fn create(params: ContextParams) -> anyhow::Result<Self> {
        let repos = match params.postgres_connection_string {
            Some(connection_string) => Repos::create_postgres(&connection_string).await?,
            None => {
                warn!("DATABASE_URL is not set. Falling back to inmemory repositories, data will be lost on restart.");
                Repos::create_inmemory()
            }
        };
        let config = Config::new();
        let notifications = create_notification_sender(&config)?;
        Ok(Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
            notifications,
        })
    }

    /// Context backed by inmemory repositories that only logs notifications
    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            config: Config::new(),
            sys: Arc::new(RealSys {}),
            notifications: Arc::new(LogNotificationSender {}),
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> anyhow::Result<SalonContext> {
    SalonContext::create(ContextParams {
        postgres_connection_string: get_psql_connection_string(),
    })
    .await
}

fn get_psql_connection_string() -> Option<String> {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    std::env::var(PSQL_CONNECTION_STRING)
        .ok()
        .filter(|url| !url.is_empty())
}
