use std::sync::Arc;

use crate::{config::Config, database::Database, error::AppError, mail::Mailer};

pub struct State {
    pub config: Config,
    pub database: Database,
    pub mailer: Mailer,
}

impl State {
    pub async fn new(config: Config) -> Result<Arc<Self>, AppError> {
        let database = Database::connect(config.redis_url.as_deref()).await?;
        let mailer = Mailer::spawn(config.mail.clone());

        Ok(State::with_parts(config, database, mailer))
    }

    pub fn with_parts(config: Config, database: Database, mailer: Mailer) -> Arc<Self> {
        Arc::new(Self {
            config,
            database,
            mailer,
        })
    }
}
