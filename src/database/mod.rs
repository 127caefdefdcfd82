pub mod bootstrap;

use crate::utils::AppError;
use mongodb::bson::doc;
use mongodb::options::{ClientOptions, Credential};
use mongodb::{Client, Collection, Database};
use std::time::Duration;

/// MongoDB connection manager
#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    /// Connects to `uri` and verifies the server answers a ping.
    pub async fn new(uri: &str, db_name: &str) -> Result<Self, AppError> {
        let client_options = Self::options(uri).await?;
        Self::connect(client_options, db_name).await
    }

    /// Same as [`MongoDB::new`], authenticating against the `admin` database.
    pub async fn with_admin_credentials(
        uri: &str,
        db_name: &str,
        username: &str,
        password: &str,
    ) -> Result<Self, AppError> {
        let mut client_options = Self::options(uri).await?;
        client_options.credential = Some(
            Credential::builder()
                .username(username.to_string())
                .password(password.to_string())
                .source("admin".to_string())
                .build(),
        );
        Self::connect(client_options, db_name).await
    }

    async fn options(uri: &str) -> Result<ClientOptions, AppError> {
        let mut client_options = ClientOptions::parse(uri).await?;

        // A single service process; no need for a large pool
        client_options.max_pool_size = Some(10);
        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));
        client_options.app_name = Some("users-service".to_string());

        Ok(client_options)
    }

    async fn connect(client_options: ClientOptions, db_name: &str) -> Result<Self, AppError> {
        let client = Client::with_options(client_options)?;
        let db = client.database(db_name);

        let mongodb = Self { db };
        mongodb.ping().await?;

        Ok(mongodb)
    }

    /// Round-trips a `ping` command to the server
    pub async fn ping(&self) -> Result<(), AppError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}
