//! Connection settings and client construction.

use crate::error::MongoDBDatagenError;
use bson::doc;
use mongodb::options::{ClientOptions, Credential};
use mongodb::Client;
use tracing::{debug, info};

/// Where and how to connect.
#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 27017,
            username: None,
            password: None,
        }
    }
}

impl ConnectionSettings {
    /// Connection string without credentials.
    pub fn uri(&self) -> String {
        format!("mongodb://{}:{}", self.host, self.port)
    }

    /// Connection string safe to print: the password, if any, is masked.
    pub fn display_uri(&self) -> String {
        match (&self.username, &self.password) {
            (Some(user), Some(_)) => format!("mongodb://{user}:***@{}:{}", self.host, self.port),
            (Some(user), None) => format!("mongodb://{user}@{}:{}", self.host, self.port),
            _ => self.uri(),
        }
    }

    /// Build client options, with credentials passed separately so that
    /// they never need escaping inside the connection string.
    pub async fn client_options(&self) -> Result<ClientOptions, MongoDBDatagenError> {
        let mut options = ClientOptions::parse(self.uri()).await?;
        if let Some(username) = &self.username {
            options.credential = Some(
                Credential::builder()
                    .username(username.clone())
                    .password(self.password.clone())
                    .build(),
            );
        }
        options.app_name = Some("datagen".to_string());
        Ok(options)
    }
}

/// Connect to the server and log what we are talking to.
///
/// `buildInfo` has to succeed; `listShards` only works against a mongos and
/// its failure is ignored.
pub async fn connect(settings: &ConnectionSettings) -> Result<Client, MongoDBDatagenError> {
    info!("Connecting to {}", settings.display_uri());

    let client = Client::with_options(settings.client_options().await?)?;
    let admin = client.database("admin");

    let build_info = admin.run_command(doc! { "buildInfo": 1 }).await?;
    let version = build_info.get_str("version").unwrap_or("unknown");
    info!("Connected to MongoDB {version}");

    match admin.run_command(doc! { "listShards": 1 }).await {
        Ok(reply) => {
            if let Ok(shards) = reply.get_array("shards") {
                let names: Vec<String> = shards
                    .iter()
                    .filter_map(|s| s.as_document())
                    .filter_map(|s| s.get_str("_id").ok())
                    .map(str::to_string)
                    .collect();
                info!("Shards: {}", names.join(", "));
            }
        }
        Err(e) => debug!("listShards unavailable, assuming unsharded deployment: {e}"),
    }

    Ok(client)
}
