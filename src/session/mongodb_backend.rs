use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::{ClientOptions, IndexOptions, ReplaceOptions};
use mongodb::{Client, Collection, IndexModel};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::SessionBackend;
use crate::models::Session;

fn default_instance() -> String {
    "primary".to_string()
}

/// The config struct for the MongoDB session backend.
#[derive(Deserialize, Serialize, JsonSchema, Debug)]
pub struct MongoDBBackendConfig {
    pub uri: String,
    pub database: String,
    /// Key separating current-session documents of distinct app instances
    /// sharing one database.
    #[serde(default = "default_instance")]
    pub instance: String,
}

/// A `SessionBackend` that keeps the current session in a MongoDB
/// collection, one document per app instance.
pub struct MongoDBBackend {
    session_collection: Collection<SessionDocument>,
    instance: String,
}

/// Document shape for the current session of one app instance.
#[derive(Serialize, Deserialize, Clone, Debug)]
struct SessionDocument {
    _id: ObjectId,
    instance: String,
    session: Session,
}

impl MongoDBBackend {
    /// Creates a new `MongoDBBackend` from the given config.
    /// It initializes the client connection and sets up indexes.
    pub async fn new(config: &MongoDBBackendConfig) -> Result<Self, String> {
        info!("Connecting to MongoDB at URI: {}", config.uri);

        let mut client_options = ClientOptions::parse(&config.uri)
            .await
            .map_err(|e| format!("Failed to parse MongoDB URI: {}", e))?;

        client_options.app_name = Some("sessiongate".to_string());

        let client = Client::with_options(client_options)
            .map_err(|e| format!("Failed to create MongoDB client: {}", e))?;

        info!("MongoDB connection established successfully.");

        let database = client.database(&config.database);
        let session_collection = database.collection::<SessionDocument>("sessions");

        // One current-session document per instance key
        let mut unique_on_instance = IndexModel::default();
        unique_on_instance.keys = doc! { "instance": 1 };
        unique_on_instance.options = Some(IndexOptions::builder().unique(true).build());

        session_collection
            .create_index(unique_on_instance, None)
            .await
            .map_err(|e| format!("Failed to create unique index on instance: {}", e))?;

        Ok(Self {
            session_collection,
            instance: config.instance.clone(),
        })
    }

    fn session_to_doc(&self, session: &Session) -> SessionDocument {
        SessionDocument {
            _id: ObjectId::new(),
            instance: self.instance.clone(),
            session: session.clone(),
        }
    }
}

#[async_trait]
impl SessionBackend for MongoDBBackend {
    /// Upserts the current session for this instance.
    async fn save(&self, session: &Session) -> Result<(), String> {
        let doc = self.session_to_doc(session);
        self.session_collection
            .replace_one(
                doc! { "instance": &self.instance },
                doc,
                ReplaceOptions::builder().upsert(true).build(),
            )
            .await
            .map_err(|e| format!("Failed to persist session: {}", e))?;
        Ok(())
    }

    /// Loads the persisted session for this instance, if any.
    async fn load(&self) -> Result<Option<Session>, String> {
        let found = self
            .session_collection
            .find_one(doc! { "instance": &self.instance }, None)
            .await
            .map_err(|e| format!("Failed to query session: {}", e))?;

        match found {
            Some(doc) => {
                debug!("Persisted session found for instance '{}'", self.instance);
                Ok(Some(doc.session))
            }
            None => Ok(None),
        }
    }

    /// Removes the persisted session for this instance.
    async fn clear(&self) -> Result<(), String> {
        self.session_collection
            .delete_one(doc! { "instance": &self.instance }, None)
            .await
            .map_err(|e| format!("Failed to delete session: {}", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::providers::{Format, Yaml};
    use figment::Figment;

    /// The instance key defaults when the config omits it.
    #[test]
    fn test_config_instance_default() {
        let config_str = r#"
uri: mongodb://localhost:27017
database: sessiongate
"#;
        let config: MongoDBBackendConfig = Figment::new()
            .merge(Yaml::string(config_str))
            .extract()
            .expect("config should parse");
        assert_eq!(config.instance, "primary");
    }

    #[test]
    fn test_config_instance_override() {
        let config_str = r#"
uri: mongodb://localhost:27017
database: sessiongate
instance: plant-7
"#;
        let config: MongoDBBackendConfig = Figment::new()
            .merge(Yaml::string(config_str))
            .extract()
            .expect("config should parse");
        assert_eq!(config.instance, "plant-7");
    }
}
