use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::{AccessProfile, Page};
use crate::policy::ProfileSource;

/// The config struct for the MongoDB profile source.
#[derive(Deserialize, Serialize, JsonSchema, Debug)]
pub struct MongoDBSourceConfig {
    pub name: String,
    pub uri: String,
    pub database: String,
}

/// A `ProfileSource` backed by a MongoDB `profiles` collection, written by
/// the admin page-assignment UI.
pub struct MongoDBSource {
    name: String,
    profile_collection: Collection<ProfileDocument>,
}

/// Document shape for stored profiles.
#[derive(Serialize, Deserialize, Clone, Debug)]
struct ProfileDocument {
    identity_id: String,
    #[serde(default)]
    is_master: bool,
    #[serde(default)]
    allowed_pages: Vec<Page>,
}

impl MongoDBSource {
    /// Creates a new `MongoDBSource` from the given config.
    pub async fn new(config: &MongoDBSourceConfig) -> Result<Self, String> {
        info!("Connecting to MongoDB at URI: {}", config.uri);

        let mut client_options = ClientOptions::parse(&config.uri)
            .await
            .map_err(|e| format!("Failed to parse MongoDB URI: {}", e))?;

        client_options.app_name = Some("sessiongate".to_string());

        let client = Client::with_options(client_options)
            .map_err(|e| format!("Failed to create MongoDB client: {}", e))?;

        let database = client.database(&config.database);
        let profile_collection = database.collection::<ProfileDocument>("profiles");

        Ok(Self {
            name: config.name.clone(),
            profile_collection,
        })
    }

    fn doc_to_profile(doc: &ProfileDocument) -> AccessProfile {
        AccessProfile {
            is_master: doc.is_master,
            allowed_pages: doc.allowed_pages.clone(),
        }
    }
}

#[async_trait]
impl ProfileSource for MongoDBSource {
    fn get_name(&self) -> &str {
        &self.name
    }

    fn get_type(&self) -> &str {
        "mongo"
    }

    /// Look up the profile document for an identity. A missing document is
    /// the locked profile; only transport failures are errors.
    async fn fetch_profile(&self, identity_id: &str) -> Result<AccessProfile, String> {
        let found = self
            .profile_collection
            .find_one(doc! { "identity_id": identity_id }, None)
            .await
            .map_err(|e| format!("Failed to query profile: {}", e))?;

        match found {
            Some(doc) => {
                debug!("Profile document found for '{}'", identity_id);
                Ok(Self::doc_to_profile(&doc))
            }
            None => {
                debug!("No profile document for '{}'", identity_id);
                Ok(AccessProfile::locked())
            }
        }
    }
}
