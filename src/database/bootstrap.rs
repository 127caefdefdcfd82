// ==================== DATABASE BOOTSTRAP ====================
// One-time setup: creates the users collection with a $jsonSchema validator.
// Meant to run once per environment, not on every service start.

use super::MongoDB;
use crate::utils::AppError;
use mongodb::bson::{doc, Document};
use std::str::FromStr;

/// Loose email shape: text@text.text
pub const EMAIL_PATTERN: &str = r"^.+@.+\..+$";

/// Which document shape the validator enforces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaProfile {
    /// `name` + `email` required (the historical validator)
    #[default]
    Legacy,
    /// Only `email` required; types the searchable fields the API writes
    Api,
}

impl FromStr for SchemaProfile {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(SchemaProfile::Legacy),
            "api" => Ok(SchemaProfile::Api),
            other => Err(AppError::InvalidRequest(format!(
                "unknown schema profile '{}', expected 'legacy' or 'api'",
                other
            ))),
        }
    }
}

fn email_property() -> Document {
    doc! {
        "bsonType": "string",
        "pattern": EMAIL_PATTERN,
        "description": "must be a valid email and is required",
    }
}

/// `$jsonSchema` validator for the given profile
pub fn validator(profile: SchemaProfile) -> Document {
    let schema = match profile {
        SchemaProfile::Legacy => doc! {
            "bsonType": "object",
            "required": ["name", "email"],
            "properties": {
                "name": {
                    "bsonType": "string",
                    "description": "must be a string and is required",
                },
                "email": email_property(),
            },
        },
        SchemaProfile::Api => doc! {
            "bsonType": "object",
            "required": ["email"],
            "properties": {
                "first_name": { "bsonType": ["string", "null"] },
                "last_name": { "bsonType": ["string", "null"] },
                "email": email_property(),
            },
        },
    };

    doc! { "$jsonSchema": schema }
}

/// Creates `collection` (uncapped) with the validator attached.
/// Fails if the collection already exists.
pub async fn create_users_collection(
    db: &MongoDB,
    collection: &str,
    profile: SchemaProfile,
) -> Result<(), AppError> {
    log::info!(
        "🔧 Creating collection {}.{} ({:?} schema)",
        db.database().name(),
        collection,
        profile
    );

    db.database()
        .create_collection(collection)
        .capped(false)
        .validator(validator(profile))
        .await?;

    log::info!("✅ Collection {} created", collection);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::Bson;

    fn required(validator: &Document) -> Vec<String> {
        validator
            .get_document("$jsonSchema")
            .unwrap()
            .get_array("required")
            .unwrap()
            .iter()
            .filter_map(Bson::as_str)
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_legacy_validator_requires_name_and_email() {
        let v = validator(SchemaProfile::Legacy);
        assert_eq!(required(&v), vec!["name", "email"]);

        let email = v
            .get_document("$jsonSchema")
            .unwrap()
            .get_document("properties")
            .unwrap()
            .get_document("email")
            .unwrap();
        assert_eq!(email.get_str("pattern").unwrap(), EMAIL_PATTERN);
    }

    #[test]
    fn test_api_validator_requires_only_email() {
        let v = validator(SchemaProfile::Api);
        assert_eq!(required(&v), vec!["email"]);

        let props = v
            .get_document("$jsonSchema")
            .unwrap()
            .get_document("properties")
            .unwrap();
        assert!(props.contains_key("first_name"));
        assert!(!props.contains_key("name"));
        // Free-form fields stay untyped
        assert!(!props.contains_key("gender"));
        assert!(!props.contains_key("married_status"));
    }

    #[test]
    fn test_profile_parsing() {
        assert_eq!("legacy".parse::<SchemaProfile>().unwrap(), SchemaProfile::Legacy);
        assert_eq!(" API ".parse::<SchemaProfile>().unwrap(), SchemaProfile::Api);
        assert!("v2".parse::<SchemaProfile>().is_err());
        assert_eq!(SchemaProfile::default(), SchemaProfile::Legacy);
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB with root/example credentials
    async fn test_create_collection_twice_fails() {
        let db = MongoDB::with_admin_credentials(
            crate::config::DEFAULT_MONGODB_URI,
            "bootstrap-test",
            "root",
            "example",
        )
        .await
        .unwrap();
        let _ = db.collection::<Document>("users").drop().await;

        assert!(create_users_collection(&db, "users", SchemaProfile::Api).await.is_ok());
        assert!(create_users_collection(&db, "users", SchemaProfile::Api).await.is_err());

        db.database().drop().await.unwrap();
    }
}
