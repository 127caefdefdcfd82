//! One-time database bootstrap: creates the users collection with its validator.
//!
//! Usage: `create-db [--schema legacy|api]`
//!
//! Admin credentials come from `MONGODB_ADMIN_USER` / `MONGODB_ADMIN_PASSWORD`
//! (default `root` / `example`), authenticated against the `admin` database.

use std::env;
use std::process::ExitCode;
use users_service::{
    config::Settings,
    database::{
        bootstrap::{create_users_collection, SchemaProfile},
        MongoDB,
    },
    utils::AppError,
};

fn schema_from_args(args: &[String]) -> Result<SchemaProfile, AppError> {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if let Some(value) = arg.strip_prefix("--schema=") {
            return value.parse();
        }
        if arg == "--schema" {
            return iter
                .next()
                .ok_or_else(|| AppError::InvalidRequest("--schema needs a value".into()))?
                .parse();
        }
    }
    Ok(SchemaProfile::default())
}

async fn run() -> Result<(), AppError> {
    let settings = Settings::from_env()?;
    let args: Vec<String> = env::args().skip(1).collect();
    let profile = schema_from_args(&args)?;

    let username = env::var("MONGODB_ADMIN_USER").unwrap_or_else(|_| "root".to_string());
    let password = env::var("MONGODB_ADMIN_PASSWORD").unwrap_or_else(|_| "example".to_string());

    let db = MongoDB::with_admin_credentials(
        &settings.mongodb_uri,
        &settings.database,
        &username,
        &password,
    )
    .await?;

    create_users_collection(&db, &settings.collection, profile).await
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    match run().await {
        Ok(()) => {
            println!("Database and collection created successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("❌ Bootstrap failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_schema_flag_forms() {
        assert_eq!(schema_from_args(&args(&[])).unwrap(), SchemaProfile::Legacy);
        assert_eq!(schema_from_args(&args(&["--schema", "api"])).unwrap(), SchemaProfile::Api);
        assert_eq!(schema_from_args(&args(&["--schema=legacy"])).unwrap(), SchemaProfile::Legacy);
        assert!(schema_from_args(&args(&["--schema"])).is_err());
        assert!(schema_from_args(&args(&["--schema", "v3"])).is_err());
    }
}
