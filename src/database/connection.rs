use sea_orm::{Database, DatabaseConnection, DbErr};

pub const DEFAULT_DATABASE: &str = "product_attributes.db";

pub async fn establish_connection(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// `:memory:` maps to an in-memory database; file databases are created on first use
pub fn get_database_url(database_path: Option<&str>) -> String {
    match database_path {
        Some(":memory:") => "sqlite::memory:".to_string(),
        Some(path) => format!("sqlite:{}?mode=rwc", path),
        None => format!("sqlite:{}?mode=rwc", DEFAULT_DATABASE),
    }
}
