use sea_orm::Database;

pub use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr};

pub mod entities;
pub mod models;
pub mod test_support;

#[derive(Clone)]
pub struct DbService {
    pub conn: DatabaseConnection,
}

impl DbService {
    /// Connects to the managed backend named by `DATABASE_URL`.
    ///
    /// The `processos` schema (including the unique constraint on `processo`)
    /// is owned by the backend; no migrations run from here.
    pub async fn new() -> Result<DbService, DbErr> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| DbErr::Custom("DATABASE_URL is not set".to_string()))?;
        let conn = Database::connect(database_url).await?;
        Ok(DbService { conn })
    }

    pub fn from_connection(conn: DatabaseConnection) -> DbService {
        DbService { conn }
    }
}
