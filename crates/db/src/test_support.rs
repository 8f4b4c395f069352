use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

/// The external `processos` schema, restated for SQLite so tests can run
/// against `sqlite::memory:`. Production never executes this; the managed
/// backend owns the real table.
const CREATE_PROCESSOS_TABLE: &str = r#"
CREATE TABLE processos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    analista TEXT NOT NULL,
    processo TEXT NOT NULL UNIQUE,
    data_producao TEXT,
    valor_processo REAL NOT NULL,
    total_senhas INTEGER NOT NULL,
    senhas_executadas INTEGER NOT NULL,
    senhas_nao_identificadas INTEGER NOT NULL,
    data_execucao TEXT NOT NULL
)
"#;

/// Connects to an in-memory SQLite database with the `processos` table
/// materialized.
pub async fn connect_memory() -> Result<DatabaseConnection, DbErr> {
    // A single pooled connection keeps every query on the same in-memory
    // database.
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);
    let db = Database::connect(options).await?;
    db.execute_raw(Statement::from_string(
        db.get_database_backend(),
        CREATE_PROCESSOS_TABLE,
    ))
    .await?;
    Ok(db)
}
