use db::DbService;

pub mod error;
pub mod http;
pub mod routes;

#[derive(Clone)]
pub struct AppState {
    pub db: DbService,
}
