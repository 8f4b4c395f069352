pub mod health;
pub mod processos;
