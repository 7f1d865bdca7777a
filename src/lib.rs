pub mod config;
pub mod error;
pub mod housing;
pub mod routes;
pub mod telemetry;

mod cli;
mod commands;
mod server;

use error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
