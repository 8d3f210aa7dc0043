mod cli;
mod demo;
mod infra;
mod routes;
mod server;
mod sessions;

use jobportal::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
