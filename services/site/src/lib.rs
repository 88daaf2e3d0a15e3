mod cli;
mod infra;
mod pages;
mod routes;
mod server;
mod verify;

use carbon_intake::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
