mod cli;
mod infra;
mod routes;
mod server;

use freight_backoffice::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
