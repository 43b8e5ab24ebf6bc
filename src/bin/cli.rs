use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    detail_ops::cli::run().await
}
