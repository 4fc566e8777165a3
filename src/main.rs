use std::process::ExitCode;

use clap::Parser;
use member_auth::{
    cli::{execute, render_error, Cli},
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "member_auth=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let cli = Cli::parse();
    let app_state = AppState::init()?;

    match execute(cli.command, &app_state).await {
        Ok(out) => {
            println!("{}", out);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("{}", render_error(&e));
            Ok(ExitCode::FAILURE)
        }
    }
}
