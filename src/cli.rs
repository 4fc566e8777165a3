use clap::{Args, Parser, Subcommand};

use crate::auth::{
    dto::{LoginForm, RegistrationForm},
    error::AuthError,
    session::AuthSession,
};
use crate::state::AppState;

/// Register, log in and out against the local member store.
#[derive(Parser, Debug)]
#[command(name = "member-auth", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an account and log in as it.
    Register(RegisterArgs),
    /// Log in with email and password.
    Login(LoginArgs),
    /// Clear the current session.
    Logout,
    /// Show the logged-in user.
    Whoami,
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[arg(long)]
    pub nickname: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
    #[arg(long)]
    pub password_confirmation: String,
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
}

/// Runs one command and returns what to print on success.
pub async fn execute(command: Command, state: &AppState) -> Result<String, AuthError> {
    let mut session = AuthSession::restore(state.store.clone()).await?;
    match command {
        Command::Register(args) => {
            let user = session
                .register(&RegistrationForm {
                    nickname: args.nickname,
                    email: args.email,
                    password: args.password,
                    password_confirmation: args.password_confirmation,
                })
                .await?;
            Ok(format!("registered {} <{}> (id {})", user.nickname, user.email, user.id))
        }
        Command::Login(args) => {
            let user = session
                .login(&LoginForm {
                    email: args.email,
                    password: args.password,
                })
                .await?;
            Ok(format!("logged in as {} <{}>", user.nickname, user.email))
        }
        Command::Logout => {
            session.logout().await?;
            Ok("logged out".into())
        }
        Command::Whoami => Ok(match session.user() {
            Some(user) => format!("{} <{}> (id {})", user.nickname, user.email, user.id),
            None => "not logged in".into(),
        }),
    }
}

/// One `field: message` line per failing field, otherwise the error message.
pub fn render_error(err: &AuthError) -> String {
    match err {
        AuthError::Validation(v) => v
            .errors()
            .iter()
            .map(|(field, e)| format!("{}: {}", field, e))
            .collect::<Vec<_>>()
            .join("\n"),
        other => match other.field() {
            Some(field) => format!("{}: {}", field, other),
            None => other.to_string(),
        },
    }
}
