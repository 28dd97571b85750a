//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use clap::{Args, Parser, Subcommand};

/// User administration server and maintenance tasks
#[derive(Parser, Debug)]
#[command(name = "user-admin")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),

    /// Manage user accounts
    Users(UsersArgs),
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host to bind to (defaults to SERVER_HOST)
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Port to listen on (defaults to SERVER_PORT)
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

/// Migration actions
#[derive(Subcommand, Debug)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset and re-run all migrations
    Fresh,
}

/// Arguments for the users command
#[derive(Parser, Debug)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub action: UsersAction,
}

/// User account actions
#[derive(Subcommand, Debug)]
pub enum UsersAction {
    /// Create a user account
    Create(CreateUserArgs),
    /// Mark a user's email address as verified
    Verify {
        /// Email of the account
        #[arg(long)]
        email: String,
    },
}

#[derive(Args, Debug)]
pub struct CreateUserArgs {
    /// Display name
    #[arg(long)]
    pub name: String,

    /// Email address (must be unused)
    #[arg(long)]
    pub email: String,

    /// Plain password, at least 8 characters
    #[arg(long, env = "USER_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Mark the email as verified right away
    #[arg(long)]
    pub verified: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_users_create() {
        let cli = Cli::parse_from([
            "user-admin",
            "users",
            "create",
            "--name",
            "Admin",
            "--email",
            "admin@example.com",
            "--password",
            "password123",
            "--verified",
        ]);

        match cli.command {
            Commands::Users(UsersArgs {
                action: UsersAction::Create(args),
            }) => {
                assert_eq!(args.email, "admin@example.com");
                assert!(args.verified);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn serve_overrides_are_optional() {
        let cli = Cli::parse_from(["user-admin", "serve", "--port", "8080"]);

        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.port, Some(8080));
                assert!(args.host.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
