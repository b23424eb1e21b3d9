//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use clap::{Parser, Subcommand};

/// Clinic API - accounts, doctor onboarding and approval
#[derive(Parser, Debug)]
#[command(name = "clinic-api")]
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

    /// Manage admin accounts
    Admin(AdminArgs),
}

/// Arguments for the serve command. Unset values fall back to SERVER_HOST/SERVER_PORT.
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Port to listen on
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

/// Arguments for the admin command
#[derive(Parser, Debug)]
pub struct AdminArgs {
    #[command(subcommand)]
    pub action: AdminAction,
}

/// Admin account actions
#[derive(Subcommand, Debug)]
pub enum AdminAction {
    /// Create an approved admin account
    Create {
        /// Login email
        #[arg(long)]
        email: String,
        /// Password (at least 6 characters)
        #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
        /// Display name
        #[arg(long, default_value = "Administrator")]
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_admin_create() {
        let cli = Cli::parse_from([
            "clinic-api",
            "admin",
            "create",
            "--email",
            "root@clinic.com",
            "--password",
            "secret123",
        ]);
        match cli.command {
            Commands::Admin(AdminArgs {
                action: AdminAction::Create { email, name, .. },
            }) => {
                assert_eq!(email, "root@clinic.com");
                assert_eq!(name, "Administrator");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::parse_from(["clinic-api", "-v", "serve", "--port", "8080"]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.port, Some(8080));
                assert!(args.host.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
