//! Willowline CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations (app tables + session store)
//! willowline-cli migrate
//!
//! # Create a staff account
//! willowline-cli staff create -e ops@willowline.shop -p <password>
//!
//! # Promote an existing customer to staff
//! willowline-cli staff promote -e kit@example.com
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `staff create` - Create staff accounts
//! - `staff promote` - Promote an existing account to staff

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "willowline-cli")]
#[command(author, version, about = "Willowline CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage staff accounts
    Staff {
        #[command(subcommand)]
        action: StaffAction,
    },
}

#[derive(Subcommand)]
enum StaffAction {
    /// Create a new staff account
    Create {
        /// Staff email address
        #[arg(short, long)]
        email: String,

        /// Initial password (min 8 characters)
        #[arg(short, long)]
        password: String,
    },
    /// Promote an existing account to staff
    Promote {
        /// Email of the account to promote
        #[arg(short, long)]
        email: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Staff { action } => match action {
            StaffAction::Create { email, password } => {
                commands::staff::create(&email, &password).await?;
            }
            StaffAction::Promote { email } => {
                commands::staff::promote(&email).await?;
            }
        },
    }
    Ok(())
}
