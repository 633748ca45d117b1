use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "skilltrack")]
#[command(version, about = "A personal skill and activity tracker")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the database file
    #[arg(long, global = true, default_value = "skilltrack.db")]
    pub db: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the database schema
    Init,

    /// Manage users
    User(UserCommand),

    /// Run the HTTP API server
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1:8000")]
        bind: String,
    },
}

#[derive(Args, Debug)]
pub struct UserCommand {
    #[command(subcommand)]
    pub action: UserAction,
}

#[derive(Subcommand, Debug)]
pub enum UserAction {
    /// Add a new user
    Add {
        /// Username, unique across the database
        username: String,
    },
}
