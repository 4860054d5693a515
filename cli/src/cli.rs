use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "players")]
#[command(about = "Command-line client for the Player Registry", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Override the registry API URL (falls back to PLAYERS_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch an admin token and store it for later commands
    Login,
    /// Forget the stored token
    Logout,
    /// List players, optionally filtered
    List {
        /// Only players from this club
        #[arg(long)]
        club: Option<String>,
        /// Only players with at least this many goals (ignored when --club is set)
        #[arg(long)]
        min_goals: Option<i64>,
        /// Print the raw XML document instead of a table
        #[arg(long)]
        xml: bool,
    },
    /// Add a player
    Create {
        name: String,
        club: String,
        position: String,
        goals: i64,
        assists: i64,
        appearances: i64,
    },
    /// Change some fields of a player
    Update {
        id: i64,
        #[command(flatten)]
        fields: UpdateFields,
    },
    /// Remove a player
    Delete { id: i64 },
    /// Run login, list, create, update and delete against a live server
    Demo,
}

#[derive(Args, Debug, Default)]
pub struct UpdateFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub club: Option<String>,
    #[arg(long)]
    pub position: Option<String>,
    #[arg(long)]
    pub goals: Option<i64>,
    #[arg(long)]
    pub assists: Option<i64>,
    #[arg(long)]
    pub appearances: Option<i64>,
}
