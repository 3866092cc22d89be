use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "notedeck", version, about = "Browse grouped study notes and mark table rows")]
pub struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and store the token
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
    /// Forget the stored token
    Logout,
    /// Check whether the stored token is still accepted
    Verify,
    /// List groups with their file counts
    Groups {
        /// Only groups whose name contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show the folder tree of a group
    Tree {
        /// Group slug
        group: String,
    },
    /// Print a file: markdown as text, CSV as one page of the table
    Show {
        group: String,
        path: String,
        #[arg(short, long)]
        search: Option<String>,
        /// "all" or a marking name
        #[arg(short, long)]
        filter: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// 10, 25, 50 or 100
        #[arg(long)]
        per_page: Option<usize>,
        /// Print the file content without rendering
        #[arg(long)]
        raw: bool,
    },
    /// Open a CSV file interactively (type `help` once open)
    Open { group: String, path: String },
}
