use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "folio-admin")]
#[command(about = "Manage the portfolio profile and projects")]
pub struct Cli {
    /// Debug-level logging for the folio crates
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and remember the session
    Login {
        #[arg(short, long)]
        email: String,
        /// Falls back to FOLIO_PASSWORD
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Sign out and forget the session
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Dashboard figures
    Stats,
    #[command(subcommand)]
    Profile(ProfileCommand),
    #[command(subcommand)]
    Projects(ProjectCommand),
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// Print the stored profile
    Show,
    /// Change profile fields; unspecified fields keep their value
    Set(ProfileArgs),
}

#[derive(Args, Debug, Default)]
pub struct ProfileArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub role: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// Replaces the service list (repeatable)
    #[arg(long = "service")]
    pub services: Vec<String>,
    /// Replaces the skill list (repeatable)
    #[arg(long = "skill")]
    pub skills: Vec<String>,
    #[arg(long)]
    pub whatsapp: Option<String>,
    #[arg(long)]
    pub instagram: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    /// List projects, newest first
    List,
    /// Create a project; an image is required
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        demo_url: String,
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long)]
        image: PathBuf,
    },
    /// Edit a project; unspecified fields keep their value
    Update {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        demo_url: Option<String>,
        /// Add a tag (repeatable)
        #[arg(long = "tag")]
        add_tags: Vec<String>,
        /// Remove a tag (repeatable)
        #[arg(long = "untag")]
        remove_tags: Vec<String>,
        /// Replace the image
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Delete a project and its image
    Delete { id: i64 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_project_add() {
        let cli = Cli::try_parse_from([
            "folio-admin",
            "projects",
            "add",
            "--title",
            "Site",
            "--description",
            "x",
            "--demo-url",
            "https://x.com",
            "--tag",
            "rust",
            "--tag",
            "web",
            "--image",
            "shot.png",
        ])
        .unwrap();

        match cli.command {
            Command::Projects(ProjectCommand::Add { tags, image, .. }) => {
                assert_eq!(tags, vec!["rust", "web"]);
                assert_eq!(image, PathBuf::from("shot.png"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_json_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["folio-admin", "projects", "list", "--json"]).unwrap();
        assert!(cli.json);
    }
}
