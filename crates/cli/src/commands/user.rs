use anyhow::Result;
use clap::{Args, Subcommand};
use colored::*;
use workbench::WorkbenchService;

#[derive(Debug, Args)]
pub struct UserCommand {
    #[command(subcommand)]
    command: UserSubcommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum UserSubcommand {
    /// Register a user
    #[command(name = "add")]
    Add {
        username: String,
        #[arg(long)]
        bio: Option<String>,
    },
    /// Delete a user with their builds, wishlist and listings
    #[command(name = "rm")]
    Rm { username: String },
    /// Show a user profile
    #[command(name = "show")]
    Show { username: String },
}

impl UserCommand {
    pub async fn execute(self, svc: &WorkbenchService) -> Result<()> {
        match self.command {
            UserSubcommand::Add { username, bio } => {
                let user = svc.create_user(&username, bio).await?;
                println!("{} User {} created", "✓".green(), user.username.bold());
            }
            UserSubcommand::Rm { username } => {
                svc.delete_user(&username).await?;
                println!("{} User {} deleted", "✓".green(), username.bold());
            }
            UserSubcommand::Show { username } => {
                let user = svc.user(&username).await?;
                let builds = svc.builds_for(&username).await?;
                let wishlist = svc.wishlist(&username).await?;

                println!("{} {}", "☺".cyan(), user.username.bold());
                if let Some(bio) = &user.bio {
                    println!("  {}", bio.italic());
                }
                println!("  joined:   {}", user.joined_at.format("%Y-%m-%d"));
                println!("  builds:   {}", builds.len());
                println!("  wishlist: {}", wishlist.len());
            }
        }
        Ok(())
    }
}
