use crate::render;
use anyhow::Result;
use clap::{Args, Subcommand};
use colored::*;
use domain::ComponentId;
use workbench::WorkbenchService;

#[derive(Debug, Args)]
pub struct WishlistCommand {
    /// Wishlist owner
    #[arg(long, short, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: WishlistSubcommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum WishlistSubcommand {
    #[command(name = "add")]
    Add { component: ComponentId },
    #[command(name = "rm")]
    Rm { component: ComponentId },
    #[command(name = "ls")]
    Ls,
}

impl WishlistCommand {
    pub async fn execute(self, svc: &WorkbenchService) -> Result<()> {
        let user = self
            .user
            .ok_or_else(|| anyhow::anyhow!("--user is required for wishlist commands"))?;

        match self.command {
            WishlistSubcommand::Add { component } => {
                if svc.wishlist_add(&user, component).await? {
                    println!("{} #{} added to wishlist", "✓".green(), component);
                } else {
                    println!("{} #{} is already on the wishlist", "ℹ".blue(), component);
                }
            }
            WishlistSubcommand::Rm { component } => {
                if svc.wishlist_remove(&user, component).await? {
                    println!("{} #{} removed from wishlist", "✓".green(), component);
                } else {
                    println!("{} #{} was not on the wishlist", "ℹ".blue(), component);
                }
            }
            WishlistSubcommand::Ls => {
                let items = svc.wishlist(&user).await?;
                println!("{} {}", "Σ".yellow(), format!("Wishlist: {}", items.len()).bold());
                for item in &items {
                    println!(
                        "  {:<12} {}",
                        item.component.category().to_string(),
                        render::component_line(&item.component)
                    );
                }
            }
        }
        Ok(())
    }
}
