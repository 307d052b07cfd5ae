use anyhow::Result;
use clap::{Args, Subcommand};
use colored::*;
use domain::{ListingId, ListingStatus, NewListing};
use workbench::WorkbenchService;

#[derive(Debug, Args)]
pub struct MarketCommand {
    #[command(subcommand)]
    command: MarketSubcommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum MarketSubcommand {
    /// Listings still for sale, newest first
    #[command(name = "ls")]
    Ls,
    /// Offer something for sale
    #[command(name = "post")]
    Post {
        #[arg(long, short)]
        user: String,
        title: String,
        #[arg(long, short, default_value = "")]
        description: String,
    },
    /// Show a listing and its comments
    #[command(name = "show")]
    Show { id: ListingId },
    /// Comment on a listing
    #[command(name = "comment")]
    Comment {
        #[arg(long, short)]
        user: String,
        id: ListingId,
        text: String,
    },
    /// Close a listing (seller only)
    #[command(name = "sold")]
    Sold {
        #[arg(long, short)]
        user: String,
        id: ListingId,
    },
}

impl MarketCommand {
    pub async fn execute(self, svc: &WorkbenchService) -> Result<()> {
        match self.command {
            MarketSubcommand::Ls => {
                let listings = svc.listings().await?;
                println!("{} {}", "Σ".yellow(), format!("Listings: {}", listings.len()).bold());
                for listing in &listings {
                    println!(
                        "  #{:<4} {}  by {}  {}",
                        listing.id,
                        listing.title.bold(),
                        listing.seller,
                        listing.listed_at.format("%Y-%m-%d").to_string().dimmed()
                    );
                }
            }
            MarketSubcommand::Post {
                user,
                title,
                description,
            } => {
                let listing = svc
                    .post_listing(NewListing {
                        seller: user,
                        title,
                        description,
                    })
                    .await?;
                println!(
                    "{} Listing {} posted (#{})",
                    "✓".green(),
                    listing.title.bold(),
                    listing.id
                );
            }
            MarketSubcommand::Show { id } => {
                let detail = svc.listing(id).await?;
                let listing = &detail.listing;
                let status = match listing.status {
                    ListingStatus::Available => listing.status.as_str().green(),
                    ListingStatus::Sold => listing.status.as_str().red(),
                };
                println!(
                    "{} {} [{}] by {}",
                    "☐".cyan(),
                    listing.title.bold(),
                    status,
                    listing.seller
                );
                if !listing.description.is_empty() {
                    println!("  {}", listing.description);
                }
                for comment in &detail.comments {
                    println!(
                        "  - {} {}: {}",
                        comment.posted_at.format("%Y-%m-%d %H:%M").to_string().dimmed(),
                        comment.author.bold(),
                        comment.text
                    );
                }
            }
            MarketSubcommand::Comment { user, id, text } => {
                let comment = svc.comment(&user, id, &text).await?;
                println!("{} Comment #{} added to listing #{}", "✓".green(), comment.id, id);
            }
            MarketSubcommand::Sold { user, id } => {
                let listing = svc.mark_sold(&user, id).await?;
                println!("{} Listing #{} marked {}", "✓".green(), listing.id, listing.status);
            }
        }
        Ok(())
    }
}
