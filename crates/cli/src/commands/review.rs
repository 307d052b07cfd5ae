use anyhow::Result;
use clap::{Args, Subcommand};
use colored::*;
use domain::ComponentId;
use workbench::WorkbenchService;

#[derive(Debug, Args)]
pub struct ReviewCommand {
    #[command(subcommand)]
    command: ReviewSubcommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ReviewSubcommand {
    /// Rate a component from 1 to 5 stars (one review per user and component)
    #[command(name = "post")]
    Post {
        #[arg(long, short)]
        user: String,
        component: ComponentId,
        stars: u8,
        text: String,
    },
    /// List the reviews of a component, newest first
    #[command(name = "ls")]
    Ls { component: ComponentId },
}

impl ReviewCommand {
    pub async fn execute(self, svc: &WorkbenchService) -> Result<()> {
        match self.command {
            ReviewSubcommand::Post {
                user,
                component,
                stars,
                text,
            } => {
                let review = svc.post_review(&user, component, stars, &text).await?;
                println!(
                    "{} Review #{} posted ({})",
                    "✓".green(),
                    review.id,
                    review.rating
                );
            }
            ReviewSubcommand::Ls { component } => {
                let summary = svc.component_reviews(component).await?;
                let average = summary
                    .average_rating()
                    .map(|avg| format!("{avg:.1}"))
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{} {} ({} reviews, avg {})",
                    "Σ".yellow(),
                    summary.component.name.bold(),
                    summary.reviews.len(),
                    average
                );
                for review in &summary.reviews {
                    println!(
                        "  {} {}  {}",
                        "★".repeat(review.rating.stars() as usize).yellow(),
                        review.author_label().bold(),
                        review.posted_at.format("%Y-%m-%d").to_string().dimmed()
                    );
                    println!("    {}", review.text);
                }
            }
        }
        Ok(())
    }
}
