use crate::render;
use anyhow::Result;
use clap::{Args, Subcommand};
use colored::*;
use domain::{CatalogQuery, ComponentCategory, ComponentId, SortOrder};
use std::path::PathBuf;
use workbench::WorkbenchService;

#[derive(Debug, Args)]
pub struct CatalogCommand {
    #[command(subcommand)]
    command: CatalogSubcommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum CatalogSubcommand {
    /// Load the demonstration catalog
    #[command(name = "seed")]
    Seed {
        /// Delete every component first (also empties builds, reviews and wishlists)
        #[arg(long)]
        reset: bool,
    },
    /// Import a JSON array of components into one category
    #[command(name = "import")]
    Import {
        category: ComponentCategory,
        file: PathBuf,
    },
    /// List components of a category
    #[command(name = "list")]
    List {
        category: ComponentCategory,
        /// Case-insensitive match on name or manufacturer
        #[arg(long, short)]
        q: Option<String>,
        /// name, price_asc or price_desc
        #[arg(long, default_value = "name")]
        sort: SortOrder,
    },
    /// Show one component with its reviews
    #[command(name = "show")]
    Show { id: ComponentId },
}

impl CatalogCommand {
    pub async fn execute(self, svc: &WorkbenchService) -> Result<()> {
        match self.command {
            CatalogSubcommand::Seed { reset } => {
                let report = svc.seed(reset).await?;
                println!(
                    "{} Catalog seeded: {} created, {} updated",
                    "✓".green(),
                    report.created,
                    report.updated
                );
            }
            CatalogSubcommand::Import { category, file } => {
                let report = svc.import_file(category, &file).await?;
                println!(
                    "{} {} import: {} created, {} updated, {} skipped",
                    "✓".green(),
                    category,
                    report.created,
                    report.updated,
                    report.skipped
                );
                for (name, reason) in &report.failed {
                    println!("  {} {}: {}", "✗".red(), name, reason);
                }
            }
            CatalogSubcommand::List { category, q, sort } => {
                let mut query = CatalogQuery::category(category).sorted_by(sort);
                if let Some(term) = q {
                    query = query.with_search(term);
                }
                let components = svc.list_components(&query).await?;
                println!(
                    "{} {}",
                    "Σ".yellow(),
                    format!("{} ({})", category, components.len()).bold()
                );
                for component in &components {
                    println!("  {}", render::component_line(component));
                }
            }
            CatalogSubcommand::Show { id } => {
                let summary = svc.component_reviews(id).await?;
                let c = &summary.component;

                println!("{} {}", "☐".cyan(), c.display_name().bold());
                println!("  id:       {}", c.id);
                println!("  category: {}", c.category());
                println!("  price:    {}", render::price(c.price));
                if let Some(tdp) = c.tdp {
                    println!("  tdp:      {} W", tdp);
                }
                if let Some(tier) = c.performance_tier {
                    println!("  tier:     {}", tier);
                }
                println!("  spec:     {}", c.spec.summary());

                match summary.average_rating() {
                    Some(avg) => println!(
                        "  rating:   {:.1} / 5 ({} reviews)",
                        avg,
                        summary.reviews.len()
                    ),
                    None => println!("  rating:   {}", "no reviews yet".dimmed()),
                }
                for review in &summary.reviews {
                    println!(
                        "  - {} {}: {}",
                        review.rating.to_string().yellow(),
                        review.author_label().bold(),
                        review.text
                    );
                }
            }
        }
        Ok(())
    }
}
