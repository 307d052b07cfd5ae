use crate::render;
use anyhow::Result;
use clap::{Args, Subcommand};
use colored::*;
use domain::{BuildId, BuildUpdate, ComponentId, NewBuild};
use workbench::WorkbenchService;

#[derive(Debug, Args)]
pub struct BuildCommand {
    /// Acting user
    #[arg(long, short, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: BuildSubcommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum BuildSubcommand {
    /// Create an empty build
    #[command(name = "new")]
    New {
        name: String,
        #[arg(long, short)]
        description: Option<String>,
    },
    /// List the user's builds, newest first
    #[command(name = "ls")]
    Ls,
    /// Show the slot layout, advisor output and total price
    #[command(name = "show")]
    Show {
        id: BuildId,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Put a component into a build
    #[command(name = "add")]
    Add { id: BuildId, component: ComponentId },
    /// Take one unit of a component out of a build
    #[command(name = "rm")]
    Rm { id: BuildId, component: ComponentId },
    /// Rename a build or change its description
    #[command(name = "edit")]
    Edit {
        id: BuildId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, short, conflicts_with = "clear_description")]
        description: Option<String>,
        #[arg(long)]
        clear_description: bool,
    },
    /// Delete a build
    #[command(name = "delete")]
    Delete { id: BuildId },
    /// Catalog parts that can still be added
    #[command(name = "available")]
    Available {
        id: BuildId,
        #[arg(long, short)]
        q: Option<String>,
    },
}

impl BuildCommand {
    pub async fn execute(self, svc: &WorkbenchService) -> Result<()> {
        let user = self
            .user
            .ok_or_else(|| anyhow::anyhow!("--user is required for build commands"))?;

        match self.command {
            BuildSubcommand::New { name, description } => {
                let mut build = NewBuild::new(&user, name);
                if let Some(description) = description {
                    build = build.with_description(description);
                }
                let build = svc.create_build(build).await?;
                println!(
                    "{} Build {} created (#{})",
                    "✓".green(),
                    build.name.bold(),
                    build.id
                );
            }
            BuildSubcommand::Ls => {
                let builds = svc.builds_for(&user).await?;
                println!("{} {}", "Σ".yellow(), format!("Builds: {}", builds.len()).bold());
                for build in builds {
                    println!(
                        "  #{:<4} {}  {}",
                        build.id,
                        build.name.bold(),
                        build.created_at.format("%Y-%m-%d %H:%M").to_string().dimmed()
                    );
                }
            }
            BuildSubcommand::Show { id, json } => {
                let summary = svc.build_summary(&user, id).await?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&summary)?);
                } else {
                    render::print_summary(&summary);
                }
            }
            BuildSubcommand::Add { id, component } => {
                let part = svc.component(component).await?;
                let outcome = svc.add_component(&user, id, component).await?;
                println!("{}", render::allocation(&outcome, &part.name));
            }
            BuildSubcommand::Rm { id, component } => {
                let outcome = svc.remove_component(&user, id, component).await?;
                println!("{}", render::removal(&outcome, component));
            }
            BuildSubcommand::Edit {
                id,
                name,
                description,
                clear_description,
            } => {
                let update = BuildUpdate {
                    name,
                    description: if clear_description {
                        Some(None)
                    } else {
                        description.map(Some)
                    },
                };
                let build = svc.update_build(&user, id, update).await?;
                println!("{} Build #{} is now {}", "✓".green(), build.id, build.name.bold());
            }
            BuildSubcommand::Delete { id } => {
                svc.delete_build(&user, id).await?;
                println!("{} Build #{} deleted", "✓".green(), id);
            }
            BuildSubcommand::Available { id, q } => {
                let components = svc.available_components(&user, id, q).await?;
                println!(
                    "{} {}",
                    "Σ".yellow(),
                    format!("Available: {}", components.len()).bold()
                );
                for component in &components {
                    println!(
                        "  {:<12} {}",
                        component.category().to_string(),
                        render::component_line(component)
                    );
                }
            }
        }
        Ok(())
    }
}
