//! Terminal rendering of domain values

use colored::*;
use domain::{
    AllocationOutcome, Bottleneck, BottleneckLevel, BuildItem, BuildSummary, Component,
    RemovalOutcome,
};
use rust_decimal::Decimal;

pub fn price(value: Option<Decimal>) -> String {
    match value {
        Some(p) => format!("${:.2}", p),
        None => "n/a".to_string(),
    }
}

/// One catalog row: `#id name (manufacturer)  $price  spec`
pub fn component_line(component: &Component) -> String {
    format!(
        "#{:<4} {} ({})  {}  {}",
        component.id,
        component.name.bold(),
        component.manufacturer,
        price(component.price),
        component.spec.summary().dimmed()
    )
}

fn slot_line(label: &str, item: Option<&BuildItem>) -> String {
    match item {
        Some(item) => format!(
            "  {:<12} {} ({})  {}",
            label,
            item.component.name,
            item.component.manufacturer,
            price(item.component.price)
        ),
        None => format!("  {:<12} {}", label, "- empty -".dimmed()),
    }
}

fn bottleneck_line(bottleneck: &Bottleneck) -> String {
    let tag = match bottleneck.level {
        BottleneckLevel::Major => "major".red().bold(),
        BottleneckLevel::Minor => "minor".yellow(),
        BottleneckLevel::Good => "good".green(),
        BottleneckLevel::Info | BottleneckLevel::None => bottleneck.level.as_str().blue(),
    };
    format!("[{}] {}", tag, bottleneck.message)
}

pub fn print_summary(summary: &BuildSummary) {
    let build = &summary.build;
    println!(
        "{} {} (#{}) by {}",
        "☐".cyan(),
        build.name.bold(),
        build.id,
        build.owner
    );
    if let Some(description) = &build.description {
        println!("  {}", description.italic());
    }
    println!();

    let scaffold = &summary.scaffold;
    println!("{}", slot_line("CPU", scaffold.cpu.as_ref()));
    println!("{}", slot_line("Motherboard", scaffold.motherboard.as_ref()));
    println!("{}", slot_line("GPU", scaffold.gpu.as_ref()));
    for (index, slot) in scaffold.ram.iter().enumerate() {
        println!("{}", slot_line(&format!("RAM {}", index + 1), slot.as_ref()));
    }
    for (index, slot) in scaffold.storage.iter().enumerate() {
        println!("{}", slot_line(&format!("Storage {}", index + 1), slot.as_ref()));
    }
    println!("{}", slot_line("PSU", scaffold.psu.as_ref()));
    println!("{}", slot_line("Case", scaffold.case.as_ref()));
    println!();

    println!("  Bottleneck:  {}", bottleneck_line(&summary.bottleneck));
    println!("  PSU:         {}", summary.psu);
    println!("  Total:       {}", format!("${:.2}", summary.total_price).bold());
}

pub fn allocation(outcome: &AllocationOutcome, name: &str) -> String {
    match outcome {
        AllocationOutcome::Swapped {
            replaced,
            trimmed_ram,
        } => {
            let mut line = format!("{} Installed {}", "✓".green(), name.bold());
            if !replaced.is_empty() {
                line.push_str(&format!(", replaced #{}", join_ids(replaced)));
            }
            let removed: u32 = trimmed_ram.iter().map(|(_, count)| count).sum();
            if removed > 0 {
                line.push_str(&format!(
                    ", {} {} RAM stick(s) no longer fit",
                    "removed".yellow(),
                    removed
                ));
            }
            line
        }
        AllocationOutcome::Stacked { quantity } => {
            format!("{} Added {} (x{})", "✓".green(), name.bold(), quantity)
        }
        AllocationOutcome::CapacityReached { capacity } => format!(
            "{} All {} slots taken, {} not added",
            "ℹ".blue(),
            capacity,
            name
        ),
    }
}

pub fn removal(outcome: &RemovalOutcome, id: i64) -> String {
    match outcome {
        RemovalOutcome::Decremented { remaining } => {
            format!("{} Removed one of #{} ({} left)", "✓".green(), id, remaining)
        }
        RemovalOutcome::Removed => format!("{} Removed #{}", "✓".green(), id),
        RemovalOutcome::NotPresent => format!("{} #{} is not in this build", "ℹ".blue(), id),
    }
}

fn join_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", #")
}
