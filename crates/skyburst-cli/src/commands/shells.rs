//! Shell registry listing

use anyhow::Result;
use serde::Serialize;
use skyburst_shells::{ShellConfig, ShellRegistry};

#[derive(Serialize)]
struct ShellRow<'a> {
    name: &'a str,
    display_name: &'a str,
    particle_count: u32,
    speed: [f32; 2],
}

pub fn run(format: &str) -> Result<()> {
    let registry = ShellRegistry::with_builtins();
    let rows: Vec<ShellRow> = registry
        .entries()
        .map(|entry| {
            let base = ShellConfig::new(&entry.name);
            ShellRow {
                name: &entry.name,
                display_name: &entry.display_name,
                particle_count: base.particle_count,
                speed: [base.speed_min, base.speed_max],
            }
        })
        .collect();

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&rows)?),
        "text" => {
            println!("{:<14} {:<16} {:>6}  speed", "name", "display", "stars");
            for row in &rows {
                println!(
                    "{:<14} {:<16} {:>6}  {:.1}-{:.1}",
                    row.name, row.display_name, row.particle_count, row.speed[0], row.speed[1]
                );
            }
            println!("\n{} shell types (plus \"random\")", rows.len());
        }
        _ => anyhow::bail!("Unknown format: {}", format),
    }

    Ok(())
}
