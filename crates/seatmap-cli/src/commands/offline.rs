use anyhow::{Context, Result};
use seatmap_core::layout::Scene;
use seatmap_core::reconciliation::compute_diff;
use seatmap_core::table::table_set;
use std::path::Path;

use super::utils::join_ids;

pub fn tables(file: &Path) -> Result<()> {
    let markup = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let scene = Scene::parse(&markup);

    if scene.is_blank() || scene.has_no_tables() {
        println!("There are no tables in this layout");
        return Ok(());
    }
    for region in scene.regions() {
        let marker = if region.is_marked() { " (selected)" } else { "" };
        println!("{}{}", region.id, marker);
    }
    println!("{} tables", scene.region_count());
    Ok(())
}

pub fn diff(selected: &[String], baseline: &[String]) {
    let selected = table_set(selected.iter().map(String::as_str));
    let baseline = table_set(baseline.iter().map(String::as_str));
    let diff = compute_diff(&selected, &baseline);

    if diff.is_empty() {
        println!("No changes");
        return;
    }
    println!("Add:    {}", join_ids(&diff.to_add));
    println!("Remove: {}", join_ids(&diff.to_remove));
}
