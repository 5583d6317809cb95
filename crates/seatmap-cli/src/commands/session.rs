use anyhow::{Context, Result, bail};
use seatmap_application::{SaveOutcome, SessionViewUseCase};
use seatmap_core::selection::ToggleOutcome;
use seatmap_core::table::table_set;
use seatmap_core::ViewStatus;
use std::path::Path;

use super::utils::{build_usecase, print_snapshot, read_config};

async fn open(config: Option<&Path>, session_id: &str) -> Result<SessionViewUseCase> {
    let usecase = build_usecase(read_config(config)?);
    let snapshot = usecase.open(session_id).await;
    if let ViewStatus::LoadFailed(reason) = &snapshot.status {
        bail!("Could not load session {}: {}", session_id, reason);
    }
    Ok(usecase)
}

pub async fn show(config: Option<&Path>, session_id: &str, json: bool) -> Result<()> {
    let usecase = open(config, session_id).await?;
    let snapshot = usecase.snapshot().await;
    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print_snapshot(session_id, &snapshot);
    }
    Ok(())
}

pub async fn render(config: Option<&Path>, session_id: &str, output: Option<&Path>) -> Result<()> {
    let usecase = open(config, session_id).await?;
    let Some(svg) = usecase.render().await? else {
        bail!("There are no tables in this layout");
    };
    match output {
        Some(path) => {
            std::fs::write(path, svg)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
        }
        None => println!("{}", svg),
    }
    Ok(())
}

pub async fn select(config: Option<&Path>, session_id: &str, tables: &[String]) -> Result<()> {
    let usecase = open(config, session_id).await?;
    let target = table_set(tables.iter().map(String::as_str));
    let snapshot = usecase.snapshot().await;
    if snapshot.ended {
        bail!("Session {} has ended", session_id);
    }

    // Toggle the symmetric difference so the selection ends up equal to `target`.
    let current = table_set(snapshot.selected.iter().cloned());
    for id in current.symmetric_difference(&target) {
        if usecase.toggle(id).await == ToggleOutcome::Ignored {
            tracing::warn!("Table {} is not part of this layout, skipping", id);
        }
    }

    match usecase.save().await? {
        SaveOutcome::Clean => println!("Nothing to save"),
        SaveOutcome::Saved { added, removed } => {
            println!("Saved: {} added, {} removed", added, removed)
        }
        SaveOutcome::Discarded => {}
    }
    print_snapshot(session_id, &usecase.snapshot().await);
    Ok(())
}

pub async fn end(config: Option<&Path>, session_id: &str) -> Result<()> {
    let usecase = open(config, session_id).await?;
    let snapshot = usecase.end_session().await.context("Failed to end session")?;
    print_snapshot(session_id, &snapshot);
    Ok(())
}
