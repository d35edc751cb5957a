//! `rhetor progress` - show or clear cumulative progress.

use anyhow::Result;
use rhetor_application::ProgressService;
use rhetor_infrastructure::TomlProgressStore;
use std::sync::Arc;

pub async fn run(reset: bool) -> Result<()> {
    let store = Arc::new(TomlProgressStore::default_location()?);
    let service = ProgressService::new(store);

    if reset {
        service.reset().await?;
        println!("Progress cleared.");
        return Ok(());
    }

    let record = service.overview().await?;
    println!("Total XP:   {}", record.points);
    println!("Level:      {}", record.level);
    println!("Completed:  {} session(s)", record.completed.len());
    if record.badges.is_empty() {
        println!("Badges:     none yet");
    } else {
        println!("Badges:     {}", record.badges.join(", "));
    }
    if let Some(latest) = record.history.last() {
        println!("Last award: {} ({} XP)", latest.date, latest.points);
    }

    Ok(())
}
