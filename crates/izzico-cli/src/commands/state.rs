use super::utils::CliPaths;
use anyhow::Result;
use chrono::Utc;
use izzico_core::session_state::SessionStateRepository;

pub fn show(paths: &CliPaths) -> Result<()> {
    let config = paths.load_config()?;
    let repository = paths.session_repository(&config)?;

    let state = repository.restore(Utc::now());
    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}

pub fn clear(paths: &CliPaths) -> Result<()> {
    let config = paths.load_config()?;
    let repository = paths.session_repository(&config)?;

    repository.clear();
    println!("Cleared '{}' in {}", repository.key(), paths.state_dir.display());
    Ok(())
}
