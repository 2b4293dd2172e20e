use super::utils::CliPaths;
use anyhow::Result;

pub fn show(paths: &CliPaths) -> Result<()> {
    let config = paths.load_config()?;
    println!("# {}", paths.config_file.display());
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}
