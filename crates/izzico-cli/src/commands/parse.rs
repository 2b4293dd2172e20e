use anyhow::{Context, Result};
use izzico_core::directive::parse;
use std::io::Read;

pub fn run(text: Option<String>) -> Result<()> {
    let raw_text = match text {
        Some(text) => text,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            buffer
        }
    };

    let parsed = parse(&raw_text);
    tracing::debug!("Extracted {} directive(s)", parsed.directives.len());
    println!("{}", serde_json::to_string_pretty(&parsed)?);
    Ok(())
}
