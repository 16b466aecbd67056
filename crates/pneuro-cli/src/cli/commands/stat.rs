//! `pneuro stat <url>` – remote file properties (always empty for PublicnEUro).

use anyhow::{anyhow, Result};

use pneuro_core::HandlerRegistry;

pub fn run_stat(registry: &mut HandlerRegistry, url: &str) -> Result<()> {
    let handler = registry
        .lookup(url)
        .ok_or_else(|| anyhow!("no handler registered for the scheme of {}", url))?;
    let props = handler.stat(url, None)?;
    if props.is_empty() {
        println!("{}: no properties (stat is not supported by PublicnEUro)", url);
    } else {
        for (k, v) in &props {
            println!("{}: {}", k, v);
        }
    }
    Ok(())
}
