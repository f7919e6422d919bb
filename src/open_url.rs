use anyhow::{Context, Result};
use std::process::Command;
use tracing::warn;

/// Opens `url` with the configured command, or the system opener.
pub fn open_url(url: &str, open_command: Option<&str>) -> Result<()> {
    match open_command {
        Some(cmd) => {
            let mut parts = cmd.split_whitespace();
            let Some(program) = parts.next() else {
                warn!("open_command is empty; cannot open {url}");
                anyhow::bail!("open_command is empty");
            };
            Command::new(program)
                .args(parts)
                .arg(url)
                .spawn()
                .inspect_err(|err| warn!("{program} failed to open {url}: {err}"))
                .with_context(|| format!("failed to run {program}"))?;
            Ok(())
        }
        None => open::that(url).map_err(|err| {
            warn!("system opener failed for {url}: {err}");
            err.into()
        }),
    }
}
