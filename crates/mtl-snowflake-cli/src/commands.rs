use std::io::Write;

use anyhow::Context;
use mtl_snowflake::{TimelineGenerator, to_readable};

use crate::config::{CliConfig, Command};

/// Runs the configured command, writing results to `out`.
pub fn run(config: &CliConfig, out: &mut impl Write) -> anyhow::Result<()> {
    match &config.command {
        Command::Generate { count, readable } => generate(config, *count, *readable, out),
        Command::Decompose { ids } => {
            let layout = config.settings.layout()?;
            for &id in ids {
                writeln!(out, "{id}\t{}", layout.decompose(id))?;
            }
            Ok(())
        }
        Command::Readable { ids } => {
            let layout = config.settings.layout()?;
            for &id in ids {
                writeln!(out, "{id}\t{}", to_readable(&layout, &config.settings, id))?;
            }
            Ok(())
        }
    }
}

fn generate(
    config: &CliConfig,
    count: usize,
    readable: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let generator = TimelineGenerator::with_settings(config.node_id, config.settings)
        .context("failed to construct generator")?;

    for n in 0..count {
        let id = generator
            .generate()
            .with_context(|| format!("failed to generate id #{n}"))?;
        if readable {
            writeln!(out, "{id}\t{}", generator.to_readable(id))?;
        } else {
            writeln!(out, "{id}")?;
        }
    }

    tracing::info!(count, node_id = config.node_id, "generated ids");
    Ok(())
}
