use crate::archive;
use crate::cmd;
use crate::config::PackConfig;
use crate::context::Context;
use crate::error::Error;
use crate::manifest::Manifest;
use crate::result::Result;
use std::path::PathBuf;

/// Per-run switches coming from the command line
#[derive(Debug, Default)]
pub struct Options {
    /// Skip the build command (use existing binaries)
    pub no_build: bool,

    /// Use this tag instead of running the tag command
    pub tag: Option<String>,
}

/// Build, tag, collect and archive; returns the path of the written archive
///
/// Each step must succeed before the next one starts. Nothing is rolled back
/// on failure.
pub fn package(ctx: &Context, config: &PackConfig, options: &Options) -> Result<PathBuf> {
    if !options.no_build && !config.build.is_empty() {
        cliclack::log::step(format!("Building: {}", config.build.join(" ")))?;
        cmd::execute(ctx, &config.build)?;
    }

    let tag = match &options.tag {
        Some(tag) => tag.trim().to_string(),
        None => cmd::execute(ctx, &config.tag)?,
    };
    check_tag(&tag)?;
    cliclack::log::step(format!("Version tag: {}", tag))?;

    let output_dir = config.output_dir(ctx);
    let filename = config.archive_filename(&tag);
    let manifest = Manifest::collect(ctx, config, &output_dir.join(&filename))?;
    if manifest.is_empty() {
        cliclack::log::warning("No files to package, the archive will be empty")?;
    } else {
        cliclack::log::step(format!("Packaging {} files", manifest.len()))?;
    }

    let archive_path = archive::create_zip(ctx, &manifest, &output_dir, &filename)?;

    if !config.clean.is_empty() {
        cliclack::log::step(format!("Cleaning: {}", config.clean.join(" ")))?;
        cmd::execute(ctx, &config.clean)?;
    }

    Ok(archive_path)
}

/// The tag lands in a file name, so it has to be a single non-empty path segment
fn check_tag(tag: &str) -> Result<()> {
    if tag.is_empty() {
        return Err(Error::InvalidTag("tag is empty".to_string()));
    }
    if tag.contains(['/', '\\']) || tag.contains(char::is_whitespace) {
        return Err(Error::InvalidTag(tag.to_string()));
    }
    Ok(())
}
