mod archive;
mod args;
mod cmd;
mod config;
mod context;
mod error;
mod manifest;
mod pack;
mod result;
mod tpl;
mod utils;

use args::Args;
use config::PackConfig;
use context::Context;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> result::Result<()> {
    let Args {
        verbose,
        no_build,
        tag,
        path,
        config,
    } = Args::parse();

    let base_dir = utils::resolve_base_dir(path.as_deref())?;
    let ctx = Context::new(base_dir, verbose);

    cliclack::intro("release-pack")?;

    let config = match PackConfig::resolve(&ctx, config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            cliclack::outro_cancel("Failed to load configuration")?;
            return Err(e);
        }
    };
    cliclack::log::info(format!("Packaging {} ({})", config.name, config.arch))?;

    let options = pack::Options { no_build, tag };
    match pack::package(&ctx, &config, &options) {
        Ok(archive_path) => {
            cliclack::outro(format!("Archive created: {}", archive_path.display()))?;
            Ok(())
        }
        Err(e) => {
            cliclack::outro_cancel("Packaging failed")?;
            Err(e)
        }
    }
}
