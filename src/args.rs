use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;

/// Command-line arguments for release-pack
#[derive(Debug)]
pub struct Args {
    /// Enable verbose output
    pub verbose: bool,

    /// Skip the build command (use existing binaries)
    pub no_build: bool,

    /// Use this tag instead of running the tag command
    pub tag: Option<String>,

    /// Working directory (defaults to the current directory)
    pub path: Option<PathBuf>,

    /// Path to the packaging configuration file
    pub config: Option<PathBuf>,
}

impl Args {
    /// Parse command-line arguments
    pub fn parse() -> Self {
        Self::from_matches(command().get_matches())
    }

    fn from_matches(matches: clap::ArgMatches) -> Self {
        Self {
            verbose: matches.get_flag("verbose"),
            no_build: matches.get_flag("no-build"),
            tag: matches.get_one::<String>("tag").cloned(),
            path: matches.get_one::<String>("path").map(PathBuf::from),
            config: matches.get_one::<String>("config").map(PathBuf::from),
        }
    }
}

fn command() -> Command {
    Command::new("release-pack")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Build an application and package it into a versioned zip archive")
        .arg(
            Arg::new("path")
                .short('p')
                .long("path")
                .value_name("DIR")
                .help("Working directory containing the files to package"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .env("RELEASE_PACK_CONFIG")
                .help("Packaging configuration file (defaults to Pack.toml when present)"),
        )
        .arg(
            Arg::new("tag")
                .short('t')
                .long("tag")
                .value_name("TAG")
                .help("Use this version tag instead of running the tag command"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Enable verbose output"),
        )
        .arg(
            Arg::new("no-build")
                .long("no-build")
                .action(ArgAction::SetTrue)
                .help("Skip the build command (use existing binaries)"),
        )
}
