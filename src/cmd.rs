use crate::context::Context;
use crate::error::Error;
use crate::result::Result;
use std::process::{Command, Stdio};

/// Execute a command given as tokens and return its trimmed stdout
///
/// The first token is the program, the rest are passed verbatim as arguments.
/// Runs in `ctx.base_dir` and blocks until the process exits.
pub fn execute(ctx: &Context, tokens: &[String]) -> Result<String> {
    let (program, args) = tokens
        .split_first()
        .ok_or_else(|| Error::custom("cannot execute an empty command"))?;

    let display = tokens.join(" ");
    if ctx.verbose {
        println!("Executing: {}", display);
    }

    let output = Command::new(program)
        .args(args)
        .current_dir(&ctx.base_dir)
        .stdin(Stdio::null())
        .stderr(Stdio::inherit())
        .output()?;

    if !output.status.success() {
        return Err(Error::CommandFailed {
            command: display,
            code: output.status.code().unwrap_or(-1),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
