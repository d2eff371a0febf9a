use crate::context::Context;
use crate::manifest::Manifest;
use crate::result::Result;
use crate::utils;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Write every manifest entry into `<output_dir>/<filename>`
///
/// An existing archive with the same name is overwritten. The archive is
/// written in place, so a failure leaves a partial file behind.
pub fn create_zip(
    ctx: &Context,
    manifest: &Manifest,
    output_dir: &Path,
    filename: &str,
) -> Result<PathBuf> {
    utils::ensure_dir(output_dir)?;
    let archive_path = output_dir.join(filename);

    let file = File::create(&archive_path)?;
    let mut zip = ZipWriter::new(file);

    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);

    for entry in &manifest.entries {
        println!("{} -> {}", entry.source.display(), entry.destination);

        let mode = if entry.executable { 0o755 } else { 0o644 };
        zip.start_file(entry.destination.as_str(), options.unix_permissions(mode))?;
        let mut source = File::open(ctx.base_dir.join(&entry.source))?;
        io::copy(&mut source, &mut zip)?;
    }

    zip.finish()?;
    Ok(archive_path)
}
