//! `.h2drumkit` archive packaging.
//!
//! A kit archive is a gzip-compressed tar file with a single top-level folder
//! named after the kit:
//!
//! ```text
//! My Kit/
//!   drumkit.xml
//!   kick.wav
//!   snare.wav
//! ```
//!
//! Everything is assembled in a temporary staging directory first. The
//! archive itself is written to a temporary file next to the destination and
//! only renamed into place once it is complete.

use crate::kit::Kit;
use crate::manifest::{write_manifest_file, MANIFEST_NAME};
use crate::resolver::SampleResolver;
use anyhow::{Context, Result};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// File extension of kit archives.
pub const KIT_SUFFIX: &str = ".h2drumkit";

/// Append [`KIT_SUFFIX`] to `path` unless it already ends with it.
pub fn normalize_output_path(path: &Path) -> PathBuf {
    if has_kit_suffix(path) {
        return path.to_path_buf();
    }
    let mut normalized = path.as_os_str().to_owned();
    normalized.push(KIT_SUFFIX);
    PathBuf::from(normalized)
}

/// Kit name derived from an output path: its file name without [`KIT_SUFFIX`].
///
/// `Rock.h2drumkit` therefore names the kit `Rock`, not `Rock.h2drumkit`.
pub fn default_kit_name(output: &Path) -> String {
    let file_name = output
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    match file_name.strip_suffix(KIT_SUFFIX) {
        Some(stem) => stem.to_string(),
        None => file_name,
    }
}

fn has_kit_suffix(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(KIT_SUFFIX))
}

/// Resolve every sample of `kit`, returning `(manifest name, source path)` pairs.
pub fn resolve_samples(kit: &Kit, resolver: &SampleResolver) -> Result<Vec<(String, PathBuf)>> {
    let mut samples = Vec::new();
    for filename in kit.sample_filenames() {
        let source = resolver.resolve(filename)?;
        log::debug!("Resolved {} -> {}", filename, source.display());
        samples.push((filename.to_string(), source));
    }
    Ok(samples)
}

/// Copy samples and write the manifest into `staging`.
///
/// Samples are stored flat under the name the manifest references, so the
/// source directory layout and the case of a case-insensitive match are
/// dropped.
pub fn stage_kit(kit: &Kit, samples: &[(String, PathBuf)], staging: &Path) -> Result<()> {
    for (filename, source) in samples {
        let base_name = Path::new(filename)
            .file_name()
            .with_context(|| format!("Invalid sample file name: {}", filename))?;
        let dest = staging.join(base_name);

        log::debug!("Copying {} -> {}", source.display(), dest.display());
        fs::copy(source, &dest)
            .with_context(|| format!("Failed to copy sample: {}", source.display()))?;
    }

    let manifest = staging.join(MANIFEST_NAME);
    write_manifest_file(kit, &manifest)
        .with_context(|| format!("Failed to write manifest: {}", manifest.display()))?;
    Ok(())
}

/// Build the archive for `kit` at `output`.
///
/// `output` is normalized with [`normalize_output_path`]; the final path is
/// returned. On error no file is left at the destination.
pub fn package_kit(kit: &Kit, resolver: &SampleResolver, output: &Path) -> Result<PathBuf> {
    let output = normalize_output_path(output);
    log::info!(
        "Packaging kit '{}' ({} instruments) into {}",
        kit.name(),
        kit.instruments().len(),
        output.display()
    );

    let samples = resolve_samples(kit, resolver)?;
    log::info!("Resolved {} samples", samples.len());

    let staging = tempfile::tempdir().context("Failed to create staging directory")?;
    stage_kit(kit, &samples, staging.path())?;
    write_archive(staging.path(), kit.name(), &output)?;

    log::info!(
        "Wrote {} ({} bytes)",
        output.display(),
        fs::metadata(&output)?.len()
    );
    Ok(output)
}

/// Archive the contents of `staging` under `folder` into a gzip tar at `output`.
fn write_archive(staging: &Path, folder: &str, output: &Path) -> Result<()> {
    let parent = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file = NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create temporary file in {}", parent.display()))?;

    let mut archive = tar::Builder::new(GzEncoder::new(file.as_file(), Compression::default()));
    archive
        .append_dir_all(folder, staging)
        .context("Failed to add kit to archive")?;
    archive
        .into_inner()
        .context("Failed to finish archive")?
        .finish()
        .context("Failed to finish compression")?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))?;
    }

    file.persist(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    Ok(())
}
