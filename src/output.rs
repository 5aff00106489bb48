//! PNG encoding, file output and output path generation

use image::{ImageOutputFormat, RgbaImage};
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::render::RenderKind;

/// Error type for output operations
#[derive(Debug, Error)]
pub enum OutputError {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Encode an image as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, image::ImageError> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)?;
    Ok(bytes)
}

/// Write already encoded bytes, creating missing parent directories.
pub fn write_bytes(bytes: &[u8], path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    std::fs::write(path, bytes)?;
    Ok(())
}

/// Where a render ends up.
///
/// | `-o` value | Output |
/// |------------|--------|
/// | file path | that path |
/// | existing directory, or path ending in `/` | `dir/{identifier}_{kind}.png` |
pub fn generate_output_path(output_arg: &Path, identifier: &str, kind: RenderKind) -> PathBuf {
    let as_dir = output_arg.is_dir() || output_arg.to_string_lossy().ends_with(std::path::MAIN_SEPARATOR);
    if as_dir {
        output_arg.join(format!("{}_{}.png", file_stem_for(identifier), kind))
    } else {
        output_arg.to_path_buf()
    }
}

/// `identifier` with anything unsafe in a file name replaced by `_`.
pub fn file_stem_for(identifier: &str) -> String {
    let stem: String = identifier
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect();
    if stem.is_empty() {
        "skin".to_string()
    } else {
        stem
    }
}
