//! Persistence of XDMF documents and their reusable fragments.
//!
//! Outputs are `<base>.xdmf` plus `<base>-header.txt`, `<base>-body.txt`
//! and `<base>-footer.txt`. Existing files are removed before rewriting.

use crate::Result;
use h5xdmf_core::Fragments;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Extension of the written document.
pub const XDMF_EXTENSION: &str = "xdmf";

/// Which fragment a part file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentPart {
    Header,
    Body,
    Footer,
}

impl FragmentPart {
    pub const ALL: [Self; 3] = [Self::Header, Self::Body, Self::Footer];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Body => "body",
            Self::Footer => "footer",
        }
    }

    fn select(self, fragments: &Fragments) -> &str {
        match self {
            Self::Header => &fragments.header,
            Self::Body => &fragments.body,
            Self::Footer => &fragments.footer,
        }
    }
}

/// Path of the XDMF document for `base` in `dir`.
#[must_use]
pub fn document_path(dir: &Path, base: &str) -> PathBuf {
    dir.join(format!("{base}.{XDMF_EXTENSION}"))
}

/// Path of one fragment file for `base` in `dir`.
#[must_use]
pub fn fragment_path(dir: &Path, base: &str, part: FragmentPart) -> PathBuf {
    dir.join(format!("{base}-{}.txt", part.as_str()))
}

/// Writes the rendered document to `<dir>/<base>.xdmf`.
///
/// # Errors
/// Returns an error if an existing file cannot be removed or the new file
/// cannot be written.
pub fn write_document(dir: &Path, base: &str, document: &str) -> Result<PathBuf> {
    let path = document_path(dir, base);
    replace_file(&path, document)?;
    log::info!("Done writing {}", path.display());
    Ok(path)
}

/// Writes the three fragments as `.txt` parts.
///
/// Returns the written paths in header, body, footer order.
///
/// # Errors
/// Returns an error if any part cannot be written.
pub fn write_fragments(dir: &Path, base: &str, fragments: &Fragments) -> Result<Vec<PathBuf>> {
    FragmentPart::ALL
        .iter()
        .map(|&part| -> Result<PathBuf> {
            let path = fragment_path(dir, base, part);
            replace_file(&path, part.select(fragments))?;
            log::info!("Done writing {}", path.display());
            Ok(path)
        })
        .collect()
}

/// Reads previously saved fragments verbatim.
///
/// # Errors
/// Returns an error if any of the files cannot be read.
pub fn load_fragments(header: &Path, body: &Path, footer: &Path) -> Result<Fragments> {
    Ok(Fragments {
        header: fs::read_to_string(header)?,
        body: fs::read_to_string(body)?,
        footer: fs::read_to_string(footer)?,
    })
}

fn replace_file(path: &Path, contents: &str) -> Result<()> {
    if path.is_file() {
        fs::remove_file(path)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(contents.as_bytes())?;
    writer.flush()?;
    Ok(())
}
