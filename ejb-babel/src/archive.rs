//! Zip archive container
//!
//! Source packages are read fully into memory when opened, so the file handle never outlives
//! [`Archive::open`]. Destination packages are streamed through [`ArchiveWriter`].

use crate::error::ConvertError;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Component, Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

const MAX_SIZE_HINT: u64 = 1 << 20;

/// True when `name` is a plain relative path: no root, drive prefix or `..` component.
pub fn is_relative_entry(name: &str) -> bool {
    !name.is_empty()
        && Path::new(name)
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// The entries of a package, by name. Directory entries are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Archive {
    entries: BTreeMap<String, Vec<u8>>,
}

impl Archive {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ConvertError> {
        let path = path.as_ref();
        let context = || format!("reading {}", path.display());

        let file = File::open(path).map_err(|e| ConvertError::io(context(), e))?;
        let mut zip = ZipArchive::new(file).map_err(|e| ConvertError::io(context(), io::Error::other(e)))?;

        let mut entries = BTreeMap::new();
        for index in 0..zip.len() {
            let mut entry = zip
                .by_index(index)
                .map_err(|e| ConvertError::io(context(), io::Error::other(e)))?;
            if entry.is_dir() {
                continue;
            }
            let name = entry.name().to_string();
            if entry.enclosed_name().is_none() || !is_relative_entry(&name) {
                return Err(ConvertError::format(format!(
                    "entry '{name}' in {} points outside the package",
                    path.display()
                )));
            }
            // the header size is only a hint
            let mut data = Vec::with_capacity(entry.size().min(MAX_SIZE_HINT) as usize);
            entry
                .read_to_end(&mut data)
                .map_err(|e| ConvertError::io(format!("{} in {}", name, path.display()), e))?;
            entries.insert(name, data);
        }

        tracing::debug!(path = %path.display(), entries = entries.len(), "opened archive");
        Ok(Self { entries })
    }

    /// Build an archive from in-memory entries.
    pub fn from_entries<I, N, D>(entries: I) -> Self
    where
        I: IntoIterator<Item = (N, D)>,
        N: Into<String>,
        D: Into<Vec<u8>>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(name, data)| (name.into(), data.into()))
                .collect(),
        }
    }

    /// Entry names in sorted order.
    pub fn list_entries(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries whose name starts with `prefix`, with the prefix stripped.
    pub fn entries_under<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = (&'a str, &'a [u8])> {
        self.entries.iter().filter_map(move |(name, data)| {
            name.strip_prefix(prefix)
                .filter(|rest| !rest.is_empty())
                .map(|rest| (rest, data.as_slice()))
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn read_entry(&self, name: &str) -> Result<&[u8], ConvertError> {
        self.entries
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| ConvertError::format(format!("missing entry '{name}'")))
    }

    /// Read an entry as UTF-8 text.
    pub fn read_text(&self, name: &str) -> Result<String, ConvertError> {
        let data = self.read_entry(name)?;
        String::from_utf8(data.to_vec())
            .map_err(|_| ConvertError::format(format!("entry '{name}' is not UTF-8 text")))
    }

    /// Like [`read_text`](Self::read_text), but a missing entry is `None`.
    pub fn read_optional_text(&self, name: &str) -> Result<Option<String>, ConvertError> {
        if self.contains(name) {
            self.read_text(name).map(Some)
        } else {
            Ok(None)
        }
    }
}

/// Writes a deflate-compressed zip entry by entry.
pub struct ArchiveWriter {
    path: PathBuf,
    zip: ZipWriter<File>,
}

impl ArchiveWriter {
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, ConvertError> {
        let path = path.into();
        let file = File::create(&path)
            .map_err(|e| ConvertError::io(format!("creating {}", path.display()), e))?;
        Ok(Self {
            path,
            zip: ZipWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_entry(&mut self, name: &str, data: impl AsRef<[u8]>) -> Result<(), ConvertError> {
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let context = || format!("writing {} to {}", name, self.path.display());
        self.zip
            .start_file(name, options)
            .map_err(|e| ConvertError::io(context(), io::Error::other(e)))?;
        self.zip
            .write_all(data.as_ref())
            .map_err(|e| ConvertError::io(context(), e))
    }

    pub fn finish(self) -> Result<PathBuf, ConvertError> {
        let Self { path, zip } = self;
        zip.finish()
            .map_err(|e| ConvertError::io(format!("finishing {}", path.display()), io::Error::other(e)))?;
        Ok(path)
    }
}
