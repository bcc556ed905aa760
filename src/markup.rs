//! Statement markup to HTML translation
//!
//!     Problem statements are authored in a small subset of LaTeX: font commands, itemize and
//!     enumerate lists, centering, dollar delimited math and \includegraphics. Destinations that
//!     render statements in a browser need HTML, so this module rewrites that subset.
//!
//!     The translation runs in fixed phases, each one a module of its own:
//!
//!     1. math          $$..$$ and $..$ become \[ .. \] and \( .. \); every math span is then
//!                      swapped for an opaque placeholder so no later phase can touch it
//!     2. images        \includegraphics[opts]{name} becomes <img>, resolved against an ImageIndex
//!     3. fonts         \textbf{..} and friends become <b>, <i>, <tt>
//!     4. environments  \item, itemize, enumerate and center
//!     5. text          smart quotes and paragraph breaks
//!     6. diagnostics   every backslash command left over (outside math) is reported
//!
//!     Placeholders are restored last. Translation is a pure function of its input and the
//!     image index: warnings are returned in the Translation, never printed, and the only hard
//!     failure is a reference to an image the index cannot resolve.

mod diagnostics;
mod environments;
mod fonts;
mod images;
mod math;
mod text;

use crate::error::ValidationError;
use crate::problem::AuxFiles;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Something the translator could not render faithfully. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupWarning {
    /// `\includegraphics` options other than `scale=` or `width=..\textwidth`; they are dropped.
    UnknownImageOptions { image: String, options: String },
    /// A backslash command that survived every phase.
    UnsupportedCommand(String),
}

impl fmt::Display for MarkupWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkupWarning::UnknownImageOptions { image, options } => {
                write!(f, "image `{image}` has unknown options `{options}`")
            }
            MarkupWarning::UnsupportedCommand(command) => {
                write!(f, "possibly unformatted command `{command}`")
            }
        }
    }
}

/// HTML output plus whatever the translator had to warn about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Translation {
    pub html: String,
    pub warnings: Vec<MarkupWarning>,
}

/// The image files a statement can reference.
///
/// Lookup accepts the exact file name or the name without its extension. A rename maps a source
/// file to the file actually shipped (e.g. `figure.eps` converted to `figure.png`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageIndex {
    names: BTreeSet<String>,
    renames: BTreeMap<String, String>,
}

impl ImageIndex {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            renames: BTreeMap::new(),
        }
    }

    pub fn from_aux_files(files: &AuxFiles) -> Self {
        Self::new(files.keys().cloned())
    }

    pub fn with_rename(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.renames.insert(from.into(), to.into());
        self
    }

    /// The shipped file name for a reference, or `MissingImage`.
    pub fn resolve(&self, reference: &str) -> Result<String, ValidationError> {
        let prefix = format!("{reference}.");
        let found = if self.names.contains(reference) {
            Some(reference)
        } else {
            self.names
                .iter()
                .map(String::as_str)
                .find(|name| name.starts_with(&prefix))
        };

        match found {
            Some(name) => Ok(self
                .renames
                .get(name)
                .cloned()
                .unwrap_or_else(|| name.to_string())),
            None => Err(ValidationError::MissingImage(reference.to_string())),
        }
    }
}

/// Statement markup translator.
#[derive(Debug, Clone, Default)]
pub struct Translator {
    images: ImageIndex,
    image_prefix: String,
}

impl Translator {
    pub fn new(images: ImageIndex) -> Self {
        Self {
            images,
            image_prefix: String::new(),
        }
    }

    /// Prepended to every `<img src>`, e.g. `@@PLUGINFILE@@/` for Moodle.
    pub fn with_image_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.image_prefix = prefix.into();
        self
    }

    pub fn translate(&self, source: &str) -> Result<Translation, ValidationError> {
        let mut warnings = Vec::new();

        let (text, spans) = math::apply(source);
        let text = images::apply(&text, &self.images, &self.image_prefix, &mut warnings)?;
        let text = fonts::apply(&text);
        let text = environments::apply(&text);
        let text = text::apply(&text);
        diagnostics::scan(&text, &mut warnings);

        Ok(Translation {
            html: spans.restore(&text),
            warnings,
        })
    }
}

/// Translate markup that references no images.
pub fn translate(source: &str) -> Result<Translation, ValidationError> {
    Translator::default().translate(source)
}
