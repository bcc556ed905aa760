//! CodeRunner format (write only)
//!
//!     CodeRunner (https://coderunner.org.nz/) questions are imported into Moodle as "Moodle XML"
//!     quizzes. A question is tied to one programming language, so a problem becomes one file
//!     per answer language, `<id>-<lang>.xml`, all sharing the same statement and tests.
//!
//!     The statement is translated to HTML (see `ejb::markup`) and stored verbatim as CDATA.
//!     Images travel inside the question as base64 `<file>` elements and are referenced through
//!     Moodle's `@@PLUGINFILE@@/` prefix. Browsers only display raster images; vector images are
//!     rasterized when an [`ImageConverter`] is available and rejected otherwise.

mod question;

use crate::error::ConvertError;
use crate::external::{ImageConverter, ImageMagick};
use crate::format::Format;
use crate::options::ConvertOptions;
use crate::xml;
use ejb::{ImageIndex, Problem, Translator, ValidationError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Answer languages, by file extension.
pub const LANGUAGES: [&str; 3] = ["c", "cpp", "py"];

/// Image types embedded as they are.
const RASTER_IMAGES: [&str; 4] = ["jpeg", "jpg", "gif", "png"];

/// Image types rasterized to PNG when a converter is configured.
const VECTOR_IMAGES: [&str; 3] = ["eps", "svg", "pdf"];

const PLUGINFILE: &str = "@@PLUGINFILE@@/";

/// The CodeRunner question type for an answer language.
pub fn prototype_for(language: &str) -> Option<&'static str> {
    match language {
        "c" => Some("c_program"),
        "cpp" => Some("cpp_program"),
        "py" => Some("python3"),
        _ => None,
    }
}

/// CodeRunner writer.
///
/// Vector images go through the injected converter, else through `coderunner.image_converter`
/// when that option names a program.
#[derive(Default)]
pub struct CodeRunnerFormat {
    converter: Option<Box<dyn ImageConverter>>,
}

impl CodeRunnerFormat {
    pub fn with_converter(converter: impl ImageConverter + 'static) -> Self {
        Self {
            converter: Some(Box::new(converter)),
        }
    }
}

impl Format for CodeRunnerFormat {
    fn name(&self) -> &str {
        "coderunner"
    }

    fn description(&self) -> &str {
        "CodeRunner questions for Moodle (Moodle XML)"
    }

    fn file_extensions(&self) -> &[&str] {
        &["xml"]
    }

    fn supports_writing(&self) -> bool {
        true
    }

    fn write(
        &self,
        problem: &Problem,
        output_dir: &Path,
        options: &ConvertOptions,
    ) -> Result<Vec<PathBuf>, ConvertError> {
        let options = &options.coderunner;
        let languages = answer_languages(problem, &options.answer_language)?;

        let configured = options.image_converter.as_deref().map(ImageMagick::new);
        let converter: Option<&dyn ImageConverter> = match (&self.converter, &configured) {
            (Some(injected), _) => Some(injected.as_ref()),
            (None, Some(program)) => Some(program),
            (None, None) => None,
        };
        let images = prepare_images(problem, converter)?;

        let question = question::build(problem, &images, options)?;

        let mut artifacts = Vec::with_capacity(languages.len());
        for language in languages {
            let quiz = question::for_language(&question, problem, language)?;
            let document = xml::to_string(&quiz).map_err(|e| {
                ConvertError::io(format!("serializing {} question", problem.id()), io::Error::other(e))
            })?;

            let path = output_dir.join(format!("{}-{language}.xml", problem.id()));
            fs::write(&path, document)
                .map_err(|e| ConvertError::io(format!("writing {}", path.display()), e))?;
            tracing::info!("created {}", path.display());
            artifacts.push(path);
        }
        Ok(artifacts)
    }
}

/// Languages to write: the requested one, or every supported language with a solution.
fn answer_languages<'p>(problem: &'p Problem, requested: &str) -> Result<Vec<&'p str>, ConvertError> {
    let available = problem.evaluation().languages();
    let languages: Vec<&str> = available
        .into_iter()
        .filter(|language| prototype_for(language).is_some())
        .filter(|language| requested == "all" || requested == *language)
        .collect();
    if languages.is_empty() {
        return Err(ValidationError::MissingSolution(requested.to_string()).into());
    }
    Ok(languages)
}

/// Statement images ready to embed, and the translator that references them.
pub(crate) struct Images {
    pub files: Vec<(String, Vec<u8>)>,
    pub translator: Translator,
}

fn prepare_images(
    problem: &Problem,
    converter: Option<&dyn ImageConverter>,
) -> Result<Images, ConvertError> {
    let aux_files = problem.statement().aux_files();
    let mut index = ImageIndex::from_aux_files(aux_files);
    let mut files = Vec::with_capacity(aux_files.len());

    let scratch = match converter {
        Some(_) if aux_files.keys().any(|name| VECTOR_IMAGES.contains(&extension(name).as_str())) => {
            Some(tempfile::tempdir().map_err(|e| ConvertError::io("creating a scratch directory for images", e))?)
        }
        _ => None,
    };

    for (name, data) in aux_files {
        let extension = extension(name);
        if RASTER_IMAGES.contains(&extension.as_str()) {
            files.push((name.clone(), data.clone()));
            continue;
        }

        let (Some(converter), Some(dir)) = (converter, &scratch) else {
            return Err(ValidationError::UnsupportedImage(name.clone()).into());
        };
        if !VECTOR_IMAGES.contains(&extension.as_str()) {
            return Err(ValidationError::UnsupportedImage(name.clone()).into());
        }
        let dir = dir.path();

        let stem = Path::new(name)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.clone());
        let raster = format!("{stem}.png");
        let input = dir.join(name.replace('/', "_"));
        let output = dir.join(raster.replace('/', "_"));

        fs::write(&input, data).map_err(|e| ConvertError::io(format!("writing {}", input.display()), e))?;
        converter.convert(&input, &output)?;
        let png = fs::read(&output).map_err(|e| ConvertError::io(format!("reading {}", output.display()), e))?;

        tracing::debug!("rasterized {name} to {raster}");
        index = index.with_rename(name.clone(), raster.clone());
        files.push((raster, png));
    }

    Ok(Images {
        files,
        translator: Translator::new(index).with_image_prefix(PLUGINFILE),
    })
}

fn extension(name: &str) -> String {
    Path::new(name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}
