//! Polygon package format (read only)
//!
//!     Polygon (https://polygon.codeforces.com/) exports "full packages" as zip files described
//!     by a `problem.xml` manifest. The parts this reader uses:
//!
//!     .
//!     ├── problem.xml                     # short-name, names, limits, <test> list, solutions, tags
//!     ├── statement-sections/<language>
//!     │   ├── name.tex, legend.tex, input.tex, output.tex
//!     │   ├── notes.tex, tutorial.tex     (optional)
//!     │   ├── example.<nn>, example.<nn>.a
//!     │   └── <images>
//!     ├── tests/<nn>, tests/<nn>.a
//!     └── solutions/...                   # paths given by assets/solutions in the manifest
//!
//!     Whether a test is a sample comes from the `sample` attribute of its `<test>` element.
//!     Test files are matched to elements by the number in their name (`tests/07` is the 7th
//!     `<test>`). Setting `polygon.positional_test_matching` restores the older behavior of
//!     pairing the sorted file names with the elements in order.

use crate::archive::Archive;
use crate::error::ConvertError;
use crate::format::Format;
use crate::options::{ConvertOptions, PolygonOptions};
use crate::reader::PackageReader;
use crate::xml::{self, Element};
use ejb::{AuxFiles, Limits, Partition, Problem, SolutionSet, TestCase, TestSuite};
use std::path::Path;

const MANIFEST: &str = "problem.xml";
const BYTES_PER_MB: u64 = 1 << 20;

/// Polygon reader.
pub struct PolygonFormat;

impl Format for PolygonFormat {
    fn name(&self) -> &str {
        "polygon"
    }

    fn description(&self) -> &str {
        "Polygon (Codeforces) full packages"
    }

    fn file_extensions(&self) -> &[&str] {
        &["zip"]
    }

    fn supports_reading(&self) -> bool {
        true
    }

    fn read(&self, source: &Path, options: &ConvertOptions) -> Result<Problem, ConvertError> {
        let archive = Archive::open(source)?;
        PolygonReader::new(&archive, &options.polygon)?.assemble()
    }
}

pub struct PolygonReader<'a> {
    archive: &'a Archive,
    options: &'a PolygonOptions,
    manifest: Element,
    statement_dir: String,
}

impl<'a> PolygonReader<'a> {
    pub fn new(archive: &'a Archive, options: &'a PolygonOptions) -> Result<Self, ConvertError> {
        let text = archive.read_text(MANIFEST)?;
        let manifest =
            xml::parse(&text).map_err(|e| ConvertError::format(format!("{MANIFEST}: {e}")))?;
        Ok(Self {
            archive,
            options,
            manifest,
            statement_dir: format!("statement-sections/{}/", options.statement_language),
        })
    }

    fn section_path(&self, name: &str) -> String {
        format!("{}{name}.tex", self.statement_dir)
    }

    fn section(&self, name: &str) -> Result<String, ConvertError> {
        Ok(self.archive.read_text(&self.section_path(name))?.trim().to_string())
    }

    fn optional_section(&self, name: &str) -> Result<Option<String>, ConvertError> {
        Ok(self
            .archive
            .read_optional_text(&self.section_path(name))?
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty()))
    }

    /// Files directly describing the statement, keyed by base name.
    fn statement_files(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.archive
            .entries_under(&self.statement_dir)
            .map(|(name, data)| (name.rsplit('/').next().unwrap_or(name), data))
    }

    /// `<test>` elements of the first testset, in manifest order.
    fn test_elements(&self) -> Vec<&Element> {
        self.manifest
            .find_path("judging/testset/tests")
            .map(|tests| tests.find_all("test").collect())
            .unwrap_or_default()
    }

    fn testset_value(&self, name: &str) -> Result<u64, ConvertError> {
        let path = format!("judging/testset/{name}");
        let text = self
            .manifest
            .find_path(&path)
            .map(Element::text_content)
            .ok_or_else(|| ConvertError::format(format!("no {path} in {MANIFEST}")))?;
        text.trim()
            .parse()
            .map_err(|_| ConvertError::format(format!("{path} is not a number: '{}'", text.trim())))
    }

    /// Pair each test file with the partition its `<test>` element declares.
    fn classify<'n>(&self, names: &[&'n str]) -> Result<Vec<(&'n str, Partition)>, ConvertError> {
        let elements = self.test_elements();

        if self.options.positional_test_matching {
            if names.len() != elements.len() {
                tracing::warn!(
                    files = names.len(),
                    elements = elements.len(),
                    "test files and <test> elements differ in number, extra ones are dropped"
                );
            }
            return Ok(names
                .iter()
                .zip(&elements)
                .map(|(name, element)| (*name, partition_of(element)))
                .collect());
        }

        names
            .iter()
            .map(|name| {
                let element = name
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|index| elements.get(index))
                    .ok_or_else(|| {
                        ConvertError::format(format!(
                            "tests/{name} has no matching <test> element in {MANIFEST}"
                        ))
                    })?;
                Ok((*name, partition_of(element)))
            })
            .collect()
    }
}

impl PackageReader for PolygonReader<'_> {
    fn read_id(&self) -> Result<String, ConvertError> {
        self.manifest
            .attribute("short-name")
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .ok_or_else(|| ConvertError::format(format!("no short-name in {MANIFEST}")))
    }

    fn read_title(&self) -> Result<String, ConvertError> {
        if let Some(title) = self.optional_section("name")? {
            return Ok(title);
        }
        let language = self.options.statement_language.as_str();
        self.manifest
            .find("names")
            .and_then(|names| {
                names
                    .find_all("name")
                    .find(|name| name.attribute("language") == Some(language))
            })
            .and_then(|name| name.attribute("value"))
            .map(|value| value.trim().to_string())
            .ok_or_else(|| ConvertError::format(format!("no {language} problem name")))
    }

    fn read_description(&self) -> Result<String, ConvertError> {
        self.section("legend")
    }

    fn read_input_spec(&self) -> Result<String, ConvertError> {
        self.section("input")
    }

    fn read_output_spec(&self) -> Result<String, ConvertError> {
        self.section("output")
    }

    fn read_examples(&self) -> Result<Vec<TestCase>, ConvertError> {
        let mut numbers: Vec<&str> = self
            .statement_files()
            .filter_map(|(name, _)| name.strip_prefix("example."))
            .filter(|rest| !rest.ends_with(".a"))
            .collect();
        numbers.sort_unstable();
        numbers.dedup();

        numbers
            .into_iter()
            .map(|number| {
                let input = format!("{}example.{number}", self.statement_dir);
                Ok(TestCase::new(
                    self.archive.read_text(&input)?,
                    self.archive.read_text(&format!("{input}.a"))?,
                ))
            })
            .collect()
    }

    fn read_aux_files(&self) -> Result<AuxFiles, ConvertError> {
        Ok(self
            .statement_files()
            .filter(|(name, _)| {
                !name.starts_with("example.") && !name.to_lowercase().ends_with(".tex")
            })
            .map(|(name, data)| (name.to_string(), data.to_vec()))
            .collect())
    }

    fn read_tags(&self) -> Result<Vec<String>, ConvertError> {
        if let Some(tags) = self.manifest.find("tags") {
            return Ok(tags
                .find_all("tag")
                .filter_map(|tag| tag.attribute("value"))
                .map(str::to_string)
                .collect());
        }
        Ok(self
            .archive
            .read_optional_text("tags")?
            .map(|text| {
                text.lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default())
    }

    fn read_tutorial(&self) -> Result<Option<String>, ConvertError> {
        self.optional_section("tutorial")
    }

    fn read_notes(&self) -> Result<Option<String>, ConvertError> {
        self.optional_section("notes")
    }

    fn read_tests(&self) -> Result<TestSuite, ConvertError> {
        let names: Vec<&str> = self
            .archive
            .entries_under("tests/")
            .map(|(name, _)| name)
            .filter(|name| !name.ends_with(".a"))
            .collect();
        if names.is_empty() {
            return Err(ConvertError::format(
                "no test data under tests/, export the full Linux package",
            ));
        }

        let mut tests = TestSuite::new();
        for (name, partition) in self.classify(&names)? {
            let input = format!("tests/{name}");
            let test = TestCase::new(
                self.archive.read_text(&input)?,
                self.archive.read_text(&format!("{input}.a"))?,
            );
            tests.insert(partition, name, test);
        }
        Ok(tests)
    }

    fn read_solutions(&self) -> Result<Vec<SolutionSet>, ConvertError> {
        let solutions: Vec<&Element> = self
            .manifest
            .find_path("assets/solutions")
            .map(|s| s.find_all("solution").collect())
            .unwrap_or_default();

        let mut sets = Vec::new();
        for tag in ["main", "accepted"] {
            let mut set = SolutionSet::new();
            for solution in solutions.iter().filter(|s| s.attribute("tag") == Some(tag)) {
                for source in solution.find_all("source") {
                    let (Some(kind), Some(path)) = (source.attribute("type"), source.attribute("path"))
                    else {
                        tracing::warn!("ignoring {tag} solution source without type or path");
                        continue;
                    };
                    set.insert(source_language(kind), self.archive.read_text(path)?);
                }
            }
            sets.push(set);
        }
        Ok(sets)
    }

    fn read_limits(&self) -> Result<Limits, ConvertError> {
        let time_ms = self.testset_value("time-limit")?;
        let memory_bytes = self.testset_value("memory-limit")?;

        let mut time_seconds = time_ms / 1000;
        if time_seconds == 0 {
            tracing::warn!("time limit of {time_ms} ms rounded up to 1 s");
            time_seconds = 1;
        }
        Ok(Limits::new(
            time_seconds,
            memory_bytes / BYTES_PER_MB,
            Some(self.options.max_file_size_kb),
        )?)
    }
}

fn partition_of(element: &Element) -> Partition {
    if element.attribute("sample").is_some() {
        Partition::Examples
    } else {
        Partition::Hidden
    }
}

/// `cpp.g++17` is `cpp`, `python.3` is `py`.
fn source_language(kind: &str) -> String {
    match kind.split('.').next().unwrap_or(kind) {
        "python" => "py".to_string(),
        language => language.to_string(),
    }
}
