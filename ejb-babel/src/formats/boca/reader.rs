use crate::archive::Archive;
use crate::error::ConvertError;
use crate::options::BocaOptions;
use crate::reader::PackageReader;
use ejb::{AuxFiles, Limits, Partition, SolutionSet, TestCase, TestSuite};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

static ECHO: Lazy<Regex> = Lazy::new(|| Regex::new(r"echo\s+(\d+)").unwrap());

const PROBLEM_INFO: &str = "description/problem.info";
const EXAMPLES_CSV: &str = "tex/examples.csv";
const TAGS_CSV: &str = "description/tags.csv";

/// Reads a BOCA package held in memory.
pub struct BocaReader<'a> {
    archive: &'a Archive,
    source: &'a Path,
    options: &'a BocaOptions,
    info: BTreeMap<String, String>,
}

impl<'a> BocaReader<'a> {
    /// Fails when `description/problem.info` exists but is not text; an absent file is fine.
    pub fn new(
        archive: &'a Archive,
        source: &'a Path,
        options: &'a BocaOptions,
    ) -> Result<Self, ConvertError> {
        let info = archive
            .read_optional_text(PROBLEM_INFO)?
            .map(|text| parse_info(&text))
            .unwrap_or_default();
        Ok(Self {
            archive,
            source,
            options,
            info,
        })
    }

    fn info(&self, key: &str) -> Option<&str> {
        self.info
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    fn section(&self, name: &str) -> Result<String, ConvertError> {
        Ok(self.archive.read_text(&format!("tex/{name}.tex"))?.trim().to_string())
    }

    fn optional_section(&self, name: &str) -> Result<Option<String>, ConvertError> {
        let path = format!("tex/{name}.tex");
        let text = self.archive.read_optional_text(&path)?;
        if text.is_none() {
            tracing::debug!("{path} not in package");
        }
        Ok(text
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty()))
    }

    /// Test names listed in `tex/examples.csv`, sorted.
    fn example_names(&self) -> Result<BTreeSet<String>, ConvertError> {
        Ok(self
            .archive
            .read_optional_text(EXAMPLES_CSV)?
            .map(|csv| split_csv(&csv))
            .unwrap_or_default()
            .into_iter()
            .collect())
    }

    fn test_case(&self, name: &str) -> Result<TestCase, ConvertError> {
        Ok(TestCase::new(
            self.archive.read_text(&format!("input/{name}"))?,
            self.archive.read_text(&format!("output/{name}"))?,
        ))
    }

    /// The limits script matching the main solution's language, else the first one.
    fn limits_script(&self) -> Option<String> {
        let main_ext = self
            .archive
            .entries_under("solutions/")
            .filter_map(|(name, _)| source_name(name))
            .find(|(stem, _)| *stem == "main")
            .map(|(_, ext)| ext.to_string());

        let candidates: Vec<String> = match main_ext.as_deref() {
            Some("py") => vec!["py".into(), "py3".into(), "py2".into()],
            Some(ext) => vec![ext.to_string()],
            None => vec![],
        };

        candidates
            .iter()
            .map(|lang| format!("limits/{lang}"))
            .find(|path| self.archive.contains(path))
            .or_else(|| {
                self.archive
                    .entries_under("limits/")
                    .next()
                    .map(|(name, _)| format!("limits/{name}"))
            })
    }

    fn default_limits(&self) -> Result<Limits, ConvertError> {
        let defaults = &self.options.default_limits;
        Ok(Limits::new(
            defaults.time_seconds,
            defaults.memory_mb,
            Some(defaults.max_file_size_kb),
        )?)
    }
}

impl PackageReader for BocaReader<'_> {
    fn read_id(&self) -> Result<String, ConvertError> {
        if let Some(id) = self.info("basename") {
            return Ok(id.to_string());
        }
        self.source
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .filter(|stem| !stem.is_empty())
            .ok_or_else(|| ConvertError::format("no basename in description/problem.info"))
    }

    fn read_title(&self) -> Result<String, ConvertError> {
        if let Some(title) = self.info("fullname") {
            return Ok(title.to_string());
        }
        match self.optional_section("title")? {
            Some(title) => Ok(title),
            None => self.read_id(),
        }
    }

    fn read_description(&self) -> Result<String, ConvertError> {
        self.section("description")
    }

    fn read_input_spec(&self) -> Result<String, ConvertError> {
        self.section("input")
    }

    fn read_output_spec(&self) -> Result<String, ConvertError> {
        self.section("output")
    }

    fn read_examples(&self) -> Result<Vec<TestCase>, ConvertError> {
        self.example_names()?
            .iter()
            .map(|name| self.test_case(name))
            .collect()
    }

    fn read_aux_files(&self) -> Result<AuxFiles, ConvertError> {
        Ok(self
            .archive
            .entries_under("tex/")
            .filter(|(name, _)| is_aux_file(name))
            .map(|(name, data)| (name.to_string(), data.to_vec()))
            .collect())
    }

    fn read_tags(&self) -> Result<Vec<String>, ConvertError> {
        Ok(self
            .archive
            .read_optional_text(TAGS_CSV)?
            .map(|csv| split_csv(&csv))
            .unwrap_or_default())
    }

    fn read_tutorial(&self) -> Result<Option<String>, ConvertError> {
        self.optional_section("tutorial")
    }

    fn read_notes(&self) -> Result<Option<String>, ConvertError> {
        self.optional_section("notes")
    }

    fn read_tests(&self) -> Result<TestSuite, ConvertError> {
        let examples = self.example_names()?;
        let mut tests = TestSuite::new();
        for (name, _) in self.archive.entries_under("input/") {
            let partition = if examples.contains(name) {
                Partition::Examples
            } else {
                Partition::Hidden
            };
            tests.insert(partition, name, self.test_case(name)?);
        }
        if tests.is_empty() {
            return Err(ConvertError::format("no test data under input/"));
        }
        Ok(tests)
    }

    fn read_solutions(&self) -> Result<Vec<SolutionSet>, ConvertError> {
        let mut by_stem: BTreeMap<&str, SolutionSet> = BTreeMap::new();
        for (name, data) in self.archive.entries_under("solutions/") {
            let Some((stem, ext)) = source_name(name) else {
                tracing::warn!("ignoring solutions/{name}: no language extension");
                continue;
            };
            let source = String::from_utf8(data.to_vec()).map_err(|_| {
                ConvertError::format(format!("entry 'solutions/{name}' is not UTF-8 text"))
            })?;
            by_stem
                .entry(stem)
                .or_default()
                .insert(ext.to_string(), source);
        }

        let mut solutions = Vec::new();
        for preferred in ["main", "accepted"] {
            if let Some(set) = by_stem.remove(preferred) {
                solutions.push(set);
            }
        }
        solutions.extend(by_stem.into_values());
        Ok(solutions)
    }

    fn read_limits(&self) -> Result<Limits, ConvertError> {
        let Some(path) = self.limits_script() else {
            tracing::warn!("no limits script in package, using default limits");
            return self.default_limits();
        };

        let script = self.archive.read_text(&path)?;
        let values: Vec<u64> = ECHO
            .captures_iter(&script)
            .filter_map(|caps| caps[1].parse().ok())
            .collect();

        match values.as_slice() {
            [time, _repetitions, memory, file_size, ..] => {
                Ok(Limits::new(*time, *memory, Some(*file_size))?)
            }
            _ => {
                tracing::warn!("cannot read limits from {path}, using default limits");
                self.default_limits()
            }
        }
    }
}

fn parse_info(text: &str) -> BTreeMap<String, String> {
    text.lines()
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .collect()
}

/// `solutions/<stem>.<ext>`: the extension is what follows the last dot.
fn source_name(name: &str) -> Option<(&str, &str)> {
    name.rsplit_once('.')
}

fn split_csv(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_aux_file(name: &str) -> bool {
    let lower = name.to_lowercase();
    !(lower.ends_with(".tex")
        || lower.ends_with(".cls")
        || lower == "examples.csv"
        || lower == "tags.csv")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> BocaOptions {
        BocaOptions::default()
    }

    fn package(extra: &[(&str, &str)]) -> Archive {
        let mut entries = vec![
            ("description/problem.info", "basename=sum\nfullname=Soma\ndescfile=sum.pdf\n"),
            ("tex/description.tex", "Add two numbers.\n"),
            ("tex/input.tex", "Two integers."),
            ("tex/output.tex", "Their sum."),
            ("tex/examples.csv", "01"),
            ("input/01", "1 2\n"),
            ("output/01", "3\n"),
            ("input/02", "5 5\n"),
            ("output/02", "10\n"),
            ("solutions/main.cpp", "int main() {}"),
            ("limits/cpp", "#!/bin/bash\necho 2\necho 1\necho 256\necho 64\nexit 0\n"),
        ];
        entries.extend_from_slice(extra);
        Archive::from_entries(entries)
    }

    #[test]
    fn test_reads_metadata_and_sections() {
        let archive = package(&[("tex/notes.tex", "  "), ("tex/tutorial.tex", "Greedy.")]);
        let options = options();
        let reader = BocaReader::new(&archive, Path::new("x.zip"), &options).unwrap();
        assert_eq!(reader.read_id().unwrap(), "sum");
        assert_eq!(reader.read_title().unwrap(), "Soma");
        assert_eq!(reader.read_description().unwrap(), "Add two numbers.");
        assert_eq!(reader.read_notes().unwrap(), None);
        assert_eq!(reader.read_tutorial().unwrap(), Some("Greedy.".to_string()));
    }

    #[test]
    fn test_id_and_title_fallbacks() {
        let archive = Archive::from_entries([("tex/description.tex", "d")]);
        let options = options();
        let reader = BocaReader::new(&archive, Path::new("/in/knapsack.zip"), &options).unwrap();
        assert_eq!(reader.read_id().unwrap(), "knapsack");
        assert_eq!(reader.read_title().unwrap(), "knapsack");

        let archive = Archive::from_entries([("tex/title.tex", "Knapsack\n")]);
        let reader = BocaReader::new(&archive, Path::new("/in/knapsack.zip"), &options).unwrap();
        assert_eq!(reader.read_title().unwrap(), "Knapsack");
    }

    #[test]
    fn test_examples_csv_splits_tests() {
        let archive = package(&[]);
        let options = options();
        let reader = BocaReader::new(&archive, Path::new("x.zip"), &options).unwrap();
        let tests = reader.read_tests().unwrap();
        assert_eq!(tests.examples().keys().collect::<Vec<_>>(), vec!["01"]);
        assert_eq!(tests.hidden().keys().collect::<Vec<_>>(), vec!["02"]);
        assert_eq!(reader.read_examples().unwrap(), vec![TestCase::new("1 2\n", "3\n")]);
    }

    #[test]
    fn test_missing_output_is_a_format_error() {
        let archive = package(&[("input/03", "x")]);
        let options = options();
        let reader = BocaReader::new(&archive, Path::new("x.zip"), &options).unwrap();
        let err = reader.read_tests().unwrap_err();
        assert!(err.to_string().contains("output/03"));
    }

    #[test]
    fn test_limits_from_main_language_script() {
        let archive = package(&[("limits/c", "echo 9\necho 9\necho 9\necho 9\n")]);
        let options = options();
        let reader = BocaReader::new(&archive, Path::new("x.zip"), &options).unwrap();
        let limits = reader.read_limits().unwrap();
        assert_eq!(limits.time_seconds(), 2);
        assert_eq!(limits.memory_mb(), 256);
        assert_eq!(limits.max_file_size_kb(), Some(64));
    }

    #[test]
    fn test_python_tries_versioned_scripts() {
        let archive = Archive::from_entries([
            ("solutions/main.py", "print()"),
            ("limits/py2", "echo 7\necho 1\necho 128\necho 32\n"),
            ("limits/py3", "echo 3\necho 1\necho 256\necho 64\n"),
        ]);
        let options = options();
        let reader = BocaReader::new(&archive, Path::new("x.zip"), &options).unwrap();
        assert_eq!(reader.read_limits().unwrap().time_seconds(), 3);
    }

    #[test]
    fn test_unreadable_limits_fall_back_to_defaults() {
        let archive = package(&[("limits/cpp", "echo $TIME\necho 1\n")]);
        let options = options();
        let reader = BocaReader::new(&archive, Path::new("x.zip"), &options).unwrap();
        let limits = reader.read_limits().unwrap();
        assert_eq!(limits.time_seconds(), 1);
        assert_eq!(limits.memory_mb(), 512);
        assert_eq!(limits.max_file_size_kb(), Some(1024));
    }

    #[test]
    fn test_solutions_in_preference_order() {
        let archive = package(&[
            ("solutions/accepted.py", "print()"),
            ("solutions/brute.c", "int main;"),
        ]);
        let options = options();
        let reader = BocaReader::new(&archive, Path::new("x.zip"), &options).unwrap();
        let solutions = reader.read_solutions().unwrap();
        assert_eq!(solutions.len(), 3);
        assert!(solutions[0].contains_key("cpp"));
        assert!(solutions[1].contains_key("py"));
        assert!(solutions[2].contains_key("c"));
    }

    #[test]
    fn test_aux_files_skip_sources_and_lists() {
        let archive = package(&[("tex/graph.png", "png"), ("tex/problem.cls", "cls")]);
        let options = options();
        let reader = BocaReader::new(&archive, Path::new("x.zip"), &options).unwrap();
        let aux = reader.read_aux_files().unwrap();
        assert_eq!(aux.keys().collect::<Vec<_>>(), vec!["graph.png"]);
    }

    #[test]
    fn test_unreadable_problem_info_is_a_format_error() {
        let archive = Archive::from_entries([
            ("description/problem.info", vec![0xff, 0xfe, b'=', 0x80]),
            ("tex/description.tex", b"d".to_vec()),
        ]);
        let options = options();
        let err = BocaReader::new(&archive, Path::new("/in/sum.zip"), &options)
            .err()
            .unwrap();
        assert!(matches!(err, ConvertError::Format(message) if message.contains("problem.info")));
    }

    #[test]
    fn test_info_values_keep_later_separators() {
        let info = parse_info("basename=sum\nfullname=a = b\n");
        assert_eq!(info.get("fullname").map(String::as_str), Some("a = b"));
    }

    #[test]
    fn test_main_extension_is_taken_after_the_last_dot() {
        let archive = Archive::from_entries([
            ("solutions/main.a.py", "print()"),
            ("solutions/main.cpp", "int main() {}"),
            ("limits/c", "echo 5\necho 1\necho 128\necho 32\n"),
            ("limits/cpp", "echo 1\necho 1\necho 256\necho 64\n"),
        ]);
        let options = options();
        let reader = BocaReader::new(&archive, Path::new("x.zip"), &options).unwrap();
        assert_eq!(reader.read_limits().unwrap().time_seconds(), 1);

        let solutions = reader.read_solutions().unwrap();
        assert!(solutions[0].contains_key("cpp"));
        assert!(solutions.iter().any(|set| set.contains_key("py")));
    }
}
