use crate::archive::{is_relative_entry, ArchiveWriter};
use crate::error::ConvertError;
use crate::external::PdfCompiler;
use crate::options::BocaOptions;
use crate::writer::PackageWriter;
use ejb::{Limits, Partition, Problem, TestCase};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const LIMITS_TEMPLATE: &str = include_str!("templates/limits.sh");
const MAIN_TEX: &str = include_str!("templates/main.tex");
const PROBLEM_CLS: &str = include_str!("templates/problem.cls");

/// One limits script per language BOCA judges.
const LIMIT_LANGUAGES: [&str; 5] = ["c", "cpp", "java", "py2", "py3"];

/// Template sub-directories that are generated rather than copied.
const GENERATED_DIRS: [&str; 2] = ["limits", "tex"];

/// Write `<output_dir>/<id>.zip`. A package that fails half way is removed.
pub(super) fn write_package(
    problem: &Problem,
    output_dir: &Path,
    options: &BocaOptions,
    compiler: &dyn PdfCompiler,
) -> Result<PathBuf, ConvertError> {
    let path = output_dir.join(format!("{}.zip", problem.id()));
    match build(problem, &path, options, compiler) {
        Ok(path) => {
            tracing::info!("created {}", path.display());
            Ok(path)
        }
        Err(err) => {
            if path.exists() {
                let _ = fs::remove_file(&path);
            }
            Err(err)
        }
    }
}

fn build(
    problem: &Problem,
    path: &Path,
    options: &BocaOptions,
    compiler: &dyn PdfCompiler,
) -> Result<PathBuf, ConvertError> {
    let scratch = scratch_dir(options, problem.id())?;
    let mut package = BocaPackage::new(ArchiveWriter::create(path)?, &scratch, problem, options)?;
    package.write_steps(problem)?;
    package.write_statement_pdf(problem, compiler)?;
    package.zip.finish()
}

fn scratch_dir(options: &BocaOptions, id: &str) -> Result<TempDir, ConvertError> {
    let base = options.tmp_dir.clone().unwrap_or_else(std::env::temp_dir);
    fs::create_dir_all(&base)
        .map_err(|e| ConvertError::io(format!("creating {}", base.display()), e))?;
    tempfile::Builder::new()
        .prefix(&format!("ejb-{id}-"))
        .tempdir_in(&base)
        .map_err(|e| ConvertError::io(format!("creating a scratch directory in {}", base.display()), e))
}

struct BocaPackage<'a> {
    zip: ArchiveWriter,
    /// LaTeX sources for the statement PDF.
    tex_dir: PathBuf,
    options: &'a BocaOptions,
    /// New name of every test, examples first.
    tests: Vec<(String, Partition, &'a TestCase)>,
}

impl<'a> BocaPackage<'a> {
    fn new(
        zip: ArchiveWriter,
        scratch: &TempDir,
        problem: &'a Problem,
        options: &'a BocaOptions,
    ) -> Result<Self, ConvertError> {
        let tex_dir = scratch.path().join("tex");
        fs::create_dir_all(&tex_dir)
            .map_err(|e| ConvertError::io(format!("creating {}", tex_dir.display()), e))?;

        let suite = problem.evaluation().tests();
        let width = suite.len().to_string().len();
        let tests = suite
            .iter()
            .enumerate()
            .map(|(i, (partition, _, test))| (format!("{:0width$}", i + 1), partition, test))
            .collect();

        Ok(Self {
            zip,
            tex_dir,
            options,
            tests,
        })
    }

    /// `name` joined to the scratch tex directory; it must not leave it.
    fn scratch_path(&self, name: &str) -> Result<PathBuf, ConvertError> {
        if !is_relative_entry(name) {
            return Err(ConvertError::format(format!(
                "file name '{name}' points outside the package"
            )));
        }
        Ok(self.tex_dir.join(name))
    }

    /// `tex/<name>` goes both into the package and next to main.tex.
    fn write_tex(&mut self, name: &str, content: &[u8]) -> Result<(), ConvertError> {
        let scratch = self.scratch_path(name)?;
        if let Some(parent) = scratch.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConvertError::io(format!("creating {}", parent.display()), e))?;
        }
        fs::write(&scratch, content)
            .map_err(|e| ConvertError::io(format!("writing {}", scratch.display()), e))?;
        self.zip.write_entry(&format!("tex/{name}"), content)
    }

    fn write_scratch(&self, name: &str, content: &str) -> Result<(), ConvertError> {
        let path = self.scratch_path(name)?;
        fs::write(&path, content).map_err(|e| ConvertError::io(format!("writing {}", path.display()), e))
    }

    /// Copy compile/run/compare/... scripts from the template directory.
    fn copy_template_dirs(&mut self, template_dir: &Path) -> Result<(), ConvertError> {
        for dir in sorted_entries(template_dir)? {
            let Some(dir_name) = dir.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                continue;
            };
            if !dir.is_dir() || GENERATED_DIRS.contains(&dir_name.as_str()) {
                continue;
            }
            for file in sorted_entries(&dir)? {
                if !file.is_file() {
                    continue;
                }
                let data = fs::read(&file)
                    .map_err(|e| ConvertError::io(format!("reading {}", file.display()), e))?;
                let name = file.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
                self.zip.write_entry(&format!("{dir_name}/{name}"), data)?;
            }
        }
        Ok(())
    }

    fn write_statement_pdf(&mut self, problem: &Problem, compiler: &dyn PdfCompiler) -> Result<(), ConvertError> {
        let statement = problem.statement();
        let mut class_options = Vec::new();
        if self.options.include_notes && statement.notes().is_some() {
            class_options.push("notes");
        }
        if self.options.include_tutorial && statement.tutorial().is_some() {
            class_options.push("tutorial");
        }

        let main = if class_options.is_empty() {
            MAIN_TEX.to_string()
        } else {
            MAIN_TEX.replacen(
                "\\documentclass",
                &format!("\\documentclass[{}]", class_options.join(",")),
                1,
            )
        };
        self.write_tex("main.tex", main.as_bytes())?;
        self.write_tex("problem.cls", PROBLEM_CLS.as_bytes())?;

        let pdf = compiler.compile(&self.tex_dir.join("main.tex"), &self.tex_dir)?;
        let data = fs::read(&pdf).map_err(|e| ConvertError::io(format!("reading {}", pdf.display()), e))?;
        self.zip
            .write_entry(&format!("description/{}.pdf", problem.id()), data)
    }
}

impl PackageWriter for BocaPackage<'_> {
    fn write_id(&mut self, problem: &Problem) -> Result<(), ConvertError> {
        let info = format!(
            "basename={id}\nfullname={title}\ndescfile={id}.pdf\n",
            id = problem.id(),
            title = problem.statement().title()
        );
        self.zip.write_entry("description/problem.info", info)
    }

    fn write_title(&mut self, problem: &Problem) -> Result<(), ConvertError> {
        self.write_tex("title.tex", problem.statement().title().as_bytes())
    }

    fn write_description(&mut self, problem: &Problem) -> Result<(), ConvertError> {
        self.write_tex("description.tex", problem.statement().description().as_bytes())
    }

    fn write_input(&mut self, problem: &Problem) -> Result<(), ConvertError> {
        self.write_tex("input.tex", problem.statement().input_spec().as_bytes())
    }

    fn write_output(&mut self, problem: &Problem) -> Result<(), ConvertError> {
        self.write_tex("output.tex", problem.statement().output_spec().as_bytes())
    }

    fn write_examples(&mut self, problem: &Problem) -> Result<(), ConvertError> {
        let names: Vec<&str> = self
            .tests
            .iter()
            .filter(|(_, partition, _)| *partition == Partition::Examples)
            .map(|(name, _, _)| name.as_str())
            .collect();
        let csv = names.join(",");
        self.zip.write_entry("tex/examples.csv", csv)?;

        let mut table = String::from("\\begin{examples}\n");
        for (i, example) in problem.statement().examples().iter().enumerate() {
            let stem = format!("example-{}", i + 1);
            self.write_scratch(&format!("{stem}.in"), example.input())?;
            self.write_scratch(&format!("{stem}.out"), example.output())?;
            table.push_str(&format!("\\exmp{{{stem}.in}}{{{stem}.out}}\n"));
        }
        table.push_str("\\end{examples}\n");
        self.write_scratch("examples.tex", &table)
    }

    fn write_aux_files(&mut self, problem: &Problem) -> Result<(), ConvertError> {
        for (name, data) in problem.statement().aux_files() {
            self.write_tex(name, data)?;
        }
        let options = self.options;
        if let Some(template_dir) = &options.template_dir {
            self.copy_template_dirs(template_dir)?;
        }
        Ok(())
    }

    fn write_tags(&mut self, problem: &Problem) -> Result<(), ConvertError> {
        self.zip
            .write_entry("description/tags.csv", problem.statement().tags().join(","))
    }

    fn write_tutorial(&mut self, problem: &Problem) -> Result<(), ConvertError> {
        match problem.statement().tutorial() {
            Some(tutorial) => self.write_tex("tutorial.tex", tutorial.as_bytes()),
            None => Ok(()),
        }
    }

    fn write_notes(&mut self, problem: &Problem) -> Result<(), ConvertError> {
        match problem.statement().notes() {
            Some(notes) => self.write_tex("notes.tex", notes.as_bytes()),
            None => Ok(()),
        }
    }

    fn write_tests(&mut self, _problem: &Problem) -> Result<(), ConvertError> {
        for (name, _, test) in &self.tests {
            self.zip.write_entry(&format!("input/{name}"), test.input())?;
            self.zip.write_entry(&format!("output/{name}"), test.output())?;
        }
        Ok(())
    }

    fn write_solutions(&mut self, problem: &Problem) -> Result<(), ConvertError> {
        for (i, set) in problem.evaluation().solutions().iter().enumerate() {
            let stem = match i {
                0 => "main".to_string(),
                1 => "accepted".to_string(),
                _ => format!("accepted{i}"),
            };
            for (language, source) in set {
                self.zip
                    .write_entry(&format!("solutions/{stem}.{language}"), source)?;
            }
        }
        Ok(())
    }

    fn write_limits(&mut self, problem: &Problem) -> Result<(), ConvertError> {
        let script = render_limits(
            problem.evaluation().limits(),
            self.options.default_limits.max_file_size_kb,
        );
        for language in LIMIT_LANGUAGES {
            self.zip.write_entry(&format!("limits/{language}"), &script)?;
        }
        Ok(())
    }
}

/// Fill the limits template. Comment lines are dropped (the shebang stays); the remaining lines
/// 0, 2 and 3 echo time, memory and file size, line 1 keeps the repetition count.
fn render_limits(limits: &Limits, default_file_size_kb: u64) -> String {
    let mut lines: Vec<String> = LIMITS_TEMPLATE
        .lines()
        .filter(|line| line.starts_with("#!") || !line.starts_with('#'))
        .map(str::to_string)
        .collect();
    let offset = usize::from(lines.first().is_some_and(|l| l.starts_with("#!")));

    let file_size = limits.max_file_size_kb().unwrap_or(default_file_size_kb);
    for (position, value) in [
        (0, limits.time_seconds()),
        (2, limits.memory_mb()),
        (3, file_size),
    ] {
        if let Some(line) = lines.get_mut(offset + position) {
            *line = format!("echo {value}");
        }
    }

    let mut script = lines.join("\n");
    script.push('\n');
    script
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, ConvertError> {
    let entries = fs::read_dir(dir).map_err(|e| ConvertError::io(format!("reading {}", dir.display()), e))?;
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ConvertError::io(format!("reading {}", dir.display()), e))?;
        paths.push(entry.path());
    }
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_limits() {
        let limits = Limits::new(3, 256, Some(64)).unwrap();
        assert_eq!(
            render_limits(&limits, 1024),
            "#!/bin/bash\necho 3\necho 1\necho 256\necho 64\nexit 0\n"
        );
    }

    #[test]
    fn test_render_limits_default_file_size() {
        let limits = Limits::new(1, 128, None).unwrap();
        assert!(render_limits(&limits, 2048).contains("echo 2048\n"));
    }
}
