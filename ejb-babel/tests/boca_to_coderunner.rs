mod common;

use ejb_babel::formats::CodeRunnerFormat;
use ejb_babel::xml::{self, Element};
use ejb_babel::{convert, ConvertError, ConvertOptions, ConvertSpec, Format, FormatRegistry};
use std::fs;
use tempfile::tempdir;

fn options(answer_language: &str) -> ConvertOptions {
    let mut options = ConvertOptions::default();
    options.coderunner.answer_language = answer_language.to_string();
    options
}

fn question(path: &std::path::Path) -> Element {
    let quiz = xml::parse(&fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(quiz.name, "quiz");
    quiz.find("question").unwrap().clone()
}

#[test]
fn boca_sum_becomes_one_cpp_question() {
    let dir = tempdir().unwrap();
    let source = common::boca_sum(dir.path());
    let registry = FormatRegistry::default();
    let options = options("cpp");

    let problem = registry.read(&source, "boca", &options).unwrap();
    let artifacts = registry
        .write(&problem, dir.path(), "coderunner", &options)
        .unwrap();
    assert_eq!(artifacts, vec![dir.path().join("sum-cpp.xml")]);

    let question = question(&artifacts[0]);
    assert_eq!(question.attribute("type"), Some("coderunner"));
    assert_eq!(question.find_path("name/text").unwrap().text_content(), "Sum");
    assert!(question
        .find_path("questiontext/text")
        .unwrap()
        .text_content()
        .contains("Add two numbers."));

    let cases: Vec<&Element> = question.find("testcases").unwrap().find_all("testcase").collect();
    assert_eq!(cases.len(), 2);
    let examples: Vec<String> = cases
        .iter()
        .filter(|case| case.attribute("useasexample") == Some("1"))
        .map(|case| case.find_path("stdin/text").unwrap().text_content())
        .collect();
    assert_eq!(examples, vec!["1 2"]);

    assert_eq!(question.find("coderunnertype").unwrap().text_content(), "cpp_program");
    assert!(question.find("answer").unwrap().text_content().contains("scanf"));
    assert_eq!(question.find("cputimelimitsecs").unwrap().text_content(), "1");
    assert_eq!(question.find("memlimitmb").unwrap().text_content(), "256");
    assert_eq!(question.find("penaltyregime").unwrap().text_content(), "0, 0, 10, 20, ...");
}

#[test]
fn source_with_cdata_terminator_survives() {
    let dir = tempdir().unwrap();
    let mut entries = common::BOCA_SUM.to_vec();
    entries.retain(|(name, _)| *name != "solutions/main.cpp");
    let source_code = "int a[2][2]; int main() { return a[a[0][0]]>0; }";
    entries.push(("solutions/main.cpp", source_code));
    let source = common::write_zip(&dir.path().join("sum.zip"), &entries);

    let registry = FormatRegistry::default();
    let options = options("all");
    let problem = registry.read(&source, "boca", &options).unwrap();
    let artifacts = registry
        .write(&problem, dir.path(), "coderunner", &options)
        .unwrap();

    let question = question(&artifacts[0]);
    assert_eq!(question.find("answer").unwrap().text_content(), source_code);
}

#[test]
fn every_available_language_gets_a_file() {
    let dir = tempdir().unwrap();
    let mut entries = common::BOCA_SUM.to_vec();
    entries.push(("solutions/accepted.py", "print(sum(map(int, input().split())))\n"));
    entries.push(("solutions/accepted.java", "class Main {}\n"));
    let source = common::write_zip(&dir.path().join("sum.zip"), &entries);

    let registry = FormatRegistry::default();
    let options = options("all");
    let problem = registry.read(&source, "boca", &options).unwrap();
    let mut artifacts = registry
        .write(&problem, dir.path(), "coderunner", &options)
        .unwrap();
    artifacts.sort();
    assert_eq!(
        artifacts,
        vec![dir.path().join("sum-cpp.xml"), dir.path().join("sum-py.xml")]
    );
    assert_eq!(
        question(&artifacts[1]).find("coderunnertype").unwrap().text_content(),
        "python3"
    );
}

#[test]
fn missing_answer_language_fails_the_file() {
    let dir = tempdir().unwrap();
    let source = common::boca_sum(dir.path());
    let options = options("py");
    let problem = FormatRegistry::default()
        .read(&source, "boca", &options)
        .unwrap();
    let err = CodeRunnerFormat::default()
        .write(&problem, dir.path(), &options)
        .unwrap_err();
    assert_eq!(err.to_string(), "no py solution available");
}

#[test]
fn negative_penalty_stops_the_batch_before_reading() {
    let dir = tempdir().unwrap();
    common::boca_sum(dir.path());
    let out = tempdir().unwrap();
    let mut options = ConvertOptions::default();
    options.coderunner.penalty_grace = -1;

    let spec = ConvertSpec::new("boca", "coderunner")
        .with_input(dir.path())
        .with_output_dir(out.path())
        .with_options(options);
    let result = convert(&FormatRegistry::default(), &spec);
    assert!(matches!(result, Err(ConvertError::Configuration(_))));
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn batch_keeps_going_after_a_broken_package() {
    let dir = tempdir().unwrap();
    common::boca_sum(dir.path());
    common::write_zip(&dir.path().join("broken.zip"), &[("tex/description.tex", "x")]);
    let out = tempdir().unwrap();

    let spec = ConvertSpec::new("boca", "coderunner")
        .with_input(dir.path())
        .with_output_dir(out.path());
    let report = convert(&FormatRegistry::default(), &spec).unwrap();

    assert_eq!(report.files.len(), 2);
    let failed: Vec<_> = report.failures().map(|f| f.input.clone()).collect();
    assert_eq!(failed, vec![dir.path().join("broken.zip")]);
    assert!(out.path().join("sum-cpp.xml").is_file());
}
