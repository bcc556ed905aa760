//! The `<question type="coderunner">` element, built step by step.

use super::{prototype_for, Images};
use crate::error::ConvertError;
use crate::options::CodeRunnerOptions;
use crate::writer::PackageWriter;
use crate::xml::{Element, Node};
use base64::Engine;
use ejb::{Partition, Problem, ValidationError};

/// Everything but the answer language, which [`for_language`] fills in.
pub(super) fn build(
    problem: &Problem,
    images: &Images,
    options: &CodeRunnerOptions,
) -> Result<Element, ConvertError> {
    let mut writer = QuestionWriter {
        question: skeleton(options),
        images,
        options,
        sections: Vec::new(),
    };
    writer.write_steps(problem)?;
    Ok(writer.finish())
}

/// A `<quiz>` holding `question` answered in `language`.
pub(super) fn for_language(
    question: &Element,
    problem: &Problem,
    language: &str,
) -> Result<Element, ConvertError> {
    let missing = || ValidationError::MissingSolution(language.to_string());
    let prototype = prototype_for(language).ok_or_else(missing)?;
    let source = problem.evaluation().solution_for(language).ok_or_else(missing)?;

    let mut question = question.clone();
    set_content(&mut question, "coderunnertype", Node::Text(prototype.to_string()));
    set_content(&mut question, "answer", Node::Literal(source.to_string()));
    Ok(Element::new("quiz").child(question))
}

/// `0` for every free attempt, then 10% steps.
pub(super) fn penalty_regime(grace: i64) -> String {
    let free = usize::try_from(grace).unwrap_or(0);
    std::iter::repeat("0")
        .take(free)
        .chain(["10", "20", "..."])
        .collect::<Vec<_>>()
        .join(", ")
}

fn skeleton(options: &CodeRunnerOptions) -> Element {
    let flag = |on: bool| if on { "1" } else { "0" };
    Element::new("question")
        .attr("type", "coderunner")
        .child(Element::new("name").child(Element::new("text")))
        .child(
            Element::new("questiontext")
                .attr("format", "html")
                .child(Element::new("text")),
        )
        .child(
            Element::new("generalfeedback")
                .attr("format", "html")
                .child(Element::new("text")),
        )
        .child(Element::with_text("defaultgrade", "1"))
        .child(Element::with_text("penalty", "0"))
        .child(Element::with_text("hidden", "0"))
        .child(Element::new("coderunnertype"))
        .child(Element::with_text("prototypetype", "0"))
        .child(Element::with_text("allornothing", flag(options.all_or_nothing)))
        .child(Element::with_text("penaltyregime", penalty_regime(options.penalty_grace)))
        .child(Element::with_text("precheck", "0"))
        .child(Element::new("answer"))
        .child(Element::new("answerpreload"))
        .child(Element::with_text("validateonsave", "1"))
        .child(Element::new("cputimelimitsecs"))
        .child(Element::new("memlimitmb"))
        .child(Element::new("maxfilesize"))
        .child(Element::new("testcases"))
        .child(Element::new("tags"))
}

fn set_content(parent: &mut Element, name: &str, node: Node) {
    if let Some(element) = parent.find_mut(name) {
        element.children = vec![node];
    }
}

/// Set the `<text>` child of `parent/name`.
fn set_text_child(parent: &mut Element, name: &str, node: Node) {
    if let Some(text) = parent.find_mut(name).and_then(|e| e.find_mut("text")) {
        text.children = vec![node];
    }
}

struct QuestionWriter<'a> {
    question: Element,
    images: &'a Images,
    options: &'a CodeRunnerOptions,
    /// HTML blocks of the question text, in order.
    sections: Vec<String>,
}

impl QuestionWriter<'_> {
    fn to_html(&self, problem: &Problem, markup: &str) -> Result<String, ConvertError> {
        let translation = self.images.translator.translate(markup)?;
        for warning in &translation.warnings {
            tracing::warn!(problem = problem.id(), "{warning}");
        }
        Ok(translation.html.trim().to_string())
    }

    fn section(&mut self, problem: &Problem, heading: Option<&str>, markup: &str) -> Result<(), ConvertError> {
        let html = self.to_html(problem, markup)?;
        let block = match heading {
            Some(heading) => format!("<p>\n<b>{heading}</b>\n<br>\n{html}\n</p>\n"),
            None => format!("<p>\n{html}\n</p>\n"),
        };
        self.sections.push(block);
        Ok(())
    }

    fn finish(mut self) -> Element {
        let html = self.sections.join("\n");
        set_text_child(&mut self.question, "questiontext", Node::Literal(html));
        self.question
    }
}

impl PackageWriter for QuestionWriter<'_> {
    fn write_title(&mut self, problem: &Problem) -> Result<(), ConvertError> {
        let title = problem.statement().title().to_string();
        set_text_child(&mut self.question, "name", Node::Text(title));
        Ok(())
    }

    fn write_description(&mut self, problem: &Problem) -> Result<(), ConvertError> {
        self.section(problem, None, problem.statement().description())
    }

    fn write_input(&mut self, problem: &Problem) -> Result<(), ConvertError> {
        let heading = self.options.headings.input.clone();
        self.section(problem, Some(&heading), problem.statement().input_spec())
    }

    fn write_output(&mut self, problem: &Problem) -> Result<(), ConvertError> {
        let heading = self.options.headings.output.clone();
        self.section(problem, Some(&heading), problem.statement().output_spec())
    }

    fn write_aux_files(&mut self, _problem: &Problem) -> Result<(), ConvertError> {
        let engine = base64::engine::general_purpose::STANDARD;
        let files: Vec<Element> = self
            .images
            .files
            .iter()
            .map(|(name, data)| {
                Element::with_text("file", engine.encode(data))
                    .attr("name", name.as_str())
                    .attr("path", "/")
                    .attr("encoding", "base64")
            })
            .collect();
        if let Some(text) = self.question.find_mut("questiontext") {
            for file in files {
                text.push(file);
            }
        }
        Ok(())
    }

    fn write_tags(&mut self, problem: &Problem) -> Result<(), ConvertError> {
        if let Some(tags) = self.question.find_mut("tags") {
            for tag in problem.statement().tags() {
                tags.push(Element::new("tag").child(Element::with_text("text", tag.as_str())));
            }
        }
        Ok(())
    }

    fn write_tutorial(&mut self, problem: &Problem) -> Result<(), ConvertError> {
        if let Some(tutorial) = problem.statement().tutorial() {
            let html = self.to_html(problem, tutorial)?;
            set_text_child(&mut self.question, "generalfeedback", Node::Literal(html));
        }
        Ok(())
    }

    fn write_notes(&mut self, problem: &Problem) -> Result<(), ConvertError> {
        match problem.statement().notes() {
            Some(notes) if self.options.include_notes => {
                let heading = self.options.headings.notes.clone();
                self.section(problem, Some(&heading), notes)
            }
            _ => Ok(()),
        }
    }

    fn write_tests(&mut self, problem: &Problem) -> Result<(), ConvertError> {
        let Some(testcases) = self.question.find_mut("testcases") else {
            return Ok(());
        };
        for (partition, _, test) in problem.evaluation().tests().iter() {
            let useasexample = if partition == Partition::Examples { "1" } else { "0" };
            testcases.push(
                Element::new("testcase")
                    .attr("testtype", "0")
                    .attr("useasexample", useasexample)
                    .attr("hiderestiffail", "0")
                    .attr("mark", "1.0000000")
                    .child(Element::new("testcode").child(Element::new("text")))
                    .child(Element::new("stdin").child(Element::with_text("text", test.input())))
                    .child(Element::new("expected").child(Element::with_text("text", test.output())))
                    .child(Element::new("extra").child(Element::new("text")))
                    .child(Element::new("display").child(Element::with_text("text", "SHOW"))),
            );
        }
        Ok(())
    }

    fn write_limits(&mut self, problem: &Problem) -> Result<(), ConvertError> {
        let limits = problem.evaluation().limits();
        set_content(
            &mut self.question,
            "cputimelimitsecs",
            Node::Text(limits.time_seconds().to_string()),
        );
        set_content(
            &mut self.question,
            "memlimitmb",
            Node::Text(limits.memory_mb().to_string()),
        );
        if let Some(size) = limits.max_file_size_kb() {
            set_content(&mut self.question, "maxfilesize", Node::Text(size.to_string()));
        }
        Ok(())
    }
}
