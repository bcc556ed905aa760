//! Package fixtures built on the fly, and fakes for external programs.
#![allow(dead_code)]

use ejb_babel::archive::ArchiveWriter;
use ejb_babel::{ConvertError, PdfCompiler};
use std::fs;
use std::path::{Path, PathBuf};

pub fn write_zip(path: &Path, entries: &[(&str, &str)]) -> PathBuf {
    let mut zip = ArchiveWriter::create(path).unwrap();
    for (name, data) in entries {
        zip.write_entry(name, data).unwrap();
    }
    zip.finish().unwrap()
}

/// `sum.zip`: one example (01), one hidden test (02) and a C++ solution.
pub const BOCA_SUM: &[(&str, &str)] = &[
    ("description/problem.info", "basename=sum\nfullname=Sum\ndescfile=sum.pdf\n"),
    ("description/tags.csv", "math,easy"),
    ("tex/description.tex", "Add two numbers."),
    ("tex/input.tex", "Two integers $a$ and $b$."),
    ("tex/output.tex", "The value of $a + b$."),
    ("tex/notes.tex", "Both fit in \\texttt{int}."),
    ("tex/examples.csv", "01"),
    ("input/01", "1 2"),
    ("output/01", "3"),
    ("input/02", "5 5"),
    ("output/02", "10"),
    ("solutions/main.cpp", "#include <cstdio>\nint main() { int a, b; scanf(\"%d %d\", &a, &b); printf(\"%d\\n\", a + b); }\n"),
    (
        "limits/cpp",
        "#!/bin/bash\n# time\necho 1\n# repetitions\necho 1\n# memory\necho 256\n# output\necho 512\nexit 0\n",
    ),
];

pub fn boca_sum(dir: &Path) -> PathBuf {
    write_zip(&dir.join("sum.zip"), BOCA_SUM)
}

pub const POLYGON_MANIFEST: &str = r#"<?xml version="1.0" encoding="utf-8" standalone="no"?>
<problem revision="7" short-name="max-pair" url="https://polygon.codeforces.com/p/u/max-pair">
  <names>
    <name language="english" value="Max Pair"/>
  </names>
  <statements>
    <statement charset="UTF-8" language="english" mathjax="true" path="statements/english/problem.tex" type="application/x-tex"/>
  </statements>
  <judging cpu-name="Intel(R) Core(TM) i3-8100 CPU @ 3.60GHz" cpu-speed="3600" input-file="" output-file="">
    <testset name="tests">
      <time-limit>1000</time-limit>
      <memory-limit>268435456</memory-limit>
      <test-count>3</test-count>
      <input-path-pattern>tests/%02d</input-path-pattern>
      <answer-path-pattern>tests/%02d.a</answer-path-pattern>
      <tests>
        <test method="manual" sample="true"/>
        <test cmd="gen 1" method="generated"/>
        <test cmd="gen 2" method="generated"/>
      </tests>
    </testset>
  </judging>
  <assets>
    <solutions>
      <solution tag="main">
        <source path="solutions/max.cpp" type="cpp.g++17"/>
      </solution>
      <solution tag="accepted">
        <source path="solutions/max.py" type="python.3"/>
      </solution>
    </solutions>
  </assets>
  <tags>
    <tag value="greedy"/>
  </tags>
</problem>
"#;

pub fn polygon_max_pair(dir: &Path) -> PathBuf {
    write_zip(
        &dir.join("max-pair.zip"),
        &[
            ("problem.xml", POLYGON_MANIFEST),
            ("statement-sections/english/name.tex", "Max Pair"),
            ("statement-sections/english/legend.tex", "Find the \\textbf{largest} pair sum.\n"),
            ("statement-sections/english/input.tex", "A line with $n$ integers.\n"),
            ("statement-sections/english/output.tex", "One integer.\n"),
            ("statement-sections/english/tutorial.tex", "Sort and take the two largest.\n"),
            ("statement-sections/english/example.01", "3\n1 2 3\n"),
            ("statement-sections/english/example.01.a", "5\n"),
            ("statement-sections/english/chart.png", "\u{89}PNG"),
            ("tests/01", "3\n1 2 3\n"),
            ("tests/01.a", "5\n"),
            ("tests/02", "2\n7 7\n"),
            ("tests/02.a", "14\n"),
            ("tests/03", "4\n1 1 1 9\n"),
            ("tests/03.a", "10\n"),
            ("solutions/max.cpp", "int main() {}\n"),
            ("solutions/max.py", "print(max_pair())\n"),
        ],
    )
}

/// Writes a placeholder PDF instead of running LaTeX.
pub struct FakeLatex;

impl PdfCompiler for FakeLatex {
    fn compile(&self, source: &Path, output_dir: &Path) -> Result<PathBuf, ConvertError> {
        let stem = source.file_stem().unwrap().to_string_lossy().into_owned();
        let pdf = output_dir.join(format!("{stem}.pdf"));
        fs::write(&pdf, "%PDF-1.4\n").map_err(|e| ConvertError::io("fake latex", e))?;
        Ok(pdf)
    }
}

/// Fails like a LaTeX run with errors in the document.
pub struct BrokenLatex;

impl PdfCompiler for BrokenLatex {
    fn compile(&self, _source: &Path, _output_dir: &Path) -> Result<PathBuf, ConvertError> {
        Err(ConvertError::io(
            "pdflatex exited with exit status: 1",
            std::io::Error::other("! Undefined control sequence."),
        ))
    }
}
