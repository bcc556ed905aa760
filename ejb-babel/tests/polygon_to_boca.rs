mod common;

use common::FakeLatex;
use ejb_babel::formats::{BocaFormat, CodeRunnerFormat, PolygonFormat};
use ejb_babel::{convert, ConvertSpec, Format, FormatRegistry, Outcome};
use tempfile::tempdir;

fn registry() -> FormatRegistry {
    let mut registry = FormatRegistry::new();
    registry.register(PolygonFormat);
    registry.register(BocaFormat::with_compiler(FakeLatex));
    registry.register(CodeRunnerFormat::default());
    registry
}

#[test]
fn polygon_package_converts_to_boca() {
    let dir = tempdir().unwrap();
    let source = common::polygon_max_pair(dir.path());
    let out = tempdir().unwrap();

    let spec = ConvertSpec::new("polygon", "boca")
        .with_input(&source)
        .with_output_dir(out.path());
    let report = convert(&registry(), &spec).unwrap();
    assert!(report.all_succeeded());
    assert_eq!(
        report.files[0].outcome,
        Outcome::Converted {
            artifacts: vec![out.path().join("max-pair.zip")]
        }
    );

    let options = spec.options.clone();
    let polygon = PolygonFormat.read(&source, &options).unwrap();
    let boca = BocaFormat::default()
        .read(&out.path().join("max-pair.zip"), &options)
        .unwrap();

    assert_eq!(boca.id(), "max-pair");
    assert_eq!(boca.statement(), polygon.statement());
    assert_eq!(boca.statement().tags(), ["greedy".to_string()]);
    assert!(boca.statement().aux_files().contains_key("chart.png"));
    assert_eq!(boca.evaluation().tests().examples().len(), 1);
    assert_eq!(boca.evaluation().tests().hidden().len(), 2);
    assert_eq!(boca.evaluation().limits().time_seconds(), 1);
    assert_eq!(boca.evaluation().limits().memory_mb(), 256);
    assert_eq!(boca.evaluation().limits().max_file_size_kb(), Some(64));
    assert_eq!(boca.evaluation().languages(), vec!["cpp", "py"]);
}

#[test]
fn polygon_package_converts_to_coderunner() {
    let dir = tempdir().unwrap();
    let source = common::polygon_max_pair(dir.path());
    let out = tempdir().unwrap();

    let spec = ConvertSpec::new("polygon", "coderunner")
        .with_input(&source)
        .with_output_dir(out.path());
    let report = convert(&registry(), &spec).unwrap();
    assert!(report.all_succeeded());

    let mut artifacts: Vec<_> = report.artifacts().map(|p| p.to_path_buf()).collect();
    artifacts.sort();
    assert_eq!(
        artifacts,
        vec![out.path().join("max-pair-cpp.xml"), out.path().join("max-pair-py.xml")]
    );
    let xml = std::fs::read_to_string(&artifacts[0]).unwrap();
    assert!(xml.contains("Find the <b>largest</b> pair sum."));
    assert!(xml.contains("Sort and take the two largest."));
    assert!(xml.contains("encoding=\"base64\""));
}

#[test]
fn polygon_cannot_be_written() {
    let dir = tempdir().unwrap();
    let spec = ConvertSpec::new("boca", "polygon").with_output_dir(dir.path());
    assert!(convert(&registry(), &spec).is_err());
}
