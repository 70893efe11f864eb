use std::fs;
use std::sync::Arc;

use intensity_select::library::{
    LibraryFile, LibraryFileError, LibraryFormat, LibraryReader, LibraryWriter, LoadError,
};
use intensity_select::predicates::{CompareOp, HardwarePredicate, HardwareProperty, ProblemPredicate, ProblemProperty};
use intensity_select::selection::{IntensitySelectionLibrary, SelectionConfig, SolutionLibrary};
use intensity_select::solution::{RegistryError, Solution, SolutionRegistry, StreamKProfile};
use intensity_select::types::{ContractionProblem, DataType, Hardware, ProblemType, SolutionIndex};
use tempfile::tempdir;

fn make_registry() -> SolutionRegistry<Solution> {
    let ty = ProblemType::gemm(DataType::BFloat16);
    SolutionRegistry::from_solutions(vec![
        Solution::new(10, "sk_low", ty.clone(), StreamKProfile::new(32.0, 0)),
        Solution::new(20, "sk_mid", ty.clone(), StreamKProfile::new(128.0, 256))
            .with_problem_predicate(ProblemPredicate::and([
                ProblemPredicate::compare(ProblemProperty::FreeSizeA, CompareOp::Multiple, 64),
                ProblemPredicate::compare(ProblemProperty::BatchSize, CompareOp::Le, 16),
            ])),
        Solution::new(30, "sk_high", ty.clone(), StreamKProfile::new(512.0, 1024))
            .with_hardware_predicate(HardwarePredicate::compare(HardwareProperty::ComputeUnits, CompareOp::Ge, 200)),
        // Only in the registry, not referenced by the library.
        Solution::new(40, "unreferenced", ty, StreamKProfile::disabled()),
    ])
    .unwrap()
}

fn make_library(registry: &SolutionRegistry<Solution>) -> IntensitySelectionLibrary {
    IntensitySelectionLibrary::from_solutions(
        [10, 20, 30].map(|i| Arc::clone(registry.get(SolutionIndex::new(i)).unwrap())),
        SelectionConfig::default(),
    )
}

#[test]
fn write_then_read_reproduces_library() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("library.json");
    let registry = make_registry();
    let library = make_library(&registry);

    let written = LibraryWriter::new(LibraryFormat::v0()).write(&library, &registry, &path).unwrap();
    let loaded = LibraryReader::default().read(&path).unwrap();

    assert_eq!(loaded.version, written.version);
    assert_eq!(loaded.registry.len(), 4);
    assert_eq!(loaded.library.to_persisted(), library.to_persisted());

    // Selection behaves the same on both sides of the file.
    let problem = ContractionProblem::gemm(DataType::BFloat16, 512, 512, 4, 512);
    let hardware = Hardware::gfx(942, 304);
    let before = library.find_best_solution(&problem, &hardware).map(|s| s.index);
    let after = loaded.library.find_best_solution(&problem, &hardware).map(|s| s.index);
    assert_eq!(before, after);
    assert!(before.is_some());
}

#[test]
fn loaded_library_shares_loaded_registry() {
    let registry = make_registry();
    let library = make_library(&registry);
    let file = LibraryWriter::new(LibraryFormat::v0()).to_file(&library, &registry).unwrap();

    let loaded = LibraryReader::default().load(file).unwrap();

    let index = SolutionIndex::new(20);
    assert!(Arc::ptr_eq(
        loaded.library.get(index).unwrap(),
        loaded.registry.get(index).unwrap()
    ));
}

#[test]
fn version_ignores_created_at() {
    let registry = make_registry();
    let library = make_library(&registry);
    let writer = LibraryWriter::new(LibraryFormat::v0());

    let a = writer.to_file(&library, &registry).unwrap();
    std::thread::sleep(std::time::Duration::from_millis(10));
    let b = writer.to_file(&library, &registry).unwrap();

    assert_eq!(a.version, b.version);
    assert!(a.version.as_str().starts_with("sha256:"));
}

#[test]
fn version_changes_with_indices() {
    let registry = make_registry();
    let writer = LibraryWriter::new(LibraryFormat::v0());

    let full = writer.to_file(&make_library(&registry), &registry).unwrap();
    let partial = IntensitySelectionLibrary::from_solutions(
        [Arc::clone(registry.get(SolutionIndex::new(10)).unwrap())],
        SelectionConfig::default(),
    );
    let partial = writer.to_file(&partial, &registry).unwrap();

    assert_ne!(full.version, partial.version);
}

#[test]
fn write_refuses_existing_output() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("library.json");
    fs::write(&path, b"{}").unwrap();

    let registry = make_registry();
    let result = LibraryWriter::new(LibraryFormat::v0()).write(&make_library(&registry), &registry, &path);

    assert!(matches!(result, Err(LibraryFileError::OutputExists(_))));
    assert_eq!(fs::read(&path).unwrap(), b"{}");
}

#[test]
fn write_leaves_no_temp_files() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("library.json");
    let registry = make_registry();

    LibraryWriter::new(LibraryFormat::v0()).write(&make_library(&registry), &registry, &path).unwrap();

    let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().map(|e| e.unwrap().file_name()).collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("library.json")]);
}

#[test]
fn writer_rejects_empty_library() {
    let registry = make_registry();
    let empty: IntensitySelectionLibrary = IntensitySelectionLibrary::new();

    let result = LibraryWriter::new(LibraryFormat::v0()).to_file(&empty, &registry);

    assert!(matches!(result, Err(LibraryFileError::Load(LoadError::EmptyIndices))));
}

#[test]
fn writer_rejects_index_missing_from_registry() {
    let registry = make_registry();
    let stray = Arc::new(Solution::new(
        99,
        "stray",
        ProblemType::gemm(DataType::BFloat16),
        StreamKProfile::new(1.0, 0),
    ));
    let library = IntensitySelectionLibrary::from_solutions([stray], SelectionConfig::default());

    let result = LibraryWriter::new(LibraryFormat::v0()).to_file(&library, &registry);

    match result {
        Err(LibraryFileError::Load(LoadError::InvalidSolutionIndex(index))) => {
            assert_eq!(index, SolutionIndex::new(99))
        }
        other => panic!("expected InvalidSolutionIndex, got {other:?}"),
    }
}

#[test]
fn tampered_solution_is_detected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("library.json");
    let registry = make_registry();
    LibraryWriter::new(LibraryFormat::v0()).write(&make_library(&registry), &registry, &path).unwrap();

    let mut file: LibraryFile = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    file.solutions[0].stream_k.target_intensity = 33.0;
    let tampered = serde_json::to_string_pretty(&file).unwrap();

    let result = LibraryReader::default().read_str(&tampered);
    assert!(matches!(result, Err(LibraryFileError::VersionMismatch { .. })));
}

#[test]
fn duplicate_solution_index_in_file_is_rejected() {
    let registry = make_registry();
    let mut file = LibraryWriter::new(LibraryFormat::v0()).to_file(&make_library(&registry), &registry).unwrap();
    let duplicate = file.solutions[1].clone();
    file.solutions.push(duplicate);
    file.version = LibraryFile::compute_version(&file.format, &file.solutions, &file.library).unwrap();

    let result = LibraryReader::default().load(file);

    match result {
        Err(LibraryFileError::Registry(RegistryError::DuplicateIndex(index))) => {
            assert_eq!(index, SolutionIndex::new(20))
        }
        other => panic!("expected DuplicateIndex, got {other:?}"),
    }
}

#[test]
fn dangling_library_index_in_file_is_rejected() {
    let registry = make_registry();
    let mut file = LibraryWriter::new(LibraryFormat::v0()).to_file(&make_library(&registry), &registry).unwrap();
    file.solutions.retain(|s| s.index != SolutionIndex::new(30));
    file.version = LibraryFile::compute_version(&file.format, &file.solutions, &file.library).unwrap();

    let result = LibraryReader::default().load(file);

    assert!(matches!(
        result,
        Err(LibraryFileError::Load(LoadError::InvalidSolutionIndex(index))) if index == SolutionIndex::new(30)
    ));
}

#[test]
fn unsupported_format_is_rejected() {
    let registry = make_registry();
    let mut file = LibraryWriter::new(LibraryFormat::v0()).to_file(&make_library(&registry), &registry).unwrap();
    file.format.format_version = "2".to_string();

    let result = LibraryReader::default().load(file);

    assert!(matches!(result, Err(LibraryFileError::UnsupportedFormat(v)) if v == "2"));
}

#[test]
fn reader_applies_its_selection_config() {
    let registry = make_registry();
    let file = LibraryWriter::new(LibraryFormat::v0()).to_file(&make_library(&registry), &registry).unwrap();

    let loaded = LibraryReader::new(SelectionConfig::verbose()).load(file).unwrap();

    assert!(loaded.library.config().trace_evaluation);
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let result = LibraryReader::default().read(&dir.path().join("absent.json"));

    assert!(matches!(result, Err(LibraryFileError::Io(_))));
}
