//! Test harness for the property-set parser against fixture files.
//!
//! Every .pset file under test/pset/ must parse without diagnostics and
//! come back unchanged from an encode/re-parse round trip. Every .pset file
//! under test/bad/ must produce exactly the diagnostics listed, one per
//! line, in the .error file beside it.

use std::fs;
use std::path::{Path, PathBuf};

use glob::glob;
use libpropset::{parse_str, ParsedSet};

/// Root test directory.
fn test_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("test")
}

/// All .pset files in a subdirectory of test/, sorted by name.
fn pset_files(subdir: &str) -> Vec<PathBuf> {
    let pattern = test_root().join(subdir).join("*.pset");
    let mut files: Vec<PathBuf> = glob(&pattern.to_string_lossy())
        .unwrap()
        .flatten()
        .collect();
    files.sort();
    files
}

/// Read and parse a fixture, labelling diagnostics with its file name.
fn parse_fixture(path: &Path) -> Result<(String, ParsedSet), String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let filename = path.file_name().unwrap().to_string_lossy().to_string();
    let parsed = parse_str(&content, Some(&filename));
    Ok((filename, parsed))
}

fn rendered(parsed: &ParsedSet) -> Vec<String> {
    parsed.diagnostics().iter().map(|d| d.to_string()).collect()
}

/// Run a single good fixture.
fn run_good_test(path: &Path) -> Result<(), String> {
    let (filename, parsed) = parse_fixture(path)?;

    if !parsed.okay() {
        return Err(format!(
            "{}: Unexpected diagnostics:\n      {}",
            filename,
            rendered(&parsed).join("\n      ")
        ));
    }

    let encoded = parsed.encode();
    let reparsed = parse_str(&encoded, Some(&filename));
    if !reparsed.okay() {
        return Err(format!(
            "{}: Encoded output does not parse: {:?}",
            filename,
            rendered(&reparsed)
        ));
    }
    if reparsed.property_set() != parsed.property_set()
        || reparsed.properties() != parsed.properties()
    {
        return Err(format!(
            "{}: Round trip mismatch\n--- encoded ---\n{}",
            filename, encoded
        ));
    }

    println!(
        "  {} => {} properties",
        filename,
        parsed.properties().len()
    );
    Ok(())
}

/// Run a single bad fixture against its .error file.
fn run_bad_test(path: &Path) -> Result<(), String> {
    let (filename, parsed) = parse_fixture(path)?;

    let error_path = path.with_extension("error");
    let expected = fs::read_to_string(&error_path)
        .map_err(|e| format!("{}: Missing {}: {}", filename, error_path.display(), e))?;
    let expected: Vec<&str> = expected.lines().filter(|l| !l.is_empty()).collect();
    let actual = rendered(&parsed);

    if actual != expected {
        return Err(format!(
            "{}: Diagnostics mismatch\n    expected: {:?}\n    actual:   {:?}",
            filename, expected, actual
        ));
    }

    println!("  {} => {} diagnostics (as expected)", filename, actual.len());
    Ok(())
}

fn run_all(kind: &str, files: &[PathBuf], run: fn(&Path) -> Result<(), String>) {
    assert!(!files.is_empty(), "no {} fixtures found", kind);

    println!("\nRunning {} {} fixtures:", files.len(), kind);

    let mut passed = 0;
    let mut failed = 0;
    let mut errors: Vec<String> = Vec::new();

    for file in files {
        match run(file) {
            Ok(()) => passed += 1,
            Err(e) => {
                failed += 1;
                errors.push(e);
            }
        }
    }

    println!("\nResults: {} passed, {} failed", passed, failed);

    if !errors.is_empty() {
        println!("\nErrors:");
        for error in &errors {
            println!("  - {}", error);
        }
    }

    assert!(failed == 0, "{} {} fixtures failed", failed, kind);
}

#[test]
fn test_all_good_fixtures() {
    run_all("good", &pset_files("pset"), run_good_test);
}

#[test]
fn test_all_bad_fixtures() {
    run_all("bad", &pset_files("bad"), run_bad_test);
}

#[test]
fn test_fixture_locations() {
    let (_, parsed) = parse_fixture(&test_root().join("pset").join("uart.pset")).unwrap();
    assert_eq!(
        parsed.property_locations().unwrap(),
        vec![
            "/acme/platform/ACME0501/3/clock-frequency",
            "/acme/platform/ACME0501/3/reg-shift",
            "/acme/platform/ACME0501/3/fifo-mode",
        ]
    );

    let (_, minimal) = parse_fixture(&test_root().join("pset").join("minimal.pset")).unwrap();
    assert!(minimal.property_locations().is_err());
}

#[test]
fn test_bad_fixtures_keep_partial_results() {
    let (_, parsed) =
        parse_fixture(&test_root().join("bad").join("dangling-requires.pset")).unwrap();
    assert_eq!(parsed.properties().len(), 2);
    assert_eq!(parsed.property("rate").unwrap().requires, vec!["clock", "divider"]);
}
