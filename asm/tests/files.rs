use r64asm::error::Error;
use r64asm::{export, AsmConfig, Assembler, Format};
use std::fs;
use std::path::Path;

fn write(dir: &Path, name: &str, text: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path.display().to_string()
}

#[test]
fn missing_primary_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.s").display().to_string();
    let result = Assembler::default().assemble_file(&path);
    assert!(matches!(result, Err(Error::SourceOpen(..))));
}

#[test]
fn include_relative_to_primary() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("lib")).unwrap();
    write(dir.path(), "lib/util.s", "util: ret\n");
    let main = write(
        dir.path(),
        "main.s",
        ".inc \"lib/util.s\"\nstart: call util\njmp start\n",
    );

    let report = Assembler::default().assemble_file(&main).unwrap();
    assert_eq!(report.errors(), 0);
    assert_eq!(
        report.symbols,
        [("util".to_string(), 0), ("start".to_string(), 1)]
    );
    let words = report.words.unwrap();
    assert_eq!(words[2], 0);
    assert_eq!(words[4], 1);
}

#[test]
fn nested_includes_resolve_against_primary_dir() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("a")).unwrap();
    write(dir.path(), "a/first.s", ".inc a/second.s\n.dw 1\n");
    write(dir.path(), "a/second.s", ".dw 2\n");
    let main = write(dir.path(), "main.s", ".inc a/first.s\n.dw 3\n");

    let report = Assembler::default().assemble_file(&main).unwrap();
    assert_eq!(report.errors(), 0);
    assert_eq!(report.words.unwrap()[..3], [2, 1, 3]);
}

#[test]
fn recursive_include_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "lib.s", ".inc main.s\n.inc lib.s\n.dw 7\n");
    let main = write(dir.path(), "main.s", ".inc lib.s\n.inc ./lib.s\n.dw 8\n");

    let report = Assembler::default().assemble_file(&main).unwrap();
    assert_eq!(report.errors(), 0);
    assert_eq!(report.words.unwrap()[..3], [7, 8, 0]);
}

#[test]
fn missing_include_is_counted() {
    let dir = tempfile::tempdir().unwrap();
    let main = write(dir.path(), "main.s", "nop\n.inc gone.s\n.inc\nnop\n");

    let report = Assembler::default().assemble_file(&main).unwrap();
    assert_eq!(report.errors(), 2);
    assert!(matches!(report.diags[0].error, Error::SourceOpen(..)));
    assert!(matches!(report.diags[1].error, Error::DirectiveArity(..)));
    assert_eq!(report.diags[0].loc.as_ref().map(|l| l.line), Some(2));
}

#[test]
fn diagnostics_name_the_included_file() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "bad.s", "nop\nmov r1\n");
    let main = write(dir.path(), "main.s", ".inc bad.s\nmov r2\n");

    let report = Assembler::default().assemble_file(&main).unwrap();
    assert_eq!(report.errors(), 2);
    let locs: Vec<_> = report
        .diags
        .iter()
        .filter_map(|d| d.loc.as_ref())
        .map(|l| (Path::new(&l.file).file_name().unwrap().to_owned(), l.line))
        .collect();
    assert_eq!(locs[0], ("bad.s".into(), 2));
    assert_eq!(locs[1], ("main.s".into(), 2));
}

#[test]
fn export_all_formats() {
    let dir = tempfile::tempdir().unwrap();
    let main = write(dir.path(), "prog.s", "inr r1, 0x11223344\nret\n");
    let asm = Assembler::new(AsmConfig { memory_size: 8 });
    let report = asm.assemble_file(&main).unwrap();
    let words = report.words.unwrap();
    let dest = dir.path().join("prog").display().to_string();

    let raw = export(&words, &dest, Format::Raw).unwrap();
    let bytes = fs::read(&raw).unwrap();
    assert_eq!(raw.extension().unwrap(), "hex");
    assert_eq!(bytes.len(), 32);
    assert_eq!(bytes[4..8], [0x44, 0x33, 0x22, 0x11]);

    let mif = export(&words, &dest, Format::Mif).unwrap();
    let text = fs::read_to_string(mif).unwrap();
    assert!(text.starts_with("DEPTH = 8;\nWIDTH = 32;\n"));
    assert!(text.contains("\n1 : 11223344;\n"));
    assert!(text.ends_with("\n7 : 00000000;\n\nEND;\n"));

    let coe = export(&words, &dest, Format::Coe).unwrap();
    let text = fs::read_to_string(coe).unwrap();
    assert_eq!(text.lines().count(), 10);
    assert!(text.contains("\n11223344,\n"));
    assert!(text.ends_with("00000000;\n"));
}

#[test]
fn latin1_comment_does_not_end_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("main.s");
    fs::write(&path, b"nop\n; Fehler f\xFCr offset\nret\nx: nop\njmp x\n").unwrap();

    let report = Assembler::default()
        .assemble_file(&path.display().to_string())
        .unwrap();
    assert_eq!(report.errors(), 0);
    assert_eq!(report.symbols, [("x".to_string(), 2)]);
    let words = report.words.unwrap();
    assert_eq!(words[4], 2);
    let lines: Vec<_> = report.segments.iter().map(|s| s.loc.line).collect();
    assert_eq!(lines, [1, 3, 4, 5]);
}
