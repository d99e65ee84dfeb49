pub mod disasm;
pub mod op;
pub mod reg;
pub mod word;

/// Returns the lowercase form of `s` when it is spelled entirely in lower or
/// entirely in upper case (`add`, `ADD`), `None` for mixed spellings (`Add`).
pub fn fold_case(s: &str) -> Option<String> {
    let lower = s.to_ascii_lowercase();
    if s == lower || s == s.to_ascii_uppercase() {
        Some(lower)
    } else {
        None
    }
}

#[test]
fn test_fold_case() {
    assert_eq!(fold_case("add"), Some("add".to_string()));
    assert_eq!(fold_case("ADD"), Some("add".to_string()));
    assert_eq!(fold_case("R12"), Some("r12".to_string()));
    assert_eq!(fold_case("Add"), None);
}
