use crate::code::CodeBuffer;
use crate::diag::Diag;
use crate::error::Error;

/// Patch every label placeholder with the address of its definition.
/// Returns one error per reference that has no definition.
pub fn link(code: &mut CodeBuffer) -> Vec<Diag> {
    let mut diags = Vec::new();
    let mut patches = Vec::new();
    for r in code.references() {
        match code.definition(&r.ident) {
            Some(def) => patches.push((r.pos, def.addr)),
            None => diags.push(Diag::error(
                Error::UnresolvedSymbol(r.ident.clone()),
                Some(r.loc.clone()),
            )),
        }
    }
    for (pos, addr) in patches {
        code.patch(pos, addr);
    }
    diags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::Loc;

    fn loc(line: usize) -> Loc {
        Loc {
            file: "test.s".to_string(),
            line,
            raw: String::new(),
        }
    }

    #[test]
    fn test_forward_and_backward() {
        let mut code = CodeBuffer::default();
        code.add_reference("end", &loc(1));
        code.add_definition("top", 0x10, &loc(2));
        code.push(0xFF);
        code.add_definition("end", 0x10, &loc(3));
        code.add_reference("top", &loc(4));
        code.add_reference("end", &loc(5));

        let diags = link(&mut code);
        assert!(diags.is_empty());
        assert_eq!(code.words(), [0x12, 0xFF, 0x11, 0x12]);
    }

    #[test]
    fn test_first_definition_wins() {
        let mut code = CodeBuffer::default();
        code.add_definition("x", 0, &loc(1));
        code.push(0);
        code.add_definition("x", 0, &loc(2));
        code.add_reference("x", &loc(3));

        assert!(link(&mut code).is_empty());
        assert_eq!(code.words(), [0, 0]);
    }

    #[test]
    fn test_unresolved() {
        let mut code = CodeBuffer::default();
        code.add_reference("missing", &loc(7));
        code.add_reference("missing", &loc(9));

        let diags = link(&mut code);
        assert_eq!(diags.len(), 2);
        assert!(matches!(&diags[0].error, Error::UnresolvedSymbol(s) if s == "missing"));
        assert_eq!(diags[1].loc.as_ref().map(|l| l.line), Some(9));
        assert_eq!(code.words(), [0, 0]);
    }
}
