use crate::assembler::State;
use crate::error::Error;
use crate::lexer::Address;
use crate::literal::{to_int, to_word_array, Word};
use crate::source::SourceStack;
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Directive {
    /// `.inc path`
    Inc,
    /// `.org [addr]`
    Org,
    /// `.def ident, replacement`
    Def,
    /// `.dw value, ...`
    Dw,
}

impl Directive {
    /// Recognize a `.`-prefixed directive in any letter case.
    pub fn parse(tok: &str) -> Option<Self> {
        tok.strip_prefix('.')?.parse().ok()
    }

    fn arity_ok(&self, n: usize) -> bool {
        match self {
            Directive::Inc | Directive::Org => n == 1,
            Directive::Def => n == 2,
            Directive::Dw => n >= 1,
        }
    }
}

pub(crate) fn execute(
    st: &mut State,
    source: &mut SourceStack,
    directive: Directive,
    name: &str,
    args: &[String],
) {
    if !directive.arity_ok(args.len()) {
        st.error(Error::DirectiveArity(name.to_string()));
        return;
    }
    match directive {
        Directive::Inc => {
            if let Err(err) = source.include(&args[0]) {
                st.error(err);
            }
        }
        Directive::Org => org(st, name, &args[0]),
        Directive::Def => st.macros.define(&args[0], &args[1]),
        Directive::Dw => {
            for arg in args {
                let words = st.accept(to_word_array(arg));
                st.code.extend(words);
            }
        }
    }
}

/// Before any code: move the origin. After: zero-fill up to the address.
fn org(st: &mut State, name: &str, arg: &str) {
    let Some(addr) = Address::parse(arg) else {
        st.error(Error::InvalidAddress(arg.to_string()));
        return;
    };
    let (None, Some(offset)) = (addr.base, addr.offset) else {
        st.error(Error::DirectAddressing(name.to_string()));
        return;
    };
    let offset = st.accept(to_int(&offset));

    if st.code.is_empty() {
        st.origin = offset;
        return;
    }

    let end = st.origin.wrapping_add(st.code.len() as Word);
    let Some(len) = offset.checked_sub(st.origin) else {
        st.error(Error::AddressOverflow(offset, end));
        return;
    };
    let len = len as usize;
    if len > st.memory_size {
        st.error(Error::MemoryOverflow(len - st.memory_size));
        return;
    }
    if st.code.reserve_to(len).is_err() {
        st.error(Error::AddressOverflow(offset, end));
    }
}
