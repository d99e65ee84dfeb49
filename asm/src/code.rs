use crate::diag::Loc;
use crate::error::Error;
use crate::literal::Word;
use indexmap::{map::Entry, IndexMap};

/// Use of a label whose address was unknown when the word was emitted.
#[derive(Debug, Clone)]
pub struct Reference {
    pub ident: String,
    pub pos: usize,
    pub loc: Loc,
}

/// Label bound to an absolute address.
#[derive(Debug, Clone)]
pub struct Definition {
    pub addr: Word,
    pub loc: Loc,
}

/// Object code under construction.
#[derive(Debug, Default)]
pub struct CodeBuffer {
    words: Vec<Word>,
    refs: Vec<Reference>,
    defs: IndexMap<String, Definition>,
}

impl CodeBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        CodeBuffer {
            words: Vec::with_capacity(capacity),
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn push(&mut self, word: Word) {
        self.words.push(word);
    }

    pub fn extend(&mut self, words: impl IntoIterator<Item = Word>) {
        self.words.extend(words);
    }

    /// Zero-pad up to `len`. Shrinking would drop emitted code and is refused.
    pub fn reserve_to(&mut self, len: usize) -> Result<(), usize> {
        if len < self.words.len() {
            return Err(self.words.len());
        }
        self.words.resize(len, 0);
        Ok(())
    }

    /// Emit a zero placeholder to be patched with the address of `ident`.
    pub fn add_reference(&mut self, ident: &str, loc: &Loc) {
        self.words.push(0);
        self.refs.push(Reference {
            ident: ident.to_string(),
            pos: self.words.len() - 1,
            loc: loc.clone(),
        });
    }

    /// Bind `ident` to the next free position. A label that is already bound
    /// keeps its first address; the earlier definition is returned.
    pub fn add_definition(&mut self, ident: &str, origin: Word, loc: &Loc) -> Option<&Definition> {
        let addr = (self.words.len() as Word).wrapping_add(origin);
        match self.defs.entry(ident.to_string()) {
            Entry::Occupied(entry) => Some(&*entry.into_mut()),
            Entry::Vacant(entry) => {
                entry.insert(Definition {
                    addr,
                    loc: loc.clone(),
                });
                None
            }
        }
    }

    pub fn references(&self) -> &[Reference] {
        &self.refs
    }

    pub fn definition(&self, ident: &str) -> Option<&Definition> {
        self.defs.get(ident)
    }

    pub fn definitions(&self) -> impl Iterator<Item = (&str, Word)> {
        self.defs.iter().map(|(ident, def)| (ident.as_str(), def.addr))
    }

    pub(crate) fn patch(&mut self, pos: usize, word: Word) {
        self.words[pos] = word;
    }

    /// Check against the memory size and zero-pad to exactly that length.
    pub fn finish(mut self, memory_size: usize) -> Result<Vec<Word>, Error> {
        if self.words.len() > memory_size {
            return Err(Error::MemoryOverflow(self.words.len() - memory_size));
        }
        self.words.resize(memory_size, 0);
        Ok(self.words)
    }
}
