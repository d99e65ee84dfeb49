use crate::code::CodeBuffer;
use crate::diag::{Diag, Level, Loc};
use crate::directive::{self, Directive};
use crate::encode;
use crate::error::Error;
use crate::lexer::{tokenize, Macros};
use crate::link::link;
use crate::literal::{to_register, LiteralError, Word};
use crate::source::SourceStack;

/// Words of instruction/data memory in the reference build.
pub const MEMORY_SIZE: usize = 4096;

/// Largest memory a run accepts.
pub const MAX_MEMORY_SIZE: usize = 1 << 26;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AsmConfig {
    pub memory_size: usize,
}

impl Default for AsmConfig {
    fn default() -> Self {
        AsmConfig {
            memory_size: MEMORY_SIZE,
        }
    }
}

/// Words emitted by a single source line.
#[derive(Debug, Clone)]
pub struct Segment {
    pub addr: Word,
    pub start: usize,
    pub end: usize,
    pub inst: bool,
    pub loc: Loc,
}

/// Outcome of one run.
#[derive(Debug)]
pub struct Report {
    /// Memory image, `None` when the run failed.
    pub words: Option<Vec<Word>>,
    pub diags: Vec<Diag>,
    pub segments: Vec<Segment>,
    pub symbols: Vec<(String, Word)>,
}

impl Report {
    pub fn errors(&self) -> usize {
        self.count(Level::Error)
    }

    pub fn warnings(&self) -> usize {
        self.count(Level::Warn)
    }

    pub fn is_ok(&self) -> bool {
        self.words.is_some()
    }

    fn count(&self, level: Level) -> usize {
        self.diags.iter().filter(|d| d.level == level).count()
    }
}

// ----------------------------------------------------------------------------
// Per-run state

/// Everything a run mutates. Created fresh for every run.
pub(crate) struct State {
    pub code: CodeBuffer,
    pub macros: Macros,
    pub origin: Word,
    pub memory_size: usize,
    pub diags: Vec<Diag>,
    pub loc: Loc,
}

impl State {
    pub fn new(memory_size: usize) -> Self {
        State {
            code: CodeBuffer::with_capacity(memory_size.min(MEMORY_SIZE)),
            macros: Macros::new(),
            origin: 0,
            memory_size,
            diags: Vec::new(),
            loc: Loc::default(),
        }
    }

    /// Report an error at the current line.
    pub fn error(&mut self, error: impl Into<Error>) {
        self.diags.push(Diag::error(error.into(), Some(self.loc.clone())));
    }

    /// Unwrap a conversion, reporting a failure and substituting the default.
    pub fn accept<T: Default>(&mut self, result: Result<T, LiteralError>) -> T {
        result.unwrap_or_else(|err| {
            self.error(err);
            T::default()
        })
    }

    pub fn reg(&mut self, tok: &str) -> u8 {
        let result = to_register(tok);
        self.accept(result)
    }

    fn label(&mut self, ident: &str) {
        let prev = self
            .code
            .add_definition(ident, self.origin, &self.loc)
            .map(|def| def.loc.clone());
        if let Some(prev) = prev {
            let loc = self.loc.clone();
            self.diags
                .push(Diag::warn(Error::RedefinedLabel(ident.to_string()), Some(loc)));
            self.diags.push(Diag::note(Error::DefinedHere, Some(prev)));
        }
    }
}

// ----------------------------------------------------------------------------
// Assembler

pub struct Assembler {
    config: AsmConfig,
}

impl Assembler {
    pub fn new(config: AsmConfig) -> Self {
        Assembler { config }
    }

    /// Assemble a file and everything it includes. Failing to open the file
    /// itself is the only error returned here; everything else is reported.
    pub fn assemble_file(&self, path: &str) -> Result<Report, Error> {
        let source = SourceStack::open(path)?;
        Ok(self.run(source))
    }

    pub fn assemble_str(&self, name: &str, text: &str) -> Report {
        self.run(SourceStack::from_text(name, text))
    }

    pub fn run(&self, mut source: SourceStack) -> Report {
        if self.config.memory_size > MAX_MEMORY_SIZE {
            let err = Error::MemorySize(self.config.memory_size, MAX_MEMORY_SIZE);
            return Report {
                words: None,
                diags: vec![Diag::error(err, None)],
                segments: Vec::new(),
                symbols: Vec::new(),
            };
        }
        let mut st = State::new(self.config.memory_size);
        let mut segments = Vec::new();

        while let Some(line) = source.next() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    st.diags.push(Diag::error(err, None));
                    continue;
                }
            };
            let expanded = st.macros.expand(&line.text);
            st.loc = Loc {
                file: line.file,
                line: line.no,
                raw: line.text,
            };

            let start = st.code.len();
            let inst = statement(&mut st, &mut source, &tokenize(&expanded));
            if let Some(inst) = inst {
                if st.code.len() > start {
                    segments.push(Segment {
                        addr: st.origin.wrapping_add(start as Word),
                        start,
                        end: st.code.len(),
                        inst,
                        loc: st.loc.clone(),
                    });
                }
            }
        }

        let unresolved = link(&mut st.code);
        st.diags.extend(unresolved);

        let symbols = st
            .code
            .definitions()
            .map(|(ident, addr)| (ident.to_string(), addr))
            .collect();
        let mut diags = st.diags;
        let words = match st.code.finish(self.config.memory_size) {
            Ok(words) => Some(words),
            Err(err) => {
                diags.push(Diag::error(err, None));
                None
            }
        };
        let failed = diags.iter().any(Diag::is_error);

        Report {
            words: words.filter(|_| !failed),
            diags,
            segments,
            symbols,
        }
    }
}

impl Default for Assembler {
    fn default() -> Self {
        Assembler::new(AsmConfig::default())
    }
}

/// Handle one tokenized line. Returns `Some(true)` for an instruction and
/// `Some(false)` for `.dw` data, the statements whose words belong to it.
fn statement(st: &mut State, source: &mut SourceStack, tokens: &[String]) -> Option<bool> {
    let mut tokens = tokens;
    while let Some((ident, rest)) = tokens
        .split_first()
        .and_then(|(head, rest)| Some((head.strip_suffix(':')?, rest)))
    {
        st.label(ident);
        tokens = rest;
    }

    let (head, args) = tokens.split_first()?;
    if let Some(dir) = Directive::parse(head) {
        directive::execute(st, source, dir, head, args);
        return (dir == Directive::Dw).then_some(false);
    }
    match encode::lookup(head) {
        Some(def) => {
            encode::encode(st, head, def, args);
            Some(true)
        }
        None => {
            st.error(Error::UnknownOperation(head.to_string()));
            None
        }
    }
}
