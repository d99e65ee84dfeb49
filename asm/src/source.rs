use crate::error::Error;
use crate::literal::remove_quotes;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};

/// One raw source line with its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub file: String,
    pub no: usize,
    pub text: String,
}

struct Frame {
    path: String,
    reader: Box<dyn BufRead>,
    buf: Vec<u8>,
    line_no: usize,
}

impl Frame {
    /// Next line without its terminator. Bytes that are not UTF-8 are
    /// replaced rather than rejected.
    fn read_line(&mut self) -> std::io::Result<Option<String>> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }
        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        }
        self.line_no += 1;
        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }
}

/// Stack of open source files. Reading continues in the including file once
/// an included one is exhausted.
pub struct SourceStack {
    frames: Vec<Frame>,
    base: PathBuf,
    included: HashSet<PathBuf>,
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

impl SourceStack {
    /// Open the primary source file. Relative includes are resolved against
    /// its directory.
    pub fn open(path: &str) -> Result<Self, Error> {
        let path = remove_quotes(path);
        let full = std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| PathBuf::from(path));
        let file = File::open(&full).map_err(|e| Error::SourceOpen(path.to_string(), e))?;

        let mut stack = SourceStack {
            frames: Vec::new(),
            base: full.parent().map(Path::to_path_buf).unwrap_or_default(),
            included: HashSet::new(),
        };
        stack.included.insert(canonical(&full));
        stack.push(path.to_string(), Box::new(BufReader::new(file)));
        Ok(stack)
    }

    /// In-memory primary source. Includes resolve against the working directory.
    pub fn from_text(name: &str, text: &str) -> Self {
        let mut stack = SourceStack {
            frames: Vec::new(),
            base: std::env::current_dir().unwrap_or_default(),
            included: HashSet::new(),
        };
        stack.push(name.to_string(), Box::new(Cursor::new(text.to_string())));
        stack
    }

    /// Directory that relative include paths are joined to.
    pub fn with_base(mut self, base: impl Into<PathBuf>) -> Self {
        self.base = base.into();
        self
    }

    /// Push an included file. A file that is already part of the run is
    /// skipped and `Ok(false)` is returned.
    pub fn include(&mut self, path: &str) -> Result<bool, Error> {
        let path = remove_quotes(path);
        let full = self.base.join(path);
        let key = canonical(&full);
        if self.included.contains(&key) {
            return Ok(false);
        }
        let file = File::open(&full).map_err(|e| Error::SourceOpen(path.to_string(), e))?;
        self.included.insert(key);
        self.push(full.display().to_string(), Box::new(BufReader::new(file)));
        Ok(true)
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    fn push(&mut self, path: String, reader: Box<dyn BufRead>) {
        self.frames.push(Frame {
            path,
            reader,
            buf: Vec::new(),
            line_no: 0,
        });
    }
}

impl Iterator for SourceStack {
    type Item = Result<Line, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(frame) = self.frames.last_mut() {
            match frame.read_line() {
                Ok(Some(text)) => {
                    return Some(Ok(Line {
                        file: frame.path.clone(),
                        no: frame.line_no,
                        text,
                    }));
                }
                Err(err) => {
                    let path = frame.path.clone();
                    self.frames.pop();
                    return Some(Err(Error::FileRead(path, err)));
                }
                Ok(None) => {
                    self.frames.pop();
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn texts(stack: SourceStack) -> Vec<(String, usize, String)> {
        stack
            .map(|line| line.unwrap())
            .map(|line| {
                let file = Path::new(&line.file)
                    .file_name()
                    .map(|name| name.to_string_lossy().to_string())
                    .unwrap_or_default();
                (file, line.no, line.text)
            })
            .collect()
    }

    #[test]
    fn test_from_text() {
        let stack = SourceStack::from_text("main.s", "nop\n\nret");
        let lines = texts(stack);
        assert_eq!(
            lines,
            [
                ("main.s".to_string(), 1, "nop".to_string()),
                ("main.s".to_string(), 2, "".to_string()),
                ("main.s".to_string(), 3, "ret".to_string()),
            ]
        );
    }

    #[test]
    fn test_line_endings() {
        let stack = SourceStack::from_text("main.s", "a\r\nb\r\n\r\nc\n");
        let lines: Vec<_> = stack.map(|line| line.unwrap().text).collect();
        assert_eq!(lines, ["a", "b", "", "c"]);
    }

    #[test]
    fn test_non_utf8_line() {
        let dir = tempfile::tempdir().unwrap();
        let main = dir.path().join("main.s");
        std::fs::write(&main, b"nop\n; f\xFCr\nret\n").unwrap();

        let stack = SourceStack::open(&main.display().to_string()).unwrap();
        let lines: Vec<_> = texts(stack)
            .into_iter()
            .map(|(_, no, text)| (no, text))
            .collect();
        assert_eq!(
            lines,
            [
                (1, "nop".to_string()),
                (2, "; f\u{FFFD}r".to_string()),
                (3, "ret".to_string()),
            ]
        );
    }

    #[test]
    fn test_include_nesting() {
        let dir = tempfile::tempdir().unwrap();
        let mut lib = File::create(dir.path().join("lib.s")).unwrap();
        writeln!(lib, "lib1\nlib2").unwrap();

        let mut stack = SourceStack::from_text("main.s", "a\nb\nc").with_base(dir.path());
        let first = stack.next().unwrap().unwrap();
        assert_eq!(first.text, "a");
        assert_eq!(stack.include("\"lib.s\"").unwrap(), true);
        assert_eq!(stack.depth(), 2);

        let rest: Vec<_> = stack.map(|line| line.unwrap().text).collect();
        assert_eq!(rest, ["lib1", "lib2", "b", "c"]);
    }

    #[test]
    fn test_include_once() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("lib.s")).unwrap();

        let mut stack = SourceStack::from_text("main.s", "").with_base(dir.path());
        assert_eq!(stack.include("lib.s").unwrap(), true);
        assert_eq!(stack.include("./lib.s").unwrap(), false);
    }

    #[test]
    fn test_primary_is_guarded() {
        let dir = tempfile::tempdir().unwrap();
        let main = dir.path().join("main.s");
        File::create(&main).unwrap();

        let mut stack = SourceStack::open(&main.display().to_string()).unwrap();
        assert_eq!(stack.include("main.s").unwrap(), false);
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_open_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.s");
        assert!(matches!(
            SourceStack::open(&missing.display().to_string()),
            Err(Error::SourceOpen(..))
        ));

        let mut stack = SourceStack::from_text("main.s", "").with_base(dir.path());
        assert!(matches!(stack.include("missing.s"), Err(Error::SourceOpen(..))));
        assert_eq!(stack.depth(), 1);
    }
}
