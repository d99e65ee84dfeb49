use crate::assembler::Report;
use crate::literal::Word;
use arch::word::Fields;
use color_print::cformat;

fn bytes(word: Word) -> String {
    let [b3, b2, b1, b0] = word.to_be_bytes();
    format!("{b3:02X} {b2:02X} {b1:02X} {b0:02X}")
}

fn file_header(path: &str) -> String {
    format!(
        "{}+------[{}]{}",
        "-".repeat(19),
        path,
        "-".repeat(45usize.saturating_sub(path.len()))
    )
}

/// Listing of every emitted word next to the source line it came from.
pub fn dump(report: &Report) -> Vec<String> {
    let Some(words) = &report.words else {
        return Vec::new();
    };
    let mut lines = Vec::new();
    let mut file = None;

    for seg in &report.segments {
        if file != Some(&seg.loc.file) {
            lines.push(file_header(&seg.loc.file));
            file = Some(&seg.loc.file);
        }
        let src = seg.loc.raw.trim();
        for (idx, &word) in words[seg.start..seg.end].iter().enumerate() {
            let addr = seg.addr.wrapping_add(idx as Word);
            let body = match (seg.inst, idx) {
                (true, 0) => {
                    let fields = Fields::from_bin(word);
                    let imm = words.get(seg.start + 1).copied().filter(|_| fields.imm);
                    format!("{}  <- {}", fields.cformat(imm), src)
                }
                (true, _) => String::new(),
                (false, 0) => cformat!("<c>{}</>", src),
                (false, _) => String::new(),
            };
            let line_no = match idx {
                0 => format!("{:>4}", seg.loc.line),
                _ => " ".repeat(4),
            };
            lines.push(format!("[{:04X}] {} | {}: {}", addr, bytes(word), line_no, body));
        }
    }

    if !report.symbols.is_empty() {
        lines.push(format!("{}+{}", "-".repeat(19), "-".repeat(53)));
        for (ident, addr) in &report.symbols {
            lines.push(cformat!("{:19}| <g>{}:</> 0x{:04X}", "", ident, addr));
        }
    }
    lines.push(format!("{}+{}", "-".repeat(19), "-".repeat(53)));
    lines
}

pub fn print_dump(report: &Report) {
    for line in dump(report) {
        println!("{}", line);
    }
}
