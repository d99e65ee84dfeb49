use crate::error::Error;
use crate::literal::{remove_quotes, Word};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Format {
    /// Little-endian binary
    #[default]
    Raw,
    /// Memory Initialization File
    Mif,
    /// Coefficient file
    Coe,
}

impl Format {
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Raw => ".hex",
            Format::Mif => ".mif",
            Format::Coe => ".coe",
        }
    }

    pub fn write(&self, words: &[Word], out: &mut impl Write) -> io::Result<()> {
        match self {
            Format::Raw => write_raw(words, out),
            Format::Mif => write_mif(words, out),
            Format::Coe => write_coe(words, out),
        }
    }
}

/// Destination path with quotes stripped and the format's extension appended
/// unless already present.
pub fn dest_path(dest: &str, format: Format) -> PathBuf {
    let dest = remove_quotes(dest);
    match dest.ends_with(format.extension()) {
        true => PathBuf::from(dest),
        false => PathBuf::from(format!("{dest}{}", format.extension())),
    }
}

pub fn export(words: &[Word], dest: &str, format: Format) -> Result<PathBuf, Error> {
    let path = dest_path(dest, format);
    let name = path.display().to_string();
    let file = File::create(&path).map_err(|e| Error::FileCreate(name.clone(), e))?;
    let mut out = BufWriter::new(file);
    format
        .write(words, &mut out)
        .and_then(|_| out.flush())
        .map_err(|e| Error::FileWrite(name, e))?;
    Ok(path)
}

fn write_raw(words: &[Word], out: &mut impl Write) -> io::Result<()> {
    for word in words {
        out.write_all(&word.to_le_bytes())?;
    }
    Ok(())
}

/// Hex digits needed to address `depth` words.
fn address_width(depth: usize) -> usize {
    let bits = usize::BITS - depth.saturating_sub(1).leading_zeros();
    (bits as usize + 3) / 4
}

fn write_mif(words: &[Word], out: &mut impl Write) -> io::Result<()> {
    let width = address_width(words.len());
    writeln!(out, "DEPTH = {};", words.len())?;
    writeln!(out, "WIDTH = 32;")?;
    writeln!(out, "ADDRESS_RADIX = HEX;")?;
    writeln!(out, "DATA_RADIX = HEX;")?;
    writeln!(out, "CONTENT")?;
    writeln!(out, "BEGIN")?;
    writeln!(out)?;
    for (addr, word) in words.iter().enumerate() {
        writeln!(out, "{addr:0width$x} : {word:08x};")?;
    }
    writeln!(out)?;
    writeln!(out, "END;")
}

fn write_coe(words: &[Word], out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "memory_initialization_radix=16;")?;
    writeln!(out, "memory_initialization_vector=")?;
    for (idx, word) in words.iter().enumerate() {
        let end = if idx + 1 == words.len() { ';' } else { ',' };
        writeln!(out, "{word:08x}{end}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(format: Format, words: &[Word]) -> Vec<u8> {
        let mut out = Vec::new();
        format.write(words, &mut out).unwrap();
        out
    }

    #[test]
    fn test_raw() {
        let out = render(Format::Raw, &[0x1234_5678, 0xDEAD_BEEF]);
        assert_eq!(out, [0x78, 0x56, 0x34, 0x12, 0xEF, 0xBE, 0xAD, 0xDE]);
    }

    #[test]
    fn test_mif() {
        let out = render(Format::Mif, &[0xAB, 0, 0, 0xFFFF_FFFF]);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "DEPTH = 4;\nWIDTH = 32;\nADDRESS_RADIX = HEX;\nDATA_RADIX = HEX;\nCONTENT\nBEGIN\n\n\
             0 : 000000ab;\n1 : 00000000;\n2 : 00000000;\n3 : ffffffff;\n\nEND;\n"
        );
    }

    #[test]
    fn test_mif_address_width() {
        assert_eq!(address_width(4096), 3);
        assert_eq!(address_width(4097), 4);
        assert_eq!(address_width(16), 1);
        assert_eq!(address_width(17), 2);
        assert_eq!(address_width(1), 0);

        let words = vec![0; 4096];
        let text = String::from_utf8(render(Format::Mif, &words)).unwrap();
        assert!(text.starts_with("DEPTH = 4096;\n"));
        assert!(text.contains("\n000 : 00000000;\n"));
        assert!(text.contains("\nfff : 00000000;\n\nEND;\n"));
    }

    #[test]
    fn test_coe() {
        let text = String::from_utf8(render(Format::Coe, &[1, 0x10, 0xCAFE])).unwrap();
        assert_eq!(
            text,
            "memory_initialization_radix=16;\nmemory_initialization_vector=\n\
             00000001,\n00000010,\n0000cafe;\n"
        );
    }

    #[test]
    fn test_dest_path() {
        assert_eq!(dest_path("out", Format::Raw), PathBuf::from("out.hex"));
        assert_eq!(dest_path("out.hex", Format::Raw), PathBuf::from("out.hex"));
        assert_eq!(dest_path("\"my out\"", Format::Mif), PathBuf::from("my out.mif"));
        assert_eq!(dest_path("out.mif", Format::Coe), PathBuf::from("out.mif.coe"));
    }

    #[test]
    fn test_export_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("prog");
        let path = export(&[7, 8], &dest.display().to_string(), Format::Coe).unwrap();
        assert_eq!(path, dir.path().join("prog.coe"));
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.ends_with("00000007,\n00000008;\n"));

        let missing = dir.path().join("no/such/dir/prog");
        let err = export(&[], &missing.display().to_string(), Format::Raw);
        assert!(matches!(err, Err(Error::FileCreate(..))));
    }
}
