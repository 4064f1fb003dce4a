//! Input and output utility.
use std::io::{self, BufRead};
use std::fs::File;
use std::path::{self, Path};
use regex::Regex;
use super::error::{Error, Result};

/// Helper function for creating `io::Error` with
/// `io::ErrorKind::InvalidData`.
pub fn invalid_data<E>(error: E) -> io::Error
    where E: Into<Box<dyn std::error::Error + Send + Sync>>
{
    io::Error::new(io::ErrorKind::InvalidData, error)
}

/// Works just like Python's `os.path.splitext`.  Note that the returned
/// extension includes the dot.  If there is no extension, returns an empty
/// string as the extension.  Only works on UTF-8 strings due to limitations
/// of the `std::path::Path` API.
pub fn split_extension(path: &Path) -> io::Result<(&str, &str)> {
    let path = path.to_str()
        .ok_or_else(|| invalid_data("path is not UTF-8"))?;
    match path.rfind('.') {
        None => Ok((path, "")),
        Some(i) => {
            let ext = &path[i ..];
            if ext.chars().any(path::is_separator) {
                Ok((path, ""))
            } else {
                Ok((&path[.. i], ext))
            }
        }
    }
}

/// Open a compressed file and decode based on the file extension.
/// If the extension does not end in "z", the file is read as-is.
pub fn open_compressed(path: &Path) -> io::Result<(&Path, Box<dyn io::Read>)> {
    let file = File::open(path)?;
    let (rest, ext) = split_extension(path)?;
    let (rest, ext) = if ext.ends_with('z') {
        (rest.as_ref(), ext)
    } else {
        (path, "")
    };
    Ok((rest, match ext {
        "" => Box::new(file),
        ".gz" => Box::new(flate2::read::GzDecoder::new(file)),
        ".xz" => Box::new(xz2::read::XzDecoder::new(file)),
        _ => return Err(invalid_data(
            format!("unrecognized compression format: {}", ext),
        )),
    }))
}

/// A one-line header followed by white-space separated numbers.  Lines
/// whose first non-blank character is `#` are comments.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextTable {
    pub header: String,
    pub values: Vec<f64>,
}

impl TextTable {
    pub fn read<R: BufRead>(r: R) -> Result<Self> {
        let mut lines = r.lines();
        let header = match lines.next() {
            Some(line) => line?,
            None => return Err(Error::Format("empty file".to_owned())),
        };
        let mut values = Vec::new();
        for (i, line) in lines.enumerate() {
            let line = line?;
            if line.trim_start().starts_with('#') {
                continue;
            }
            for token in line.split_whitespace() {
                values.push(token.parse().map_err(|e| {
                    Error::Format(format!("line {}: {:?}: {}", i + 2, token, e))
                })?);
            }
        }
        Ok(Self { header, values })
    }
}

/// Check that `header` contains the `magic` word and extract `emax=N`.
pub fn parse_header(header: &str, magic: &str) -> Result<i32> {
    if !header.split_whitespace().any(|w| w == magic) {
        return Err(Error::Format(
            format!("expected a {} header, got {:?}", magic, header)));
    }
    let caps = re!(r"\bemax=(\d+)\b").captures(header)
        .ok_or_else(|| Error::Format(
            format!("{} header lacks emax: {:?}", magic, header)))?;
    caps[1].parse().map_err(|e| Error::Format(
        format!("{} header has a bad emax: {}", magic, e)))
}

/// Consume the next number of a data section.
pub fn next_value<I>(values: &mut I, what: &str) -> Result<f64>
    where I: Iterator<Item = f64>
{
    values.next().ok_or_else(|| Error::Format(
        format!("{}: unexpected end of data", what)))
}

/// Fail if a data section has leftover numbers.
pub fn expect_end<I>(values: &mut I, what: &str) -> Result<()>
    where I: Iterator<Item = f64>
{
    let rest = values.count();
    if rest != 0 {
        return Err(Error::Format(
            format!("{}: {} trailing numbers", what, rest)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_extension() {
        assert_eq!(split_extension(Path::new("a/b.me1j.gz")).unwrap(),
                   ("a/b.me1j", ".gz"));
        assert_eq!(split_extension(Path::new("a.b/c")).unwrap(),
                   ("a.b/c", ""));
    }

    #[test]
    fn test_text_table() {
        let t = TextTable::read(&b"ME1J emax=2\n# note\n 1 2.5\n\n-3e-1\n"[..])
            .unwrap();
        assert_eq!(t.header, "ME1J emax=2");
        assert_eq!(t.values, vec![1.0, 2.5, -0.3]);
        assert_eq!(parse_header(&t.header, "ME1J").unwrap(), 2);
        assert!(parse_header(&t.header, "ME2JP").unwrap_err().is_format());
        assert!(parse_header("ME1J", "ME1J").unwrap_err().is_format());
        let e = TextTable::read(&b"ME1J emax=0\n1 x\n"[..]).unwrap_err();
        assert!(e.is_format());
        assert!(e.to_string().contains("line 2"));
        assert!(TextTable::read(&b""[..]).unwrap_err().is_format());
    }

    #[test]
    fn test_values() {
        let mut it = vec![1.0, 2.0].into_iter();
        assert_eq!(next_value(&mut it, "x").unwrap(), 1.0);
        assert!(expect_end(&mut it, "x").unwrap_err().is_format());
        assert!(next_value(&mut it, "x").unwrap_err().is_format());
        expect_end(&mut it, "x").unwrap();
    }
}
