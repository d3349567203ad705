//! Content Loader
//!
//! Reads a file, guesses its encoding and decodes it without replacement
//! characters. A failed decode is retried once with the configured
//! single-byte fallback.

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use md5::{Digest, Md5};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::types::{DocError, Result};

/// A file ready to be documented
#[derive(Debug, Clone)]
pub struct ScanTarget {
    pub path: PathBuf,
    pub filename: String,
    /// Containing directory as it was reached from the scan root
    pub directory: String,
    pub bytes: Vec<u8>,
    pub text: String,
    /// Lowercase hex MD5 of `bytes`
    pub md5: String,
    pub line_count: usize,
    /// Encoding the text was decoded with
    pub encoding: &'static Encoding,
}

impl ScanTarget {
    fn new(path: PathBuf, bytes: Vec<u8>, text: String, encoding: &'static Encoding) -> Self {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let directory = path
            .parent()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        let md5 = md5_hex(&bytes);
        let line_count = text.lines().count();

        Self {
            path,
            filename,
            directory,
            bytes,
            text,
            md5,
            line_count,
            encoding,
        }
    }

    /// Target for already-decoded UTF-8 text
    pub fn from_text(path: PathBuf, text: &str) -> Self {
        Self::new(path, text.as_bytes().to_vec(), text.to_string(), UTF_8)
    }
}

/// Lowercase hex MD5 digest
pub fn md5_hex(bytes: &[u8]) -> String {
    format!("{:x}", Md5::digest(bytes))
}

/// Guess the encoding of `bytes`
pub fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

/// Decode strictly with `primary`, then with `fallback`
pub fn decode_with(
    bytes: &[u8],
    primary: &'static Encoding,
    fallback: &'static Encoding,
) -> std::result::Result<(String, &'static Encoding), String> {
    for encoding in [primary, fallback] {
        let (without_bom, bom_encoding) = match Encoding::for_bom(bytes) {
            Some((bom, len)) if bom == encoding => (&bytes[len..], bom),
            _ => (bytes, encoding),
        };
        if let Some(text) =
            bom_encoding.decode_without_bom_handling_and_without_replacement(without_bom)
        {
            return Ok((text.into_owned(), bom_encoding));
        }
        debug!("Strict {} decode failed", encoding.name());
    }
    Err(format!(
        "'{}' and '{}' codecs can't decode the file contents",
        primary.name(),
        fallback.name()
    ))
}

#[derive(Debug, Clone, Copy)]
pub struct ContentLoader {
    fallback: &'static Encoding,
}

impl ContentLoader {
    /// Loader whose fallback is the WHATWG encoding `label`
    pub fn new(fallback_label: &str) -> Result<Self> {
        let fallback = Encoding::for_label(fallback_label.as_bytes()).ok_or_else(|| {
            DocError::Config(format!("Unknown fallback encoding '{}'", fallback_label))
        })?;
        Ok(Self { fallback })
    }

    pub fn load(&self, path: &Path) -> Result<ScanTarget> {
        let bytes = fs::read(path).map_err(|e| DocError::read(path, e.to_string()))?;
        let detected = detect_encoding(&bytes);

        let (text, encoding) = decode_with(&bytes, detected, self.fallback)
            .map_err(|message| DocError::read(path, message))?;
        debug!("Loaded {} as {}", path.display(), encoding.name());

        Ok(ScanTarget::new(path.to_path_buf(), bytes, text, encoding))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::WINDOWS_1252;
    use tempfile::TempDir;

    fn loader() -> ContentLoader {
        ContentLoader::new("latin1").unwrap()
    }

    #[test]
    fn test_latin1_label_maps_to_windows_1252() {
        assert_eq!(loader().fallback, WINDOWS_1252);
        assert!(ContentLoader::new("klingon").is_err());
    }

    #[test]
    fn test_load_utf8_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("módulo.py");
        fs::write(&path, "# café\nprint('ok')\n").unwrap();

        let target = loader().load(&path).unwrap();
        assert_eq!(target.filename, "módulo.py");
        assert_eq!(target.text, "# café\nprint('ok')\n");
        assert_eq!(target.line_count, 2);
        assert_eq!(target.directory, dir.path().display().to_string());
        assert_eq!(target.md5, md5_hex("# café\nprint('ok')\n".as_bytes()));
    }

    #[test]
    fn test_load_latin1_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("legacy.txt");
        // ISO-8859-1 French, invalid as UTF-8
        let bytes = b"Le caf\xe9 est tr\xe8s chaud, d\xe9j\xe0 pr\xeat.\ncaf\xe9 au lait\n";
        fs::write(&path, bytes).unwrap();

        let target = loader().load(&path).unwrap();
        assert_eq!(target.text, "Le café est très chaud, déjà prêt.\ncafé au lait\n");
        assert_eq!(target.line_count, 2);
        assert_eq!(target.md5, md5_hex(bytes));
        assert_ne!(target.encoding, UTF_8);
    }

    #[test]
    fn test_single_byte_fallback_accepts_any_bytes() {
        let bytes: Vec<u8> = (0..=255u8).collect();
        let (text, encoding) = decode_with(&bytes, UTF_8, WINDOWS_1252).unwrap();
        assert_eq!(encoding, WINDOWS_1252);
        assert_eq!(text.chars().count(), 256);
    }

    #[test]
    fn test_utf8_bom_is_stripped() {
        let (text, encoding) = decode_with(b"\xef\xbb\xbfx = 1", UTF_8, WINDOWS_1252).unwrap();
        assert_eq!(text, "x = 1");
        assert_eq!(encoding, UTF_8);
    }

    #[test]
    fn test_both_decodes_failing_is_error() {
        // windows-1252 maps every byte, so only a multi-byte fallback can fail
        let result = decode_with(b"ok \xff\xfe broken", UTF_8, UTF_8);
        assert!(result.is_err());
    }

    #[test]
    fn test_unreadable_file_is_read_error() {
        let dir = TempDir::new().unwrap();
        let result = loader().load(&dir.path().join("gone.py"));
        match result {
            Err(DocError::Read { path, .. }) => assert!(path.ends_with("gone.py")),
            other => panic!("expected read error, got {:?}", other),
        }
    }

    #[test]
    fn test_md5_known_value() {
        assert_eq!(md5_hex(b""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(md5_hex(b"abc"), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn test_line_count_without_trailing_newline() {
        let target = ScanTarget::from_text(PathBuf::from("a/b.py"), "one\ntwo\r\nthree");
        assert_eq!(target.line_count, 3);
        assert_eq!(target.directory, "a");
        assert_eq!(target.filename, "b.py");
    }
}
