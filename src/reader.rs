use anyhow::{Context, Result};
use std::borrow::Cow;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::encoding::Decoder;

/// Configuration for file reading behavior
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Fold `\r\n` and lone `\r` into `\n`, the way text-mode reads do
    pub translate_newlines: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            translate_newlines: true,
        }
    }
}

/// Statistics for a single whole-file read
#[derive(Debug, Clone)]
pub struct ReadStats {
    pub file_path: String,
    pub encoding: &'static str,
    pub bytes_read: u64,
    pub chars_decoded: u64,
    /// Whether any byte sequence had to be replaced with U+FFFD
    pub had_replacements: bool,
    pub duration_ms: u64,
}

/// Read a whole file and decode it with `decoder`.
///
/// Malformed sequences become U+FFFD; decoding never fails. The file handle
/// is released before decoding starts.
pub async fn read_decoded<P: AsRef<Path>>(
    file_path: P,
    decoder: Decoder,
    config: &ReaderConfig,
) -> Result<(String, ReadStats)> {
    let path = file_path.as_ref();
    let start_time = std::time::Instant::now();

    debug!("Starting read of file: {}", path.display());

    // WHY: whole-file read; the handle is dropped before decoding begins
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let (decoded, had_replacements) = decoder.decode(&bytes);
    if had_replacements {
        warn!(
            "Malformed {} sequences in {} were replaced",
            decoder.name(),
            path.display()
        );
    }

    let text = if config.translate_newlines {
        translate_newlines(&decoded).into_owned()
    } else {
        decoded.into_owned()
    };

    let stats = ReadStats {
        file_path: path.display().to_string(),
        encoding: decoder.name(),
        bytes_read: bytes.len() as u64,
        chars_decoded: text.chars().count() as u64,
        had_replacements,
        duration_ms: start_time.elapsed().as_millis() as u64,
    };

    info!(
        "Read {}: {} bytes as {}, {} chars in {}ms",
        stats.file_path, stats.bytes_read, stats.encoding, stats.chars_decoded, stats.duration_ms
    );

    Ok((text, stats))
}

/// Universal newline translation: `\r\n` and lone `\r` become `\n`
pub fn translate_newlines(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }

    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\r' {
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            result.push('\n');
        } else {
            result.push(ch);
        }
    }
    Cow::Owned(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::{UTF_8, WINDOWS_1252};
    use std::path::PathBuf;
    use tempfile::TempDir;
    use tokio::fs;

    const UTF8: Decoder = Decoder::Whatwg(UTF_8);

    async fn create_test_file(dir: &Path, name: &str, content: &[u8]) -> Result<PathBuf> {
        let file_path = dir.join(name);
        fs::write(&file_path, content).await?;
        Ok(file_path)
    }

    #[tokio::test]
    async fn test_read_valid_utf8_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = create_test_file(temp_dir.path(), "test.txt", "Café\nLine 2".as_bytes())
            .await
            .unwrap();

        let (text, stats) = read_decoded(&file_path, UTF8, &ReaderConfig::default()).await.unwrap();

        assert_eq!(text, "Café\nLine 2");
        assert_eq!(stats.chars_decoded, 11);
        assert_eq!(stats.bytes_read, 12);
        assert_eq!(stats.encoding, "UTF-8");
        assert!(!stats.had_replacements);
    }

    #[tokio::test]
    async fn test_read_latin1_bytes() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = create_test_file(temp_dir.path(), "latin.txt", &[b'C', b'a', b'f', 0xE9])
            .await
            .unwrap();

        let (text, stats) = read_decoded(&file_path, Decoder::Latin1, &ReaderConfig::default())
            .await
            .unwrap();
        assert_eq!(text, "Café");
        assert_eq!(stats.encoding, "ISO-8859-1");
    }

    #[tokio::test]
    async fn test_latin1_and_cp1252_differ_in_c1_range() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = create_test_file(temp_dir.path(), "c1.txt", &[0x93, b'x', 0x94])
            .await
            .unwrap();

        let (text, _stats) = read_decoded(&file_path, Decoder::Latin1, &ReaderConfig::default())
            .await
            .unwrap();
        assert_eq!(text, "\u{93}x\u{94}");

        let cp1252 = Decoder::Whatwg(WINDOWS_1252);
        let (text, _stats) = read_decoded(&file_path, cp1252, &ReaderConfig::default())
            .await
            .unwrap();
        assert_eq!(text, "\u{201C}x\u{201D}");
    }

    #[tokio::test]
    async fn test_ascii_replaces_non_ascii_bytes() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = create_test_file(temp_dir.path(), "mixed.txt", "né".as_bytes())
            .await
            .unwrap();

        let (text, stats) = read_decoded(&file_path, Decoder::Ascii, &ReaderConfig::default())
            .await
            .unwrap();
        assert_eq!(text, "n\u{FFFD}\u{FFFD}");
        assert!(stats.had_replacements);
    }

    #[tokio::test]
    async fn test_invalid_bytes_are_replaced() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = create_test_file(temp_dir.path(), "bad.txt", &[b'a', 0xFF, b'b'])
            .await
            .unwrap();

        let (text, stats) = read_decoded(&file_path, UTF8, &ReaderConfig::default()).await.unwrap();
        assert_eq!(text, "a\u{FFFD}b");
        assert!(stats.had_replacements);
    }

    #[tokio::test]
    async fn test_bom_is_stripped() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = create_test_file(temp_dir.path(), "bom.txt", b"\xEF\xBB\xBFhi")
            .await
            .unwrap();

        let (text, _stats) = read_decoded(&file_path, UTF8, &ReaderConfig::default()).await.unwrap();
        assert_eq!(text, "hi");
    }

    #[tokio::test]
    async fn test_read_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = create_test_file(temp_dir.path(), "empty.txt", b"").await.unwrap();

        let (text, stats) = read_decoded(&file_path, UTF8, &ReaderConfig::default()).await.unwrap();
        assert_eq!(text, "");
        assert_eq!(stats.bytes_read, 0);
    }

    #[tokio::test]
    async fn test_read_nonexistent_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = read_decoded(temp_dir.path().join("nope.txt"), UTF8, &ReaderConfig::default()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_carriage_returns_kept_when_disabled() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = create_test_file(temp_dir.path(), "crlf.txt", b"a\r\nb").await.unwrap();

        let config = ReaderConfig { translate_newlines: false };
        let (text, _stats) = read_decoded(&file_path, UTF8, &config).await.unwrap();
        assert_eq!(text, "a\r\nb");

        let (text, _stats) = read_decoded(&file_path, UTF8, &ReaderConfig::default()).await.unwrap();
        assert_eq!(text, "a\nb");
    }

    #[test]
    fn test_translate_newlines() {
        assert_eq!(translate_newlines("a\r\nb\rc\nd"), "a\nb\nc\nd");
        assert_eq!(translate_newlines("\r\r\n"), "\n\n");
        assert!(matches!(translate_newlines("no returns\n"), Cow::Borrowed(_)));
    }
}
