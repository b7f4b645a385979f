// Charset sniffing shared by both tools
// Detection only ever looks at a fixed-size prefix of the file

use anyhow::{Context, Result};
use encoding_rs::{Encoding, UTF_8};
use std::borrow::Cow;
use std::fmt;
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing::{debug, warn};

use crate::error::ToolError;

/// Number of leading bytes handed to the detector
pub const SAMPLE_SIZE: usize = 10_000;

// WHY: the WHATWG table aliases these to windows-1252, which turns
// 0x80-0x9F into punctuation; latin-1 callers expect the C1 controls
const LATIN1_LABELS: &[&str] = &[
    "latin-1", "latin1", "iso-8859-1", "iso8859-1", "l1", "cp819", "ibm819", "iso-ir-100", "8859",
];

const ASCII_LABELS: &[&str] = &["ascii", "us-ascii", "646", "ansi-x3.4-1968"];

/// Best guess produced by statistical detection over a byte sample
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedEncoding {
    /// Detector label, `None` when the sample gave nothing to go on (e.g. empty file)
    pub label: Option<String>,
    /// Heuristic probability in [0, 1]
    pub confidence: f32,
}

/// How the encoding for a run was decided
#[derive(Debug, Clone, PartialEq)]
pub enum EncodingChoice {
    Detected(DetectedEncoding),
    Specified(String),
}

/// Byte-to-text conversion for a resolved label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoder {
    /// An encoding from the WHATWG table (UTF-8, windows-125x, UTF-16, ...)
    Whatwg(&'static Encoding),
    /// Strict ISO-8859-1: byte `n` is code point U+00nn, 0x80-0x9F included
    Latin1,
    /// 7-bit ASCII: every byte >= 0x80 becomes U+FFFD
    Ascii,
}

impl Decoder {
    pub fn name(self) -> &'static str {
        match self {
            Decoder::Whatwg(encoding) => encoding.name(),
            Decoder::Latin1 => "ISO-8859-1",
            Decoder::Ascii => "US-ASCII",
        }
    }

    /// Decode `bytes`, replacing anything malformed with U+FFFD.
    ///
    /// The flag reports whether a replacement happened. A BOM is only
    /// stripped for WHATWG encodings, and only when it matches.
    pub fn decode(self, bytes: &[u8]) -> (Cow<'_, str>, bool) {
        match self {
            Decoder::Whatwg(encoding) => encoding.decode_with_bom_removal(bytes),
            Decoder::Latin1 => (encoding_rs::mem::decode_latin1(bytes), false),
            Decoder::Ascii if bytes.is_ascii() => (encoding_rs::mem::decode_latin1(bytes), false),
            Decoder::Ascii => {
                // WHY: one U+FFFD per offending byte, never a multi-byte guess
                let text = bytes
                    .iter()
                    .map(|&b| if b.is_ascii() { b as char } else { char::REPLACEMENT_CHARACTER })
                    .collect();
                (Cow::Owned(text), true)
            }
        }
    }
}

/// Run statistical detection over an in-memory sample.
pub fn detect_bytes(sample: &[u8]) -> DetectedEncoding {
    if sample.is_empty() {
        return DetectedEncoding { label: None, confidence: 0.0 };
    }

    let sample = sample[..sample.len().min(SAMPLE_SIZE)].to_vec();
    let (label, confidence, _language) = chardet::detect(&sample);

    let label = if label.trim().is_empty() { None } else { Some(label) };
    DetectedEncoding {
        label,
        confidence: confidence.clamp(0.0, 1.0),
    }
}

/// Detect the encoding of a file from at most [`SAMPLE_SIZE`] leading bytes.
///
/// I/O failures (missing or unreadable file) are returned unchanged so callers
/// can tell a missing input apart from other errors.
pub async fn detect_encoding<P: AsRef<Path>>(file_path: P) -> Result<DetectedEncoding> {
    let path = file_path.as_ref();
    let file = File::open(path).await?;

    let mut sample = Vec::with_capacity(SAMPLE_SIZE);
    file.take(SAMPLE_SIZE as u64).read_to_end(&mut sample).await?;

    let detected = detect_bytes(&sample);
    debug!(
        path = %path.display(),
        sample_bytes = sample.len(),
        label = ?detected.label,
        confidence = detected.confidence,
        "Encoding detection finished"
    );
    Ok(detected)
}

/// Map a user- or detector-supplied label onto a decoder.
///
/// Matching is case-insensitive, underscores read as hyphens and a trailing
/// `-sig` is ignored (BOM removal is always on). Latin-1 and ASCII spellings
/// get their strict decoders; everything else goes through the WHATWG label
/// table, retrying without hyphens.
pub fn lookup_encoding(label: &str) -> Option<Decoder> {
    let normalized = label.trim().to_ascii_lowercase().replace('_', "-");
    let normalized = normalized.strip_suffix("-sig").unwrap_or(&normalized);
    if normalized.is_empty() {
        return None;
    }

    if LATIN1_LABELS.contains(&normalized) {
        return Some(Decoder::Latin1);
    }
    if ASCII_LABELS.contains(&normalized) {
        return Some(Decoder::Ascii);
    }

    Encoding::for_label(normalized.as_bytes())
        .or_else(|| Encoding::for_label(normalized.replace('-', "").as_bytes()))
        .map(Decoder::Whatwg)
}

/// Decide the encoding for `file_path`: the override wins, otherwise detect.
///
/// An empty override counts as no override.
pub async fn resolve<P: AsRef<Path>>(file_path: P, specified: Option<&str>) -> Result<EncodingChoice> {
    match specified.filter(|label| !label.is_empty()) {
        Some(label) => Ok(EncodingChoice::Specified(label.to_string())),
        None => {
            let path = file_path.as_ref();
            let detected = detect_encoding(path)
                .await
                .with_context(|| format!("Failed to sample {}", path.display()))?;
            Ok(EncodingChoice::Detected(detected))
        }
    }
}

impl EncodingChoice {
    pub fn label(&self) -> Option<&str> {
        match self {
            EncodingChoice::Detected(detected) => detected.label.as_deref(),
            EncodingChoice::Specified(label) => Some(label),
        }
    }

    /// Decoder for this choice.
    ///
    /// An explicit label the decoder table does not know is an error naming
    /// that label. A detected label that is missing or unknown falls back to
    /// UTF-8, since the replace-on-error read still yields usable text.
    pub fn decoder(&self, file_path: &Path) -> Result<Decoder> {
        match self {
            EncodingChoice::Specified(label) => lookup_encoding(label).ok_or_else(|| {
                ToolError::UnsupportedEncoding {
                    path: file_path.to_path_buf(),
                    encoding: label.clone(),
                }
                .into()
            }),
            EncodingChoice::Detected(detected) => {
                match detected.label.as_deref().and_then(lookup_encoding) {
                    Some(decoder) => Ok(decoder),
                    None => {
                        warn!(
                            path = %file_path.display(),
                            label = ?detected.label,
                            "No usable detected encoding, decoding as UTF-8"
                        );
                        Ok(Decoder::Whatwg(UTF_8))
                    }
                }
            }
        }
    }
}

impl fmt::Display for EncodingChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodingChoice::Detected(detected) => write!(
                f,
                "Detected encoding: {} (confidence: {:.2})",
                detected.label.as_deref().unwrap_or("unknown"),
                detected.confidence
            ),
            EncodingChoice::Specified(label) => write!(f, "Using specified encoding: {label}"),
        }
    }
}
