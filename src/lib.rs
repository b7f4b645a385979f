pub mod cli;
pub mod encoding;
pub mod error;
pub mod frequency;
pub mod reader;
pub mod sanitizer;

// Re-export main types for convenient access
pub use encoding::{
    detect_bytes, detect_encoding, lookup_encoding, resolve,
    Decoder, DetectedEncoding, EncodingChoice, SAMPLE_SIZE
};

pub use error::ToolError;

pub use frequency::{display_char, FrequencyRow, FrequencyTable};

pub use reader::{read_decoded, translate_newlines, ReadStats, ReaderConfig};

pub use sanitizer::{
    is_allowed, sanitize, sanitize_with_stats, substitute,
    SanitizeStats, ALLOWED_CHARS, SUBSTITUTIONS
};
