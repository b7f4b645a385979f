// Command-line plumbing shared by the charfreq and sanitize binaries

use clap::error::ErrorKind;
use clap::{Args, Parser};
use tracing::Level;

use crate::error::ToolError;
use crate::reader::ReaderConfig;

/// Options understood by both tools
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Keep carriage returns instead of folding line endings into '\n'
    #[arg(long)]
    pub keep_cr: bool,

    /// Log debug detail to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

impl CommonArgs {
    pub fn reader_config(&self) -> ReaderConfig {
        ReaderConfig {
            translate_newlines: !self.keep_cr,
        }
    }

    /// Install the tracing subscriber.
    ///
    /// WHY: stdout is the tools' result channel (tables, JSON, error lines), so
    /// logs must never land there.
    pub fn init_tracing(&self) {
        let level = if self.verbose { Level::DEBUG } else { Level::WARN };
        let builder = tracing_subscriber::fmt()
            .with_target(false)
            .with_max_level(level)
            .with_writer(std::io::stderr);

        if self.log_json {
            builder.json().init();
        } else {
            builder.init();
        }
    }
}

/// Which binary is reporting, for usage and remediation text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    CharFreq,
    Sanitize,
}

/// WHY: cp1252 and latin-1 decode 0x80-0x9F differently, so both are offered
pub const COMMON_ENCODINGS: &str = "latin-1, cp1252, iso-8859-1";

impl Tool {
    pub fn usage(self) -> &'static str {
        match self {
            Tool::CharFreq => "Usage: charfreq <file_path> [encoding]",
            Tool::Sanitize => "Usage: sanitize <input_file_path> <output_file_path> [encoding]",
        }
    }

    fn encoding_example(self) -> &'static str {
        match self {
            Tool::CharFreq => "charfreq filename.txt encoding",
            Tool::Sanitize => "sanitize input.txt output.txt encoding",
        }
    }

    /// Parse arguments, exiting with status 1 and the usage text when they
    /// are missing or malformed. `--help` and `--version` keep clap's behavior.
    pub fn parse_args<T: Parser>(self) -> T {
        match T::try_parse() {
            Ok(args) => args,
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
            Err(e) => {
                // WHY: usage failures exit 1; reported runtime failures exit 0
                eprint!("{e}");
                println!("{}", self.usage());
                println!("If encoding is not specified, it will be auto-detected.");
                std::process::exit(1);
            }
        }
    }

    /// Lines printed to stdout for a failed run
    pub fn error_lines(self, err: &ToolError) -> Vec<String> {
        let mut lines = vec![format!("Error: {err}")];
        if let ToolError::UnsupportedEncoding { .. } = err {
            lines.push(format!(
                "Try specifying a different encoding: {}",
                self.encoding_example()
            ));
            lines.push(format!("Common encodings: {COMMON_ENCODINGS}"));
        }
        lines
    }

    pub fn report(self, err: &ToolError) {
        tracing::debug!(error = ?err, "Run failed");
        for line in self.error_lines(err) {
            println!("{line}");
        }
    }
}
