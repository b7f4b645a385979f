use clap::Parser;
use corpus_prep::cli::{CommonArgs, Tool};
use corpus_prep::{encoding, reader, sanitize_with_stats, ToolError};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "sanitize")]
#[command(about = "Reduce a text file to lowercase a-z, space, .,?' and newline")]
#[command(version)]
struct Args {
    /// Text file to sanitize
    input_file_path: PathBuf,

    /// Destination, written as UTF-8 (created or overwritten)
    output_file_path: PathBuf,

    /// Encoding to decode the input with; auto-detected when omitted
    encoding: Option<String>,

    #[command(flatten)]
    common: CommonArgs,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args: Args = Tool::Sanitize.parse_args();
    args.common.init_tracing();

    info!(?args, "Parsed CLI arguments");

    if let Err(err) = run(&args).await {
        Tool::Sanitize.report(&err);
    }
}

async fn run(args: &Args) -> Result<(), ToolError> {
    let input = &args.input_file_path;
    let classify = |e: anyhow::Error| ToolError::classify(e, input);

    let choice = encoding::resolve(input, args.encoding.as_deref())
        .await
        .map_err(classify)?;
    println!("{choice}");

    let decoder = choice.decoder(input).map_err(classify)?;
    let (text, _stats) = reader::read_decoded(input, decoder, &args.common.reader_config())
        .await
        .map_err(classify)?;

    let (sanitized, stats) = sanitize_with_stats(&text);
    info!(
        chars = stats.chars_in,
        substituted = stats.substituted,
        blanked = stats.blanked,
        "Sanitized {}",
        input.display()
    );

    // WHY: output is only opened once the whole input has been transformed,
    // so a failed decode never truncates an existing file
    tokio::fs::write(&args.output_file_path, sanitized.as_bytes())
        .await
        .map_err(|source| ToolError::Write {
            path: args.output_file_path.clone(),
            source,
        })?;

    println!("Sanitized text saved to {}", args.output_file_path.display());
    Ok(())
}
