use clap::Parser;
use corpus_prep::cli::{CommonArgs, Tool};
use corpus_prep::{encoding, reader, EncodingChoice, FrequencyTable, ToolError};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "charfreq")]
#[command(about = "Print a character frequency table for a text file")]
#[command(version)]
struct Args {
    /// Text file to analyze
    file_path: PathBuf,

    /// Encoding to decode with; auto-detected when omitted
    encoding: Option<String>,

    /// Print a JSON document instead of the tab-separated table
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    common: CommonArgs,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args: Args = Tool::CharFreq.parse_args();
    args.common.init_tracing();

    info!(?args, "Parsed CLI arguments");

    if let Err(err) = run(&args).await {
        Tool::CharFreq.report(&err);
    }
}

async fn run(args: &Args) -> Result<(), ToolError> {
    let classify = |e: anyhow::Error| ToolError::classify(e, &args.file_path);

    let choice = encoding::resolve(&args.file_path, args.encoding.as_deref())
        .await
        .map_err(classify)?;
    if !args.json {
        println!("{choice}");
    }

    let decoder = choice.decoder(&args.file_path).map_err(classify)?;
    let (text, stats) = reader::read_decoded(&args.file_path, decoder, &args.common.reader_config())
        .await
        .map_err(classify)?;

    let table = FrequencyTable::from_text(&text);
    info!(
        "Counted {} distinct characters over {} total in {}",
        table.len(),
        table.total(),
        stats.file_path
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if args.json {
        let document = json_document(&choice, &table);
        serde_json::to_writer_pretty(&mut out, &document).map_err(|e| ToolError::Other(e.into()))?;
        writeln!(out).map_err(|e| ToolError::Other(e.into()))?;
    } else {
        writeln!(out, "Character Frequency Table (sorted by most common):")
            .and_then(|_| table.write_table(&mut out))
            .map_err(|e| ToolError::Other(e.into()))?;
    }

    Ok(())
}

fn json_document(choice: &EncodingChoice, table: &FrequencyTable) -> serde_json::Value {
    let confidence = match choice {
        EncodingChoice::Detected(detected) => Some(detected.confidence),
        EncodingChoice::Specified(_) => None,
    };

    serde_json::json!({
        "encoding": choice.label(),
        "specified": matches!(choice, EncodingChoice::Specified(_)),
        "confidence": confidence,
        "total": table.total(),
        "rows": table.rows(),
    })
}
