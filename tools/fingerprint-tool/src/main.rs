use clap::{Parser, Subcommand};
use doc_fingerprint::scoring::{containment, resemblance};
use doc_fingerprint::sink::{RecordReader, RecordWriter};
use doc_fingerprint::{FingerprintConfig, Fingerprinter, Signature};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fingerprint-tool")]
#[command(about = "Document fingerprinting: hash records, sketches and comparison")]
struct Cli {
    /// Config file (default: ~/.config/doc-fingerprint/config.toml if present)
    #[arg(long, short, global = true)]
    config: Option<String>,
    /// Log at debug level
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the winnowed (hash, position) records of a text file
    Hash {
        #[arg(long, short)]
        input: String,
        #[arg(long, short)]
        output: String,
        /// Use the chunked streaming hasher instead of the whole-document hasher
        #[arg(long)]
        streaming: bool,
    },
    /// Write a CBOR signature of a text file
    Sketch {
        #[arg(long, short)]
        input: String,
        #[arg(long, short)]
        output: String,
        /// Sign with all winnowed hashes instead of the top-k sketch
        #[arg(long)]
        winnowed: bool,
    },
    /// Compare two signature files
    Compare { first: String, second: String },
    /// Print a record file as tab-separated hash/position lines
    Dump {
        #[arg(long, short)]
        input: String,
    },
    /// Write the default configuration as TOML
    InitConfig {
        /// Output file (default: ~/.config/doc-fingerprint/config.toml)
        #[arg(long, short)]
        output: Option<String>,
    },
}

fn default_config_path() -> Option<PathBuf> {
    let mut p = dirs::config_dir()?;
    p.push("doc-fingerprint");
    p.push("config.toml");
    Some(p)
}

fn load_config(path: Option<&str>) -> Result<FingerprintConfig, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return Ok(FingerprintConfig::load(path)?);
    }
    match default_config_path() {
        Some(p) if p.exists() => Ok(FingerprintConfig::load(&p)?),
        _ => Ok(FingerprintConfig::default()),
    }
}

fn open_text(path: &str) -> Result<BufReader<File>, Box<dyn std::error::Error>> {
    Ok(BufReader::new(
        File::open(path).map_err(|e| format!("cannot open {}: {}", path, e))?,
    ))
}

fn hash_file(
    fp: &Fingerprinter,
    input: &str,
    output: &str,
    streaming: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let reader = open_text(input)?;
    let mut writer = RecordWriter::create(output)?;
    if streaming {
        let consumed = fp.stream_document(reader, &mut writer)?;
        tracing::info!("streamed {} normalized chars from {}", consumed, input);
    } else {
        let produced = fp.hash_document(reader, &mut writer)?;
        tracing::info!("hashed {} shingles from {}", produced, input);
    }
    println!(
        "Records written to: {} ({} records)",
        output,
        writer.records_written()
    );
    Ok(())
}

fn sketch_file(
    fp: &Fingerprinter,
    input: &str,
    output: &str,
    winnowed: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let reader = open_text(input)?;
    let signature = if winnowed {
        fp.winnowed_signature(reader)?
    } else {
        fp.sketch(reader)?
    };
    let bytes = signature.to_bytes()?;
    fs::write(output, &bytes)?;
    println!(
        "Signature written to: {} ({} hashes, {} bytes)",
        output,
        signature.len(),
        bytes.len()
    );
    Ok(())
}

fn read_signature(path: &str) -> Result<Signature, Box<dyn std::error::Error>> {
    let bytes = fs::read(path).map_err(|e| format!("cannot read {}: {}", path, e))?;
    Ok(Signature::from_bytes(&bytes)?)
}

fn compare(first: &str, second: &str) -> Result<(), Box<dyn std::error::Error>> {
    let a = read_signature(first)?;
    let b = read_signature(second)?;
    let common = a.similarity(&b);
    let res = resemblance(a.as_slice(), b.as_slice())?;
    let con = containment(a.as_slice(), b.as_slice())?;
    println!("common:      {} ({} vs {} hashes)", common, a.len(), b.len());
    println!("resemblance: {}.{:02}%", res / 100, res % 100);
    println!("containment: {}.{:02}%", con / 100, con % 100);
    Ok(())
}

fn dump(input: &str) -> Result<(), Box<dyn std::error::Error>> {
    for record in RecordReader::open(input)? {
        let record = record?;
        println!("{}\t{}", record.hash, record.position);
    }
    Ok(())
}

fn init_config(output: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let path = match output {
        Some(p) => PathBuf::from(p),
        None => default_config_path().ok_or("Could not find config directory")?,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, FingerprintConfig::default().to_toml_string()?)?;
    println!("Config written to: {}", path.display());
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::InitConfig { output } => init_config(output),
        Commands::Compare { first, second } => compare(&first, &second),
        Commands::Dump { input } => dump(&input),
        Commands::Hash {
            input,
            output,
            streaming,
        } => {
            let fp = Fingerprinter::new(load_config(cli.config.as_deref())?)?;
            hash_file(&fp, &input, &output, streaming)
        }
        Commands::Sketch {
            input,
            output,
            winnowed,
        } => {
            let fp = Fingerprinter::new(load_config(cli.config.as_deref())?)?;
            sketch_file(&fp, &input, &output, winnowed)
        }
    }
}
