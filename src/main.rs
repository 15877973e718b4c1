//! Command-line interface for corpus-gen
//!
//! # Usage Examples
//! ```bash
//! # Roughly 1 GiB of events rendered from a placeholder template
//! corpus-gen generate \
//!   --template template.tpl \
//!   --fields fields.yml \
//!   --config config.yml \
//!   --tot-size 1073741824 \
//!   --output corpus.ndjson
//!
//! # Exactly 1000 events through the text-template engine, to stdout
//! corpus-gen generate \
//!   --template template.tpl --engine text \
//!   --fields fields.yml --count 1000
//! ```

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use corpus_genlib::{
    Config, CustomTemplateGenerator, EmitOutcome, Fields, Generator, TextTemplateGenerator,
};

#[derive(Parser)]
#[command(name = "corpus-gen")]
#[command(about = "Generate synthetic structured-event corpora from templates and field definitions")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a template against field generators until a size or count budget is reached
    Generate {
        /// Template file
        #[arg(long, value_name = "PATH")]
        template: PathBuf,

        /// Template engine variant
        #[arg(long, value_enum, default_value_t = Engine::Custom)]
        engine: Engine,

        /// Field definitions (YAML)
        #[arg(long, value_name = "PATH")]
        fields: PathBuf,

        /// Per-field generation config (YAML)
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Target total output size in bytes (0 = no size bound)
        #[arg(long, default_value_t = 0)]
        tot_size: u64,

        /// Explicit event count; stops after this many events even if the
        /// size budget is not exhausted
        #[arg(long)]
        count: Option<u64>,

        /// RNG seed, overriding the config file
        #[arg(long)]
        seed: Option<u64>,

        /// Output file (stdout when omitted)
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Engine {
    /// Pre-resolved `{{.field}}` placeholder emitter
    Custom,
    /// General-purpose template engine with a `generate` helper
    Text,
}

fn main() -> anyhow::Result<()> {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            template,
            engine,
            fields,
            config,
            tot_size,
            count,
            seed,
            output,
        } => {
            let template = fs::read(&template)
                .with_context(|| format!("Failed to read template from {template:?}"))?;
            let fields = Fields::from_file(&fields)
                .with_context(|| format!("Failed to load field definitions from {fields:?}"))?;
            let mut config = match config {
                Some(path) => Config::from_file(&path)
                    .with_context(|| format!("Failed to load generation config from {path:?}"))?,
                None => Config::default(),
            };
            if let Some(seed) = seed {
                config.seed = Some(seed);
            }

            if tot_size == 0 && count.is_none() {
                anyhow::bail!("one of --tot-size or --count must be set");
            }

            let generator: Box<dyn Generator> = match engine {
                Engine::Custom => Box::new(
                    CustomTemplateGenerator::new(&template, &config, &fields, tot_size)
                        .context("Failed to build custom-template generator")?,
                ),
                Engine::Text => Box::new(
                    TextTemplateGenerator::new(&template, &config, &fields, tot_size)
                        .context("Failed to build text-template generator")?,
                ),
            };

            let mut writer: Box<dyn Write> = match &output {
                Some(path) => Box::new(BufWriter::new(fs::File::create(path).with_context(
                    || format!("Failed to create output file {path:?}"),
                )?)),
                None => Box::new(BufWriter::new(io::stdout())),
            };

            let (events, bytes) = write_corpus(generator, &mut writer, count)?;
            writer.flush().context("Failed to flush output")?;
            tracing::info!(events, bytes, "corpus generation complete");
        }
    }

    Ok(())
}

/// Drive a generator until exhaustion (or an explicit event count), writing
/// each event through `writer`. Returns events and bytes written.
fn write_corpus(
    mut generator: Box<dyn Generator>,
    writer: &mut dyn Write,
    count: Option<u64>,
) -> anyhow::Result<(u64, u64)> {
    let mut buf = Vec::with_capacity(16 * 1024);
    let mut events = 0u64;
    let mut bytes = 0u64;

    loop {
        if let Some(limit) = count {
            if events >= limit {
                break;
            }
        }

        buf.clear();
        match generator.emit(&mut buf)? {
            EmitOutcome::Emitted => {
                writer.write_all(&buf).context("Failed to write event")?;
                events += 1;
                bytes += buf.len() as u64;
                if events % 100_000 == 0 {
                    tracing::debug!(events, bytes, "generation progress");
                }
            }
            EmitOutcome::Exhausted => break,
        }
    }

    generator.close()?;
    Ok((events, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_write_corpus_respects_size_budget() {
        let dir = tempfile::tempdir().unwrap();
        let fields_path = write_file(
            &dir,
            "fields.yml",
            "- name: c\n  type: constant_keyword\n  value: BBBB\n",
        );
        let template_path = write_file(&dir, "template.tpl", "AAAA{{.c}}");

        let template = fs::read(&template_path).unwrap();
        let fields = Fields::from_file(&fields_path).unwrap();
        let generator: Box<dyn Generator> = Box::new(
            CustomTemplateGenerator::new(&template, &Config::default(), &fields, 43).unwrap(),
        );

        let mut out = Vec::new();
        let (events, bytes) = write_corpus(generator, &mut out, None).unwrap();

        assert_eq!(events, 5);
        assert_eq!(bytes, 40);
        assert_eq!(out.len(), 40);
        assert!(out.starts_with(b"AAAABBBB"));
    }

    #[test]
    fn test_write_corpus_respects_explicit_count() {
        let fields =
            Fields::from_yaml("- name: c\n  type: constant_keyword\n  value: x\n").unwrap();
        let generator: Box<dyn Generator> = Box::new(
            CustomTemplateGenerator::new(b"{{.c}}\n", &Config::default(), &fields, 0).unwrap(),
        );

        let mut out = Vec::new();
        let (events, _) = write_corpus(generator, &mut out, Some(3)).unwrap();

        assert_eq!(events, 3);
        assert_eq!(&out, b"x\nx\nx\n");
    }
}
