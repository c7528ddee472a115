// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Docwerk — command-line front end.
//
// Entry point. Initialises logging, loads the conversion config, runs one
// conversion and writes the artifact into the output directory.

mod sink;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use docwerk_convert::{ArtifactSink, AsyncConverter, ConversionResult, SourceDocument};
use docwerk_core::human_errors::{HumanError, humanize_conversion_error, humanize_error};
use docwerk_core::{ConversionConfig, ImageRasterSpec};

use sink::DirectorySink;

#[derive(Parser)]
#[command(name = "docwerk")]
#[command(version)]
#[command(about = "Convert text, PDF, DOCX and images locally", long_about = None)]
struct Cli {
    /// Directory the output file is written to
    #[arg(long, global = true, value_name = "DIR", default_value = ".")]
    out_dir: PathBuf,

    /// JSON conversion settings (page size, margins, resize search)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a txt, pdf or docx file from a text file
    Text {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output format: txt, pdf or docx
        #[arg(short, long, default_value = "pdf")]
        format: String,

        /// Output name (defaults to the input's stem)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Re-typeset a DOCX document as PDF
    DocxToPdf {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[arg(short, long)]
        name: Option<String>,
    },

    /// Merge PDFs in the given order
    MergePdf {
        #[arg(value_name = "FILE", num_args = 2.., required = true)]
        inputs: Vec<PathBuf>,

        #[arg(short, long, default_value = "merged")]
        name: String,
    },

    /// Merge DOCX files in the given order
    MergeDocx {
        #[arg(value_name = "FILE", num_args = 2.., required = true)]
        inputs: Vec<PathBuf>,

        #[arg(short, long, default_value = "document")]
        name: String,
    },

    /// Put each image on its own PDF page
    ImagesToPdf {
        #[arg(value_name = "FILE", num_args = 1.., required = true)]
        inputs: Vec<PathBuf>,

        #[arg(short, long, default_value = "images")]
        name: String,
    },

    /// Resize an image and save it as JPEG
    Resize {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[arg(long)]
        width: Option<u32>,

        #[arg(long)]
        height: Option<u32>,

        /// JPEG quality (1-100)
        #[arg(short, long, default_value_t = 80)]
        quality: u8,

        /// Best-effort size ceiling in kilobytes
        #[arg(long, value_name = "KB")]
        target_kb: Option<u32>,

        #[arg(short, long)]
        name: Option<String>,
    },

    /// Extract a PDF's text into a DOCX document
    PdfToDocx {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[arg(short, long)]
        name: Option<String>,
    },

    /// Extract a PDF's text
    PdfToText {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[arg(short, long)]
        name: Option<String>,
    },
}

/// Why a run failed, before it is turned into a message.
#[derive(Debug)]
enum Failure {
    Setup(docwerk_core::DocwerkError),
    Conversion(docwerk_core::ConversionError),
}

impl Failure {
    fn humanize(&self) -> HumanError {
        match self {
            Self::Setup(err) => humanize_error(err),
            Self::Conversion(err) => humanize_conversion_error(err),
        }
    }
}

impl From<docwerk_core::DocwerkError> for Failure {
    fn from(err: docwerk_core::DocwerkError) -> Self {
        Self::Setup(err)
    }
}

impl From<docwerk_core::ConversionError> for Failure {
    fn from(err: docwerk_core::ConversionError) -> Self {
        Self::Conversion(err)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(path) => {
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        Err(failure) => {
            let human = failure.humanize();
            eprintln!("{}\n{}", human.message, human.suggestion);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<PathBuf, Failure> {
    let config = match &cli.config {
        Some(path) => ConversionConfig::load(path)?,
        None => ConversionConfig::default(),
    };
    let converter = AsyncConverter::new(config)?;
    let sink = DirectorySink::new(cli.out_dir);

    let result = convert(&converter, cli.command).await?;
    let path = sink.path_for(&result)?;
    sink.deliver(&result).await?;
    Ok(path)
}

async fn convert(converter: &AsyncConverter, command: Commands) -> Result<ConversionResult, Failure> {
    let result = match command {
        Commands::Text {
            input,
            format,
            name,
        } => {
            let content = tokio::fs::read_to_string(&input)
                .await
                .map_err(docwerk_core::DocwerkError::from)?;
            let name = name.unwrap_or_else(|| stem(&input));
            converter.generate_file(content, name, format).await?
        }
        Commands::DocxToPdf { input, name } => {
            let name = name.unwrap_or_else(|| stem(&input));
            let source = SourceDocument::from_path(&input).await?;
            converter.convert_docx_to_pdf(source, name).await?
        }
        Commands::MergePdf { inputs, name } => {
            converter.merge_pdf_files(read_all(&inputs).await?, name).await?
        }
        Commands::MergeDocx { inputs, name } => {
            converter.merge_docx_files(read_all(&inputs).await?, name).await?
        }
        Commands::ImagesToPdf { inputs, name } => {
            converter
                .convert_images_to_pdf(read_all(&inputs).await?, name)
                .await?
        }
        Commands::Resize {
            input,
            width,
            height,
            quality,
            target_kb,
            name,
        } => {
            let name = name.unwrap_or_else(|| format!("{}_resized", stem(&input)));
            let spec = ImageRasterSpec {
                width,
                height,
                quality,
                target_size_kb: target_kb,
            };
            let source = SourceDocument::from_path(&input).await?;
            converter.resize_image(source, name, spec).await?
        }
        Commands::PdfToDocx { input, name } => {
            let name = name.unwrap_or_else(|| stem(&input));
            let source = SourceDocument::from_path(&input).await?;
            converter.convert_pdf_to_docx(source, name).await?
        }
        Commands::PdfToText { input, name } => {
            let name = name.unwrap_or_else(|| stem(&input));
            let source = SourceDocument::from_path(&input).await?;
            converter.convert_pdf_to_text(source, name).await?
        }
    };
    Ok(result)
}

async fn read_all(paths: &[PathBuf]) -> docwerk_core::error::Result<Vec<SourceDocument>> {
    let mut sources = Vec::with_capacity(paths.len());
    for path in paths {
        sources.push(SourceDocument::from_path(path).await?);
    }
    Ok(sources)
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::ffi::{OsStr, OsString};

    fn args(out_dir: &Path, rest: &[&OsStr]) -> Vec<OsString> {
        let mut args = vec![
            OsString::from("docwerk"),
            OsString::from("--out-dir"),
            out_dir.as_os_str().to_owned(),
        ];
        args.extend(rest.iter().map(|arg| arg.to_os_string()));
        args
    }

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn merge_requires_two_files() {
        assert!(Cli::try_parse_from(["docwerk", "merge-pdf", "a.pdf"]).is_err());
        assert!(Cli::try_parse_from(["docwerk", "merge-pdf", "a.pdf", "b.pdf"]).is_ok());
    }

    #[test]
    fn stem_drops_directory_and_extension() {
        assert_eq!(stem(Path::new("/tmp/in/report.final.pdf")), "report.final");
    }

    #[tokio::test]
    async fn text_to_pdf_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("notes.txt");
        tokio::fs::write(&input, "hello\nworld").await.unwrap();

        let cli = Cli::try_parse_from(args(dir.path(), &[OsStr::new("text"), input.as_os_str()]))
            .unwrap();
        let path = run(cli).await.unwrap();

        assert_eq!(path, dir.path().join("notes.pdf"));
        let bytes = tokio::fs::read(&path).await.unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn missing_input_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let absent = dir.path().join("absent.pdf");
        let cli = Cli::try_parse_from(args(
            dir.path(),
            &[OsStr::new("pdf-to-text"), absent.as_os_str()],
        ))
        .unwrap();
        let Err(failure) = run(cli).await else {
            panic!("missing input must fail");
        };
        assert!(!failure.humanize().message.is_empty());
    }
}
