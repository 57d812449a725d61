//! resumekit CLI - résumé download and PDF to Word conversion

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use resumekit::convert::{ConvertContext, ProgressSink};
use resumekit::download::{
    DirectorySink, DownloadFormat, DownloadOrchestrator, DownloadRequest, HttpResumeSource,
    Notification, Notifier,
};
use resumekit::render::{to_json, to_text};
use resumekit::{
    BuildOptions, ClientConfig, ConvertOptions, ExtractOptions, JsonFormat, LayoutConfig,
    PageSelection, PdfExtractor, PdfToDocxConverter, Resumekit, Stage,
};

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "resumekit")]
#[command(version)]
#[command(about = "Download resumes and convert PDF resumes to Word", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a PDF resume to DOCX
    Convert {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (defaults to the input name with .docx)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Page range (e.g., "1-2", "1,3")
        #[arg(long)]
        pages: Option<String>,

        /// Skip pages that fail to parse
        #[arg(long)]
        lenient: bool,

        /// Password for encrypted PDFs
        #[arg(long)]
        password: Option<String>,

        /// Start each source page on a new Word page
        #[arg(long)]
        page_breaks: bool,
    },

    /// Show how each line of a PDF is classified
    Inspect {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print the built document as JSON
        #[arg(long)]
        json: bool,

        /// Compact JSON
        #[arg(long, requires = "json")]
        compact: bool,
    },

    /// Show document information
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Download a candidate's resume from the backend
    Download {
        /// Candidate id
        #[arg(long)]
        candidate: String,

        /// Job id
        #[arg(long)]
        job: String,

        /// Candidate full name, used when the server sends no filename
        #[arg(long)]
        name: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value = "pdf")]
        format: FormatArg,

        /// Output directory
        #[arg(long, value_name = "DIR", default_value = ".")]
        out: PathBuf,

        /// Backend base URL
        #[arg(long, env = "RESUMEKIT_BASE_URL")]
        base_url: String,

        /// Bearer token
        #[arg(long, env = "RESUMEKIT_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Request timeout in seconds
        #[arg(long, default_value = "60")]
        timeout: u64,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    /// Stored PDF
    Pdf,
    /// Stored DOCX
    Docx,
    /// PDF converted to Word locally
    Word,
}

impl From<FormatArg> for DownloadFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Pdf => DownloadFormat::Pdf,
            FormatArg::Docx => DownloadFormat::Docx,
            FormatArg::Word => DownloadFormat::Word,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert {
            input,
            output,
            pages,
            lenient,
            password,
            page_breaks,
        } => cmd_convert(
            &input,
            output.as_deref(),
            pages.as_deref(),
            lenient,
            password,
            page_breaks,
        ),
        Commands::Inspect {
            input,
            json,
            compact,
        } => cmd_inspect(&input, json, compact),
        Commands::Info { input } => cmd_info(&input),
        Commands::Download {
            candidate,
            job,
            name,
            format,
            out,
            base_url,
            token,
            timeout,
        } => {
            let config = ClientConfig::new(base_url)
                .with_token(token.unwrap_or_default())
                .with_timeout(std::time::Duration::from_secs(timeout));
            let mut request = DownloadRequest::new(candidate, job, format.into());
            if let Some(name) = name {
                request = request.with_name(name);
            }
            cmd_download(config, request, out)
        }
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn progress_bar() -> Result<ProgressBar, Box<dyn std::error::Error>> {
    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos:>3}% {msg}")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

fn bar_sink(pb: &ProgressBar) -> Arc<dyn ProgressSink> {
    let pb = pb.clone();
    Arc::new(move |percent: u8, stage: Stage| {
        pb.set_position(percent as u64);
        pb.set_message(stage.label());
    })
}

fn cmd_convert(
    input: &Path,
    output: Option<&Path>,
    pages: Option<&str>,
    lenient: bool,
    password: Option<String>,
    page_breaks: bool,
) -> CliResult {
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| input.with_extension("docx"));

    let mut builder = Resumekit::new().with_page_breaks(page_breaks);
    if let Some(p) = pages {
        builder = builder.with_pages(PageSelection::parse(p)?);
    }
    if lenient {
        builder = builder.lenient();
    }
    if let Some(password) = password {
        builder = builder.with_password(password);
    }

    let extract = &builder.options().extract;
    log::debug!(
        "Converting {} -> {} (pages: {:?}, mode: {:?}, password: {}, page breaks: {})",
        input.display(),
        output.display(),
        extract.pages,
        extract.error_mode,
        extract.password.is_some(),
        page_breaks
    );

    let pb = progress_bar()?;
    let result = builder.with_progress(bar_sink(&pb)).convert_file(input)?;
    fs::write(&output, &result.bytes)?;
    pb.finish_with_message("Done!");

    println!("\n{} {}", "Saved to".green(), output.display());
    println!(
        "  {} {} pages, {} lines, {} links",
        "└─".dimmed(),
        result.stats.pages,
        result.stats.lines,
        result.stats.links
    );

    Ok(())
}

fn cmd_inspect(input: &Path, json: bool, compact: bool) -> CliResult {
    let converter = PdfToDocxConverter::new(ConvertOptions::default());

    if json {
        let data = fs::read(input)?;
        let (doc, _) = converter.to_document(&data, &ConvertContext::new())?;
        let format = if compact {
            JsonFormat::Compact
        } else {
            JsonFormat::Pretty
        };
        println!("{}", to_json(&doc, format)?);
        return Ok(());
    }

    let lines = Resumekit::new().classify_file(input)?;
    let mut page = 0;
    for styled in &lines {
        if styled.page != page {
            page = styled.page;
            println!("{}", format!("── page {} ──", page).dimmed());
        }
        let label = format!("{:<8}", styled.style.kind.label());
        let label = match styled.style.kind {
            resumekit::LineKind::Heading1 => label.magenta().bold(),
            resumekit::LineKind::Heading2 => label.cyan().bold(),
            resumekit::LineKind::Bullet => label.yellow(),
            resumekit::LineKind::Normal => label.normal(),
        };
        println!(
            "{} {:>5.1}pt  {}",
            label,
            styled.style.size_points(),
            styled.text()
        );
    }

    if lines.is_empty() {
        println!("{}", "No text found".yellow());
    }

    Ok(())
}

fn cmd_info(input: &Path) -> CliResult {
    let extraction = PdfExtractor::new(ExtractOptions::new().lenient()).extract_file(input)?;
    let metadata = &extraction.metadata;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    for (label, value) in metadata.summary() {
        println!("{}: {}", label.bold(), value);
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let lines = resumekit::layout::analyze(&extraction, &LayoutConfig::default())?;
    let doc = resumekit::render::build_document(
        &lines,
        &extraction.all_links(),
        metadata.clone(),
        &BuildOptions::default(),
    );
    let text = to_text(&doc);

    println!("{}: {}", "Pages extracted".bold(), extraction.page_count());
    println!("{}: {}", "Lines".bold(), lines.len());
    println!("{}: {}", "Text runs".bold(), extraction.run_count());
    println!("{}: {}", "Paragraphs".bold(), doc.len());
    println!("{}: {}", "Links".bold(), doc.hyperlinks().count());
    println!("{}: {}", "Words".bold(), text.split_whitespace().count());

    Ok(())
}

struct ConsoleNotifier {
    pb: ProgressBar,
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: &Notification) {
        let line = match notification {
            Notification::Preparing | Notification::Converting => {
                notification.to_string().cyan().to_string()
            }
            Notification::Done { .. } => notification.to_string().green().to_string(),
            Notification::Failed {
                password_protected, ..
            } => {
                let mut line = notification.to_string().red().bold().to_string();
                if *password_protected {
                    line.push_str(&" (download the PDF instead)".dimmed().to_string());
                }
                line
            }
        };
        self.pb.println(line);
    }
}

fn cmd_download(config: ClientConfig, request: DownloadRequest, out: PathBuf) -> CliResult {
    let source = HttpResumeSource::new(config)?;
    let pb = progress_bar()?;
    let orchestrator = DownloadOrchestrator::new(
        source,
        PdfToDocxConverter::default(),
        DirectorySink::new(out),
        ConsoleNotifier { pb: pb.clone() },
    )
    .with_progress(bar_sink(&pb));

    let rt = tokio::runtime::Runtime::new()?;
    let result = rt.block_on(orchestrator.download(&request));
    match result {
        Ok(_) => pb.finish_with_message("Done!"),
        Err(_) => pb.abandon(),
    }
    result?;

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "resumekit".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Resume download and PDF to Word conversion");
    println!();
    println!("Library: resumekit {}", resumekit::VERSION);
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_download_args() {
        let cli = Cli::try_parse_from([
            "resumekit",
            "download",
            "--candidate",
            "42",
            "--job",
            "7",
            "--format",
            "word",
            "--base-url",
            "https://ats.example.com/api",
        ])
        .unwrap();
        match cli.command {
            Commands::Download {
                candidate, format, ..
            } => {
                assert_eq!(candidate, "42");
                assert!(format == FormatArg::Word);
            }
            _ => panic!("expected download"),
        }
    }

    #[test]
    fn test_parse_convert_args() {
        let cli = Cli::try_parse_from([
            "resumekit",
            "convert",
            "cv.pdf",
            "-o",
            "cv.docx",
            "--pages",
            "1-2",
            "--page-breaks",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Convert {
                page_breaks: true,
                ..
            }
        ));
    }
}
