//! CLI binary for bionic-reader.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ProcessingConfig` and prints results.

use anyhow::{Context, Result};
use bionic_reader::{
    process_file, process_to_file, ProcessingConfig, ProcessingProgressCallback, ProgressCallback,
};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Spinner while the document is decoded, then a bar over render batches.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);
        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening document…");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl ProcessingProgressCallback for CliProgressCallback {
    fn on_processing_start(&self, filename: &str, file_size: usize) {
        self.bar.set_prefix("Extracting");
        self.bar
            .set_message(format!("{filename} ({})", dim(&format!("{file_size} bytes"))));
    }

    fn on_lines_extracted(&self, count: usize) {
        self.bar
            .println(format!("{} {} lines extracted", cyan("◆"), bold(&count.to_string())));
    }

    fn on_render_start(&self, total_paragraphs: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>4}/{len} paragraphs  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total_paragraphs as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Rendering");
    }

    fn on_batch_complete(&self, done: usize, _total: usize) {
        self.bar.set_position(done as u64);
    }

    fn on_processing_complete(&self, paragraphs: usize, truncated: bool) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} paragraphs rendered{}",
            green("✔"),
            bold(&paragraphs.to_string()),
            if truncated {
                cyan("  (output truncated)")
            } else {
                String::new()
            }
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Bionic HTML on stdout
  bionic notes.txt

  # Write to a file
  bionic report.docx -o report.html

  # Paragraphs only, no bolding
  bionic --plain paper.pdf

  # Treat CJK full stops as sentence ends
  bionic --terminal-marks '.。！？' novel.txt

  # Legacy Chinese text file
  bionic --encoding gbk old.txt

  # Document JSON (content + metadata + stats)
  bionic --json report.pdf > report.json

  # HTTP service (requires the `server` feature)
  bionic --serve 0.0.0.0:3000

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH   Path to libpdfium (file or directory) for PDF input
  RUST_LOG          Overrides the log filter (e.g. bionic_reader=debug)
"#;

/// Convert documents to bionic-reading HTML.
#[derive(Parser, Debug)]
#[command(
    name = "bionic",
    version,
    about = "Convert Word, PDF and text documents to bionic-reading HTML",
    long_about = "Convert Word (.doc/.docx), PDF and plain-text documents (local files or URLs) \
into HTML paragraphs with an adaptive bold prefix on every word. English and Chinese text are \
both supported.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local document path or HTTP/HTTPS URL.
    #[arg(required_unless_present = "serve")]
    input: Option<String>,

    /// Write HTML to this file instead of stdout.
    #[arg(short, long, env = "BIONIC_OUTPUT")]
    output: Option<PathBuf>,

    /// Structure paragraphs but do not bold anything.
    #[arg(long, env = "BIONIC_PLAIN")]
    plain: bool,

    /// Output the document as JSON (content, metadata, stats) on stdout.
    #[arg(long, env = "BIONIC_JSON", conflicts_with = "output")]
    json: bool,

    /// Base bold ratio for Chinese runs.
    #[arg(long, env = "BIONIC_CHINESE_RATIO", default_value_t = 1.0)]
    chinese_ratio: f64,

    /// Base bold ratio for English words.
    #[arg(long, env = "BIONIC_ENGLISH_RATIO", default_value_t = 0.4)]
    english_ratio: f64,

    /// Words shorter than this are left plain (a lone Chinese character is always bolded).
    #[arg(long, env = "BIONIC_MIN_LENGTH", default_value_t = 3)]
    min_length: usize,

    /// Bold common English words such as "the" and "and" too.
    #[arg(long, env = "BIONIC_NO_SKIP_COMMON")]
    no_skip_common: bool,

    /// Maximum output length in characters before truncation.
    #[arg(long, env = "BIONIC_MAX_LENGTH", default_value_t = 100_000)]
    max_length: usize,

    /// Characters that end a sentence for paragraph detection.
    #[arg(long, env = "BIONIC_TERMINAL_MARKS", default_value = ".")]
    terminal_marks: String,

    /// Encoding label for .txt input without a BOM (utf-8, gbk, big5, …).
    #[arg(long, env = "BIONIC_ENCODING")]
    encoding: Option<String>,

    /// Number of leading PDF pages to read.
    #[arg(long, env = "BIONIC_MAX_PDF_PAGES", default_value_t = 20)]
    max_pdf_pages: usize,

    /// Maximum input size in bytes.
    #[arg(long, env = "BIONIC_MAX_FILE_SIZE", default_value_t = 5 * 1024 * 1024)]
    max_file_size: usize,

    /// Number of render batches processed in parallel.
    #[arg(short, long, env = "BIONIC_CONCURRENCY", default_value_t = 4)]
    concurrency: usize,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "BIONIC_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// Disable progress bar.
    #[arg(long, env = "BIONIC_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "BIONIC_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "BIONIC_QUIET")]
    quiet: bool,

    /// Run the HTTP service on this address instead of converting a file.
    #[arg(long, env = "BIONIC_SERVE", value_name = "ADDR")]
    serve: Option<std::net::SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO logs for interactive conversions.
    let show_progress = cli.serve.is_none() && !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn ProcessingProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    // ── Service mode ─────────────────────────────────────────────────────
    if let Some(addr) = cli.serve {
        return serve(addr, config).await;
    }

    let input = cli
        .input
        .as_deref()
        .context("An input path or URL is required")?;

    // ── Run processing ───────────────────────────────────────────────────
    if let Some(ref output_path) = cli.output {
        let document = process_to_file(input, output_path, &config)
            .await
            .context("Processing failed")?;

        if !cli.quiet {
            eprintln!(
                "{}  {} paragraphs  {}ms  →  {}",
                green("✔"),
                document.stats.paragraph_count,
                document.stats.total_duration_ms,
                bold(&output_path.display().to_string()),
            );
        }
    } else {
        let document = process_file(input, &config)
            .await
            .context("Processing failed")?;

        if cli.json {
            let json =
                serde_json::to_string_pretty(&document).context("Failed to serialise output")?;
            println!("{json}");
        } else {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(document.content.as_bytes())
                .context("Failed to write to stdout")?;
            handle.write_all(b"\n").ok();
        }

        if !cli.quiet && !show_progress && !cli.json {
            eprintln!(
                "Rendered {} paragraphs ({} chars) in {}ms{}",
                document.stats.paragraph_count,
                document.stats.content_length,
                document.stats.total_duration_ms,
                if document.stats.truncated {
                    ", truncated"
                } else {
                    ""
                }
            );
        }
    }

    Ok(())
}

/// Map CLI args to `ProcessingConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ProcessingConfig> {
    let marks: Vec<char> = cli.terminal_marks.chars().filter(|c| !c.is_whitespace()).collect();
    if marks.is_empty() {
        anyhow::bail!("--terminal-marks must contain at least one character");
    }

    let mut builder = ProcessingConfig::builder()
        .bionic_enabled(!cli.plain)
        .chinese_ratio(cli.chinese_ratio)
        .english_ratio(cli.english_ratio)
        .min_length(cli.min_length)
        .skip_common_words(!cli.no_skip_common)
        .terminal_marks(marks)
        .max_content_length(cli.max_length)
        .max_file_size(cli.max_file_size)
        .max_pdf_pages(cli.max_pdf_pages)
        .concurrency(cli.concurrency)
        .download_timeout_secs(cli.download_timeout);

    if let Some(ref label) = cli.encoding {
        builder = builder.text_encoding(label.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

#[cfg(feature = "server")]
async fn serve(addr: std::net::SocketAddr, config: ProcessingConfig) -> Result<()> {
    bionic_reader::server::serve(addr, config)
        .await
        .context("HTTP service failed")
}

#[cfg(not(feature = "server"))]
async fn serve(_addr: std::net::SocketAddr, _config: ProcessingConfig) -> Result<()> {
    anyhow::bail!("This binary was built without the `server` feature; rebuild with --features server")
}
