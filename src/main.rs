use abyssal_press::{config, format, output, pdf, scan, types};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Shared flags for commands that export a PDF.
#[derive(clap::Args, Clone)]
struct PdfArgs {
    /// Keep images in the exported PDF (stripped by default)
    #[arg(long)]
    images: bool,

    /// Extra CSS file appended to the print stylesheet
    #[arg(long)]
    pdf_css: Option<PathBuf>,
}

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "abyssal-press")]
#[command(about = "Grimoire formatter and PDF press for Templo do Abismo")]
#[command(long_about = "\
Grimoire formatter and PDF press for Templo do Abismo

Your filesystem is the data source. A grimoire is a directory of plain-text
chapters ordered by numeric prefix; formatting decorates them with the
temple's symbols and highlighted vocabulary, and the press paginates the
result into an A4 PDF.

Content structure:

  content/
  ├── grimoire.toml                # Grimoire config (optional)
  ├── 010-Introdução.txt           # Chapter (numbered = included)
  ├── 020-O-Primeiro-Rito.txt      # Dashes become spaces in the title
  └── rascunho.txt                 # No number prefix = draft, excluded

Formatting rules (per paragraph, first match wins):
  Heading:  short line ending with ':'
  Quote:    wrapped in double quotes
  List:     every line starts with '-', '*' or 'N.'
  Warning:  contains a warning keyword (cuidado, atenção, ...)
  Plain:    everything else

Run 'abyssal-press gen-config' to generate a documented grimoire.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan the content directory and show the discovered grimoire
    Scan,
    /// Format the grimoire into a standalone HTML page
    Format,
    /// Format the grimoire and press it into an A4 PDF
    Pdf(PdfArgs),
    /// Run the full pipeline: scan → format → pdf
    Build(PdfArgs),
    /// Validate the content directory without building
    Check,
    /// Print a stock grimoire.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Scan => {
            let grimoire = scan::scan(&cli.source)?;
            output::print_scan_output(&grimoire);
        }
        Command::Format => {
            let formatted = run_format(&cli)?;
            output::print_format_output(&formatted, &cli.output);
        }
        Command::Pdf(ref args) => {
            let formatted = run_format(&cli)?;
            run_pdf(&cli, &args, &formatted)?;
        }
        Command::Build(ref args) => {
            println!("==> Stage 1: Scanning {}", cli.source.display());
            let grimoire = scan::scan(&cli.source)?;
            output::print_scan_output(&grimoire);

            println!("==> Stage 2: Formatting");
            let formatted = run_format(&cli)?;
            output::print_format_output(&formatted, &cli.output);

            println!("==> Stage 3: Pressing PDF");
            run_pdf(&cli, &args, &formatted)?;

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let grimoire = scan::scan(&cli.source)?;
            // Pattern compilation is the remaining way config can be unusable
            format::Formatter::new(&grimoire.config)?;
            output::print_scan_output(&grimoire);
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Scan and format, writing index.html and grimoire.json to the output dir.
fn run_format(cli: &Cli) -> Result<types::FormattedGrimoire, Box<dyn std::error::Error>> {
    let grimoire = scan::scan(&cli.source)?;
    let formatter = format::Formatter::new(&grimoire.config)?;
    let formatted =
        formatter.format_grimoire(&grimoire.title, &grimoire.description, &grimoire.chapters);

    std::fs::create_dir_all(&cli.output)?;
    let css = format::stylesheet(&grimoire.config.theme);
    let page = format::render_document(&formatted, &css).into_string();
    std::fs::write(cli.output.join("index.html"), page)?;
    // Companion stylesheet, also inlined in the page above
    std::fs::write(cli.output.join("grimoire.css"), &css)?;
    let json = serde_json::to_string_pretty(&formatted)?;
    std::fs::write(cli.output.join("grimoire.json"), json)?;

    Ok(formatted)
}

/// Press a formatted grimoire into `<output>/grimoire.pdf`.
fn run_pdf(
    cli: &Cli,
    args: &PdfArgs,
    formatted: &types::FormattedGrimoire,
) -> Result<(), Box<dyn std::error::Error>> {
    let custom_css = match &args.pdf_css {
        Some(path) => Some(std::fs::read_to_string(path)?),
        None => None,
    };
    let options = types::PdfOptions {
        title: formatted.title.clone(),
        content: format::render_body(formatted),
        custom_css,
        include_images: args.images,
    };
    let bytes = pdf::generate_grimoire_pdf(&options)?;

    std::fs::create_dir_all(&cli.output)?;
    let pdf_path = cli.output.join("grimoire.pdf");
    std::fs::write(&pdf_path, &bytes)?;
    output::print_pdf_output(&formatted.title, &pdf_path, bytes.len());
    Ok(())
}
