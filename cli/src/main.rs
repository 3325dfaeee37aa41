//! istdoc CLI - Integrated Spacecraft Test Document assembly tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use istdoc::{
    compile, render_many, render_signature_page, session_dir, ContentStore, JsonStore,
    RenderOptions, RenderStats, ToolSpec,
};

#[derive(Parser)]
#[command(name = "istdoc")]
#[command(version)]
#[command(about = "Assemble Integrated Spacecraft Test Documents into Typst", long_about = None)]
struct Cli {
    /// Content store directory
    #[arg(long, global = true, env = "ISTDOC_STORE", default_value = "store")]
    store: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render documents to Typst markup
    Render {
        /// Document names
        #[arg(value_name = "DOCUMENT", required = true)]
        documents: Vec<String>,

        /// Output directory (one subdirectory per document)
        #[arg(short, long, value_name = "DIR", default_value = "out")]
        output: PathBuf,

        /// Compile each document to PDF
        #[arg(long)]
        compile: bool,

        /// Header logo
        #[arg(long, env = "ISTDOC_LOGO", value_name = "FILE")]
        logo: Option<PathBuf>,

        /// Print render statistics as JSON
        #[arg(long)]
        stats: bool,
    },

    /// Render the approval page alone, for signing
    Signature {
        /// Document name
        #[arg(value_name = "DOCUMENT")]
        document: String,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = "out")]
        output: PathBuf,

        /// Compile to PDF
        #[arg(long)]
        compile: bool,

        /// Header logo
        #[arg(long, env = "ISTDOC_LOGO", value_name = "FILE")]
        logo: Option<PathBuf>,
    },

    /// List stored documents
    List,

    /// Create an empty document in the store
    Init {
        /// Document name
        #[arg(value_name = "DOCUMENT")]
        document: String,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let store = JsonStore::open(&cli.store);

    let result = match cli.command {
        Commands::Render {
            documents,
            output,
            compile,
            logo,
            stats,
        } => cmd_render(&store, &documents, &output, compile, logo, stats),
        Commands::Signature {
            document,
            output,
            compile,
            logo,
        } => cmd_signature(&store, &document, &output, compile, logo),
        Commands::List => cmd_list(&store),
        Commands::Init { document } => cmd_init(&store, &document),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn render_options(logo: Option<PathBuf>) -> RenderOptions {
    match logo {
        Some(path) => RenderOptions::new().with_logo(path),
        None => RenderOptions::new(),
    }
}

fn cmd_render(
    store: &JsonStore,
    documents: &[String],
    output: &Path,
    compile_pdf: bool,
    logo: Option<PathBuf>,
    stats: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = render_options(logo);
    fs::create_dir_all(output)?;

    let steps = (if compile_pdf { 2 } else { 1 }) * documents.len() as u64;
    let pb = ProgressBar::new(steps);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Rendering...");
    log::debug!("rendering {} documents into {}", documents.len(), output.display());
    let results = render_many(store, documents, output, &options);
    pb.inc(documents.len() as u64);

    let compiler = ToolSpec::default_compiler();
    let mut failures = 0;
    let mut totals = RenderStats::new();
    let mut lines = Vec::new();
    for (document, result) in documents.iter().zip(results) {
        let result = match result {
            Ok(result) => result,
            Err(e) => {
                failures += 1;
                lines.push(format!("  {} {}: {}", "✗".red(), document, e));
                continue;
            }
        };

        if stats {
            lines.push(serde_json::to_string_pretty(&result.stats)?);
            totals.merge(&result.stats);
        }

        if compile_pdf {
            pb.set_message(format!("Compiling {}...", document));
            match compile(session_dir(output, document)?, &compiler) {
                Ok(pdf) => {
                    let pdf_path = output.join(format!("{}.pdf", document));
                    fs::write(&pdf_path, pdf)?;
                    lines.push(format!("  {} {}", "✓".green(), pdf_path.display()));
                }
                Err(e) => {
                    failures += 1;
                    lines.push(format!("  {} {}:\n{}", "✗".red(), document, e));
                }
            }
            pb.inc(1);
        } else {
            lines.push(format!("  {} {}", "✓".green(), result.markup_path.display()));
        }
    }
    pb.finish_with_message("Done!");

    println!("\n{}", "Output:".green().bold());
    for line in lines {
        println!("{}", line);
    }
    if stats && documents.len() > 1 {
        println!("\n{}", "Totals:".green().bold());
        println!("{}", serde_json::to_string_pretty(&totals)?);
    }

    if failures > 0 {
        return Err(format!("{} of {} documents failed", failures, documents.len()).into());
    }
    Ok(())
}

fn cmd_signature(
    store: &JsonStore,
    document: &str,
    output: &Path,
    compile_pdf: bool,
    logo: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = render_options(logo);
    let root = session_dir(output, document)?;
    let path = render_signature_page(store, document, &root, &options)?;
    println!("{} {}", "Saved to".green(), path.display());

    if compile_pdf {
        let pdf = compile(&root, &ToolSpec::default_compiler())?;
        let pdf_path = output.join(format!("{}-signature.pdf", document));
        fs::write(&pdf_path, pdf)?;
        println!("{} {}", "Saved to".green(), pdf_path.display());
    }
    Ok(())
}

fn cmd_list(store: &JsonStore) -> Result<(), Box<dyn std::error::Error>> {
    let names = store.document_names()?;
    println!("{}", "Documents".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    if names.is_empty() {
        println!("{}", "(none)".dimmed());
    }
    for name in names {
        let (details, subsystem) = store.details(&name)?;
        println!(
            "{}  {} {}",
            name.bold(),
            details.document_number.dimmed(),
            subsystem.document_title().dimmed()
        );
    }
    Ok(())
}

fn cmd_init(store: &JsonStore, document: &str) -> Result<(), Box<dyn std::error::Error>> {
    store.add_document(document)?;
    println!(
        "{} {} in {}",
        "Created".green(),
        document.bold(),
        store.root().display()
    );
    Ok(())
}
