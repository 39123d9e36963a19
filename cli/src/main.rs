//! vetdeck CLI - builds the "Rickets in the Dog" presentation
//!
//! With no arguments the built-in deck is written to the current directory.

use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use vetdeck::{content, BuildOptions, DeckOutline, DeckSpec};

/// Build the "Rickets in the Dog" veterinary teaching deck
#[derive(Parser)]
#[command(
    name = "vetdeck",
    version,
    about = "Build the Rickets in the Dog presentation",
    long_about = "vetdeck - builds a PowerPoint deck from a slide table.\n\n\
                  Images are downloaded once into a local cache; the .pptx is written at the end."
)]
struct Cli {
    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the presentation (the default command)
    Build {
        /// Output file path
        #[arg(short, long, default_value = content::OUTPUT_FILE)]
        output: PathBuf,

        /// Directory for cached images
        #[arg(long, default_value = ".")]
        cache_dir: PathBuf,

        /// Deck definition as JSON (default: the built-in deck)
        #[arg(long)]
        deck: Option<PathBuf>,

        /// Download timeout in seconds
        #[arg(long, default_value = "30")]
        timeout: u64,
    },

    /// Show the slides of an existing presentation
    Inspect {
        /// Input file path
        input: PathBuf,

        /// Output JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Write the built-in deck as JSON (the format accepted by `build --deck`)
    ExportDeck {
        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let command = cli.command.unwrap_or(Commands::Build {
        output: PathBuf::from(content::OUTPUT_FILE),
        cache_dir: PathBuf::from("."),
        deck: None,
        timeout: 30,
    });

    match command {
        Commands::Build {
            output,
            cache_dir,
            deck,
            timeout,
        } => {
            let deck = match deck {
                Some(path) => {
                    log::info!("loading deck from {}", path.display());
                    DeckSpec::from_json_file(&path)?
                }
                None => content::rickets_in_the_dog(),
            };
            let options = BuildOptions::new()
                .with_output(output)
                .with_cache_dir(cache_dir)
                .with_timeout(Duration::from_secs(timeout));

            let pb = create_spinner("Building presentation...");
            let result = vetdeck::build(&deck, &options);
            pb.finish_and_clear();

            let path = result?;
            println!("Presentation saved → {}", path.display());
        }

        Commands::Inspect { input, json } => {
            let pb = create_spinner("Reading presentation...");
            let outline = vetdeck::inspect(&input);
            pb.finish_and_clear();
            let outline = outline?;

            if json {
                write_output(None, &serde_json::to_string_pretty(&outline)?)?;
            } else {
                print_outline(&input, &outline);
            }
        }

        Commands::ExportDeck { output } => {
            let json = serde_json::to_string_pretty(&content::rickets_in_the_dog())?;
            write_output(output.as_ref(), &json)?;

            if let Some(path) = output {
                println!("{} Deck written to {}", "✓".green().bold(), path.display());
            }
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

fn print_outline(input: &std::path::Path, outline: &DeckOutline) {
    println!("{}", "Presentation".cyan().bold());
    println!("{}", "─".repeat(40));
    println!(
        "{}: {}",
        "File".bold(),
        input.file_name().unwrap_or_default().to_string_lossy()
    );
    if let Some(ref title) = outline.metadata.title {
        println!("{}: {}", "Title".bold(), title);
    }
    println!(
        "{}: {:.2} x {:.2} in",
        "Canvas".bold(),
        vetdeck::Emu(outline.width).inches(),
        vetdeck::Emu(outline.height).inches()
    );
    println!("{}: {}", "Slides".bold(), outline.slides.len());
    println!("{}: {}", "Pictures".bold(), outline.picture_count());

    for slide in &outline.slides {
        println!();
        println!(
            "{} {}",
            format!("[{}]", slide.index + 1).cyan().bold(),
            slide.title.as_deref().unwrap_or("(untitled)").bold()
        );
        for line in slide.body_paragraphs() {
            println!("  {}", line);
        }
        for picture in &slide.pictures {
            println!(
                "  {} {} ({:.2} x {:.2} in)",
                "picture".yellow(),
                picture.media_path,
                vetdeck::Emu(picture.width).inches(),
                vetdeck::Emu(picture.height).inches()
            );
        }
        if let Some(ref notes) = slide.notes {
            println!("  {} {}", "notes:".dimmed(), notes);
        }
    }
}

fn print_version() {
    println!("{} {}", "vetdeck".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Builds the Rickets in the Dog teaching presentation (.pptx)");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn write_output(path: Option<&PathBuf>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", content)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_arguments_means_build() {
        let cli = Cli::try_parse_from(["vetdeck"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_build_arguments() {
        let cli = Cli::try_parse_from([
            "vetdeck", "-v", "build", "--output", "x.pptx", "--cache-dir", "img", "--timeout", "5",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Some(Commands::Build {
                output,
                cache_dir,
                deck,
                timeout,
            }) => {
                assert_eq!(output, PathBuf::from("x.pptx"));
                assert_eq!(cache_dir, PathBuf::from("img"));
                assert!(deck.is_none());
                assert_eq!(timeout, 5);
            }
            _ => panic!("expected build"),
        }
    }
}
