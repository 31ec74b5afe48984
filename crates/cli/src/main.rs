use clap::{Parser, Subcommand};
use eyre::{Result, WrapErr};
use patti_lib::{
    capture_snapshot, config::PattiConfig, execute, import_sheet, render, Cell, Rasterizer,
};
use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::PathBuf,
};
use strum::IntoEnumIterator;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "patti", version, about = "Compute, preview and keep patti notes")]
struct Cli {
    /// Config file (defaults to ./patti.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute a batch file with one patti per row
    Compute {
        input: PathBuf,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Import a labelled sheet and print its preview
    Sheet {
        input: PathBuf,
        /// Write the rendered sheet as SVG
        #[arg(long)]
        svg: Option<PathBuf>,
        /// Save a snapshot to the gallery
        #[arg(long)]
        save: bool,
    },
    /// Inspect saved pattis
    Gallery {
        #[command(subcommand)]
        action: GalleryAction,
    },
}

#[derive(Subcommand, Debug)]
enum GalleryAction {
    List,
    Remove { id: String },
    Clear,
    /// Distinct miller and party names
    Names,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = PattiConfig::load(cli.config.as_deref()).wrap_err("Failed to load config")?;

    match cli.command {
        Command::Compute { input, output } => {
            let reader = BufReader::new(
                File::open(&input).wrap_err_with(|| format!("Cannot open {input:?}"))?,
            );
            let writer: Box<dyn Write> = match output {
                Some(path) => Box::new(BufWriter::new(File::create(path)?)),
                None => Box::new(io::stdout()),
            };
            execute(reader, writer)?;
        }
        Command::Sheet { input, svg, save } => {
            let session = import_sheet(BufReader::new(
                File::open(&input).wrap_err_with(|| format!("Cannot open {input:?}"))?,
            ))?;
            let output = session.output();
            let preview = render(session.input(), &output);

            let mut stdout = io::stdout().lock();
            for cell in Cell::iter() {
                writeln!(stdout, "{cell:>3}  {}", preview.get(cell))?;
            }
            writeln!(stdout, "{}", preview.days_label)?;

            if svg.is_some() || save {
                let image = config.rasterizer().render(&preview)?;
                let image_ref = match svg {
                    Some(path) => {
                        std::fs::write(&path, &image.bytes)?;
                        info!(path = %path.display(), "wrote sheet image");
                        path.display().to_string()
                    }
                    None => String::from_utf8_lossy(&image.bytes).into_owned(),
                };
                if save {
                    let snapshot =
                        capture_snapshot(session.input(), image_ref, chrono::Utc::now());
                    writeln!(stdout, "saved {}", snapshot.id)?;
                    config.gallery().push(snapshot)?;
                }
            }
        }
        Command::Gallery { action } => {
            let mut gallery = config.gallery();
            match action {
                GalleryAction::List => {
                    for item in gallery.load_all()? {
                        println!(
                            "{}\t{}\t{}\t{}\t{}",
                            item.id,
                            item.created_at.format("%d/%m/%Y %H:%M"),
                            item.bill_no,
                            item.miller_name,
                            item.party_name
                        );
                    }
                }
                GalleryAction::Remove { id } => {
                    if !gallery.remove(&id)? {
                        return Err(eyre::eyre!("No saved patti with id `{id}`"));
                    }
                }
                GalleryAction::Clear => gallery.clear()?,
                GalleryAction::Names => {
                    let (millers, parties) = gallery.known_names()?;
                    println!("millers: {}", millers.join(", "));
                    println!("parties: {}", parties.join(", "));
                }
            }
        }
    }

    Ok(())
}
