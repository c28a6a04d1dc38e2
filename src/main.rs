//! `atlas`: Command-line front end for Special RGBA Atlas files.
//!
//! Dimensions are never stored in the file, so every command takes
//! `--width` and `--height` (defaulting to the editor defaults).

use anyhow::{Context, Result};
use atlas::preview::{self, OutputBuffer};
use atlas::{io, AtlasBuffer, EditorConfig, PreviewFlags, Rgb, SpacePolicy, Stamp};
use clap::{Parser, Subcommand, ValueEnum};
use crossterm::tty::IsTty;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "atlas")]
#[command(version)]
#[command(about = "Inspect and edit Special RGBA Atlas files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Atlas width in cells
    #[arg(short = 'W', long, global = true, value_parser = clap::value_parser!(u16).range(1..))]
    width: Option<u16>,

    /// Atlas height in cells
    #[arg(short = 'H', long, global = true, value_parser = clap::value_parser!(u16).range(1..))]
    height: Option<u16>,

    /// Show debug logging (overridden by ATLAS_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an all-clear atlas file
    New {
        /// Output file
        path: PathBuf,
    },
    /// Report how many cells are content-valid
    Validate {
        /// Atlas file
        path: PathBuf,
        /// Print the coordinates of every invalid cell
        #[arg(long)]
        list: bool,
    },
    /// Print one cell's bytes and kind
    Inspect {
        /// Atlas file
        path: PathBuf,
        /// Column
        #[arg(allow_negative_numbers = true)]
        x: i32,
        /// Row
        #[arg(allow_negative_numbers = true)]
        y: i32,
    },
    /// Write a solid pixel
    SetSolid {
        /// Atlas file
        path: PathBuf,
        /// Column
        #[arg(allow_negative_numbers = true)]
        x: i32,
        /// Row
        #[arg(allow_negative_numbers = true)]
        y: i32,
        /// Color as #rrggbb
        #[arg(short, long, default_value = "#00ff00")]
        color: Rgb,
    },
    /// Write a glyph cell
    SetGlyph {
        /// Atlas file
        path: PathBuf,
        /// Column
        #[arg(allow_negative_numbers = true)]
        x: i32,
        /// Row
        #[arg(allow_negative_numbers = true)]
        y: i32,
        /// Visible ASCII character
        glyph: char,
        /// Color as #rrggbb
        #[arg(short, long, default_value = "#00ff00")]
        color: Rgb,
    },
    /// Clear a cell
    Clear {
        /// Atlas file
        path: PathBuf,
        /// Column
        #[arg(allow_negative_numbers = true)]
        x: i32,
        /// Row
        #[arg(allow_negative_numbers = true)]
        y: i32,
    },
    /// Stamp a text file of ASCII art into the atlas
    Stamp {
        /// Atlas file
        path: PathBuf,
        /// Text file with the art
        art: PathBuf,
        /// Column of the top-left corner
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        x: i32,
        /// Row of the top-left corner
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        y: i32,
        /// Color as #rrggbb
        #[arg(short, long, default_value = "#00ff00")]
        color: Rgb,
        /// How spaces in the art are written
        #[arg(long, value_enum, default_value_t = Spaces::Transparent)]
        spaces: Spaces,
    },
    /// Render the atlas to the terminal
    Preview {
        /// Atlas file
        path: PathBuf,
        /// Use the terminal background behind clear cells
        #[arg(long)]
        no_checkerboard: bool,
        /// Draw invalid cells as clear instead of marking them
        #[arg(long)]
        no_markers: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Spaces {
    Transparent,
    Clear,
    Glyph,
}

impl From<Spaces> for SpacePolicy {
    fn from(spaces: Spaces) -> Self {
        match spaces {
            Spaces::Transparent => Self::Transparent,
            Spaces::Clear => Self::Clear,
            Spaces::Glyph => Self::Glyph,
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = EditorConfig::default();
    let width = cli.width.unwrap_or(config.default_width);
    let height = cli.height.unwrap_or(config.default_height);

    match cli.command {
        Commands::New { path } => {
            config.check_new(width, height)?;
            let atlas = AtlasBuffer::new(width, height)?;
            save(&atlas, &path)?;
            println!("Created {}x{} atlas: {}", width, height, path.display());
        }
        Commands::Validate { path, list } => {
            let atlas = open(&config, &path, width, height)?;
            let report = atlas.validate();
            println!("{report}");
            if list {
                for (x, y) in atlas.invalid_cells() {
                    let cell = atlas.cell(x.into(), y.into())?;
                    println!("({x},{y}) alpha={}", cell.a);
                }
            }
            if !report.is_valid() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Inspect { path, x, y } => {
            let atlas = open(&config, &path, width, height)?;
            let cell = atlas.cell(x, y)?;
            println!(
                "cell=({x},{y}) RGBA=({},{},{},{}) kind={}",
                cell.r,
                cell.g,
                cell.b,
                cell.a,
                cell.kind().name()
            );
        }
        Commands::SetSolid { path, x, y, color } => {
            let mut atlas = open(&config, &path, width, height)?;
            atlas.set_solid(x, y, color)?;
            save(&atlas, &path)?;
        }
        Commands::SetGlyph {
            path,
            x,
            y,
            glyph,
            color,
        } => {
            let mut atlas = open(&config, &path, width, height)?;
            atlas.set_glyph(x, y, glyph, color)?;
            save(&atlas, &path)?;
        }
        Commands::Clear { path, x, y } => {
            let mut atlas = open(&config, &path, width, height)?;
            atlas.clear(x, y)?;
            save(&atlas, &path)?;
        }
        Commands::Stamp {
            path,
            art,
            x,
            y,
            color,
            spaces,
        } => {
            let mut atlas = open(&config, &path, width, height)?;
            let text = std::fs::read_to_string(&art)
                .with_context(|| format!("failed to read {}", art.display()))?;
            let report = Stamp::parse(&text).apply(&mut atlas, x, y, color, spaces.into())?;
            save(&atlas, &path)?;
            println!(
                "Stamped {} glyphs, cleared {}, clipped {}, rejected {}",
                report.written, report.cleared, report.clipped, report.rejected
            );
        }
        Commands::Preview {
            path,
            no_checkerboard,
            no_markers,
        } => {
            let atlas = open(&config, &path, width, height)?;
            let mut preview_config = config.preview.clone();
            preview_config.flags.set(PreviewFlags::CHECKERBOARD, !no_checkerboard);
            preview_config.flags.set(PreviewFlags::MARK_INVALID, !no_markers);

            let mut stdout = std::io::stdout();
            let mut viewport = atlas::Rect::from_size(atlas.width(), atlas.height());
            if stdout.is_tty() {
                if let Ok((columns, rows)) = crossterm::terminal::size() {
                    viewport = preview::fit_viewport(&atlas, columns, rows);
                }
            }

            let mut out = OutputBuffer::with_capacity(atlas.len() * 8);
            let result = preview::render(&atlas, viewport, &preview_config, &mut out);
            out.flush_to(&mut stdout).context("failed to write preview")?;
            if result.area.width < atlas.width() || result.area.height < atlas.height() {
                eprintln!(
                    "Showing {}x{} of {}x{} cells",
                    result.area.width,
                    result.area.height,
                    atlas.width(),
                    atlas.height()
                );
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn open(config: &EditorConfig, path: &Path, width: u16, height: u16) -> Result<AtlasBuffer> {
    config.check_open(width, height)?;
    let atlas = io::load_raw(path, width, height)
        .with_context(|| format!("failed to open {}", path.display()))?;
    info!(path = %path.display(), width, height, "opened atlas");
    Ok(atlas)
}

fn save(atlas: &AtlasBuffer, path: &Path) -> Result<()> {
    io::save_raw(atlas, path).with_context(|| format!("failed to save {}", path.display()))?;
    info!(path = %path.display(), "saved atlas");
    Ok(())
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("ATLAS_LOG").unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
