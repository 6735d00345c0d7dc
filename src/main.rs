use clap::{Parser, Subcommand};
use responsive_image::calculator::ResponsiveSizeCalculator;
use responsive_image::imaging::{Quality, RustBackend};
use responsive_image::output::{self, PlanReport, RenderOutcome};
use responsive_image::render::{ResponsivePage, render_document};
use responsive_image::{Size, config};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "responsive-image")]
#[command(about = "Crop-safe thumbnail sizing and responsive image markup")]
#[command(long_about = "\
Crop-safe thumbnail sizing and responsive image markup

Given an aspect ratio such as 16x9, computes the smallest thumbnail that
covers the configured minimum size, plus a ladder of larger thumbnails
swapped in by CSS media queries as the viewport grows.

Run 'responsive-image gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Directory containing config.toml
    #[arg(long, default_value = ".", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the thumbnail sizes computed for a ratio
    Plan {
        /// Aspect ratio as <width>x<height>
        #[arg(long)]
        ratio: String,
        /// Also compute the size covering this display width
        #[arg(long)]
        width: Option<u32>,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Generate thumbnails and an HTML page for the given images
    Render {
        /// Aspect ratio as <width>x<height>
        #[arg(long)]
        ratio: String,
        /// Output directory
        #[arg(long, default_value = "dist")]
        out: PathBuf,
        /// Page title
        #[arg(long, default_value = "Responsive images")]
        title: String,
        /// Source images
        #[arg(required = true)]
        images: Vec<PathBuf>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Plan { ratio, width, json } => {
            let site_config = config::load_config(&cli.config)?;
            let calculator =
                ResponsiveSizeCalculator::new(Size::parse(ratio)?, site_config.bounds()?)?;
            let report =
                PlanReport::new(&calculator, width, site_config.responsive.breakpoint_step)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                output::print_plan(&report);
            }
        }
        Command::Render {
            ratio,
            out,
            title,
            images,
        } => {
            let site_config = config::load_config(&cli.config)?;
            let mut page = ResponsivePage::from_config(&site_config)?;
            let backend = RustBackend::new(
                out.join(&site_config.thumbnails.dir),
                site_config.thumbnails.url_prefix.clone(),
                Quality::new(site_config.thumbnails.quality),
            );

            let mut blocks = Vec::new();
            let mut failed = 0;
            for (idx, source) in images.iter().enumerate() {
                let alt = source
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_default();
                let outcome = match page.render_image(&backend, source, ratio.as_str(), &alt) {
                    Ok(block) => {
                        blocks.push(block);
                        RenderOutcome::Rendered
                    }
                    Err(e) => {
                        failed += 1;
                        RenderOutcome::Failed(e.to_string())
                    }
                };
                output::print_render_entry(idx + 1, source, &outcome);
            }

            std::fs::create_dir_all(&out)?;
            let document_path = out.join("index.html");
            let document = render_document(&title, &page, &blocks);
            std::fs::write(&document_path, document.into_string())?;
            println!();
            println!(
                "{}",
                output::format_render_summary(blocks.len(), failed, &document_path)
            );
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
