use clap::{Parser, Subcommand};
use std::path::PathBuf;
use stock_review::{catalog, config, imaging, output, server};
use tracing_subscriber::{EnvFilter, prelude::*};

#[derive(Parser)]
#[command(name = "stock-review")]
#[command(about = "Walk the product catalog, collect an order, share it as PDF")]
#[command(long_about = "\
Walk the product catalog, collect an order, share it as PDF

Serves a small phone-friendly web app. The catalog is shown one product at a
time: mark it as in stock or enter a quantity to order. At the end the order
list can be downloaded as a PDF and sent through a prefilled chat link.

Catalog layout (first row is the header, first worksheet is used):

  Name     | Category | Unit | ImageReference
  Apples   | Fruit    | kg   |
  Milk     | Dairy    | l    | milk.jpg

Polish headers (Nazwa, Kategoria, Jednostka, Zdjecie) are accepted as well.
Image references are file names inside the images directory.

Run 'stock-review gen-config' to generate a documented stock-review.toml.")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(long, default_value = "stock-review.toml", global = true)]
    config: PathBuf,

    /// Catalog file (overrides the config)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Image directory (overrides the config)
    #[arg(long, global = true)]
    images: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the review app over HTTP
    Serve {
        /// Address to listen on (overrides the config)
        #[arg(long)]
        bind: Option<String>,
    },
    /// Load the catalog and report products and image files
    Check,
    /// Print a stock stock-review.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging();

    match cli.command {
        Command::Serve { bind } => {
            let mut config = load_config(&cli.config, cli.catalog, cli.images)?;
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::serve(config))?;
        }
        Command::Check => {
            let config = load_config(&cli.config, cli.catalog, cli.images)?;
            let source = &config.catalog.path;
            println!("==> Checking {}", source.display());
            let catalog = catalog::load_catalog(source);
            output::print_check_output(&catalog, source, |reference| {
                imaging::resolve_image_path(&config.images.dir, reference).is_some()
            });
            if catalog.warning.is_some() {
                return Err("catalog could not be loaded".into());
            }
            println!("==> Catalog is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load the config file and apply the command-line overrides.
fn load_config(
    path: &std::path::Path,
    catalog: Option<PathBuf>,
    images: Option<PathBuf>,
) -> Result<config::AppConfig, config::ConfigError> {
    let mut config = config::load_config(path)?;
    if let Some(catalog) = catalog {
        config.catalog.path = catalog;
    }
    if let Some(images) = images {
        config.images.dir = images;
    }
    Ok(config)
}

/// Log to stderr, `info` by default, overridable with `RUST_LOG`.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(filter),
        )
        .init();
}
