extern crate pretty_logger;
#[macro_use] extern crate log;
use log::LogLevelFilter;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use photogallery::config::{local_config, API_KEY_VAR};
use photogallery::gallery::util::endpoint_host;
use photogallery::{Error, FetchState, GalleryFetcher, GalleryModel, PhotoListing};
use url::Url;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true, help = "Config file (defaults to ~/.photogallery/config.yml)")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one page of interesting photos
    Fetch {
        #[arg(short, long, default_value_t = 1, help = "Page number, starting at 1")]
        page: u32,

        #[arg(long, help = "Print the listing as JSON")]
        json: bool,
    },
    /// Write a config file
    Init {
        #[arg(short, long, help = "Photo listing endpoint")]
        endpoint: Option<Url>,
    },
}

fn get_api_key() -> Result<String, Error> {
    match std::env::var(API_KEY_VAR) {
        Ok(key) if !key.is_empty() => Ok(key),
        _ => {
            print!("API key({}): ", API_KEY_VAR);
            std::io::stdout().flush()?;
            let key = rpassword::read_password()?;
            Ok(key.trim().to_owned())
        }
    }
}

fn print_listing(listing: &PhotoListing, json: bool) -> Result<(), Error> {
    if json {
        let out = serde_json::to_string_pretty(listing)
            .map_err(Error::Encode)?;
        println!("{}", out);
        return Ok(());
    }
    for item in listing.items() {
        println!("{}\t{}\t{}", item.id(), item.title(), item.url());
    }
    Ok(())
}

async fn fetch(config: Option<PathBuf>, page: u32, json: bool) -> Result<(), Error> {
    let config = local_config::load(config.as_deref())?.with_env();
    if config.api_key.is_empty() {
        warn!("No API key configured, set {} or run `init`.", API_KEY_VAR);
    }
    let fetcher = Arc::new(GalleryFetcher::new(&config)?);
    info!("Fetching page {} from {}.", page, endpoint_host(fetcher.endpoint()));

    let model = GalleryModel::new(fetcher);
    let mut state = model.subscribe();
    let load = model.load(page);
    let outcome = tokio::select! {
        result = state.wait_for(FetchState::is_terminal) => result.ok().map(|s| s.clone()),
        _ = tokio::signal::ctrl_c() => {
            model.cancel();
            None
        },
    };
    let _ = load.await;

    let listing = match outcome.and_then(FetchState::into_result) {
        Some(result) => result?,
        None => return Err(Error::Cancelled),
    };
    info!("Fetched {} photos.", listing.len());
    print_listing(&listing, json)?;
    if listing.has_next_page() {
        info!("More photos with --page {}.", page + 1);
    }
    Ok(())
}

fn init(config: Option<PathBuf>, endpoint: Option<Url>) -> Result<(), Error> {
    let mut settings = local_config::load_for_update(config.as_deref())?;
    if let Some(endpoint) = endpoint {
        settings.endpoint = endpoint;
    }
    settings.api_key = get_api_key()?;
    let path = local_config::save(&settings, config.as_deref())?;
    info!("Saved config to {}.", path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    if let Err(err) = pretty_logger::init_level(LogLevelFilter::Info) {
        eprintln!("Could not set up logging: {}", err);
    }
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Fetch { page, json }) => fetch(cli.config, page, json).await?,
        Some(Commands::Init { endpoint }) => init(cli.config, endpoint)?,
        None => {}
    }
    Ok(())
}
