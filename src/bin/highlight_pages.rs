use clap::Parser;
use relocation_advisor::config::toml_config::TomlConfig;
use relocation_advisor::config::{DestinationMode, HighlighterSettings};
use relocation_advisor::core::highlight::PAGE_EXTENSION;
use relocation_advisor::utils::{logger, validation::Validate};
use relocation_advisor::{PageStore, Storage};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "highlight_pages")]
#[command(about = "Mark links to other destination pages in a directory of static pages")]
struct Args {
    /// Directory containing the source *.html pages
    #[arg(short, long)]
    input: PathBuf,

    /// Directory the decorated pages are written to
    #[arg(short, long)]
    output: PathBuf,

    /// Optional TOML configuration file ([highlighter] section is used)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where destination page names come from
    #[arg(long, value_enum)]
    destination_source: Option<DestinationMode>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let mut settings = match &args.config {
        Some(path) => TomlConfig::from_file(path)?.into_settings().highlighter,
        None => HighlighterSettings::default(),
    };
    if let Some(mode) = args.destination_source {
        settings.destination_source = mode;
    }
    settings.validate()?;

    let decorator = settings.decorator()?;
    let source = PageStore::new(args.input.clone());
    let target = PageStore::new(args.output.clone());

    let pages = source.list_pages(PAGE_EXTENSION).await?;
    tracing::info!("📁 Found {} pages in {}", pages.len(), args.input.display());

    for name in &pages {
        let html = source.read_page(name).await?;
        let decorated = decorator.decorate_html(&html, name);
        target.write_file(name, decorated.as_bytes()).await?;
        tracing::debug!("Wrote {}", name);
    }

    println!("✅ Decorated {} pages into {}", pages.len(), args.output.display());
    Ok(())
}
