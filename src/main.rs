use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use knemo::api;
use knemo::assets::AssetLoader;
use knemo::models::{AppConfig, Project};
use knemo::server;
use knemo::services::{PngExporter, SourceDecoder};

#[derive(Parser)]
#[command(name = "knemo")]
#[command(about = "Knemo - turn images into editable pixel-art grids")]
struct Cli {
    /// Config file (default: $CONFIG_FILE, then the embedded config)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve,
    /// Convert an image to a pixel-art PNG (or grid JSON)
    Convert(ConvertArgs),
}

#[derive(Args)]
struct ConvertArgs {
    /// Source image (JPEG, PNG or WebP)
    input: PathBuf,

    /// Output file path
    #[arg(short, long)]
    output: PathBuf,

    /// Grid width in cells (1-500)
    #[arg(long)]
    width: Option<u32>,

    /// Grid height in cells (1-500)
    #[arg(long)]
    height: Option<u32>,

    /// Palette size (2-14)
    #[arg(short, long)]
    colors: Option<u32>,

    /// Apply Floyd-Steinberg dithering
    #[arg(short, long)]
    dither: bool,

    /// Pixels per cell in the PNG: 1, 2, 4, 8 or 16
    #[arg(short, long, default_value_t = 1)]
    scale: u32,

    /// Draw grid lines (scale 2 and up)
    #[arg(long)]
    grid: bool,

    /// Embed palette and color usage in the PNG
    #[arg(long)]
    metadata: bool,

    /// Write the grid as JSON instead of PNG
    #[arg(long)]
    json: bool,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Knemo API",
        description = "Image to pixel-art grid conversion and editing",
        version = "0.1.0",
        license(name = "MIT")
    ),
    paths(
        api::handle_create_session,
        api::handle_get_session,
        api::handle_delete_session,
        api::handle_update_preferences,
        api::handle_project,
        api::handle_convert,
        api::handle_set_pixels,
        api::handle_fill,
        api::handle_apply_tool,
        api::handle_commit,
        api::handle_undo,
        api::handle_redo,
        api::handle_revert,
        api::handle_clear_history,
        api::handle_export,
    ),
    components(schemas(
        api::SessionCreated,
        api::SessionView,
        api::HistoryView,
        api::PreferencesUpdate,
        api::PixelsRequest,
        api::FillRequest,
        api::ToolRequest,
        api::EditResponse,
        api::HistoryResponse,
        Project,
    )),
    tags(
        (name = "Session", description = "Editor sessions, preferences and project snapshots"),
        (name = "Conversion", description = "Image to grid conversion"),
        (name = "Editing", description = "Cell edits on the working grid"),
        (name = "History", description = "Undo, redo and commits"),
        (name = "Export", description = "PNG export")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_file = cli
        .config
        .or_else(|| std::env::var("CONFIG_FILE").ok().map(PathBuf::from));
    let asset_loader = Arc::new(AssetLoader::new(config_file));

    match cli.command {
        Some(Commands::Convert(args)) => run_convert_command(&asset_loader, args),
        Some(Commands::Serve) | None => run_server(asset_loader).await,
    }
}

/// Convert one image to a file (no server needed)
fn run_convert_command(asset_loader: &AssetLoader, args: ConvertArgs) -> anyhow::Result<()> {
    use pixel_grid::{Config, ExportOptions, ExportScale, PixelArtConverter};

    // Minimal logging for CLI
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "knemo=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let app_config = AppConfig::load_from_assets(asset_loader);
    let defaults = app_config.defaults;
    let config = Config {
        width: args.width.unwrap_or(defaults.width),
        height: args.height.unwrap_or(defaults.height),
        color_count: args.colors.unwrap_or(defaults.color_count),
        dithering: args.dither || defaults.dithering,
    };
    config.validate()?;

    let bytes = std::fs::read(&args.input)?;
    let decoded = SourceDecoder::new(&app_config.upload).decode(&bytes)?;
    let grid = PixelArtConverter::new(config)
        .convert(&decoded.image)
        .map_err(|e| anyhow::anyhow!("Conversion error: {e}"))?;

    let out = if args.json {
        serde_json::to_vec_pretty(&grid)?
    } else {
        let scale = ExportScale::new(args.scale)?;
        let options = ExportOptions::new(scale)
            .show_grid(args.grid)
            .include_color_info(args.metadata);
        PngExporter::new(app_config.export.optimize).export(&grid, &options)?
    };

    std::fs::write(&args.output, &out)?;
    println!(
        "Converted {} -> {} ({}x{} cells, {} colors, {} bytes)",
        args.input.display(),
        args.output.display(),
        grid.width(),
        grid.height(),
        grid.palette().len(),
        out.len()
    );

    Ok(())
}

/// Run the HTTP server
async fn run_server(asset_loader: Arc<AssetLoader>) -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "knemo=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        config = ?asset_loader
            .config_file()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "embedded".to_string()),
        "Config source"
    );

    let state = server::create_app_state(asset_loader)?;
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| state.config.server.bind.clone());

    // Build router: shared API routes plus production-only documentation
    let app = server::build_router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "Knemo server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
