//! CLI for ReelMind - generate and edit images with Gemini.

use clap::{Args, Parser, Subcommand, ValueEnum};
use reelmind::image::providers::GeminiProvider;
use reelmind::{
    AspectRatio, GeminiModel, GeneratedImage, ImageService, LoadingState, Mode, Studio,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "reelmind")]
#[command(about = "Generate images from text or edit images with instructions (Gemini)")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Model to use
    #[arg(long, global = true, value_enum, default_value = "flash")]
    model: ModelArg,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an image from a text prompt
    Generate(GenerateArgs),

    /// Edit an existing image with a natural-language instruction
    Edit(EditArgs),

    /// Check that the API key and model are usable
    Check,
}

#[derive(Args)]
struct GenerateArgs {
    /// The text prompt. Quote text with 「…」 or “…” to render it verbatim
    prompt: String,

    /// Output file path (defaults to reelmind-generate-<timestamp>.png)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Aspect ratio
    #[arg(long, value_enum, default_value = "1:1")]
    aspect_ratio: AspectRatioArg,
}

#[derive(Args)]
struct EditArgs {
    /// Image to edit (PNG, JPEG or WebP)
    input: PathBuf,

    /// What to change
    instruction: String,

    /// Output file path (defaults to reelmind-edit-<timestamp>.png)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModelArg {
    Flash,
    Pro,
}

impl From<ModelArg> for GeminiModel {
    fn from(arg: ModelArg) -> Self {
        match arg {
            ModelArg::Flash => GeminiModel::NanoBanana,
            ModelArg::Pro => GeminiModel::NanoBananaPro,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AspectRatioArg {
    #[value(name = "1:1")]
    Square,
    #[value(name = "16:9")]
    Landscape,
    #[value(name = "9:16")]
    Portrait,
    #[value(name = "3:4")]
    StandardPortrait,
    #[value(name = "4:3")]
    Standard,
}

impl From<AspectRatioArg> for AspectRatio {
    fn from(arg: AspectRatioArg) -> Self {
        match arg {
            AspectRatioArg::Square => AspectRatio::Square,
            AspectRatioArg::Landscape => AspectRatio::Landscape,
            AspectRatioArg::Portrait => AspectRatio::Portrait,
            AspectRatioArg::StandardPortrait => AspectRatio::StandardPortrait,
            AspectRatioArg::Standard => AspectRatio::Standard,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("reelmind=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let provider = GeminiProvider::builder().model(cli.model.into()).build()?;

    match cli.command {
        Commands::Generate(args) => {
            let studio = Studio::new(provider);
            studio.set_aspect_ratio(args.aspect_ratio.into());
            studio.set_prompt(args.prompt);
            run(&studio, args.output, cli.json).await?;
        }
        Commands::Edit(args) => {
            let studio = Studio::new(provider);
            studio.set_mode(Mode::Edit);
            studio.load_source_file(&args.input).await?;
            studio.set_prompt(args.instruction);
            run(&studio, args.output, cli.json).await?;
        }
        Commands::Check => {
            provider.health_check().await?;
            if cli.json {
                let result = serde_json::json!({
                    "success": true,
                    "provider": provider.name(),
                    "model": provider.model().as_str(),
                });
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{} ready ({})", provider.name(), provider.model().as_str());
            }
        }
    }

    Ok(())
}

async fn run<S: ImageService>(
    studio: &Studio<S>,
    output: Option<PathBuf>,
    json_output: bool,
) -> anyhow::Result<()> {
    tracing::info!("{}", LoadingState::for_mode(studio.mode()).message);
    let image = studio.submit().await?;
    let output = output.unwrap_or_else(|| PathBuf::from(image.download_file_name()));
    image.save(&output)?;
    report(&image, &output, studio.service().name(), json_output)
}

fn report(
    image: &GeneratedImage,
    output: &std::path::Path,
    provider: &str,
    json_output: bool,
) -> anyhow::Result<()> {
    let size_bytes = image.bytes()?.len();

    if json_output {
        let result = serde_json::json!({
            "type": image.mode.as_str(),
            "success": true,
            "id": image.id,
            "output": output.display().to_string(),
            "size_bytes": size_bytes,
            "mime_type": image.image.mime_type(),
            "provider": provider,
            "timestamp": image.timestamp,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!(
            "Saved {} image: {} ({} bytes) via {}",
            image.mode,
            output.display(),
            size_bytes,
            provider
        );
    }

    Ok(())
}
