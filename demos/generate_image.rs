//! Basic image generation example.
//!
//! Run with: `cargo run --example generate_image`
//!
//! Requires `GEMINI_API_KEY` (or `GOOGLE_API_KEY`) environment variable.

use reelmind::{AspectRatio, GeminiProvider, GenerationRequest, ImageService};

#[tokio::main]
async fn main() -> reelmind::Result<()> {
    let provider = GeminiProvider::builder().build()?;

    let request = GenerationRequest::new("A rainy alley with a neon sign reading “NOODLES”")
        .with_aspect_ratio(AspectRatio::Portrait);
    let image = provider.generate(&request).await?;

    let path = image.download_file_name();
    image.save(&path)?;
    println!(
        "Generated image: {} ({})",
        path,
        image.image.mime_type()
    );

    Ok(())
}
