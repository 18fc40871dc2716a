//! Image editing example - modifies an existing image with an instruction.
//!
//! Run with: `cargo run --example edit_image -- <input_image.png>`
//!
//! Requires `GEMINI_API_KEY` (or `GOOGLE_API_KEY`) environment variable.

use reelmind::{GeminiProvider, Mode, Studio};

#[tokio::main]
async fn main() -> reelmind::Result<()> {
    let Some(input_path) = std::env::args().nth(1) else {
        eprintln!("Usage: edit_image <input_image.png>");
        std::process::exit(2);
    };

    let studio = Studio::new(GeminiProvider::builder().build()?);
    studio.set_mode(Mode::Edit);
    studio.load_source_file(&input_path).await?;
    studio.set_prompt("Make the colors more vibrant and add a warm sunset glow");

    let image = studio.submit().await?;
    image.save("edited.png")?;
    println!("Edited image saved to edited.png ({} bytes)", image.bytes()?.len());

    Ok(())
}
