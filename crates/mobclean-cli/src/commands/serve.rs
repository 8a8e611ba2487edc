//! Serve command - web form for uploading and processing contact files.

use colored::Colorize;
use mobclean::CleanerConfig;

use crate::server::{app, state::AppState};

const BYTES_PER_MB: usize = 1024 * 1024;

pub fn run(
    port: u16,
    no_open: bool,
    max_upload_mb: usize,
    max_uploads: usize,
    config: CleanerConfig,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let max_upload_bytes = max_upload_mb.max(1).saturating_mul(BYTES_PER_MB);
    let state = AppState::new(config, max_upload_bytes).with_max_uploads(max_uploads);

    let url = format!("http://localhost:{}", port);
    println!();
    println!(
        "{} {}",
        "Starting mobclean at".cyan().bold(),
        url.white().bold()
    );
    println!();
    println!("  Max upload: {} MB", max_upload_mb.max(1));
    println!("  Uploads kept: {}", state.max_uploads);
    if verbose {
        println!(
            "  Translated column: {}",
            state.config.pipeline.translated_column
        );
    }
    println!();
    println!("Press {} to stop the server", "Ctrl+C".yellow().bold());
    println!();

    if !no_open {
        if let Err(e) = open::that(&url) {
            eprintln!("{} Could not open browser: {}", "Warning:".yellow(), e);
        }
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        tokio::spawn(async {
            tokio::signal::ctrl_c().await.ok();
            println!();
            println!("{}", "Shutting down...".yellow());
            std::process::exit(0);
        });

        app::run_server(state, port).await
    })?;

    Ok(())
}
