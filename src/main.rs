use std::sync::Arc;

use clap::Parser;
use tokio::signal;

use media_downloader_lib::config::{Command, InstallArgs, ServerConfig};
use media_downloader_lib::downloader::{
    InfoExtractorOrchestrator, ToolManager, ToolType, YtDlpAudioTranscoder,
};
use media_downloader_lib::logging::init_tracing;
use media_downloader_lib::server::{run_server, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::parse();
    let log_guard = init_tracing(config.log_level.as_tracing_level(), &config.log_dir)?;

    let result = match &config.command {
        Some(Command::InstallFfmpeg(args)) => install_ffmpeg(&config, args).await,
        Some(Command::Serve) | None => serve(&config).await,
    };
    if let Err(e) = &result {
        tracing::error!("{}", e);
    }

    log_guard.shutdown();
    result
}

async fn install_ffmpeg(
    config: &ServerConfig,
    args: &InstallArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = config.install_options(args).ok_or_else(|| {
        format!(
            "No static FFmpeg build known for {}-{}; pass --url",
            std::env::consts::OS,
            std::env::consts::ARCH
        )
    })?;

    let tools = ToolManager::install_ffmpeg(&config.bin_dir, &options).await?;
    let info = tools.get_tool_info(ToolType::Ffmpeg).await;
    tracing::info!(
        "FFmpeg ready: {} ({})",
        info.path.as_deref().unwrap_or("?"),
        info.version.as_deref().unwrap_or("unknown version")
    );
    Ok(())
}

async fn serve(config: &ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let tools = config.tool_manager();
    let extractor = InfoExtractorOrchestrator::new(config.extractor_config(&tools));
    tracing::info!("Extractor backends: {:?}", extractor.backend_names());
    let transcoder = YtDlpAudioTranscoder::new(config.transcode_config(), tools.clone());

    let state = AppState::new(Arc::new(extractor), Arc::new(transcoder), tools);
    let addr = config.bind_addr()?;

    let shutdown = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
        tracing::info!("Shutdown signal received");
    };

    run_server(addr, state, shutdown)
        .await
        .map_err(|e| e as Box<dyn std::error::Error>)
}
