// Media downloader - resolves media page URLs into direct stream links and
// serves on-demand MP3 conversions over HTTP.

pub mod config;
pub mod downloader;
pub mod logging;
pub mod server;
