//! Slate CLI Application
//!
//! Command-line interface, interactive shell and MCP server for the slate
//! task and board manager.

mod args;
mod cli;
mod mcp;
mod renderer;
mod shell;

use std::sync::Arc;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::info;
use mcp::{run_stdio_server, SlateMcpServer};
use renderer::TerminalRenderer;
use slate_core::{GatewayBuilder, NotificationLog, Workspace};
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        no_color,
        command,
    } = Args::parse();

    let gateway = GatewayBuilder::new()
        .with_database_path(database_file)
        .build()
        .await
        .context("Failed to open task store")?;

    let log = NotificationLog::new();
    let workspace = Workspace::new(Arc::new(gateway), Arc::new(log.clone()));
    let renderer = TerminalRenderer::new(!no_color);

    info!("Slate started");

    match command {
        Some(Task { command }) => {
            Cli::new(workspace, log, renderer)
                .handle_task_command(command)
                .await
        }
        Some(Board { command }) => {
            Cli::new(workspace, log, renderer)
                .handle_board_command(command)
                .await
        }
        Some(Shell) => {
            let stdin = std::io::stdin();
            shell::Shell::new(workspace, log, renderer)
                .run(stdin.lock())
                .await
        }
        Some(Serve) => {
            info!("Starting Slate MCP server");
            run_stdio_server(SlateMcpServer::new(workspace, log))
                .await
                .context("MCP server failed")
        }
        None => Cli::new(workspace, log, renderer).list_tasks().await,
    }
}
