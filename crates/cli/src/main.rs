use anyhow::Result;
use clap::{Parser, Subcommand};
use pdfdrop_catalog::{MetadataStore, PdfFileFilter};
use pdfdrop_workflow::{Phase, UploadController};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod backend;
mod candidate;
mod clipboard;
mod config;
mod render;
mod shell;

use crate::{
    backend::{Catalog, Storage},
    clipboard::SystemClipboard,
    config::AppConfig,
    render::TerminalRenderer,
};

type Controller = UploadController<Storage, Catalog, SystemClipboard, TerminalRenderer<std::io::Stdout>>;

#[derive(Parser, Debug)]
#[command(author, version, about = "pdfdrop - Upload PDF files and share their public link", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, help = "Path to a TOML config file")]
    config: Option<PathBuf>,

    #[arg(long, help = "Log filter, overrides the config file")]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Upload one file and print its public link
    Upload {
        file: PathBuf,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, help = "Grade/series")]
        year: Option<String>,
        #[arg(long = "type")]
        doc_type: Option<String>,
        #[arg(long, help = "Declared media type (guessed from the extension by default)")]
        content_type: Option<String>,
        #[arg(long, help = "Copy the link to the clipboard after uploading")]
        copy: bool,
        #[arg(long, help = "Mark the link as saved after uploading")]
        save: bool,
    },
    /// Interactive upload session
    Shell,
    /// List uploaded files
    List {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long = "type")]
        doc_type: Option<String>,
        #[arg(long, default_value_t = 50)]
        limit: i32,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).await?;
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    setup_tracing(&config.log_level);

    let (storage, catalog) = backend::connect(&config).await?;

    match cli.command {
        Commands::Upload {
            file,
            name,
            year,
            doc_type,
            content_type,
            copy,
            save,
        } => {
            let mut controller = controller(storage, catalog, &config);
            upload(&mut controller, file, name, year, doc_type, content_type, copy, save).await?;
        }
        Commands::Shell => {
            let mut controller = controller(storage, catalog, &config);
            shell::run(&mut controller).await?;
        }
        Commands::List {
            year,
            doc_type,
            limit,
        } => {
            let filter = PdfFileFilter {
                year,
                doc_type,
                limit: Some(limit),
            };
            list(&catalog, &filter).await;
        }
    }

    Ok(())
}

fn controller(storage: Storage, catalog: Catalog, config: &AppConfig) -> Controller {
    UploadController::new(
        storage,
        catalog,
        SystemClipboard::new(),
        TerminalRenderer::stdout(),
        config.upload_settings(),
        config.form.clone(),
    )
}

#[allow(clippy::too_many_arguments)]
async fn upload(
    controller: &mut Controller,
    file: PathBuf,
    name: Option<String>,
    year: Option<String>,
    doc_type: Option<String>,
    content_type: Option<String>,
    copy: bool,
    save: bool,
) -> Result<()> {
    let candidate = candidate::read_candidate(&file, content_type.as_deref()).await?;
    controller.on_file_chosen(candidate).await;
    if controller.phase() == Phase::Error {
        std::process::exit(1);
    }

    if let Some(name) = name {
        controller.on_name_edited(name).await;
    }
    controller.on_year_selected(year).await;
    controller.on_type_selected(doc_type).await;
    controller.on_submit().await;

    if controller.phase() == Phase::Success {
        if copy {
            controller.on_copy_link().await;
        }
        if save {
            controller.on_save_link().await;
        }
    }

    if controller.phase() == Phase::Error {
        std::process::exit(1);
    }
    Ok(())
}

async fn list(catalog: &Catalog, filter: &PdfFileFilter) {
    match catalog.list(filter).await {
        Ok(files) => {
            if files.is_empty() {
                println!("No files found");
            } else {
                println!("Files:");
                for file in files {
                    println!("  {} ({}, {})", file.name, file.year, file.doc_type);
                    println!("    {}", file.file_url);
                    if let Some(created) = file.created_at {
                        println!("    Uploaded: {}", created.format("%Y-%m-%d %H:%M:%S UTC"));
                    }
                }
            }
        }
        Err(e) => {
            eprintln!("Failed to list files: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn setup_tracing(log_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
