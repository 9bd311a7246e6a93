use anyhow::Result;
use clap::{Parser, Subcommand};
use futures::stream::{FuturesUnordered, StreamExt};
use pdfdrop_catalog::MetadataStore;
use pdfdrop_engine::StorageEngine;
use pdfdrop_workflow::{Clipboard, Renderer, Scheduled, Timer, UploadController};
use std::{future::Future, path::PathBuf, pin::Pin};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{candidate::read_candidate, render::describe};

#[derive(Parser, Debug)]
#[command(multicall = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Subcommand, Debug, PartialEq)]
enum ShellCommand {
    /// Select a PDF file
    #[command(alias = "drop")]
    Choose {
        #[arg(required = true, trailing_var_arg = true)]
        path: Vec<String>,
    },
    /// Clear the selected file and the form
    Remove,
    /// Set the display name
    Name {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        words: Vec<String>,
    },
    /// Pick the grade/series (no value clears it)
    Year { value: Option<String> },
    /// Pick the document type (no value clears it)
    Type { value: Option<String> },
    /// Upload the selected file
    Submit,
    /// Copy the public link
    Copy,
    /// Acknowledge the link as saved
    Save,
    /// Start over
    Reset,
    /// Print the current state
    Show,
    #[command(alias = "exit")]
    Quit,
}

type TimerFuture = Pin<Box<dyn Future<Output = Timer>>>;

/// Everything after the command word, spacing intact.
fn remainder(line: &str) -> &str {
    let line = line.trim_start();
    match line.find(char::is_whitespace) {
        Some(end) => line[end..].trim_start(),
        None => "",
    }
}

fn parse_line(line: &str) -> Result<ShellCommand, clap::Error> {
    let command = ShellLine::try_parse_from(line.split_whitespace())?.command;

    // Paths and names take the rest of the line as typed.
    Ok(match command {
        ShellCommand::Choose { .. } => ShellCommand::Choose {
            path: vec![remainder(line).to_string()],
        },
        ShellCommand::Name { .. } => ShellCommand::Name {
            words: vec![remainder(line).to_string()],
        },
        other => other,
    })
}

fn arm(timers: &mut FuturesUnordered<TimerFuture>, scheduled: Vec<Scheduled>) {
    for Scheduled { after, timer } in scheduled {
        timers.push(Box::pin(async move {
            tokio::time::sleep(after).await;
            timer
        }));
    }
}

/// Interactive session: one command per line on stdin, confirmation timers
/// firing between commands.
pub async fn run<S, M, C, R>(controller: &mut UploadController<S, M, C, R>) -> Result<()>
where
    S: StorageEngine,
    M: MetadataStore,
    C: Clipboard,
    R: Renderer,
{
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut timers: FuturesUnordered<TimerFuture> = FuturesUnordered::new();

    println!("Type 'help' for commands.");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }

                let command = match parse_line(&line) {
                    Ok(command) => command,
                    Err(e) => {
                        println!("{}", e);
                        continue;
                    }
                };

                if command == ShellCommand::Quit {
                    break;
                }
                let scheduled = execute(controller, command).await;
                arm(&mut timers, scheduled);
            }
            Some(timer) = timers.next(), if !timers.is_empty() => {
                let scheduled = controller.on_timer(timer).await;
                arm(&mut timers, scheduled);
            }
        }
    }

    Ok(())
}

async fn execute<S, M, C, R>(
    controller: &mut UploadController<S, M, C, R>,
    command: ShellCommand,
) -> Vec<Scheduled>
where
    S: StorageEngine,
    M: MetadataStore,
    C: Clipboard,
    R: Renderer,
{
    match command {
        ShellCommand::Choose { path } => {
            let path = PathBuf::from(path.concat());
            match read_candidate(&path, None).await {
                Ok(candidate) => controller.on_file_chosen(candidate).await,
                Err(e) => {
                    println!("{:#}", e);
                    Vec::new()
                }
            }
        }
        ShellCommand::Remove => controller.on_remove().await,
        ShellCommand::Name { words } => controller.on_name_edited(words.concat()).await,
        ShellCommand::Year { value } => controller.on_year_selected(value).await,
        ShellCommand::Type { value } => controller.on_type_selected(value).await,
        ShellCommand::Submit => controller.on_submit().await,
        ShellCommand::Copy => controller.on_copy_link().await,
        ShellCommand::Save => controller.on_save_link().await,
        ShellCommand::Reset => controller.on_reset().await,
        ShellCommand::Show => {
            println!("{}", describe(&controller.view()).join("\n"));
            Vec::new()
        }
        ShellCommand::Quit => Vec::new(),
    }
}
