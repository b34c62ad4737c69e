use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use gallery_api::{
    demo::{demo_session, fresh_session},
    SessionOptions,
};
use shared::{domain::PostCategory, protocol::GalleryEvent};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::broadcast::error::RecvError,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{parse_line, Flow, Shell};
use config::{load_settings, DEFAULT_CONFIG_PATH};

#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    #[arg(long)]
    reveal_delay_ms: Option<u64>,
    #[arg(long)]
    post_category: Option<PostCategory>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = load_settings(&args.config)?;
    if let Some(v) = args.reveal_delay_ms {
        settings.reveal_delay_ms = v;
    }
    if let Some(v) = args.post_category {
        settings.post_category = v;
    }

    let filter = EnvFilter::try_new(&settings.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!(
        "gallery: starting post={} category={} reveal_delay_ms={} seed_demo={}",
        settings.post_id,
        settings.post_category.as_str(),
        settings.reveal_delay_ms,
        settings.seed_demo
    );

    let options = SessionOptions {
        reveal_delay: settings.reveal_delay(),
    };
    let post_id = settings.post_id();
    let session = if settings.seed_demo {
        demo_session(options, &post_id, settings.post_category)?
    } else {
        fresh_session(options, &post_id, settings.post_category)?
    };
    let mut shell = Shell::new(session, post_id, settings.post_category);

    // Deferred reveals land after the command that caused them has returned.
    let mut events = shell.session().subscribe();
    let printer = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event @ GalleryEvent::CardRevealed { .. }) => match serde_json::to_string(&event) {
                    Ok(line) => println!("{line}"),
                    Err(err) => warn!("gallery: failed to encode event: {err}"),
                },
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!("gallery: event printer lagged, skipped={skipped}");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match parse_line(&line) {
            Ok(command) => command,
            Err(err) => {
                eprintln!("{err}");
                continue;
            }
        };
        match shell.execute(command).await? {
            Flow::Continue(value) => println!("{value}"),
            Flow::Quit => break,
        }
    }

    drop(shell);
    printer.abort();
    info!("gallery: session closed");
    Ok(())
}
