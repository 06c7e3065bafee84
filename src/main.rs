//! Redcover - red envelope cover generation server and session client.

use std::path::Path;
use std::process;

use chrono::Utc;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use redcover::adapters::live::cover_api::HttpCoverApi;
use redcover::cli::{Cli, Command, GenerateArgs};
use redcover::config::{self, Config};
use redcover::context::ServiceContext;
use redcover::error::CoverError;
use redcover::output::{numbered_path, resolve_output_path, save_image, DataUri};
use redcover::params::{describe_options, validate_choice, Field, Mode};
use redcover::server::{self, AppState};
use redcover::session::controller::SessionController;
use redcover::session::history::format_relative;
use redcover::session::{Edit, Event, SessionState};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

async fn run(cli: Cli) -> Result<(), CoverError> {
    let config_path = config::discover_config_path(cli.config.as_deref());
    let config = Config::load(&config_path).map_err(CoverError::Config)?;

    match cli.command {
        Command::Serve { bind } => serve(&config, bind.as_deref()).await,
        Command::Generate(args) => generate(&config, &args).await,
        Command::Options { mode } => {
            let mode: Mode = mode.parse().map_err(CoverError::InvalidArgument)?;
            print!("{}", describe_options(mode));
            Ok(())
        }
    }
}

async fn serve(config: &Config, bind: Option<&str>) -> Result<(), CoverError> {
    let replay_path = std::env::var("REDCOVER_REPLAY").ok();
    let is_recording = std::env::var("REDCOVER_REC").is_ok_and(|v| v == "true" || v == "1");

    let (ctx, recording_session) = if let Some(ref cassette_path) = replay_path {
        info!(cassette = %cassette_path, "replaying provider responses");
        (ServiceContext::replaying(Path::new(cassette_path))?, None)
    } else if is_recording {
        info!("recording provider responses");
        let (ctx, session) = ServiceContext::recording(config)?;
        (ctx, Some(session))
    } else {
        (ServiceContext::live(config)?, None)
    };

    let addr = config.bind(bind);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let state = AppState { generator: ctx.generator, model: config.model() };

    server::serve(listener, state, shutdown_signal()).await?;

    if let Some(session) = recording_session {
        match session.finish() {
            Ok(Some(path)) => info!(path = %path.display(), "cassette saved"),
            Ok(None) => info!("no provider calls; cassette not written"),
            Err(e) => warn!(error = %e, "failed to save cassette"),
        }
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for ctrl-c; stopping");
    }
    info!("shutting down");
}

async fn generate(config: &Config, args: &GenerateArgs) -> Result<(), CoverError> {
    let prompt = args.resolve_prompt()?;
    let mode: Mode = args.mode.parse().map_err(CoverError::InvalidArgument)?;

    // Check every flag against the mode's tables before touching the network.
    let choices = [
        (Field::Style, &args.style),
        (Field::Background, &args.background),
        (Field::Lighting, &args.lighting),
        (Field::Pose, &args.pose),
        (Field::AspectRatio, &args.aspect_ratio),
        (Field::Resolution, &args.resolution),
    ];
    let mut edits = Vec::new();
    for (field, value) in choices {
        if let Some(value) = value {
            validate_choice(mode, field, value).map_err(CoverError::InvalidArgument)?;
            edits.push(Edit::Choice(field, value.clone()));
        }
    }
    edits.push(Edit::Prompt(prompt));
    if let Some(ref negative) = args.negative_prompt {
        edits.push(Edit::NegativePrompt(negative.clone()));
    }

    let server_url = config.server_url(args.server.as_deref());
    let mut session =
        SessionController::new(HttpCoverApi::new(&server_url)).with_observer(report_loading);
    session.dispatch(Event::ChangeMode(mode));
    for edit in edits {
        session.dispatch(Event::Edit(edit));
    }

    for n in 1..=args.count {
        if n > 1 {
            session.dispatch(Event::Back);
        }
        if !session.submit().await {
            let message = session.state().error.clone().unwrap_or_else(|| "unknown error".into());
            return Err(CoverError::Generation(message));
        }

        let item = session.state().preview_item().ok_or(CoverError::NoImage)?;
        let image = DataUri::parse(&item.url)?;
        let mut output_path =
            resolve_output_path(args.output.as_deref(), &item.prompt, image.extension());
        if args.count > 1 {
            output_path = numbered_path(&output_path, n);
        }
        save_image(&image, &output_path)?;
        eprintln!("Saved: {}", output_path.display());
    }

    if args.count > 1 {
        let now = Utc::now();
        eprintln!("History:");
        for item in session.state().filtered_history() {
            eprintln!("  {:<9} {:<6} {}", format_relative(item.timestamp, now), item.kind.as_str(), item.prompt);
        }
    }
    Ok(())
}

/// Mirror the loading panel on stderr.
fn report_loading(event: &Event, state: &SessionState) {
    match event {
        Event::Submit => eprintln!("{}", state.mode.options().estimate),
        Event::RotateLoadingText => {
            eprintln!("{} {:>3.0}%", state.loading_text(), state.progress);
        }
        _ => {}
    }
}
