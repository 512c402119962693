use std::sync::Arc;

use clap::Parser;

use snapcap::camera::{self, BlankFeed, FrameSource};
use snapcap::cli::{handle_config_action, Args, Command};
use snapcap::config::Config;
use snapcap::prompt::{PromptInput, SessionCommand, HELP_TEXT};
use snapcap::session::{Event, Session};
use snapcap::upload::UploadClient;

#[tokio::main]
async fn main() {
    // .env is optional
    let _ = dotenv::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut config = Config::load(args.config.as_deref())?;
    config.apply_env();
    args.apply_overrides(&mut config);

    if let Some(Command::Config { action }) = args.command {
        return Ok(handle_config_action(action, &config, args.config.as_deref())?);
    }

    config.validate()?;

    let uploader = Arc::new(UploadClient::with_timeout(
        &config.upload.endpoint,
        config.upload.timeout(),
    )?);
    log::info!("Uploading to {}", uploader.endpoint());

    // Capture stays unavailable until the camera binds. The camera is held
    // for the life of the session and released on drop.
    let (session, rx) = Session::new(Box::new(BlankFeed), uploader, config.session_options());
    session.spawn_acquire(|| {
        camera::acquire().map(|capture| Box::new(capture) as Box<dyn FrameSource>)
    });

    let ctrlc_tx = session.sender();
    ctrlc::set_handler(move || {
        let _ = ctrlc_tx.send(Event::Command(SessionCommand::Quit));
    })?;

    PromptInput::print_status(HELP_TEXT);
    let _listener = PromptInput::spawn_listener(session.sender());

    session.run(rx).await;
    log::info!("Session ended");
    Ok(())
}
