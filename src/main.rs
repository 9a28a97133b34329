use promptline::adapters::ReqwestHttpClient;
use promptline::cancel::{cancel_pair, CancelHandle};
use promptline::chat::ChatClient;
use promptline::cli::{handle_version_command, parse_args, CliCommand, USAGE};
use promptline::config::ClientConfig;
use promptline::error::ChatError;
use promptline::images::ImageClient;
use promptline::models::{ChatMessage, ImageSize};
use promptline::sse::{relay, WriteSink};

use color_eyre::eyre::{Report, WrapErr};
use color_eyre::Result;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Handle of the request currently in flight, if any.
///
/// Ctrl+C cancels it; with nothing in flight Ctrl+C exits.
type ActiveRequest = Arc<Mutex<Option<CancelHandle>>>;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .try_init();
}

fn install_interrupt_handler(active: ActiveRequest) {
    let result = ctrlc::set_handler(move || {
        let handle = active.lock().ok().and_then(|guard| guard.clone());
        match handle {
            Some(handle) => handle.cancel(),
            None => std::process::exit(130),
        }
    });
    if let Err(e) = result {
        debug!(error = %e, "could not install Ctrl+C handler");
    }
}

/// Send `history` and print the reply as it arrives.
///
/// Returns the full reply, or `None` if the user cancelled it. A failed
/// write to stdout stops the stream and is returned as an error.
async fn chat_turn(
    chat: &ChatClient<ReqwestHttpClient>,
    history: &[ChatMessage],
    active: &ActiveRequest,
) -> Result<Option<String>> {
    let (handle, signal) = cancel_pair();
    if let Ok(mut guard) = active.lock() {
        *guard = Some(handle.clone());
    }

    let (result, reply, write_error) = match chat.send(history, signal).await {
        Ok(stream) => {
            let mut sink = WriteSink::new(io::stdout(), handle);
            let result = relay(stream, &mut sink).await;
            let (reply, write_error) = sink.into_parts();
            (result, reply, write_error)
        }
        Err(e) => (Err(e), String::new(), None),
    };

    if let Ok(mut guard) = active.lock() {
        *guard = None;
    }

    if let Some(err) = write_error {
        return Err(Report::new(err).wrap_err("failed to write reply to stdout"));
    }

    match result {
        Ok(()) => Ok(Some(reply)),
        Err(ChatError::Cancelled) => {
            eprintln!("\n[cancelled]");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

async fn run_single_prompt(config: ClientConfig, prompt: String, active: ActiveRequest) -> Result<()> {
    let chat = ChatClient::from_config(config)?;
    let history = vec![ChatMessage::user(prompt)];
    chat_turn(&chat, &history, &active)
        .await
        .wrap_err("chat request failed")?;
    Ok(())
}

async fn run_interactive(config: ClientConfig, active: ActiveRequest) -> Result<()> {
    let chat = ChatClient::from_config(config)?;
    let mut history: Vec<ChatMessage> = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    eprintln!("Chatting with {} (Ctrl+D to quit, Ctrl+C to stop a reply)", chat.config().chat_url);

    loop {
        eprint!("> ");
        let _ = io::stderr().flush();

        let Some(line) = lines.next_line().await.wrap_err("failed to read input")? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        history.push(ChatMessage::user(line));
        match chat_turn(&chat, &history, &active).await {
            Ok(Some(reply)) => history.push(ChatMessage::assistant(reply)),
            Ok(None) => {
                history.pop();
            }
            Err(report) => {
                // Anything but a request error means stdout is gone
                let Some(e) = report.downcast_ref::<ChatError>() else {
                    return Err(report);
                };
                eprintln!("error: {}", e.user_message());
                debug!(error = %e, "chat turn failed");
                history.pop();
            }
        }
    }
    Ok(())
}

async fn run_image(
    config: ClientConfig,
    prompt: String,
    size: Option<ImageSize>,
    count: u32,
) -> Result<()> {
    let images = ImageClient::from_config(config)?;
    let response = match size {
        Some(size) => images.generate_with_size(&prompt, count, size).await,
        None => images.generate(&prompt, count).await,
    }
    .wrap_err("image generation failed")?;

    if let Some(created) = response.created_at() {
        eprintln!("created {}", created.to_rfc3339());
    }
    for url in response.urls() {
        println!("{}", url);
    }
    Ok(())
}

async fn run_models(config: ClientConfig) -> Result<()> {
    let images = ImageClient::from_config(config)?;
    let models = images
        .list_models()
        .await
        .wrap_err("model listing failed")?;
    println!("{}", serde_json::to_string_pretty(&models)?);
    Ok(())
}

fn main() -> Result<()> {
    let command = match parse_args(std::env::args()) {
        Ok(command) => command,
        Err(message) => {
            eprintln!("error: {}\n\n{}", message, USAGE);
            std::process::exit(2);
        }
    };

    match command {
        CliCommand::Version => handle_version_command(),
        CliCommand::Help => {
            println!("{}", USAGE);
            return Ok(());
        }
        _ => {}
    }

    color_eyre::install()?;
    init_tracing();

    let config = ClientConfig::load().wrap_err("failed to load configuration")?;
    debug!(chat_url = %config.chat_url, backend = %config.backend, "configuration loaded");

    let active: ActiveRequest = Arc::new(Mutex::new(None));
    install_interrupt_handler(active.clone());

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        match command {
            CliCommand::Chat { prompt: Some(prompt) } => {
                run_single_prompt(config, prompt, active).await
            }
            CliCommand::Chat { prompt: None } => run_interactive(config, active).await,
            CliCommand::Image {
                prompt,
                size,
                count,
            } => run_image(config, prompt, size, count).await,
            CliCommand::Models => run_models(config).await,
            CliCommand::Version | CliCommand::Help => Ok(()),
        }
    })
}
