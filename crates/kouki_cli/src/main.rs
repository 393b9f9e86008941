use anyhow::Result;
use clap::Parser;
use kouki_chat::{
    Caption, CaptionKind, ChatClient, ConversationSession, HttpChatClient, MockChatClient,
};
use kouki_core::{KoukiConfig, Preferences, Role};
use kouki_motion::{Avatar, AvatarCommand, AvatarRuntime, MemoryModel, TraceRenderer};
use kouki_voice::{ClipSink, HttpTts, UnsupportedStt};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

mod repl;

use repl::ReplCommand;

#[derive(Parser, Debug)]
#[command(name = "kouki", author, version, about, long_about = None)]
struct Args {
    /// Path to the config file
    #[arg(short, long, default_value = "kouki.toml")]
    config: PathBuf,

    /// Rig manifest of the avatar model (overrides config)
    #[arg(short, long)]
    model: Option<String>,

    /// Frame rate of the animation loop (overrides config)
    #[arg(long)]
    fps: Option<u32>,

    /// Never synthesize audio; the mouth follows the text length instead
    #[arg(long)]
    no_voice: bool,

    /// Fix blink and gesture timing
    #[arg(long)]
    seed: Option<u64>,

    /// Skip the greeting
    #[arg(long)]
    no_greeting: bool,

    /// Answer with the built-in mock instead of the chat backend
    #[arg(long)]
    offline: bool,
}

fn init_tracing() {
    // Logs go to stderr so the prompt on stdout stays readable
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_avatar(config: &KoukiConfig) -> Avatar {
    let mut avatar = Avatar::new(config.avatar.seed).with_renderer(TraceRenderer::default());
    match MemoryModel::load(&config.avatar.model_path) {
        Ok(model) => avatar.set_model(Box::new(model)),
        Err(e) => error!(
            "Failed to load model {}: {:#}. Running without an avatar.",
            config.avatar.model_path, e
        ),
    }
    avatar
}

fn print_captions(captions: &[Caption]) {
    for caption in captions {
        match (caption.role, caption.kind) {
            (Role::User, _) => {}
            (_, CaptionKind::Notice) => println!("[{}]", caption.text),
            _ => println!("Kouki: {}", caption.text),
        }
    }
}

fn prompt() -> Result<()> {
    print!("> ");
    std::io::stdout().flush()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing();
    let args = Args::parse();

    let mut config = KoukiConfig::load_or_default(&args.config);
    if let Some(model) = args.model {
        config.avatar.model_path = model;
    }
    if let Some(fps) = args.fps {
        config.frame.fps = fps;
    }
    if args.seed.is_some() {
        config.avatar.seed = args.seed;
    }

    info!("Initializing Kouki...");
    let mut initial = load_avatar(&config);
    if args.no_greeting {
        // The greeting is what normally arms the gesture countdown
        initial.arm_gestures();
    }
    let runtime = AvatarRuntime::spawn(initial, config.frame.fps);
    let avatar = runtime.handle();

    let client: Arc<dyn ChatClient> = if args.offline {
        info!("Offline mode, replies come from the mock backend");
        Arc::new(MockChatClient::new())
    } else {
        info!("Chat backend: {}", config.backend.chat_url);
        Arc::new(HttpChatClient::from_config(&config.backend)?)
    };

    let mut session = ConversationSession::new(client, avatar.clone(), &config);
    if let Some(path) = Preferences::default_path() {
        session = session.with_preferences(path);
    }
    if !args.no_voice && !args.offline {
        let tts = HttpTts::from_config(&config.backend)?;
        session = session.with_voice(Arc::new(tts), Arc::new(ClipSink::new(&config.audio)));
    }

    println!("Kouki is here. Type 'quit' to exit, '/help' for commands.");
    let mut shown = 0;
    if !args.no_greeting {
        session.play_greeting().await;
        print_captions(&session.transcript()[shown..]);
        shown = session.transcript().len();
    }

    let stt = UnsupportedStt;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt()?;

    while let Some(line) = lines.next_line().await? {
        match ReplCommand::parse(&line) {
            ReplCommand::Quit => break,
            ReplCommand::Say(text) => {
                session.send_message(&text).await;
            }
            ReplCommand::Voice(None) => {
                let state = if session.voice_enabled() { "on" } else { "off" };
                println!("voice is {state}");
            }
            ReplCommand::Voice(Some(enabled)) => {
                if let Err(e) = session.set_voice_enabled(enabled) {
                    error!("Failed to save preferences: {:#}", e);
                }
            }
            ReplCommand::Mic => {
                session.listen(&stt).await;
            }
            ReplCommand::Replay => match session.last_reply().map(str::to_string) {
                Some(reply) => {
                    session.replay(&reply).await;
                }
                None => println!("nothing to replay yet"),
            },
            ReplCommand::Wave => avatar.send(AvatarCommand::Wave),
            ReplCommand::Tilt => avatar.send(AvatarCommand::TiltHead),
            ReplCommand::Status => println!("{}", serde_json::to_string(&runtime.status())?),
            ReplCommand::Help => println!("{}", repl::HELP),
            ReplCommand::Unknown(cmd) => println!("unknown command: {cmd}"),
        }

        print_captions(&session.transcript()[shown..]);
        shown = session.transcript().len();
        prompt()?;
    }

    let avatar = runtime.shutdown().await?;
    info!(frames = avatar.clock().frames(), "Goodbye");
    Ok(())
}
