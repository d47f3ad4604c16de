use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use crossbeam_channel::Receiver;
use playkeep_core::{
    Orchestrator, PersistConfig, PlayerEvent, SaveOutcome, TimerQueue, config, loader,
};
use tokio::io::{AsyncBufReadExt, BufReader};

mod commands;
mod logger;
mod player;

use commands::PlayerCommand;
use player::SessionPlayer;

fn main() -> anyhow::Result<()> {
    logger::setup_logging()?;

    log::info!("Starting playkeep");

    // Optional config path as the only argument
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(config::default_config_path);

    let persist_config = match &config_path {
        Some(path) => PersistConfig::load_from(path)
            .with_context(|| format!("cannot load config {}", path.display()))?,
        None => PersistConfig::default(),
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("cannot start event loop")?;

    runtime.block_on(run(persist_config))
}

/// Everything below runs on one thread: stdin commands, player notifications
/// and timers are handled strictly one after another.
async fn run(persist_config: PersistConfig) -> anyhow::Result<()> {
    let (event_tx, event_rx) = crossbeam_channel::unbounded();
    let mut player = SessionPlayer::new(event_tx, std::env::current_dir().ok());
    let mut orchestrator = Orchestrator::for_host(persist_config, &player);
    let mut timers = TimerQueue::new(Instant::now());

    log::info!(
        "Queue file: {} (restore mode: {})",
        orchestrator.target().display(),
        orchestrator.config().load_mode
    );
    orchestrator.on_start(&mut timers);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let deadline = timers.next_deadline();
        let sleep = tokio::time::sleep_until(tokio::time::Instant::from_std(
            deadline.unwrap_or_else(Instant::now),
        ));

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("cannot read stdin")? else {
                    log::info!("stdin closed");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<PlayerCommand>() {
                    Ok(PlayerCommand::Quit) => break,
                    Ok(command) => {
                        execute(command, &mut player, &mut orchestrator, &mut timers)
                    }
                    Err(e) => println!("{:#}", e),
                }
            }
            _ = sleep, if deadline.is_some() => {}
        }

        pump(&mut orchestrator, &mut player, &mut timers, &event_rx);
    }

    // Ensure clean shutdown
    pump(&mut orchestrator, &mut player, &mut timers, &event_rx);
    player.shutdown();
    pump(&mut orchestrator, &mut player, &mut timers, &event_rx);

    log::info!("Bye");
    Ok(())
}

/// Deliver pending player notifications and fire due timers until both are
/// exhausted; a fired timer may mutate the queue and queue more notifications.
fn pump(
    orchestrator: &mut Orchestrator,
    player: &mut SessionPlayer,
    timers: &mut TimerQueue,
    event_rx: &Receiver<PlayerEvent>,
) {
    timers.set_now(Instant::now());
    loop {
        while let Ok(event) = event_rx.try_recv() {
            orchestrator.on_event(&event, &*player, timers);
        }

        match timers.pop_due(Instant::now()) {
            Some(timer) => {
                orchestrator.on_timer(timer, player, timers);
            }
            None => break,
        }
    }
}

fn execute(
    command: PlayerCommand,
    player: &mut SessionPlayer,
    orchestrator: &mut Orchestrator,
    timers: &mut TimerQueue,
) {
    // Timers armed by the command count from now, not from the last pump.
    timers.set_now(Instant::now());
    match command {
        PlayerCommand::Add(path) => player.add(path),
        PlayerCommand::Remove(index) => match player.remove_at(index) {
            Some(path) => println!("removed {}", path),
            None => println!("no entry at position {}", index + 1),
        },
        PlayerCommand::Clear => player.clear(),
        PlayerCommand::List => print_queue(player),
        PlayerCommand::Save => match orchestrator.save_now(&*player) {
            Some(SaveOutcome::Written(count)) => println!("saved {} entries", count),
            Some(SaveOutcome::Skipped(reason)) => println!("not saved: {}", reason),
            None => println!("save failed, see log"),
        },
        PlayerCommand::Load => {
            let count = orchestrator.load_now(player, timers);
            println!("restored {} entries", count);
        }
        PlayerCommand::Saved => match loader::read_persisted(orchestrator.target()) {
            Ok(entries) if entries.is_empty() => println!("(queue file is empty or missing)"),
            Ok(entries) => {
                for (i, entry) in entries.iter().enumerate() {
                    println!("{:>3}. {}", i + 1, entry);
                }
            }
            Err(e) => println!("{}", e),
        },
        PlayerCommand::Help => println!("{}", commands::help_text()),
        PlayerCommand::Quit => {}
    }
}

fn print_queue(player: &SessionPlayer) {
    if player.items().is_empty() {
        println!("(queue is empty)");
        return;
    }
    for (i, item) in player.items().iter().enumerate() {
        let marker = if player.current().map(|c| c.id) == Some(item.id) {
            ">"
        } else {
            " "
        };
        println!("{}{:>3}. {}", marker, i + 1, item.path);
    }
}
