use std::io::Write;

use env_logger::Env;
use log::LevelFilter;

/// Log to stderr as `[time][LEVEL] message`; `RUST_LOG` overrides the level.
pub fn setup_logging() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}][{}] {}",
                buf.timestamp_seconds(),
                record.level(),
                record.args()
            )
        })
        // Dependencies stay quiet unless asked for
        .filter_module("tokio", LevelFilter::Warn)
        .try_init()?;

    Ok(())
}
