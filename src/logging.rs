use std::io::Write;

use colored::Colorize;
use env_logger::{Builder, Target};
use log::{Level, LevelFilter};

/// Environment variable that overrides `-v` with an env_logger filter spec.
pub const LOG_ENV: &str = "COMMITMENTOR_LOG";

fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,  // default: retries and ignored config still show
        1 => LevelFilter::Info,  // -v: which model, which files
        2 => LevelFilter::Debug, // -vv: prompts and replies
        _ => LevelFilter::Trace, // -vvv: raw HTTP bodies
    }
}

pub fn init_logger(verbosity: u8) {
    let level = level_for(verbosity);

    let mut builder = Builder::new();
    builder.target(Target::Stderr);
    // HTTP internals stay quiet unless explicitly asked for.
    builder.filter_level(LevelFilter::Warn);
    builder.filter_module(env!("CARGO_CRATE_NAME"), level);
    if let Ok(spec) = std::env::var(LOG_ENV) {
        builder.parse_filters(&spec);
    }

    builder.format(|buf, record| {
        let level_label = match record.level() {
            Level::Error => "ERROR".red().bold(),
            Level::Warn => "WARN ".yellow().bold(),
            Level::Info => "INFO ".white().bold(),
            Level::Debug => "DEBUG".bright_black(),
            Level::Trace => "TRACE".bright_black(),
        };

        writeln!(buf, "{} {}", level_label, record.args())
    });

    let _ = builder.try_init();
}
