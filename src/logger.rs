use log::LevelFilter;
use env_logger::Builder;
use std::io::Write;
use chrono::Local;

/// Logs go to stderr; stdout is reserved for the result table.
pub fn init(debug: bool) {
    let level = if debug { LevelFilter::Debug } else { LevelFilter::Info };

    Builder::new()
        .format(|buf, record| {
            writeln!(buf,
                "{} [{}] - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(None, level)
        .parse_default_env()
        .init();

    log::debug!("Logger initialized.");
}
