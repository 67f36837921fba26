//! Colorful console output for server events.
//!
//! Provides a custom `tracing` layer that formats leaderboard events with
//! colors.
//!
//! ## Log Levels
//!
//! - **INFO**: Lifecycle events and one line per handled request
//! - **WARN**: Rejected requests
//! - **ERROR**: Store failures
//! - **DEBUG**: Per-request store calls

use std::fmt::Write as _;
use std::io::{self, Write};
use std::sync::OnceLock;

use owo_colors::OwoColorize;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();

/// Package version for banner display.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initializes console output.
///
/// Safe to call multiple times - only the first call has effect.
/// Prints the banner and sets up tracing with `default_filter`, unless
/// `RUST_LOG` is set.
pub fn init(default_filter: &str) {
    INIT.get_or_init(|| {
        print_banner();

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_filter));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(ServerConsoleLayer)
            .try_init();
    });
}

pub fn print_banner() {
    let banner = r#"
 _                _           _                         _
| |    ___  __ _ | | ___ _ __| |__   ___   __ _ _ __ __| |
| |   / _ \/ _` |/ _` |/ _ \ '__| '_ \ / _ \ / _` | '__/ _` |
| |__|  __/ (_| | (_| |  __/ |  | |_) | (_) | (_| | | | (_| |
|_____\___|\__,_|\__,_|\___|_|  |_.__/ \___/ \__,_|_|  \__,_|
"#;

    let version_line = format!("                  v{} - Online Ranking Server\n", VERSION);

    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", banner.bright_cyan());
    let _ = writeln!(stdout, "{}", version_line.bright_white().bold());
    let _ = stdout.flush();
}

/// A tracing layer that formats leaderboard events with colors.
pub struct ServerConsoleLayer;

impl<S: Subscriber> Layer<S> for ServerConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();

        // Only handle leaderboard crate events
        if !metadata.target().starts_with("leaderboard_") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(*metadata.level(), &visitor);
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    message: Option<String>,
    method: Option<String>,
    path: Option<String>,
    status: Option<u64>,
    elapsed_us: Option<u64>,
    fields: Vec<(&'static str, String)>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        self.record_text(field, s.trim_matches('"').to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "status" => self.status = Some(value),
            "elapsed_us" => self.elapsed_us = Some(value),
            name => self.fields.push((name, value.to_string())),
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields.push((field.name(), value.to_string()));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_text(field, value.to_string());
    }
}

impl EventVisitor {
    fn record_text(&mut self, field: &Field, value: String) {
        match field.name() {
            "message" => self.message = Some(value),
            "method" => self.method = Some(value),
            // Also a plain field: store events report their database path.
            "path" => {
                self.path = Some(value.clone());
                self.fields.push(("path", value));
            }
            name => self.fields.push((name, value)),
        }
    }
}

fn format_event(level: Level, v: &EventVisitor) -> String {
    match v.message.as_deref() {
        Some("Request handled") => format_request(v),
        Some(msg) => format_message(level, msg, &v.fields),
        None => String::new(),
    }
}

fn format_request(v: &EventVisitor) -> String {
    let method = v.method.as_deref().unwrap_or("?");
    let path = v.path.as_deref().unwrap_or("/");
    let status = v.status.unwrap_or(0);
    let elapsed = format_elapsed(v.elapsed_us.unwrap_or(0));

    let status = match status {
        200..=299 => status.bright_green().to_string(),
        400..=499 => status.bright_yellow().to_string(),
        _ => status.bright_red().bold().to_string(),
    };

    format!(
        "{} {:<6} {} {} {}",
        "▸".bright_cyan(),
        method.white().bold(),
        path,
        status,
        elapsed.dimmed()
    )
}

fn format_message(level: Level, msg: &str, fields: &[(&'static str, String)]) -> String {
    let tag = match level {
        Level::ERROR => "ERROR".bright_red().bold().to_string(),
        Level::WARN => " WARN".bright_yellow().to_string(),
        Level::INFO => " INFO".bright_green().to_string(),
        Level::DEBUG => "DEBUG".bright_blue().to_string(),
        Level::TRACE => "TRACE".dimmed().to_string(),
    };

    let mut line = format!("{} {}", tag, msg);
    for (name, value) in fields {
        let _ = write!(line, " {}={}", name.dimmed(), value);
    }
    line
}

fn format_elapsed(us: u64) -> String {
    if us < 1_000 {
        format!("{}µs", us)
    } else if us < 1_000_000 {
        format!("{:.2}ms", us as f64 / 1_000.0)
    } else {
        format!("{:.2}s", us as f64 / 1_000_000.0)
    }
}
