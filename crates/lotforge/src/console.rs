//! Colorful console output for solver events.
//!
//! Provides a `tracing` layer that renders the solver's structured events as
//! one line each.
//!
//! ## Log Levels
//!
//! - **INFO**: Solve and phase start/end
//! - **DEBUG**: Restarts and VNS iterations
//! - **TRACE**: Individual local-search steps

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();
static SOLVE_START_NANOS: AtomicU64 = AtomicU64::new(0);

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initializes the console output.
///
/// Safe to call multiple times; only the first call has effect. `RUST_LOG`
/// overrides the default of info-level solver events.
pub fn init() {
    INIT.get_or_init(|| {
        print_banner();

        let filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::WARN.into())
            .from_env_lossy();
        let filter = match "lotforge_solver=info".parse() {
            Ok(directive) => filter.add_directive(directive),
            Err(_) => filter,
        };

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(ConsoleLayer)
            .try_init();
    });
}

fn mark_solve_start() {
    let epoch = EPOCH.get_or_init(Instant::now);
    SOLVE_START_NANOS.store(epoch.elapsed().as_nanos() as u64, Ordering::Relaxed);
}

fn elapsed_secs() -> f64 {
    let Some(epoch) = EPOCH.get() else {
        return 0.0;
    };
    let start = SOLVE_START_NANOS.load(Ordering::Relaxed);
    let now = epoch.elapsed().as_nanos() as u64;
    now.saturating_sub(start) as f64 / 1_000_000_000.0
}

fn print_banner() {
    let mut stdout = io::stdout().lock();
    let _ = writeln!(
        stdout,
        "{} {}",
        "LotForge".bright_cyan().bold(),
        format!("v{VERSION} - capacitated lot-sizing heuristics").bright_white()
    );
    let _ = stdout.flush();
}

/// A tracing layer that formats solver events with colors.
pub struct ConsoleLayer;

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !metadata.target().starts_with("lotforge") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor, *metadata.level());
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{output}");
        }
    }
}

#[derive(Debug, Default)]
struct EventVisitor {
    event: Option<String>,
    phase: Option<String>,
    instance: Option<String>,
    reason: Option<String>,
    parts: Option<u64>,
    machines: Option<u64>,
    periods: Option<u64>,
    iterations: Option<u64>,
    iteration: Option<u64>,
    steps: Option<u64>,
    step: Option<u64>,
    k: Option<u64>,
    speed: Option<u64>,
    duration_ms: Option<u64>,
    work_slots: Option<u64>,
    score: Option<f64>,
    candidate_score: Option<f64>,
    improved: Option<bool>,
    valid: Option<bool>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{value:?}").trim_matches('"').to_string();
        match field.name() {
            "event" => self.event = Some(s),
            "phase" => self.phase = Some(s),
            "instance" => self.instance = Some(s),
            "reason" => self.reason = Some(s),
            _ => {}
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "event" => self.event = Some(value.to_string()),
            "phase" => self.phase = Some(value.to_string()),
            "instance" => self.instance = Some(value.to_string()),
            "reason" => self.reason = Some(value.to_string()),
            _ => {}
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "parts" => self.parts = Some(value),
            "machines" => self.machines = Some(value),
            "periods" => self.periods = Some(value),
            "iterations" => self.iterations = Some(value),
            "iteration" => self.iteration = Some(value),
            "steps" => self.steps = Some(value),
            "step" => self.step = Some(value),
            "k" => self.k = Some(value),
            "speed" => self.speed = Some(value),
            "duration_ms" => self.duration_ms = Some(value),
            "work_slots" => self.work_slots = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        match field.name() {
            "score" => self.score = Some(value),
            "candidate_score" => self.candidate_score = Some(value),
            _ => {}
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        match field.name() {
            "improved" => self.improved = Some(value),
            "valid" => self.valid = Some(value),
            _ => {}
        }
    }
}

fn format_event(v: &EventVisitor, level: Level) -> String {
    match v.event.as_deref().unwrap_or("") {
        "solve_start" => format_solve_start(v),
        "solve_end" => format_solve_end(v),
        "phase_start" if level == Level::INFO => format_phase_start(v),
        "phase_end" if level == Level::INFO => format_phase_end(v),
        "validation_failed" => format_validation_failed(v),
        "step" => format_step(v, level),
        _ => String::new(),
    }
}

fn format_elapsed() -> String {
    format!("{:>7.3}s", elapsed_secs()).bright_black().to_string()
}

fn format_count(n: u64) -> String {
    n.to_formatted_string(&Locale::en)
}

fn format_score(score: Option<f64>) -> String {
    match score {
        Some(s) if s == 0.0 => format!("{s:.2}").bright_green().to_string(),
        Some(s) => format!("{s:.2}").white().to_string(),
        None => "N/A".white().to_string(),
    }
}

fn format_solve_start(v: &EventVisitor) -> String {
    mark_solve_start();
    format!(
        "{} {} Solving {} │ {} parts │ {} machines │ {} periods │ {} iterations",
        format_elapsed(),
        "▶".bright_green().bold(),
        v.instance.as_deref().unwrap_or("instance").bright_white().bold(),
        format_count(v.parts.unwrap_or(0)).bright_yellow(),
        format_count(v.machines.unwrap_or(0)).bright_yellow(),
        format_count(v.periods.unwrap_or(0)).bright_yellow(),
        format_count(v.iterations.unwrap_or(1)).bright_yellow(),
    )
}

fn format_solve_end(v: &EventVisitor) -> String {
    let status = if v.valid.unwrap_or(false) {
        "VALID".bright_green().bold().to_string()
    } else {
        "INVALID".bright_red().bold().to_string()
    };
    format!(
        "{} {} Solving complete │ {} │ {} steps │ {} moves/s │ {} │ {}",
        format_elapsed(),
        "■".bright_cyan().bold(),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
        format_count(v.steps.unwrap_or(0)).white(),
        format_count(v.speed.unwrap_or(0)).bright_magenta().bold(),
        format_score(v.score),
        status,
    )
}

fn format_phase_start(v: &EventVisitor) -> String {
    format!(
        "{} {} {} started",
        format_elapsed(),
        "▶".bright_blue(),
        v.phase.as_deref().unwrap_or("Unknown").white().bold()
    )
}

fn format_phase_end(v: &EventVisitor) -> String {
    let mut output = format!(
        "{} {} {} ended │ {}",
        format_elapsed(),
        "◀".bright_blue(),
        v.phase.as_deref().unwrap_or("Unknown").white().bold(),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
    );
    if let Some(slots) = v.work_slots {
        output.push_str(&format!(" │ {} work slots", format_count(slots).white()));
    }
    if let Some(steps) = v.steps {
        output.push_str(&format!(" │ {} steps", format_count(steps).white()));
    }
    if let Some(speed) = v.speed {
        output.push_str(&format!(" │ {} moves/s", format_count(speed).bright_magenta().bold()));
    }
    output.push_str(&format!(" │ {}", format_score(v.score)));
    output
}

fn format_validation_failed(v: &EventVisitor) -> String {
    format!(
        "{} {} {}",
        format_elapsed(),
        "✗".bright_red().bold(),
        v.reason.as_deref().unwrap_or("validation failed").bright_red()
    )
}

fn format_step(v: &EventVisitor, level: Level) -> String {
    match (v.k, level) {
        // VNS iteration
        (Some(k), Level::DEBUG) => {
            let icon = if v.improved.unwrap_or(false) {
                "✓".bright_green().to_string()
            } else {
                "✗".bright_red().to_string()
            };
            format!(
                "{} {} Iteration {:>8} │ k {:>3} │ {} → {}",
                format_elapsed(),
                icon,
                format_count(v.step.unwrap_or(0)).bright_black(),
                k,
                format_score(v.candidate_score),
                format_score(v.score),
            )
        }
        (None, Level::TRACE) => format!(
            "{} {} Step {:>10} │ {}",
            format_elapsed(),
            "·".bright_black(),
            format_count(v.step.unwrap_or(0)).bright_black(),
            format_score(v.score).bright_black()
        ),
        _ => String::new(),
    }
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{ms}ms")
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        format!("{}m {}s", ms / 60_000, (ms % 60_000) / 1000)
    }
}
