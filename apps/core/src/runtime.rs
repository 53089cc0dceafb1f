use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use crate::config::{self, ConfigError};
use crate::logging::{self, LogEvent};
use crate::session::{SessionError, SessionEvent, ShowcaseSession};

const LOG_PREFIX: &str = "[devtools-showcase]";
const BAR_WIDTH: usize = 40;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeOptions {
    pub query: Option<String>,
    pub category: Option<String>,
    pub install: bool,
    pub json: bool,
    pub config_path: Option<PathBuf>,
}

#[derive(Debug)]
pub enum RuntimeError {
    Config(ConfigError),
    Session(SessionError),
    Output(String),
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(error) => write!(f, "config error: {error}"),
            Self::Session(error) => write!(f, "session error: {error}"),
            Self::Output(error) => write!(f, "output error: {error}"),
        }
    }
}

impl std::error::Error for RuntimeError {}

impl From<ConfigError> for RuntimeError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<SessionError> for RuntimeError {
    fn from(value: SessionError) -> Self {
        Self::Session(value)
    }
}

pub fn parse_cli_args(args: &[String]) -> Result<RuntimeOptions, String> {
    let mut options = RuntimeOptions::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--query" | "-q" => {
                let value = iter.next().ok_or("--query requires a value")?;
                options.query = Some(value.clone());
            }
            "--category" | "-c" => {
                let value = iter.next().ok_or("--category requires a value")?;
                options.category = Some(value.clone());
            }
            "--config" => {
                let value = iter.next().ok_or("--config requires a path")?;
                options.config_path = Some(PathBuf::from(value));
            }
            "--install" => options.install = true,
            "--json" => options.json = true,
            other => return Err(format!("unknown argument: {other}")),
        }
    }

    Ok(options)
}

pub fn run_with_options(options: RuntimeOptions) -> Result<(), RuntimeError> {
    if let Err(error) = logging::init() {
        eprintln!("{LOG_PREFIX} logging disabled: {error}");
    }

    let config = config::load(options.config_path.as_deref())?;
    if !config.config_path.exists() {
        config::save(&config)?;
        logging::record(&LogEvent::ConfigWritten(&config.config_path));
        println!(
            "{LOG_PREFIX} wrote default config to {}",
            config.config_path.display()
        );
    }
    logging::record(&LogEvent::Startup {
        hotkey: &config.hotkey,
        step: config.progress_step,
        interval_ms: config.tick_interval_ms,
        config_path: &config.config_path,
    });

    let mut session = ShowcaseSession::with_builtin_catalog(config)?;
    if let Some(category) = options.category.as_deref() {
        session.set_category(category);
    }
    if let Some(query) = options.query.as_deref() {
        session.set_search_text(query);
    }
    logging::record(&LogEvent::QueryApplied {
        text: &session.query().text,
        category: session.query().category.as_str(),
        results: session.visible_tools().len(),
    });

    if options.install {
        play_install(&mut session)?;
    }

    if options.json {
        let body = serde_json::to_string_pretty(&session.snapshot())
            .map_err(|e| RuntimeError::Output(e.to_string()))?;
        println!("{body}");
    } else {
        print_catalog(&session);
    }

    session.teardown();
    logging::shutdown();
    Ok(())
}

fn print_catalog(session: &ShowcaseSession) {
    let tools = session.visible_tools();
    println!(
        "{LOG_PREFIX} {} of {} tools (category={}, text='{}')",
        tools.len(),
        session.catalog().len(),
        session.query().category,
        session.query().text
    );
    if tools.is_empty() {
        println!("  No tools match. Try a broader query.");
        return;
    }
    for tool in tools {
        println!(
            "  {:<18} [{}] {} - {}",
            tool.name,
            tool.category,
            tool.popularity_label(),
            tool.description
        );
        println!(
            "    {} | updated {} | $ {}",
            tool.downloads_label(),
            tool.last_update,
            tool.install_command()
        );
    }
}

fn play_install(session: &mut ShowcaseSession) -> Result<(), RuntimeError> {
    session.subscribe(|event| match event {
        SessionEvent::ProgressChanged(state) => {
            print!("\r{LOG_PREFIX} installing {}", progress_bar(state.percent));
            let _ = std::io::stdout().flush();
        }
        SessionEvent::InstallCompleted => println!("\n{LOG_PREFIX} installation complete!"),
        _ => {}
    });

    session.start_install()?;
    while session.progress().running {
        if let Some(wait) = session.next_tick_due_in(Instant::now()) {
            std::thread::sleep(wait);
        }
        session.poll_install(Instant::now());
    }
    Ok(())
}

fn progress_bar(percent: u8) -> String {
    let filled = usize::from(percent.min(100)) * BAR_WIDTH / 100;
    format!(
        "[{}{}] {percent:>3}%",
        "#".repeat(filled),
        " ".repeat(BAR_WIDTH - filled)
    )
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{parse_cli_args, progress_bar, RuntimeOptions};

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn parses_all_flags() {
        let options = parse_cli_args(&args(&[
            "--query",
            "ai",
            "-c",
            "build",
            "--install",
            "--json",
            "--config",
            "/tmp/showcase.json",
        ]))
        .unwrap();
        assert_eq!(
            options,
            RuntimeOptions {
                query: Some("ai".to_string()),
                category: Some("build".to_string()),
                install: true,
                json: true,
                config_path: Some(PathBuf::from("/tmp/showcase.json")),
            }
        );
    }

    #[test]
    fn rejects_unknown_and_incomplete_args() {
        assert!(parse_cli_args(&args(&["--nope"])).is_err());
        assert!(parse_cli_args(&args(&["--query"])).is_err());
    }

    #[test]
    fn progress_bar_fills_proportionally() {
        assert_eq!(progress_bar(0), format!("[{}]   0%", " ".repeat(40)));
        assert_eq!(progress_bar(50), format!("[{}{}]  50%", "#".repeat(20), " ".repeat(20)));
        assert_eq!(progress_bar(100), format!("[{}] 100%", "#".repeat(40)));
    }
}
