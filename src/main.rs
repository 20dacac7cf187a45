mod app;
mod cli;
mod config;
mod error;
mod logic;
mod ml;
mod models;
mod report;
mod ui;

use anyhow::Context;
use app::{App, Focus};
use clap::Parser;
use cli::{Cli, Commands, ReadingArgs};
use config::Config;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use logic::{AdvisoryEngine, Preset};
use ml::IrrigationClassifier;
use models::{Dataset, Reading, Transcript};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use ui::screens::AdvisorScreen;

fn main() {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let tui_mode = cli.command.is_none();
    if tui_mode {
        // Logs to a file so they do not draw over the terminal UI
        let log_path = Config::log_path(cli.data_dir.as_ref())?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("Failed to open log file {}", log_path.display()))?;
        init_logging(cli.verbose, Some(file));
    } else {
        init_logging(cli.verbose, None);
    }

    let data_dir = cli.data_dir.as_ref();
    let load = || load_config(cli.config.clone(), cli.dataset.clone());

    match cli.command {
        Some(Commands::Init) => {
            Config::setup_interactive()?;
            println!("Run `riceintel check` to train the model against your dataset.");
            Ok(())
        }
        Some(Commands::Presets) => print_presets(),
        Some(Commands::Check) => {
            let config = load();
            let (dataset, classifier) = train(&config)?;
            let engine = AdvisoryEngine::new(config.advisory.thresholds()?);
            print_check(&config, &dataset, &classifier, &engine);
            Ok(())
        }
        Some(Commands::Predict { reading, json }) => {
            let reading = parse_reading(&reading)?;
            let (_, classifier) = train(&load())?;
            let verdict = classifier.predict(&reading);
            if json {
                println!("{}", serde_json::to_string_pretty(&verdict)?);
            } else {
                println!("{}", verdict);
            }
            Ok(())
        }
        Some(Commands::Ask { query, reading }) => {
            let reading = match reading.into_required()? {
                Some(args) => Some(parse_reading(&args)?),
                None => None,
            };
            let config = load();
            let (_, classifier) = train(&config)?;
            let engine = AdvisoryEngine::new(config.advisory.thresholds()?);
            let advice = engine.respond(reading.as_ref(), &query, &classifier);
            println!("{} {}", advice.severity.symbol(), advice.message);
            Ok(())
        }
        Some(Commands::Report { reading, output }) => {
            let reading = parse_reading(&reading)?;
            let config = load();
            let (_, classifier) = train(&config)?;
            let engine = AdvisoryEngine::new(config.advisory.thresholds()?);
            let verdict = classifier.predict(&reading);
            let transcript = Transcript::new();
            let input = report::ReportInput {
                snapshot: Some(&reading),
                verdict: Some(&verdict),
                transcript: &transcript,
            };
            let dir = match output {
                Some(dir) => dir,
                None => config.report_dir(data_dir)?,
            };
            let path = report::export(&input, &engine, &classifier, &dir)?;
            println!("Report saved to {}", path.display());
            Ok(())
        }
        None => {
            let config = load();
            eprintln!(
                "Training irrigation model on {}...",
                config.dataset.path.display()
            );
            let (_, classifier) = train(&config)?;
            let report_dir = config.report_dir(data_dir)?;
            let app = App::new(&config, classifier, report_dir)?;
            run_tui(app)
        }
    }
}

/// Load config, applying the `--dataset` override. Exits on a bad config.
fn load_config(config_path: Option<PathBuf>, dataset: Option<PathBuf>) -> Config {
    let mut config = match Config::load(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            eprintln!("Copy config/config.yaml.example to config/config.yaml or run `riceintel init`");
            std::process::exit(1);
        }
    };
    if let Some(path) = dataset {
        config.dataset.path = path;
    }
    config
}

fn init_logging(verbose: u8, log_file: Option<std::fs::File>) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match log_file {
        Some(file) => builder.with_ansi(false).with_writer(Mutex::new(file)).init(),
        None => builder.with_writer(io::stderr).init(),
    }
}

fn train(config: &Config) -> anyhow::Result<(Dataset, IrrigationClassifier)> {
    let path: &PathBuf = &config.dataset.path;
    let dataset = Dataset::from_csv_path(path)
        .with_context(|| format!("Failed to load training data from {}", path.display()))?;
    let classifier =
        IrrigationClassifier::train(&dataset, &config.model).context("Failed to train model")?;
    Ok((dataset, classifier))
}

fn parse_reading(args: &ReadingArgs) -> error::Result<Reading> {
    Reading::parse(&args.temperature, &args.humidity, &args.ph, &args.moisture)
}

fn print_check(
    config: &Config,
    dataset: &Dataset,
    classifier: &IrrigationClassifier,
    engine: &AdvisoryEngine,
) {
    println!("Dataset:   {}", config.dataset.path.display());
    println!("Rows:      {}", dataset.len());
    for (label, count) in dataset.class_counts() {
        println!("  {:<12} {}", label, count);
    }
    println!("Labels:    {}", classifier.labels().join(", "));
    println!(
        "Split:     {} train / {} test",
        classifier.train_rows(),
        classifier.test_rows()
    );
    println!("Accuracy:  {:.2}%", classifier.accuracy() * 100.0);
    println!("Preset:    {}", config.advisory.preset.as_str());
    println!("Rules:");
    for (topic, name) in engine.list_rules() {
        println!("  {:<12} {}", topic.as_str(), name);
    }
}

fn print_presets() -> anyhow::Result<()> {
    for preset in Preset::ALL {
        println!("# {}", preset.as_str());
        println!("{}", serde_yaml::to_string(&preset.table())?);
    }
    Ok(())
}

fn run_tui(mut app: App) -> anyhow::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> anyhow::Result<()> {
    loop {
        terminal.draw(|f| {
            let area = f.area();
            f.render_widget(AdvisorScreen::new(app), area);
        })?;

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                handle_key(app, key);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('c') if ctrl => app.quit(),
        KeyCode::Char('r') if ctrl => export_report(app),
        KeyCode::F(5) => export_report(app),
        KeyCode::Esc => app.quit(),
        KeyCode::Tab => app.focus = app.focus.next(),
        KeyCode::BackTab => app.focus = app.focus.prev(),
        KeyCode::PageUp => app.chat.scroll_up(),
        KeyCode::PageDown => app.chat.scroll_down(),
        KeyCode::Enter => match app.focus {
            Focus::Field(_) => {
                if let Err(e) = app.analyze() {
                    tracing::debug!("Analyze rejected: {}", e);
                }
            }
            Focus::Chat => {
                app.send_chat();
            }
        },
        KeyCode::Backspace => app.delete_char(),
        KeyCode::Char(c) if !ctrl => app.insert_char(c),
        _ => {}
    }
}

fn export_report(app: &mut App) {
    if let Err(e) = app.export_report() {
        tracing::warn!("Report export failed: {}", e);
    }
}
