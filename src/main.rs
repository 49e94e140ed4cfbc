use piccull::cli::{AppConfig, Args};
use piccull::config::UserConfig;
use piccull::App;

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::{io, time::Duration};

fn main() -> io::Result<()> {
    // Parse command line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let config: AppConfig = args.into();
    init_logging(config.log_file.as_deref());

    run_app_with_config(&config)
}

fn default_log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("piccull").join("piccull.log"))
}

/// Sends log output to a file so it never draws over the TUI. Logging stays
/// off when no file can be opened.
fn init_logging(log_file: Option<&Path>) {
    let Some(path) = log_file.map(Path::to_path_buf).or_else(default_log_path) else {
        return;
    };

    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }

    let Ok(file) = File::options().create(true).append(true).open(&path) else {
        return;
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}

/// Runs the TUI application with configuration
pub fn run_app_with_config(config: &AppConfig) -> io::Result<()> {
    let mut app = App::from_config_file(config, UserConfig::config_path());
    let show_welcome = config.show_welcome || !app.config().welcome_shown;
    app.start(config.directory.as_deref(), show_welcome);
    info!("started with view {:?}", app.view());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Print summary after exit
    let stats = app.session().stats();
    if stats.culled > 0 {
        println!(
            "Culled {} of {} images ({} moved, {} deleted)",
            stats.culled, stats.found, stats.moved, stats.deleted
        );
        if let Some(dir) = app.session().culled_dir().filter(|d| d.is_dir()) {
            println!("   Culled images: {}", dir.display());
        }
    }

    result
}

/// Main application loop
fn run_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    while !app.should_quit() {
        terminal.draw(|frame| app.draw(frame))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                // Ignore release and repeat events reported by some terminals
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
    }

    info!("quitting");
    Ok(())
}
