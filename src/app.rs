//! Presentation controller: turns key presses into session operations and
//! keeps the status line and view state in step with the session.

use crate::cli::AppConfig;
use crate::config::UserConfig;
use crate::domain::{
    CullSession, DeleteMode, DirectoryScanner, FileMover, FsMover, FsScanner, SessionState, Step,
};
use crate::error::{PicCullError, Result};
use crate::file_opener;
use crate::preview::PreviewCache;
use crate::tui::{
    handle_confirm_input, handle_key_event, handle_prompt_input, handle_settings_input,
    render_browser, render_confirm_delete_overlay, render_help_overlay, render_open_prompt,
    render_settings_overlay, render_summary, render_welcome_overlay, KeyAction, KeyTrigger,
    PromptInput, SettingsInput, SettingsState, ViewState,
};
use crossterm::event::{KeyCode, KeyEvent};
use log::{info, warn};
use ratatui::Frame;
use std::path::{Path, PathBuf};

pub const NO_MORE_IMAGES: &str = "No more images in the directory.";
pub const NO_CULLED_DIR: &str = "No culled directory exists.";

/// Opens a folder in the platform file manager
pub type FolderOpener = fn(&Path) -> Result<()>;

pub struct App<S = FsScanner, M = FsMover> {
    session: CullSession,
    scanner: S,
    mover: M,
    delete_mode: DeleteMode,
    preview: PreviewCache,
    config: UserConfig,
    /// Where applied settings are written. `None` keeps them in memory only.
    config_path: Option<PathBuf>,
    /// Why the stored preferences could not be loaded
    config_error: Option<String>,
    confirm_delete: bool,
    opener: FolderOpener,
    view: ViewState,
    status: String,
    prompt: String,
    settings: SettingsState,
    should_quit: bool,
}

impl App<FsScanner, FsMover> {
    /// Builds the app for the real filesystem with the preferences stored at
    /// `config_path`. CLI flags override them for this run only.
    ///
    /// A file that fails to load is left alone: the run uses defaults and
    /// nothing is written back to it.
    pub fn from_config_file(app_config: &AppConfig, config_path: Option<PathBuf>) -> Self {
        let (config, config_path, config_error) = match config_path {
            Some(path) => match UserConfig::load_from(&path) {
                Ok(config) => (config, Some(path), None),
                Err(e) => {
                    warn!("failed to load user config {}: {}", path.display(), e);
                    // The file exists, so this is not a first run
                    let config = UserConfig {
                        welcome_shown: true,
                        ..UserConfig::default()
                    };
                    (config, None, Some(e.to_string()))
                }
            },
            None => (UserConfig::default(), None, None),
        };
        let delete_on_cull = app_config.delete_on_cull || config.delete_on_cull;

        let mut app = App::new(FsScanner, FsMover::new(app_config.delete_mode), config)
            .with_config_path(config_path);
        app.config_error = config_error;
        app.delete_mode = app_config.delete_mode;
        app.confirm_delete = !app_config.skip_confirm;
        app.session.set_delete_on_cull(delete_on_cull);
        app
    }
}

impl<S, M> App<S, M>
where
    S: DirectoryScanner,
    M: FileMover,
{
    pub fn new(scanner: S, mover: M, config: UserConfig) -> Self {
        let settings = SettingsState::new(config.keybindings.clone(), config.delete_on_cull);

        Self {
            session: CullSession::new(config.delete_on_cull),
            scanner,
            mover,
            delete_mode: DeleteMode::Permanent,
            preview: PreviewCache::default(),
            config,
            config_path: None,
            config_error: None,
            confirm_delete: true,
            opener: file_opener::open_folder,
            view: ViewState::Browsing,
            status: PicCullError::NoDirectorySelected.to_string(),
            prompt: String::new(),
            settings,
            should_quit: false,
        }
    }

    pub fn with_config_path(mut self, path: Option<PathBuf>) -> Self {
        self.config_path = path;
        self
    }

    pub fn with_opener(mut self, opener: FolderOpener) -> Self {
        self.opener = opener;
        self
    }

    pub fn with_confirm_delete(mut self, confirm: bool) -> Self {
        self.confirm_delete = confirm;
        self
    }

    /// Loads the initial directory, if any, and picks the first view.
    pub fn start(&mut self, directory: Option<&Path>, show_welcome: bool) {
        if let Some(dir) = directory {
            self.open_directory(dir);
        }

        self.view = if show_welcome {
            ViewState::Welcome
        } else {
            self.idle_view()
        };

        if let Some(e) = &self.config_error {
            self.status = format!("{}. Settings will not be saved.", e);
        }
    }

    pub fn session(&self) -> &CullSession {
        &self.session
    }

    pub fn config(&self) -> &UserConfig {
        &self.config
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn settings(&self) -> &SettingsState {
        &self.settings
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Replaces the session's images with those of `directory`.
    pub fn open_directory(&mut self, directory: &Path) {
        self.preview.clear();

        match self.session.open(directory, &self.scanner) {
            Ok(_) => self.refresh_status("Loaded directory"),
            Err(e) => self.status = e.to_string(),
        }
    }

    /// Routes a key press to the handler of the current view
    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.view {
            ViewState::Welcome => self.dismiss_welcome(),
            ViewState::Help => self.view = ViewState::Browsing,
            ViewState::Summary => self.should_quit = true,
            ViewState::ConfirmDelete => match handle_confirm_input(key) {
                KeyAction::ConfirmDelete => {
                    self.view = ViewState::Browsing;
                    self.perform_cull();
                }
                KeyAction::CancelDelete => self.view = ViewState::Browsing,
                _ => {}
            },
            ViewState::OpenPrompt => self.handle_prompt_key(key),
            ViewState::Settings => self.handle_settings_key(key),
            ViewState::Browsing => {
                let action = handle_key_event(key, &self.config.keybindings);
                self.handle_action(action);
            }
        }
    }

    pub fn handle_action(&mut self, action: KeyAction) {
        match action {
            KeyAction::Quit => self.request_quit(),
            KeyAction::Previous => self.navigate(Step::Back),
            KeyAction::Next => self.navigate(Step::Forward),
            KeyAction::Cull => self.cull(),
            KeyAction::OpenDirectory => {
                self.prompt = self
                    .session
                    .source_dir()
                    .map(|dir| dir.display().to_string())
                    .unwrap_or_default();
                self.view = ViewState::OpenPrompt;
            }
            KeyAction::OpenCulled => self.open_culled_folder(),
            KeyAction::Settings => {
                self.settings = SettingsState::new(
                    self.config.keybindings.clone(),
                    self.session.delete_on_cull(),
                );
                self.view = ViewState::Settings;
            }
            KeyAction::Help => self.view = ViewState::Help,
            // Only meaningful inside the confirm dialog
            KeyAction::ConfirmDelete | KeyAction::CancelDelete => {}
            KeyAction::None => {}
        }
    }

    /// Draws the main view and the overlay for the current view state
    pub fn draw(&mut self, frame: &mut Frame) {
        render_browser(
            frame,
            &self.session,
            &self.status,
            &self.config.keybindings,
            &mut self.preview,
        );

        match self.view {
            ViewState::Browsing => {}
            ViewState::Help => render_help_overlay(frame, &self.config.keybindings),
            ViewState::Settings => render_settings_overlay(frame, &self.settings),
            ViewState::OpenPrompt => render_open_prompt(frame, &self.prompt),
            ViewState::ConfirmDelete => {
                if let Some(path) = self.session.current() {
                    render_confirm_delete_overlay(frame, path);
                }
            }
            ViewState::Welcome => render_welcome_overlay(frame, &self.config.keybindings),
            ViewState::Summary => render_summary(frame, &self.session.stats()),
        }
    }

    fn idle_view(&self) -> ViewState {
        if self.session.state() == SessionState::Empty {
            ViewState::OpenPrompt
        } else {
            ViewState::Browsing
        }
    }

    fn dismiss_welcome(&mut self) {
        self.view = self.idle_view();

        if !self.config.welcome_shown {
            self.config.welcome_shown = true;
            if let Err(e) = self.save_config() {
                warn!("failed to save user config: {}", e);
            }
        }
    }

    fn request_quit(&mut self) {
        if self.session.stats().culled > 0 {
            self.view = ViewState::Summary;
        } else {
            self.should_quit = true;
        }
    }

    fn navigate(&mut self, step: Step) {
        if self.session.state() == SessionState::Empty {
            self.status = PicCullError::NoDirectorySelected.to_string();
            return;
        }

        if self.session.advance(step) {
            self.refresh_status("Directory");
        }
    }

    fn cull(&mut self) {
        match self.session.state() {
            SessionState::Empty => {
                self.status = PicCullError::NoDirectorySelected.to_string();
            }
            SessionState::Exhausted => self.status = NO_MORE_IMAGES.to_string(),
            SessionState::Browsing => {
                let permanent =
                    self.session.delete_on_cull() && self.delete_mode == DeleteMode::Permanent;
                if permanent && self.confirm_delete {
                    self.view = ViewState::ConfirmDelete;
                } else {
                    self.perform_cull();
                }
            }
        }
    }

    fn perform_cull(&mut self) {
        match self.session.cull(&mut self.mover) {
            Ok(outcome) => {
                self.preview.invalidate(&outcome.path);
                self.refresh_status("Directory");
            }
            Err(e) => self.status = e.to_string(),
        }
    }

    fn open_culled_folder(&mut self) {
        let Some(dir) = self.session.culled_dir().filter(|d| d.is_dir()) else {
            self.status = NO_CULLED_DIR.to_string();
            return;
        };

        match (self.opener)(dir) {
            Ok(()) => self.status = format!("Opened {}", dir.display()),
            Err(e) => {
                warn!("failed to open {}: {}", dir.display(), e);
                self.status = e.to_string();
            }
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        match handle_prompt_input(key) {
            PromptInput::Insert(c) => self.prompt.push(c),
            PromptInput::Backspace => {
                self.prompt.pop();
            }
            PromptInput::Clear => self.prompt.clear(),
            PromptInput::Submit => self.submit_prompt(),
            PromptInput::Cancel => self.view = ViewState::Browsing,
            PromptInput::None => {}
        }
    }

    fn submit_prompt(&mut self) {
        self.view = ViewState::Browsing;

        let input = self.prompt.trim();
        if input.is_empty() {
            self.status = PicCullError::NoDirectorySelected.to_string();
            return;
        }

        let directory = expand_home(input);
        if !directory.is_dir() {
            self.status = PicCullError::InvalidDirectory(directory).to_string();
            return;
        }

        self.open_directory(&directory);
    }

    fn handle_settings_key(&mut self, key: KeyEvent) {
        if self.settings.capturing {
            if key.code == KeyCode::Esc {
                self.settings.cancel_capture();
            } else {
                let trigger = KeyTrigger::from_event(key);
                let action = self.settings.selected_action();
                match (self.settings.capture(trigger), action) {
                    (Ok(()), Some(action)) => {
                        self.status = format!("{} bound to {}", action.label(), trigger)
                    }
                    (Ok(()), None) => {}
                    (Err(e), _) => self.status = e.to_string(),
                }
            }
            return;
        }

        match handle_settings_input(key) {
            SettingsInput::Up => self.settings.select_previous(),
            SettingsInput::Down => self.settings.select_next(),
            SettingsInput::Select => self.settings.activate(),
            SettingsInput::ToggleDelete => self.settings.toggle_delete(),
            SettingsInput::Apply => self.apply_settings(),
            SettingsInput::Cancel => self.view = ViewState::Browsing,
            SettingsInput::None => {}
        }
    }

    fn apply_settings(&mut self) {
        self.view = ViewState::Browsing;

        self.config.keybindings = self.settings.bindings.clone();
        self.config.delete_on_cull = self.settings.delete_on_cull;
        self.session.set_delete_on_cull(self.settings.delete_on_cull);
        info!(
            "applied settings: previous={} next={} cull={} delete_on_cull={}",
            self.config.keybindings.previous,
            self.config.keybindings.next,
            self.config.keybindings.cull,
            self.config.delete_on_cull
        );

        self.status = match self.save_config() {
            Ok(()) if self.config_path.is_none() => "Settings applied.".to_string(),
            Ok(()) => "Settings saved.".to_string(),
            Err(e) => {
                warn!("failed to save user config: {}", e);
                e.to_string()
            }
        };
    }

    fn save_config(&self) -> Result<()> {
        match &self.config_path {
            Some(path) => self.config.save_to(path),
            None => Ok(()),
        }
    }

    /// Sets the status line for the session's current position and reports
    /// an image that cannot be decoded.
    fn refresh_status(&mut self, prefix: &str) {
        let Some(path) = self.session.current().map(Path::to_path_buf) else {
            self.status = NO_MORE_IMAGES.to_string();
            return;
        };

        if let Err(e) = self.preview.check(&path) {
            self.status = e.to_string();
            return;
        }

        let dir = self
            .session
            .source_dir()
            .map(|d| d.display().to_string())
            .unwrap_or_default();
        self.status = format!(
            "{}: {}. Image {}/{}",
            prefix,
            dir,
            self.session.index() + 1,
            self.session.len()
        );
    }
}

/// Expands a leading `~` to the home directory
fn expand_home(input: &str) -> PathBuf {
    if input == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    if let Some(rest) = input.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(input)
}
