use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use directories::ProjectDirs;
use flashy_reveal::{
    render::{
        frame, frame_size,
        terminal::{TerminalRenderer, WindowSize},
        Palette,
    },
    reveal::visibility::Rect,
    text_flashy_reveal, Color, HostElement, RevealEffect, RevealOptions,
};
use std::{
    fs,
    io::{self, Stdout},
    path::PathBuf,
    time::{Duration, Instant},
};

const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Reveal text in the terminal as you scroll it into view.
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The text to reveal. Inline markup like `<b>` and `<br>` is supported.
    text: Option<String>,

    /// Read the text to reveal from a file.
    #[clap(short, long, conflicts_with = "text")]
    file: Option<PathBuf>,

    /// The path to the configuration file.
    #[clap(short, long, env = "FLASHY_REVEAL_CONFIG")]
    config_file: Option<PathBuf>,

    /// The color characters flash with when they appear.
    #[clap(long)]
    accent_color: Option<String>,

    /// The color characters settle on.
    #[clap(long)]
    final_color: Option<String>,

    /// The intermediate color, derived from the accent color by default.
    #[clap(long)]
    transition_color: Option<String>,

    /// The delay between characters appearing, in milliseconds.
    #[clap(long)]
    reveal_delay: Option<u64>,

    /// How long characters take to fade, in milliseconds.
    #[clap(long)]
    fade_duration: Option<u64>,

    /// How long characters stay in the transition color, in milliseconds.
    #[clap(long)]
    color_delay: Option<u64>,

    /// How long characters stay in the accent color, in milliseconds.
    #[clap(long)]
    flash_delay: Option<u64>,

    /// Only animate the first time the text comes into view.
    #[clap(long)]
    no_replay: bool,

    /// Only flash colors on replays rather than hiding and revealing characters again.
    #[clap(long)]
    no_reveal_on_replay: bool,

    /// The fraction of the text that must be in view for it to count as visible.
    #[clap(long)]
    threshold: Option<f64>,

    /// The background color to paint behind the text.
    #[clap(long, default_value = "#ffffff")]
    background: String,

    /// Print the JSON schema for the configuration file and exit.
    #[cfg(feature = "json-schema")]
    #[clap(long)]
    generate_config_file_schema: bool,
}

impl Cli {
    fn options(&self) -> RevealOptions {
        RevealOptions {
            accent_color: self.accent_color.clone(),
            final_color: self.final_color.clone(),
            transition_color: self.transition_color.clone(),
            reveal_delay: self.reveal_delay,
            fade_duration: self.fade_duration,
            color_delay: self.color_delay,
            flash_delay: self.flash_delay,
            replay: self.no_replay.then_some(false),
            reveal_on_replay: self.no_reveal_on_replay.then_some(false),
            threshold: self.threshold,
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    let dirs = ProjectDirs::from("", "", "flashy-reveal")?;
    Some(dirs.config_dir().join("config.yaml"))
}

fn load_options(cli: &Cli) -> Result<RevealOptions, Box<dyn std::error::Error>> {
    let path = match &cli.config_file {
        Some(path) => Some(path.clone()),
        None => default_config_path().filter(|path| path.exists()),
    };
    let file_options = match path {
        Some(path) => {
            log::debug!("loading config from {}", path.display());
            RevealOptions::load(&path)?
        }
        None => RevealOptions::default(),
    };
    Ok(file_options.merge(cli.options()))
}

fn load_text(cli: &Cli) -> Result<String, Box<dyn std::error::Error>> {
    match (&cli.text, &cli.file) {
        (Some(text), _) => Ok(text.clone()),
        (None, Some(path)) => Ok(fs::read_to_string(path)?),
        (None, None) => {
            Cli::command().error(ErrorKind::MissingRequiredArgument, "either text or a file is required").exit()
        }
    }
}

/// The demo: the text sits in the middle of a page three screens tall that can be scrolled.
struct Demo {
    markup: String,
    options: RevealOptions,
    effect: RevealEffect,
    palette: Palette,
    renderer: TerminalRenderer<Stdout>,
    scroll: i32,
    started: Instant,
}

impl Demo {
    fn new(markup: String, options: RevealOptions, background: Option<Color>) -> Result<Self, Box<dyn std::error::Error>> {
        let effect = Self::start_effect(&markup, &options)?;
        let palette = Palette::new(effect.config(), background);
        Ok(Self {
            markup,
            options,
            effect,
            palette,
            renderer: TerminalRenderer::new(io::stdout(), background),
            scroll: 0,
            started: Instant::now(),
        })
    }

    fn start_effect(markup: &str, options: &RevealOptions) -> Result<RevealEffect, Box<dyn std::error::Error>> {
        let element = HostElement::from_markup(markup)?;
        Ok(text_flashy_reveal(Some(element), options.clone())?)
    }

    fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.renderer.enter()?;
        let result = self.event_loop();
        self.effect.dispose();
        self.renderer.leave()?;
        result
    }

    fn event_loop(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        loop {
            let window = WindowSize::current()?;
            let now = self.started.elapsed();
            let text_top = self.text_top(window);
            let text = frame(self.effect.element(), &self.palette, now);
            let (width, height) = frame_size(&text);

            let element_rect = Rect::new(0.0, text_top as f64, width as f64, height as f64);
            let viewport = Rect::new(0.0, self.scroll as f64, window.columns as f64, window.rows as f64);
            self.effect.observe_viewport(&element_rect, &viewport, now);
            self.effect.poll(now);

            let text = frame(self.effect.element(), &self.palette, now);
            let column = (window.columns as i32 - width as i32) / 2;
            self.renderer.clear()?;
            self.renderer.draw_frame(&text, column.max(0), text_top - self.scroll, window)?;
            let status = format!(
                " scroll {}/{} | {} | arrows scroll, r restarts, q quits ",
                self.scroll,
                self.max_scroll(window),
                self.effect.phase()
            );
            self.renderer.draw_text(&status, 0, window.rows.saturating_sub(1))?;
            self.renderer.flush()?;

            if event::poll(FRAME_INTERVAL)? {
                if let Event::Key(key) = event::read()? {
                    if !self.handle_key(key, window)? {
                        return Ok(());
                    }
                }
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent, window: WindowSize) -> Result<bool, Box<dyn std::error::Error>> {
        if key.kind != KeyEventKind::Press {
            return Ok(true);
        }
        let page = window.rows as i32;
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(false),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return Ok(false),
            KeyCode::Up | KeyCode::Char('k') => self.scroll_by(-1, window),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_by(1, window),
            KeyCode::PageUp => self.scroll_by(-page, window),
            KeyCode::PageDown => self.scroll_by(page, window),
            KeyCode::Home => self.scroll = 0,
            KeyCode::End => self.scroll = self.max_scroll(window),
            KeyCode::Char('r') => {
                self.effect.dispose();
                self.effect = Self::start_effect(&self.markup, &self.options)?;
                self.started = Instant::now();
            }
            _ => (),
        };
        Ok(true)
    }

    fn scroll_by(&mut self, delta: i32, window: WindowSize) {
        self.scroll = (self.scroll + delta).clamp(0, self.max_scroll(window));
    }

    fn page_height(window: WindowSize) -> i32 {
        window.rows as i32 * 3
    }

    fn max_scroll(&self, window: WindowSize) -> i32 {
        Self::page_height(window) - window.rows as i32
    }

    fn text_top(&self, window: WindowSize) -> i32 {
        Self::page_height(window) / 2
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "json-schema")]
    if cli.generate_config_file_schema {
        let schema = schemars::schema_for!(RevealOptions);
        print!("{}", serde_yaml::to_string(&schema)?);
        return Ok(());
    }

    let options = load_options(&cli)?;
    let markup = load_text(&cli)?;
    let background = Color::from_hex(&cli.background)?;
    let mut demo = Demo::new(markup, options, Some(background))?;
    demo.run()
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
