//! REELPICK - slot machine game picker for the terminal
//!
//! Three provider carousels, one big spin button.

mod audio;
mod catalog;
mod column;
mod feedback;
mod render;
mod ring;
mod sampler;
mod settings;
mod spin;
mod ui;

use audio::{AudioFeedback, AudioManager};
use catalog::{Catalog, GamePool, Provider};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton, MouseEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use render::FrameStore;
use ring::RingPosition;
use sampler::Sampler;
use settings::Settings;
use spin::SpinCoordinator;
use std::{
    io::{self, stdout},
    path::PathBuf,
    time::{Duration, Instant},
};

/// Target frame rate
const TARGET_FPS: u64 = 60;
const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / TARGET_FPS);

/// How long the jackpot banner stays up after a cycle completes
const CELEBRATE_DURATION: Duration = Duration::from_millis(2500);

/// Everything the frame loop owns
struct App {
    coordinator: SpinCoordinator,
    store: FrameStore,
    sampler: Sampler,
    pools: GamePool,
    feedback: AudioFeedback,
    title: String,
    spin_label: String,
    play_link: Option<String>,
    selected: Provider,
    celebrate_until: Option<Instant>,
}

impl App {
    fn new(catalog: Catalog, settings: &Settings, feedback: AudioFeedback) -> Self {
        let pools = GamePool::new(&catalog.games);
        let mut coordinator = SpinCoordinator::new();
        let mut store = FrameStore::new();
        let mut sampler = Sampler::new();
        coordinator.populate_all(&pools, &mut sampler, &mut store);

        // Catalog site settings win over the local config
        let title = catalog
            .site
            .title
            .or_else(|| settings.site.title.clone())
            .unwrap_or_else(|| "REELPICK".to_string());
        let spin_label = catalog
            .site
            .random_btn_text
            .or_else(|| settings.site.spin_button.clone())
            .unwrap_or_else(|| "Spin".to_string());
        let play_link = catalog.site.contact_link.or_else(|| settings.site.play_link.clone());

        Self {
            coordinator,
            store,
            sampler,
            pools,
            feedback,
            title,
            spin_label,
            play_link,
            selected: Provider::Jili,
            celebrate_until: None,
        }
    }

    /// Poll the spin engine forward to `now`
    fn update(&mut self, now: Instant) {
        let completed = self.coordinator.update(
            now,
            &self.pools,
            &mut self.sampler,
            &mut self.store,
            &mut self.feedback,
        );
        if completed {
            self.celebrate_until = Some(now + CELEBRATE_DURATION);
        }
        if let Some(until) = self.celebrate_until {
            if now >= until {
                self.celebrate_until = None;
            }
        }
    }

    fn request_spin(&mut self, now: Instant) {
        self.celebrate_until = None;
        self.coordinator
            .request_spin(now, &self.pools, &mut self.sampler, &mut self.store);
    }

    fn toggle_lock(&mut self, provider: Provider) {
        self.coordinator.toggle_lock(provider, &mut self.feedback);
    }

    fn click(&mut self, provider: Provider, position: RingPosition) {
        self.coordinator.handle_click(provider, position, &mut self.store);
    }

    fn select_next_column(&mut self) {
        let next = (self.selected.index() + 1) % Provider::all().len();
        self.selected = Provider::all()[next];
    }

    fn adjust_volume(&mut self, delta: f32) {
        if let Some(audio) = self.feedback.audio_mut() {
            let volume = (audio.sfx_volume() + delta).clamp(0.0, 1.0);
            audio.set_sfx_volume(volume);
        }
    }

    fn view(&self) -> ui::View<'_> {
        ui::View {
            coordinator: &self.coordinator,
            store: &self.store,
            title: &self.title,
            spin_label: &self.spin_label,
            play_link: self.play_link.as_deref(),
            selected: self.selected,
            celebrating: self.celebrate_until.is_some(),
        }
    }
}

/// Get the reelpick temp directory, creating it if needed
fn reelpick_temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join("reelpick");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

fn main() -> io::Result<()> {
    // Generate session ID for this instance
    let session_id: u32 = rand::random();

    // Setup tracing to a log file in the temp dir
    let log_dir = reelpick_temp_dir();
    let log_file = format!("{:08x}.log", session_id);
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("reelpick=debug".parse().unwrap()),
        )
        .with_ansi(false)
        .init();

    tracing::info!(
        "REELPICK starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    // Load settings; a catalog path on the command line wins
    let mut settings = Settings::load();
    let catalog_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| settings.catalog.path.clone());
    let catalog = Catalog::load(&PathBuf::from(&catalog_path));
    if catalog.games.is_empty() {
        tracing::warn!("No games loaded from {}; spins will be no-ops", catalog_path);
    }

    // Initialize audio (optional - the picker works without it)
    let mut audio = AudioManager::new();
    if let Some(ref mut a) = audio {
        a.set_sfx_volume(settings.audio.sfx_volume as f32 / 100.0);
    } else {
        tracing::warn!("Audio unavailable, running silent");
    }

    let mut app = App::new(catalog, &settings, AudioFeedback::new(audio));

    // Setup terminal
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen, DisableMouseCapture)?;

    // Persist the volume the session ended with
    if let Some(audio) = app.feedback.audio_mut() {
        settings.audio.sfx_volume = (audio.sfx_volume() * 100.0).round() as u32;
    }
    if let Err(e) = settings.save() {
        eprintln!("Warning: Could not save settings: {}", e);
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        let now = Instant::now();
        app.update(now);

        terminal.draw(|frame| ui::render(frame, &app.view()))?;

        if !event::poll(FRAME_DURATION)? {
            continue;
        }

        match event::read()? {
            Event::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char(' ') | KeyCode::Enter => app.request_spin(Instant::now()),
                    KeyCode::Char('1') => app.toggle_lock(Provider::Jili),
                    KeyCode::Char('2') => app.toggle_lock(Provider::PgSoft),
                    KeyCode::Char('3') => app.toggle_lock(Provider::PpSlot),
                    KeyCode::Tab => app.select_next_column(),
                    // Rotating left pulls the right card into the active
                    // spot, so the arrow keys act as clicks on the
                    // opposite side card
                    KeyCode::Left => app.click(app.selected, RingPosition::Right),
                    KeyCode::Right => app.click(app.selected, RingPosition::Left),
                    KeyCode::Char('+') | KeyCode::Char('=') => app.adjust_volume(0.05),
                    KeyCode::Char('-') => app.adjust_volume(-0.05),
                    _ => {}
                }
            }
            Event::Mouse(mouse) => {
                if mouse.kind == MouseEventKind::Down(MouseButton::Left) {
                    let size = terminal.size()?;
                    let area = Rect::new(0, 0, size.width, size.height);
                    if let Some((provider, position)) = ui::hit_test(area, mouse.column, mouse.row) {
                        app.click(provider, position);
                    }
                }
            }
            _ => {}
        }
    }

    tracing::info!("REELPICK shutting down");
    Ok(())
}
