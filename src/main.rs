use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use quiz_composer::{App, Config, LocalBackend, UserProfile, logger, ui, worker};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> io::Result<()> {
    loop {
        let now = Instant::now();
        app.tick(now);
        terminal.draw(|f| ui::draw(f, app, now))?;

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.handle_key(key);
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn main() -> io::Result<()> {
    let config = Config::from_env();
    logger::init(&config.log_path());
    logger::log(&format!("Starting with data dir {}", config.data_dir.display()));

    let identity = UserProfile {
        username: config.user_name.clone(),
        user_id: config.user_id.clone(),
    };
    let backend = LocalBackend::open(config.db_path(), identity).map_err(|e| {
        io::Error::other(format!(
            "Failed to open database {}: {}",
            config.db_path().display(),
            e
        ))
    })?;
    let (client, _worker) = worker::start(Arc::new(backend))?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, Box::new(client));
    let result = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    logger::log("Exiting");
    result
}
