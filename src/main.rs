use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseEvent,
    MouseEventKind,
};
use crossterm::execute;
use pin_map::app::App;
use pin_map::config::{MapConfig, DEFAULT_LAND_SOURCE, DEFAULT_MARKER_SOURCE};
use pin_map::data::Source;
use pin_map::jitter::{JitterSource, SplitMix};
use pin_map::map::Scene;
use pin_map::{pipeline, svg, ui};
use ratatui::DefaultTerminal;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Duration;

/// World map with animated location pins
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Land topology (TopoJSON), file path or http(s) URL
    #[arg(long, default_value = DEFAULT_LAND_SOURCE)]
    land: String,

    /// Marker features (GeoJSON FeatureCollection), file path or http(s) URL
    #[arg(long, default_value = DEFAULT_MARKER_SOURCE)]
    markers: String,

    /// Write the map as SVG to this file instead of opening the viewer
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Seed for marker jitter; omit for a different scatter every run
    #[arg(long)]
    seed: Option<u64>,

    /// Also draw country boundaries when the topology has a `countries` object
    #[arg(long)]
    boundaries: bool,
}

impl CliArgs {
    fn config(&self) -> MapConfig {
        MapConfig {
            land_source: Source::parse(&self.land),
            marker_source: Source::parse(&self.markers),
            boundaries: self.boundaries,
            ..MapConfig::default()
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = CliArgs::parse();
    let config = args.config();

    let mut jitter: Box<dyn JitterSource> = match args.seed {
        Some(seed) => Box::new(SplitMix::seeded(seed)),
        None => Box::new(SplitMix::from_entropy()),
    };

    // Load failures are logged by the pipeline; nothing is drawn
    let Ok(scene) = pipeline::run(&config, jitter.as_mut()) else {
        std::process::exit(1);
    };

    if let Some(path) = &args.svg {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        let mut out = BufWriter::new(file);
        svg::write_svg(&scene, &mut out)
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!("wrote {}", path.display());
        return Ok(());
    }

    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;

    // Enable mouse capture
    execute!(std::io::stdout(), EnableMouseCapture)?;

    // Run the app
    let result = run(&mut terminal, scene, &config);

    // Disable mouse capture and restore terminal
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

/// Pointer tracking drives hover; everything else is ignored
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(_) => {
            app.pointer_moved(mouse.column, mouse.row);
        }
        _ => {}
    }
}

fn run(terminal: &mut DefaultTerminal, scene: Scene, config: &MapConfig) -> Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(scene, size.width as usize, size.height as usize);

    // Main loop
    loop {
        // Draw
        terminal.draw(|frame| ui::render(frame, &app, config))?;

        // ~60fps while the pins grow, slower once everything is still
        let tick = if app.is_animating() { 16 } else { 100 };
        if event::poll(Duration::from_millis(tick))? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events (not release)
                    if key.kind == KeyEventKind::Press {
                        match key.code {
                            KeyCode::Char('q') | KeyCode::Esc => app.quit(),
                            KeyCode::Char('r') | KeyCode::Char('R') => app.replay(),
                            _ => {}
                        }
                    }
                }
                Event::Mouse(mouse) => {
                    handle_mouse(&mut app, mouse);
                }
                Event::FocusLost => app.pointer_left(),
                Event::Resize(width, height) => {
                    app.resize(width as usize, height as usize);
                }
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
