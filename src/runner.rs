use std::io;
use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::debug_log::DebugLogHandle;
use crate::drivers::{InputDriver, OutputDriver};
use crate::engine::Engine;
use crate::event_loop::{ControlFlow, EventLoop, Pass};
use crate::line_editor::LineEditor;
use crate::simulation::Simulation;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(16);
const DEBUG_LOG_ROWS: u16 = 8;

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub poll_interval: Duration,
    /// Show the tail of this buffer under the scene.
    pub debug_log: Option<DebugLogHandle>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            debug_log: None,
        }
    }
}

fn is_quit_key(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
}

/// Drive `engine` until `should_quit` returns true or the user presses
/// Ctrl+C / Ctrl+Q. The output driver is entered before the first frame and
/// exited on every return path.
pub fn run_engine<S, D, O, FQuit>(
    engine: &mut Engine<S>,
    driver: D,
    output: &mut O,
    options: RunOptions,
    should_quit: FQuit,
) -> io::Result<()>
where
    S: Simulation,
    D: InputDriver,
    O: OutputDriver,
    FQuit: FnMut(&Engine<S>) -> bool,
{
    output.enter()?;
    let result = drive(engine, driver, output, options, should_quit);
    let exited = output.exit();
    result.and(exited)
}

fn drive<S, D, O, FQuit>(
    engine: &mut Engine<S>,
    driver: D,
    output: &mut O,
    options: RunOptions,
    mut should_quit: FQuit,
) -> io::Result<()>
where
    S: Simulation,
    D: InputDriver,
    O: OutputDriver,
    FQuit: FnMut(&Engine<S>) -> bool,
{
    let mut editor = LineEditor::default();
    let mut log_seen = 0u64;
    let mut event_loop = EventLoop::new(driver, options.poll_interval);
    engine.invalidate();

    event_loop.run(|pass| {
        match pass {
            Pass::Pulse => {
                engine.pulse().map_err(io::Error::other)?;
            }
            Pass::Input(Event::Key(key)) if is_quit_key(&key) => {
                return Ok(ControlFlow::Quit);
            }
            Pass::Input(Event::Key(key)) => {
                if engine.accepting_input() {
                    let fills = engine.input_fills_buffer();
                    if let Some(line) = editor.handle_key(&key, fills) {
                        engine.send_input(&line).map_err(io::Error::other)?;
                    }
                } else {
                    editor.clear();
                }
            }
            Pass::Input(Event::Resize(..)) => engine.invalidate(),
            Pass::Input(_) => {}
        }
        if should_quit(engine) {
            return Ok(ControlFlow::Quit);
        }

        let log_revision = options.debug_log.as_ref().map_or(0, |log| log.revision());
        let log_changed = log_revision != log_seen;
        log_seen = log_revision;
        let frame = engine.render(editor.buffer()).map(str::to_owned);
        let frame = match (frame, log_changed) {
            (Some(frame), _) => frame,
            (None, true) => engine.frame(editor.buffer()),
            (None, false) => return Ok(ControlFlow::Continue),
        };
        let log_lines = options
            .debug_log
            .as_ref()
            .map(|log| log.tail(DEBUG_LOG_ROWS.saturating_sub(2) as usize));
        output.draw(|f| draw_scene(f, &frame, log_lines.as_deref()))?;
        Ok(ControlFlow::Continue)
    })
}

fn draw_scene(frame: &mut Frame<'_>, text: &str, log_lines: Option<&[String]>) {
    let area = frame.area();
    let Some(log_lines) = log_lines else {
        frame.render_widget(Paragraph::new(text.to_string()), area);
        return;
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(DEBUG_LOG_ROWS)])
        .split(area);
    frame.render_widget(Paragraph::new(text.to_string()), chunks[0]);
    let log = Paragraph::new(log_lines.join("\n"))
        .block(Block::default().borders(Borders::TOP).title("Debug Log"));
    frame.render_widget(log, chunks[1]);
}
