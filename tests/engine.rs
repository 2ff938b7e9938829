mod common;

use std::collections::VecDeque;
use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use indoc::indoc;
use ratatui::backend::TestBackend;
use ratatui::{Frame, Terminal};
use term_stack::drivers::{InputDriver, OutputDriver};
use term_stack::runner::{RunOptions, run_engine};
use term_stack::{Clock, Engine, EngineConfig};

use common::{FormKey, Game, Key, Travel, engine, factory};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn clocked_engine(game: Game, start: Instant) -> Engine<Game> {
    let config = EngineConfig::default();
    let clock = Clock::starting_at(config.tick_interval, start);
    Engine::with_clock(game, factory(), config, clock)
}

#[test]
fn first_tick_opens_the_root_window() {
    let start = Instant::now();
    let game = Game {
        opening: vec![Key::Travel],
        ..Game::default()
    };
    let mut engine = clocked_engine(game, start);

    let pulse = engine.pulse_at(start).unwrap();
    assert!(!pulse.is_tick());
    assert!(engine.windows().is_empty());

    let pulse = engine.pulse_at(start + ms(1500)).unwrap();
    assert_eq!(pulse.tick, Some(1));
    assert!(pulse.first_tick);
    assert_eq!(engine.windows().focus(), Some(Key::Travel));
    assert_eq!(engine.sim().ticks, vec![1]);
    assert_eq!(
        engine.sim().log,
        vec!["Travel:post_create", "Travel:tick:sim"]
    );

    let pulse = engine.pulse_at(start + ms(1600)).unwrap();
    assert!(!pulse.is_tick());
    assert_eq!(engine.sim().count("Travel:tick:pulse"), 1);

    // Exactly one cadence later is not enough.
    assert!(!engine.pulse_at(start + ms(2500)).unwrap().is_tick());

    let pulse = engine.pulse_at(start + ms(2501)).unwrap();
    assert_eq!(pulse.tick, Some(2));
    assert!(!pulse.first_tick);
    assert_eq!(engine.sim().ticks, vec![1, 2]);
    assert_eq!(engine.windows().window_factory().attach_count(Key::Travel), 1);
}

#[test]
fn frame_is_emitted_only_when_it_changes() {
    let start = Instant::now();
    let game = Game {
        opening: vec![Key::Travel],
        title: Some("Trail".to_string()),
        ..Game::default()
    };
    let mut engine = clocked_engine(game, start);
    assert_eq!(engine.frame(""), "Trail |\n\nNo windows");

    engine.pulse_at(start + ms(1001)).unwrap();
    let expected = indoc! {"
        Trail /

        Miles: 0

        1. Head north
        2. Head south
        3. Make camp

        Choose:

        > 1"};
    assert_eq!(engine.render("1"), Some(expected));
    assert_eq!(engine.render("1"), None);

    engine.pulse_at(start + ms(1100)).unwrap();
    assert_eq!(engine.render("1"), None);

    assert!(engine.render("12").is_some_and(|frame| frame.ends_with("> 12")));

    engine.invalidate();
    assert!(engine.render("12").is_some());
}

#[test]
fn prompt_is_hidden_while_input_is_refused() {
    let mut engine = engine(Game::default());
    engine.add_window(Key::Travel).unwrap();
    engine.set_form(FormKey::Sleeping).unwrap();

    assert!(!engine.accepting_input());
    assert_eq!(engine.frame("typed"), "Zzz");
}

#[test]
fn engine_routes_input_and_forms_to_focus() {
    let mut engine = engine(Game::default());
    engine.add_window(Key::Travel).unwrap();

    engine.send_input("2").unwrap();
    assert_eq!(engine.sim().count("GoSouth"), 1);

    engine.set_form(FormKey::Ledger).unwrap();
    engine.send_input("note").unwrap();
    assert_eq!(engine.sim().count("Ledger:note"), 1);
    engine.clear_form().unwrap();

    assert!(engine.remove_next_tick(Key::Travel));
    engine.pulse().unwrap();
    assert!(engine.windows().is_empty());

    engine.add_window(Key::Store).unwrap();
    engine.clear_windows();
    assert!(engine.windows().is_empty());
    assert_eq!(engine.into_sim().count("Store:post_create"), 1);
}

struct Script(VecDeque<Event>);

impl Script {
    fn keys(codes: impl IntoIterator<Item = KeyEvent>) -> Self {
        Self(codes.into_iter().map(Event::Key).collect())
    }
}

impl InputDriver for Script {
    fn poll(&mut self, _timeout: Duration) -> io::Result<bool> {
        Ok(!self.0.is_empty())
    }

    fn read(&mut self) -> io::Result<Event> {
        self.0
            .pop_front()
            .ok_or_else(|| io::Error::other("script exhausted"))
    }
}

struct Screen {
    terminal: Terminal<TestBackend>,
    entered: usize,
    exited: usize,
}

impl Screen {
    fn new() -> Self {
        Self {
            terminal: Terminal::new(TestBackend::new(30, 12)).unwrap(),
            entered: 0,
            exited: 0,
        }
    }

    fn row(&self, y: u16) -> String {
        let buffer = self.terminal.backend().buffer();
        (0..buffer.area.width)
            .map(|x| buffer[(x, y)].symbol().to_string())
            .collect::<String>()
            .trim_end()
            .to_string()
    }
}

impl OutputDriver for Screen {
    fn enter(&mut self) -> io::Result<()> {
        self.entered += 1;
        Ok(())
    }

    fn exit(&mut self) -> io::Result<()> {
        self.exited += 1;
        Ok(())
    }

    fn draw<F>(&mut self, f: F) -> io::Result<()>
    where
        F: FnOnce(&mut Frame<'_>),
    {
        self.terminal
            .draw(f)
            .map(|_| ())
            .map_err(|err| io::Error::other(err.to_string()))
    }
}

fn press(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

#[test]
fn runner_feeds_typed_lines_until_quit_key() {
    let mut engine = engine(Game::default());
    engine.add_window(Key::Travel).unwrap();
    let mut screen = Screen::new();
    let script = Script::keys([
        press(KeyCode::Char('2')),
        press(KeyCode::Enter),
        KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL),
    ]);
    let options = RunOptions {
        poll_interval: Duration::ZERO,
        debug_log: None,
    };

    run_engine(&mut engine, script, &mut screen, options, |_| false).unwrap();

    assert_eq!(engine.sim().count("GoSouth"), 1);
    assert_eq!(
        engine.windows().window::<Travel>(Key::Travel).unwrap().behavior().miles,
        1
    );
    assert_eq!((screen.entered, screen.exited), (1, 1));
    assert_eq!(screen.row(0), "Miles: 1");
}

#[test]
fn runner_stops_when_the_game_asks() {
    let mut engine = engine(Game::default());
    engine.add_window(Key::Travel).unwrap();
    engine.set_form(FormKey::Confirm).unwrap();
    let mut screen = Screen::new();
    let options = RunOptions {
        poll_interval: Duration::ZERO,
        debug_log: None,
    };

    run_engine(
        &mut engine,
        Script::keys([press(KeyCode::Char('y'))]),
        &mut screen,
        options,
        |engine| engine.sim().count("confirmed") > 0,
    )
    .unwrap();

    assert_eq!(screen.exited, 1);
    assert!(!engine.windows().window::<Travel>(Key::Travel).unwrap().has_form());
}
