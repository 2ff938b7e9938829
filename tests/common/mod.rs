#![allow(dead_code)]

use term_stack::{
    Engine, EngineConfig, EngineError, Form, MenuCommand, NoCommand, Requests, Result,
    Simulation, WindowBehavior, WindowCx, WindowFactory,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Key {
    Travel,
    Camp,
    Store,
    Missing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FormKey {
    Ledger,
    Receipt,
    Sleeping,
    Confirm,
    Orphan,
    Broken,
}

#[derive(Debug, Default)]
pub struct Game {
    pub log: Vec<String>,
    pub ticks: Vec<u64>,
    pub opening: Vec<Key>,
    pub title: Option<String>,
    /// Makes the camp's tick queue a store window and then fail.
    pub fail_camp_tick: bool,
}

impl Game {
    pub fn count(&self, entry: &str) -> usize {
        self.log.iter().filter(|line| *line == entry).count()
    }

    pub fn record(&mut self, entry: impl Into<String>) {
        self.log.push(entry.into());
    }
}

impl Simulation for Game {
    type WindowKey = Key;
    type FormKey = FormKey;

    fn title(&self) -> Option<String> {
        self.title.clone()
    }

    fn on_first_tick(&mut self, requests: &mut Requests<Key>) {
        for key in &self.opening {
            requests.add(*key);
        }
    }

    fn on_tick(&mut self, tick: u64) {
        self.ticks.push(tick);
    }
}

fn pulse_label(is_external_pulse: bool) -> &'static str {
    if is_external_pulse { "pulse" } else { "sim" }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    GoNorth,
    GoSouth,
    Camp,
}

impl MenuCommand for Heading {
    const ALL: &'static [Self] = &[Heading::GoNorth, Heading::GoSouth, Heading::Camp];

    fn name(&self) -> &'static str {
        match self {
            Heading::GoNorth => "north",
            Heading::GoSouth => "south",
            Heading::Camp => "camp",
        }
    }
}

#[derive(Debug, Default)]
pub struct Travel {
    pub miles: u32,
}

fn go_north(cx: &mut WindowCx<'_, Game, Travel>) -> Result<()> {
    cx.window.miles += 1;
    cx.sim.record("GoNorth");
    Ok(())
}

fn go_south(cx: &mut WindowCx<'_, Game, Travel>) -> Result<()> {
    cx.window.miles += 1;
    cx.sim.record("GoSouth");
    Ok(())
}

fn make_camp(cx: &mut WindowCx<'_, Game, Travel>) -> Result<()> {
    cx.add_window(Key::Camp);
    Ok(())
}

impl WindowBehavior<Game> for Travel {
    type Command = Heading;

    fn create_form(&self, key: FormKey, _sim: &Game) -> Result<Option<Box<dyn Form<Game, Self>>>> {
        Ok(match key {
            FormKey::Ledger => Some(Box::new(Ledger)),
            FormKey::Receipt => Some(Box::new(Receipt)),
            FormKey::Sleeping => Some(Box::new(Sleeping)),
            FormKey::Confirm => Some(Box::new(Confirm)),
            FormKey::Orphan => None,
            FormKey::Broken => return Err(EngineError::construction(key, "ink spilled")),
        })
    }

    fn on_window_post_create(cx: &mut WindowCx<'_, Game, Self>) -> Result<()> {
        cx.sim.record("Travel:post_create");
        cx.add_command(go_north, Heading::GoNorth, "Head north")?;
        cx.add_command(go_south, Heading::GoSouth, "Head south")?;
        cx.add_command(make_camp, Heading::Camp, "Make camp")
    }

    fn on_window_activate(cx: &mut WindowCx<'_, Game, Self>) -> Result<()> {
        cx.sim.record("Travel:activate");
        Ok(())
    }

    fn on_window_added(cx: &mut WindowCx<'_, Game, Self>) -> Result<()> {
        cx.sim.record("Travel:added");
        Ok(())
    }

    fn on_tick(is_external_pulse: bool, cx: &mut WindowCx<'_, Game, Self>) -> Result<()> {
        cx.sim.record(format!("Travel:tick:{}", pulse_label(is_external_pulse)));
        Ok(())
    }

    fn menu_header(&self, _sim: &Game) -> Option<String> {
        Some(format!("Miles: {}", self.miles))
    }

    fn menu_footer(&self, _sim: &Game) -> Option<String> {
        Some("Choose:".to_string())
    }
}

pub struct Ledger;

impl Form<Game, Travel> for Ledger {
    fn on_form_post_create(&mut self, cx: &mut WindowCx<'_, Game, Travel>) -> Result<()> {
        cx.sim.record("Ledger:post_create");
        Ok(())
    }

    fn render(&self, _window: &Travel, _sim: &Game) -> String {
        "Ledger open".to_string()
    }

    fn on_input(&mut self, input: &str, cx: &mut WindowCx<'_, Game, Travel>) -> Result<()> {
        match input {
            "receipt" => cx.set_form(FormKey::Receipt),
            "close" => cx.clear_form(),
            other => cx.sim.record(format!("Ledger:{other}")),
        }
        Ok(())
    }
}

pub struct Receipt;

impl Form<Game, Travel> for Receipt {
    fn render(&self, window: &Travel, _sim: &Game) -> String {
        format!("Receipt for {} miles", window.miles)
    }

    fn on_input(&mut self, input: &str, cx: &mut WindowCx<'_, Game, Travel>) -> Result<()> {
        if input == "close" {
            cx.clear_form();
        }
        Ok(())
    }
}

/// Ignores input and closes itself on the next simulation tick.
pub struct Sleeping;

impl Form<Game, Travel> for Sleeping {
    fn render(&self, _window: &Travel, _sim: &Game) -> String {
        "Zzz".to_string()
    }

    fn on_tick(
        &mut self,
        is_external_pulse: bool,
        cx: &mut WindowCx<'_, Game, Travel>,
    ) -> Result<()> {
        if !is_external_pulse {
            cx.clear_form();
        }
        Ok(())
    }

    fn accepts_input(&self) -> bool {
        false
    }
}

pub struct Confirm;

impl Form<Game, Travel> for Confirm {
    fn render(&self, _window: &Travel, _sim: &Game) -> String {
        "Sure? Y/N".to_string()
    }

    fn on_input(&mut self, input: &str, cx: &mut WindowCx<'_, Game, Travel>) -> Result<()> {
        if input.eq_ignore_ascii_case("y") {
            cx.sim.record("confirmed");
        }
        cx.clear_form();
        Ok(())
    }

    fn input_fills_buffer(&self) -> bool {
        false
    }
}

/// A window with no commands at all.
#[derive(Debug, Default)]
pub struct Camp;

impl WindowBehavior<Game> for Camp {
    type Command = NoCommand;

    fn on_window_post_create(cx: &mut WindowCx<'_, Game, Self>) -> Result<()> {
        cx.sim.record("Camp:post_create");
        Ok(())
    }

    fn on_window_activate(cx: &mut WindowCx<'_, Game, Self>) -> Result<()> {
        cx.sim.record("Camp:activate");
        Ok(())
    }

    fn on_window_added(cx: &mut WindowCx<'_, Game, Self>) -> Result<()> {
        cx.sim.record("Camp:added");
        Ok(())
    }

    fn on_tick(_is_external_pulse: bool, cx: &mut WindowCx<'_, Game, Self>) -> Result<()> {
        if cx.sim.fail_camp_tick {
            cx.add_window(Key::Store);
            // Camp never has a form, so this fails once the hook returns.
            cx.clear_form();
        }
        Ok(())
    }

    fn menu_header(&self, _sim: &Game) -> Option<String> {
        Some("Camping".to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreCommand {
    Leave,
}

impl MenuCommand for StoreCommand {
    const ALL: &'static [Self] = &[StoreCommand::Leave];

    fn name(&self) -> &'static str {
        "leave"
    }
}

#[derive(Debug, Default)]
pub struct Store;

fn leave(cx: &mut WindowCx<'_, Game, Store>) -> Result<()> {
    cx.remove_next_tick();
    Ok(())
}

impl WindowBehavior<Game> for Store {
    type Command = StoreCommand;

    fn on_window_post_create(cx: &mut WindowCx<'_, Game, Self>) -> Result<()> {
        cx.sim.record("Store:post_create");
        cx.add_command(leave, StoreCommand::Leave, "Leave")
    }

    fn on_window_activate(cx: &mut WindowCx<'_, Game, Self>) -> Result<()> {
        cx.sim.record("Store:activate");
        Ok(())
    }

    fn on_window_added(cx: &mut WindowCx<'_, Game, Self>) -> Result<()> {
        cx.sim.record("Store:added");
        Ok(())
    }

    fn on_tick(is_external_pulse: bool, cx: &mut WindowCx<'_, Game, Self>) -> Result<()> {
        cx.sim.record(format!("Store:tick:{}", pulse_label(is_external_pulse)));
        Ok(())
    }
}

pub fn factory() -> WindowFactory<Game> {
    WindowFactory::new()
        .with(Key::Travel, |_| Ok(Travel::default()))
        .and_then(|factory| factory.with(Key::Camp, |_| Ok(Camp)))
        .and_then(|factory| factory.with(Key::Store, |_| Ok(Store)))
        .expect("test windows register cleanly")
}

pub fn engine(game: Game) -> Engine<Game> {
    Engine::new(game, factory(), EngineConfig::default())
}
