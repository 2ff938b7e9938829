//! Demo shell: a tiny trail game driven by the window-stack runtime.

use std::io;
use std::time::Duration;

use clap::Parser;
use indoc::formatdoc;

use term_stack::debug_log::{DebugLogHandle, install_panic_hook, set_global_debug_log};
use term_stack::drivers::{ConsoleInputDriver, ConsoleOutputDriver};
use term_stack::runner::{RunOptions, run_engine};
use term_stack::{
    Engine, EngineConfig, Form, MenuCommand, Requests, Result, Simulation, WindowBehavior,
    WindowCx, WindowFactory, tracing_sub,
};

#[derive(Debug, Parser)]
#[command(name = "term-stack", about = "Trail demo for the term-stack runtime")]
struct Args {
    /// Milliseconds between simulation ticks.
    #[arg(long, default_value_t = 1000)]
    tick_ms: u64,
    /// Milliseconds to wait for input before pulsing the clock.
    #[arg(long, default_value_t = 16)]
    poll_ms: u64,
    /// Show engine logs under the scene.
    #[arg(long)]
    debug_log: bool,
    /// Include trace events in the debug pane.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

const FOOD_PRICE: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Screen {
    MainMenu,
    Travel,
    Store,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Dialog {
    ConfirmQuit,
    Resting,
    Purchase,
}

#[derive(Debug)]
struct Trail {
    day: u64,
    miles: u32,
    food: u32,
    money: u32,
    moving: bool,
    quit: bool,
}

impl Default for Trail {
    fn default() -> Self {
        Self {
            day: 1,
            miles: 0,
            food: 20,
            money: 40,
            moving: false,
            quit: false,
        }
    }
}

impl Simulation for Trail {
    type WindowKey = Screen;
    type FormKey = Dialog;

    fn title(&self) -> Option<String> {
        Some(format!("Trail - day {}", self.day))
    }

    fn on_first_tick(&mut self, requests: &mut Requests<Screen>) {
        requests.add(Screen::MainMenu);
    }

    fn on_tick(&mut self, _tick: u64) {
        if !self.moving {
            return;
        }
        self.day += 1;
        self.miles += 12;
        self.food = self.food.saturating_sub(1);
        if self.food == 0 {
            self.moving = false;
        }
    }
}

type DialogBox<W> = Box<dyn Form<Trail, W>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MainCommand {
    Travel,
    Quit,
}

impl MenuCommand for MainCommand {
    const ALL: &'static [Self] = &[MainCommand::Travel, MainCommand::Quit];

    fn name(&self) -> &'static str {
        match self {
            MainCommand::Travel => "travel",
            MainCommand::Quit => "quit",
        }
    }
}

struct MainMenu;

impl WindowBehavior<Trail> for MainMenu {
    type Command = MainCommand;

    fn create_form(&self, key: Dialog, _sim: &Trail) -> Result<Option<DialogBox<Self>>> {
        Ok(match key {
            Dialog::ConfirmQuit => Some(Box::new(ConfirmQuit)),
            _ => None,
        })
    }

    fn on_window_post_create(cx: &mut WindowCx<'_, Trail, Self>) -> Result<()> {
        cx.add_command(start_travel, MainCommand::Travel, "Travel the trail")?;
        cx.add_command(ask_quit, MainCommand::Quit, "Quit")
    }

    fn menu_header(&self, _sim: &Trail) -> Option<String> {
        Some("You may:".to_string())
    }

    fn menu_footer(&self, _sim: &Trail) -> Option<String> {
        Some("What is your choice?".to_string())
    }
}

fn start_travel(cx: &mut WindowCx<'_, Trail, MainMenu>) -> Result<()> {
    cx.add_window(Screen::Travel);
    Ok(())
}

fn ask_quit(cx: &mut WindowCx<'_, Trail, MainMenu>) -> Result<()> {
    cx.set_form(Dialog::ConfirmQuit);
    Ok(())
}

struct ConfirmQuit;

impl Form<Trail, MainMenu> for ConfirmQuit {
    fn render(&self, _window: &MainMenu, _sim: &Trail) -> String {
        "Are you sure you want to quit? Y/N".to_string()
    }

    fn on_input(&mut self, input: &str, cx: &mut WindowCx<'_, Trail, MainMenu>) -> Result<()> {
        if input.eq_ignore_ascii_case("y") {
            cx.sim.quit = true;
        }
        cx.clear_form();
        Ok(())
    }

    fn input_fills_buffer(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TravelCommand {
    Continue,
    Rest,
    Store,
    Stop,
    MainMenu,
}

impl MenuCommand for TravelCommand {
    const ALL: &'static [Self] = &[
        TravelCommand::Continue,
        TravelCommand::Rest,
        TravelCommand::Store,
        TravelCommand::Stop,
        TravelCommand::MainMenu,
    ];

    fn name(&self) -> &'static str {
        match self {
            TravelCommand::Continue => "continue",
            TravelCommand::Rest => "rest",
            TravelCommand::Store => "store",
            TravelCommand::Stop => "stop",
            TravelCommand::MainMenu => "menu",
        }
    }
}

struct Travel;

impl WindowBehavior<Trail> for Travel {
    type Command = TravelCommand;

    fn create_form(&self, key: Dialog, _sim: &Trail) -> Result<Option<DialogBox<Self>>> {
        Ok(match key {
            Dialog::Resting => Some(Box::new(Resting { days_left: 0 })),
            _ => None,
        })
    }

    fn on_window_post_create(cx: &mut WindowCx<'_, Trail, Self>) -> Result<()> {
        cx.add_command(keep_moving, TravelCommand::Continue, "Continue on the trail")?;
        cx.add_command(stop, TravelCommand::Stop, "Stop to look around")?;
        cx.add_command(rest, TravelCommand::Rest, "Rest for a few days")?;
        cx.add_command(visit_store, TravelCommand::Store, "Visit the store")?;
        cx.add_command(back_to_menu, TravelCommand::MainMenu, "Return to the main menu")
    }

    fn menu_header(&self, sim: &Trail) -> Option<String> {
        let pace = if sim.moving { "moving" } else { "stopped" };
        Some(formatdoc! {"
            Miles traveled: {miles}
            Food: {food} pounds
            Money: ${money}
            Wagon is {pace}.",
            miles = sim.miles,
            food = sim.food,
            money = sim.money,
        })
    }
}

fn keep_moving(cx: &mut WindowCx<'_, Trail, Travel>) -> Result<()> {
    cx.sim.moving = cx.sim.food > 0;
    Ok(())
}

fn stop(cx: &mut WindowCx<'_, Trail, Travel>) -> Result<()> {
    cx.sim.moving = false;
    Ok(())
}

fn rest(cx: &mut WindowCx<'_, Trail, Travel>) -> Result<()> {
    cx.sim.moving = false;
    cx.set_form(Dialog::Resting);
    Ok(())
}

fn visit_store(cx: &mut WindowCx<'_, Trail, Travel>) -> Result<()> {
    cx.sim.moving = false;
    cx.add_window(Screen::Store);
    Ok(())
}

fn back_to_menu(cx: &mut WindowCx<'_, Trail, Travel>) -> Result<()> {
    cx.sim.moving = false;
    cx.remove_next_tick();
    Ok(())
}

struct Resting {
    days_left: u32,
}

impl Form<Trail, Travel> for Resting {
    fn on_form_post_create(&mut self, cx: &mut WindowCx<'_, Trail, Travel>) -> Result<()> {
        self.days_left = cx.sim.food.min(3);
        Ok(())
    }

    fn render(&self, _window: &Travel, sim: &Trail) -> String {
        format!("Resting on day {}... {} days left.", sim.day, self.days_left)
    }

    fn on_tick(
        &mut self,
        is_external_pulse: bool,
        cx: &mut WindowCx<'_, Trail, Travel>,
    ) -> Result<()> {
        if is_external_pulse {
            return Ok(());
        }
        if self.days_left == 0 {
            cx.clear_form();
            return Ok(());
        }
        self.days_left -= 1;
        cx.sim.day += 1;
        cx.sim.food = cx.sim.food.saturating_sub(1);
        Ok(())
    }

    fn accepts_input(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StoreCommand {
    BuyFood,
    Leave,
}

impl MenuCommand for StoreCommand {
    const ALL: &'static [Self] = &[StoreCommand::BuyFood, StoreCommand::Leave];

    fn name(&self) -> &'static str {
        match self {
            StoreCommand::BuyFood => "food",
            StoreCommand::Leave => "leave",
        }
    }
}

#[derive(Default)]
struct Store {
    last_receipt: Option<String>,
}

impl Store {
    fn build_menu(cx: &mut WindowCx<'_, Trail, Self>) -> Result<()> {
        cx.clear_commands();
        if cx.sim.money >= FOOD_PRICE {
            let description = format!("Buy food (${FOOD_PRICE} a pound)");
            cx.add_command(Self::buy_food, StoreCommand::BuyFood, description)?;
        }
        cx.add_command(Self::leave, StoreCommand::Leave, "Leave the store")
    }

    fn buy_food(cx: &mut WindowCx<'_, Trail, Self>) -> Result<()> {
        cx.set_form(Dialog::Purchase);
        Ok(())
    }

    fn leave(cx: &mut WindowCx<'_, Trail, Self>) -> Result<()> {
        cx.remove_next_tick();
        Ok(())
    }
}

impl WindowBehavior<Trail> for Store {
    type Command = StoreCommand;

    fn create_form(&self, key: Dialog, _sim: &Trail) -> Result<Option<DialogBox<Self>>> {
        Ok(match key {
            Dialog::Purchase => Some(Box::new(Purchase)),
            _ => None,
        })
    }

    fn on_window_post_create(cx: &mut WindowCx<'_, Trail, Self>) -> Result<()> {
        Self::build_menu(cx)
    }

    fn menu_header(&self, sim: &Trail) -> Option<String> {
        let mut header = format!("General store. You have ${}.", sim.money);
        if let Some(receipt) = &self.last_receipt {
            header.push('\n');
            header.push_str(receipt);
        }
        Some(header)
    }
}

struct Purchase;

impl Form<Trail, Store> for Purchase {
    fn render(&self, _window: &Store, sim: &Trail) -> String {
        format!(
            "How many pounds of food? You can afford {}.",
            sim.money / FOOD_PRICE
        )
    }

    fn on_input(&mut self, input: &str, cx: &mut WindowCx<'_, Trail, Store>) -> Result<()> {
        let Ok(pounds) = input.parse::<u32>() else {
            return Ok(());
        };
        let cost = pounds.saturating_mul(FOOD_PRICE);
        if cost <= cx.sim.money {
            cx.sim.money -= cost;
            cx.sim.food += pounds;
            cx.window.last_receipt = Some(format!("Bought {pounds} pounds for ${cost}."));
        }
        cx.clear_form();
        Store::build_menu(cx)
    }
}

fn build_factory() -> Result<WindowFactory<Trail>> {
    WindowFactory::new()
        .with(Screen::MainMenu, |_| Ok(MainMenu))?
        .with(Screen::Travel, |_| Ok(Travel))?
        .with(Screen::Store, |_| Ok(Store::default()))
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    let debug_log = args.debug_log.then(|| {
        let handle = DebugLogHandle::default();
        set_global_debug_log(handle.clone());
        install_panic_hook();
        tracing_sub::init(tracing_sub::level_for_verbosity(args.verbose));
        handle
    });

    let factory = build_factory().map_err(io::Error::other)?;
    let config = EngineConfig::new()
        .with_tick_interval(Duration::from_millis(args.tick_ms))
        .with_empty_message("Loading...");
    let mut engine = Engine::new(Trail::default(), factory, config);

    let mut output = ConsoleOutputDriver::new()?.with_title("Trail");
    let options = RunOptions {
        poll_interval: Duration::from_millis(args.poll_ms),
        debug_log,
    };
    run_engine(
        &mut engine,
        ConsoleInputDriver::new(),
        &mut output,
        options,
        |engine| engine.sim().quit,
    )
}
