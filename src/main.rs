//! Weather lookup TUI - current conditions by city or location

use std::cell::RefCell;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Mutex;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend, layout::Rect};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext,
};
use tui_dispatch_components::centered_rect;
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};
use weather_lookup::action::Action;
use weather_lookup::api::DEFAULT_BASE_URL;
use weather_lookup::components::{
    Component, SearchOverlay, SearchOverlayProps, WeatherDisplay, WeatherDisplayProps,
};
use weather_lookup::config::{self, Config, DEFAULT_TIMEOUT_SECS};
use weather_lookup::effect::Effect;
use weather_lookup::geo::DEFAULT_IP_LOCATE_URL;
use weather_lookup::reducer::reducer;
use weather_lookup::services::Services;
use weather_lookup::state::{AppState, LOADING_ANIM_TICK_MS, Unit};

/// Weather lookup TUI
#[derive(Parser, Debug)]
#[command(name = "weather-lookup")]
#[command(about = "Current weather by city name or by your location")]
struct Args {
    /// City to look up on startup
    #[arg(long, short)]
    city: Option<String>,

    /// OpenWeather API key
    #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Current-weather endpoint
    #[arg(long, env = "WEATHER_LOOKUP_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Initial unit system
    #[arg(long, short, value_enum, default_value_t = Unit::Metric)]
    units: Unit,

    /// Where recent searches are kept
    #[arg(long, env = "WEATHER_LOOKUP_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Fixed latitude for "my location" (requires --lon)
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Fixed longitude for "my location" (requires --lat)
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lon: Option<f64>,

    /// Disable location lookup
    #[arg(long)]
    no_geolocation: bool,

    /// HTTP timeout in seconds (minimum 1)
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: u64,

    /// Write logs to this file (filter with RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum WeatherComponentId {
    Display,
    Search,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum WeatherContext {
    Main,
    Search,
}

impl EventRoutingState<WeatherComponentId, WeatherContext> for AppState {
    fn focused(&self) -> Option<WeatherComponentId> {
        if self.search_mode {
            Some(WeatherComponentId::Search)
        } else {
            Some(WeatherComponentId::Display)
        }
    }

    fn modal(&self) -> Option<WeatherComponentId> {
        if self.search_mode {
            Some(WeatherComponentId::Search)
        } else {
            None
        }
    }

    fn binding_context(&self, id: WeatherComponentId) -> WeatherContext {
        match id {
            WeatherComponentId::Display => WeatherContext::Main,
            WeatherComponentId::Search => WeatherContext::Search,
        }
    }

    fn default_context(&self) -> WeatherContext {
        WeatherContext::Main
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        city,
        api_key,
        base_url,
        units,
        data_dir,
        lat,
        lon,
        no_geolocation,
        timeout_secs,
        log_file,
        debug: debug_args,
    } = Args::parse();

    if let Some(path) = &log_file {
        init_logging(path)?;
    }

    let config = Config {
        api_key,
        base_url,
        unit: units,
        data_dir: config::resolve_data_dir(data_dir),
        locator: config::locator_config(no_geolocation, lat.zip(lon), DEFAULT_IP_LOCATE_URL),
        timeout: Duration::from_secs(timeout_secs),
    };
    let services = match Services::from_config(&config) {
        Ok(services) => services,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    tracing::info!(
        base_url = %config.base_url,
        data_dir = %config.data_dir.display(),
        unit = config.unit.as_param(),
        "starting weather lookup"
    );

    let debug = DebugSession::new(debug_args);

    // Export JSON schemas if requested
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let store_handle = services.store().clone();
    let state = debug
        .load_state_or_else_async(move || async move {
            let recent = store_handle.load_or_default().await;
            Ok::<AppState, io::Error>(AppState::new(recent, units))
        })
        .await
        .map_err(debug_error)?;

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(
        &mut terminal,
        &debug,
        store,
        services,
        city.map(Action::SearchCity),
        replay_actions,
    )
    .await;

    // ===== Cleanup =====
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug
        .save_actions(action_recorder.as_ref())
        .map_err(debug_error)?;

    Ok(())
}

/// File-only subscriber: stdout and stderr belong to the terminal UI.
fn init_logging(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weather_lookup=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

struct WeatherUi {
    display: WeatherDisplay,
    search: SearchOverlay,
}

impl WeatherUi {
    fn new() -> Self {
        Self {
            display: WeatherDisplay::new(),
            search: SearchOverlay::new(),
        }
    }

    fn search_props(state: &AppState, is_focused: bool) -> SearchOverlayProps<'_> {
        SearchOverlayProps {
            query: &state.query,
            is_focused,
            is_loading: state.is_loading(),
            on_query_change: Action::SearchQueryChange,
            on_query_submit: |_| Action::SearchSubmit,
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<WeatherComponentId>,
    ) {
        event_ctx.set_component_area(WeatherComponentId::Display, area);

        let props = WeatherDisplayProps {
            state,
            is_focused: render_ctx.is_focused() && !state.search_mode,
        };
        self.display.render(frame, area, props);

        self.search.set_open(state.search_mode);
        if state.search_mode {
            let modal_area = centered_rect(60, 7, area);
            event_ctx.set_component_area(WeatherComponentId::Search, modal_area);
            let props = Self::search_props(state, render_ctx.is_focused());
            self.search.render(frame, area, props);
        } else {
            event_ctx
                .component_areas
                .remove(&WeatherComponentId::Search);
        }
    }

    fn handle_display_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = WeatherDisplayProps {
            state,
            is_focused: true,
        };
        let actions: Vec<_> = self
            .display
            .handle_event(event, props)
            .into_iter()
            .collect();
        if actions.is_empty() {
            HandlerResponse::ignored()
        } else {
            HandlerResponse {
                actions,
                consumed: true,
                needs_render: false,
            }
        }
    }

    fn handle_search_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        self.search.set_open(state.search_mode);
        let props = Self::search_props(state, true);
        let actions: Vec<_> = self.search.handle_event(event, props).into_iter().collect();
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    services: Services,
    initial_action: Option<Action>,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(WeatherUi::new()));
    let mut bus: EventBus<AppState, Action, WeatherComponentId, WeatherContext> = EventBus::new();
    let keybindings: Keybindings<WeatherContext> = Keybindings::new();

    let ui_display = Rc::clone(&ui);
    bus.register(WeatherComponentId::Display, move |event, state| {
        ui_display
            .borrow_mut()
            .handle_display_event(&event.kind, state)
    });

    let ui_search = Rc::clone(&ui);
    bus.register(WeatherComponentId::Search, move |event, state| {
        ui_search
            .borrow_mut()
            .handle_search_event(&event.kind, state)
    });

    // Re-render on terminal resize (no action needed, just redraw)
    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(_, _) => HandlerResponse::ignored().with_render(),
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            initial_action,
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }

                runtime.subscriptions().interval(
                    "tick",
                    Duration::from_millis(LOADING_ANIM_TICK_MS),
                    || Action::Tick,
                );
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            move |effect, ctx| handle_effect(&services, effect, ctx),
        )
        .await
}

/// Handle effects by spawning tasks. Lookups share one task key so a newer
/// lookup replaces the one in flight.
fn handle_effect(services: &Services, effect: Effect, ctx: &mut EffectContext<Action>) {
    match effect {
        Effect::FetchWeather { seq, target, unit } => {
            let services = services.clone();
            ctx.tasks().spawn("lookup", async move {
                services.fetch_weather(seq, target, unit).await
            });
        }
        Effect::Locate { seq } => {
            let services = services.clone();
            ctx.tasks()
                .spawn("lookup", async move { services.locate(seq).await });
        }
        Effect::SaveRecent { cities } => {
            let services = services.clone();
            ctx.tasks()
                .spawn("save_recent", async move { services.save_recent(cities).await });
        }
    }
}
