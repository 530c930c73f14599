use std::rc::Rc;

use engine::{LoopConfig, Scene, Vec2};
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::config::{ConfigError, GameConfig};
use super::events::{PortalBus, PortalEvent};
use super::menu::DisplayCountBadge;
use super::registry::{ActorRegistry, SpawnRules, ZoneSide};
use super::zone::{KeyBindings, ZoneScene, ZoneTuning};

const WINDOW_TITLE: &str = "Portal Split";

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) scene_a: Box<dyn Scene>,
    pub(crate) scene_b: Box<dyn Scene>,
    /// Kept alive for the whole run so its subscription stays registered.
    pub(crate) badge: DisplayCountBadge,
}

pub(crate) fn build_app() -> Result<AppWiring, ConfigError> {
    init_tracing();
    info!(version = env!("CARGO_PKG_VERSION"), "startup");

    let game = GameConfig::load()?;
    info!(
        window_width = game.window_width,
        window_height = game.window_height,
        move_speed = game.move_speed,
        display_count = game.display_count,
        "config_loaded"
    );

    Ok(wire(&game))
}

/// Composition root: the one bus and the one registry are created here and
/// handed to both zones.
fn wire(game: &GameConfig) -> AppWiring {
    let bus = Rc::new(PortalBus::new());
    let registry = Rc::new(ActorRegistry::new(
        Rc::clone(&bus),
        SpawnRules {
            inset: game.spawn_inset,
            offset_y: game.spawn_offset_y,
        },
    ));

    let badge = DisplayCountBadge::attach(Rc::clone(&bus));
    bus.publish(&PortalEvent::DisplayCount(game.display_count));

    let zone_size = Vec2::new(game.zone_width(), game.zone_height());
    let tuning = ZoneTuning {
        move_speed: game.move_speed,
        portal_size: Vec2::new(game.portal_width, game.portal_height),
    };
    let bindings = KeyBindings::standard();
    let zone = |side| {
        Box::new(ZoneScene::new(
            side,
            zone_size,
            tuning,
            bindings.clone(),
            Rc::clone(&registry),
            Rc::clone(&bus),
        )) as Box<dyn Scene>
    };
    let scene_a = zone(ZoneSide::A);
    let scene_b = zone(ZoneSide::B);

    let window_title = match badge.label() {
        Some(label) => format!("{WINDOW_TITLE} | {label}"),
        None => WINDOW_TITLE.to_string(),
    };
    let config = LoopConfig {
        window_title,
        window_width: game.window_width,
        window_height: game.window_height,
        ..LoopConfig::default()
    };

    AppWiring {
        config,
        scene_a,
        scene_b,
        badge,
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
