//! Page startup
//!
//! Runs once per page load, in this order:
//!
//! 1. `Configuring`: ask for notification permission, resolve the config
//! 2. `StoresReady`: build the store mapping, install the API client
//! 3. `Authenticating`: bind the session bridge, check the stored token
//! 4. `Mounted`: the root component rendered, register the service worker
//!
//! Permission, authentication and service-worker registration run in the
//! background; nothing here waits for them.

pub mod config;
pub mod session_bridge;

use std::cell::Cell;
use std::rc::Rc;

use crate::context::app_context::StoreMapping;
use crate::services::{http, notifications, service_worker};
use crate::stores::{
    app_store::AppStore, client_store::ClientStore, current_user::CurrentUser,
    messages_store::MessagesStore, snack_manager::SnackManager, user_store::UserStore,
    ws_store::WebSocketStore,
};
use crate::utils::Subscription;

use config::{BuildMode, Config, PageLocation};

thread_local! {
    static STARTED: Cell<bool> = const { Cell::new(false) };
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Uninitialized,
    Configuring,
    StoresReady,
    Authenticating,
    Mounted,
}

impl Phase {
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Uninitialized => Some(Phase::Configuring),
            Phase::Configuring => Some(Phase::StoresReady),
            Phase::StoresReady => Some(Phase::Authenticating),
            Phase::Authenticating => Some(Phase::Mounted),
            Phase::Mounted => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StartupError {
    /// Startup already ran on this page
    AlreadyStarted,
    OutOfOrder { from: Phase, to: Phase },
}

impl std::fmt::Display for StartupError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            StartupError::AlreadyStarted => write!(f, "Startup already ran on this page"),
            StartupError::OutOfOrder { from, to } => {
                write!(f, "Cannot move from {:?} to {:?}", from, to)
            }
        }
    }
}

impl std::error::Error for StartupError {}

/// Linear, one-way startup phases
#[derive(Debug)]
pub struct StartupSequence {
    phase: Cell<Phase>,
}

impl Default for StartupSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl StartupSequence {
    pub fn new() -> Self {
        Self {
            phase: Cell::new(Phase::Uninitialized),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase.get()
    }

    pub fn advance(&self, to: Phase) -> Result<(), StartupError> {
        let from = self.phase.get();
        if from.next() != Some(to) {
            return Err(StartupError::OutOfOrder { from, to });
        }
        log::info!("Startup: {:?} -> {:?}", from, to);
        self.phase.set(to);
        Ok(())
    }
}

/// Construct every store, dependencies first
///
/// The snack manager comes first because every other store reports through
/// it; the WebSocket store comes last because it needs the session and the
/// message lists.
pub fn init_stores(config: &Config) -> StoreMapping {
    let snack_manager = Rc::new(SnackManager::new());
    let app_store = Rc::new(AppStore::new(snack_manager.snack()));
    let user_store = Rc::new(UserStore::new(snack_manager.snack()));
    let messages_store = Rc::new(MessagesStore::new(app_store.clone(), snack_manager.snack()));
    let current_user = Rc::new(CurrentUser::new(snack_manager.snack()));
    let client_store = Rc::new(ClientStore::new(snack_manager.snack()));
    let ws_store = WebSocketStore::new(
        snack_manager.snack(),
        current_user.clone(),
        messages_store.clone(),
        &config.url,
    );
    log::debug!("Stores constructed");

    StoreMapping {
        config: config.clone(),
        app_store,
        snack_manager,
        user_store,
        messages_store,
        current_user,
        client_store,
        ws_store,
    }
}

/// Everything startup produced, kept alive for the page's lifetime
pub struct Booted {
    mode: BuildMode,
    sequence: StartupSequence,
    stores: StoreMapping,
    _session_bridge: Subscription,
}

impl Booted {
    pub fn stores(&self) -> &StoreMapping {
        &self.stores
    }

    #[allow(dead_code)]
    pub fn phase(&self) -> Phase {
        self.sequence.phase()
    }

    /// The root component is on screen
    pub fn mounted(&self) -> Result<(), StartupError> {
        self.sequence.advance(Phase::Mounted)?;
        service_worker::register(self.mode);
        Ok(())
    }
}

fn claim_startup() -> Result<(), StartupError> {
    if STARTED.with(|started| started.replace(true)) {
        return Err(StartupError::AlreadyStarted);
    }
    Ok(())
}

/// Run startup against the current page
pub fn start() -> Result<Booted, StartupError> {
    start_with(
        BuildMode::current(),
        config::injected_from_window(),
        PageLocation::from_window(),
    )
}

pub fn start_with(
    mode: BuildMode,
    injected: Option<Config>,
    location: PageLocation,
) -> Result<Booted, StartupError> {
    claim_startup()?;
    let sequence = StartupSequence::new();

    sequence.advance(Phase::Configuring)?;
    notifications::request_permission();
    let config = config::resolve(mode, injected, &location);

    sequence.advance(Phase::StoresReady)?;
    let stores = init_stores(&config);
    http::init_http(
        &config,
        stores.current_user.clone(),
        stores.snack_manager.snack(),
    );

    sequence.advance(Phase::Authenticating)?;
    let session_bridge = session_bridge::bind(
        &stores.current_user.logged_in,
        stores.ws_store.clone(),
        stores.app_store.clone(),
    );
    stores.current_user.spawn_try_authenticate();

    Ok(Booted {
        mode,
        sequence,
        stores,
        _session_bridge: session_bridge,
    })
}
