use chrono::FixedOffset;

use crate::app::AppState;
use crate::calendar::CalendarView;
use crate::storage::config::{Config, ConfigError};
use crate::storage::{LocalStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// The state plus its backing store. Every mutation is followed by a
/// whole-snapshot write through `persist`.
pub struct Session {
    pub state: AppState,
    pub view: CalendarView,
    pub default_color: String,
    store: LocalStore,
}

impl Session {
    pub fn open(config: &Config) -> Result<Self, SessionError> {
        let store = LocalStore::open(&config.storage.database_path)?;
        Self::from_store(store, config.ui.offset()?, config.ui.default_view, &config.ui.default_color)
    }

    pub fn from_store(
        store: LocalStore,
        offset: FixedOffset,
        default_view: CalendarView,
        default_color: &str,
    ) -> Result<Self, SessionError> {
        let events = store.load_events()?;
        let view = match store.get_item(crate::storage::local_store::VIEW_KEY)? {
            Some(_) => store.load_view()?,
            None => default_view,
        };
        tracing::info!("Loaded {} events, view {}", events.len(), view);

        Ok(Self {
            state: AppState::new().with_events(events).with_offset(offset),
            view,
            default_color: default_color.to_string(),
            store,
        })
    }

    pub fn persist(&self) -> Result<(), SessionError> {
        self.store.save_events(self.state.events())?;
        self.store.save_view(self.view)?;
        Ok(())
    }
}
