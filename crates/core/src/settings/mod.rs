//! Settings module - runtime configuration read from the environment.

mod settings_model;

pub use settings_model::{
    Settings, ENV_DATA_DIR, ENV_HISTORY_CAP, ENV_HISTORY_KEY,
};
