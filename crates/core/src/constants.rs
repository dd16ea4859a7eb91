/// Hourly-rate multiplier applied to rush orders
pub const RUSH_MULTIPLIER: f64 = 1.2;

/// Surcharge fraction of the subtotal added for rush orders
pub const RUSH_SURCHARGE_RATE: f64 = 0.2;

/// Fraction of the subtotal charged for the maintenance add-on
pub const MAINTENANCE_RATE: f64 = 0.15;

/// Number of quotes kept in history unless configured otherwise
pub const DEFAULT_HISTORY_CAP: usize = 20;

/// Blob-store key under which the quote history snapshot is kept
pub const DEFAULT_HISTORY_KEY: &str = "serviceSimulatorHistory";

/// File names of the reference data documents inside a data directory
pub const PLANS_FILE_NAME: &str = "plans.json";
pub const SERVICES_FILE_NAME: &str = "services.json";
