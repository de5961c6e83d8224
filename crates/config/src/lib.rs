mod settings;

pub use settings::{DatabaseSettings, Settings, StoreBackend, StoreSettings};
