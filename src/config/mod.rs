pub mod overrides;
pub mod schema;

pub use overrides::Overrides;
pub use schema::{Config, DeviceConfig, NotifyConfig};
