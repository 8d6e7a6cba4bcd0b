mod config;
mod render;
mod table;

pub use config::Config;
pub use render::RenderConfig;
pub use table::TableConfig;
