use anyhow::Result;

use karst_view::logging::{LoggingConfig, init_logging};
use karst_view::window::{Runtime, RuntimeConfig};

mod triangle;

use triangle::TrianglePresenter;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "karst triangle".to_string(),
        ..RuntimeConfig::default()
    };

    Runtime::run(config, TrianglePresenter)
}
