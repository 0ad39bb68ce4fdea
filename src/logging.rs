//! Logger setup.
//!
//! Native builds log through `env_logger`. The filter comes from `RUST_LOG` when it is set and
//! otherwise defaults to [`DEFAULT_FILTER`], which keeps the `wgpu` internals quiet.
//!
//! Browser builds log to the developer console through `console_log` and install
//! `console_error_panic_hook` so panics show up there as well.

use std::sync::Once;

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

static INIT: Once = Once::new();

/// Initializes the global logger once. Later calls are ignored.
pub fn init_logging() {
    INIT.call_once(|| {
        #[cfg(not(target_arch = "wasm32"))]
        {
            let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_FILTER.to_owned());
            env_logger::Builder::new()
                .parse_filters(&filter)
                .write_style(env_logger::WriteStyle::Auto)
                .init();
        }

        #[cfg(target_arch = "wasm32")]
        {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));
            if console_log::init_with_level(log::Level::Info).is_err() {
                // Another logger is already installed; keep using it.
                return;
            }
        }

        log::debug!("logging initialized");
    });
}
