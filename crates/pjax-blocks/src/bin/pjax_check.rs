//! `pjax-check` — validate a PJAX URL configuration.
//!
//! Usage:
//!   pjax-check <config.json> [path...]
//!
//! Every decorator expression and URL pattern is checked. The rules are
//! printed in precedence order, followed by the rules matching each path.
//! Set `RUST_LOG=pjax_blocks=debug` for more detail.

use pjax_blocks::report::describe;
use pjax_blocks::{Middleware, PjaxConfig};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((config_path, paths)) = args.split_first() else {
        eprintln!("First argument must be a configuration file.");
        std::process::exit(2);
    };

    let middleware = match PjaxConfig::from_path(config_path).and_then(|config| Middleware::new(&config)) {
        Ok(middleware) => middleware,
        Err(e) => {
            eprintln!("{config_path}: {e}");
            std::process::exit(1);
        }
    };

    print!("{}", describe(&middleware, paths));
}
