//! Version command implementation

use crate::error::Result;
use crate::recipe::store;

/// Run version command
pub fn run() -> Result<()> {
    let store = store::load()?;

    println!("stackforge {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Build info:");
    println!("  Rust version: {}", rustc_version());
    println!("  Profile: {}", build_profile());
    println!("Data set:");
    println!("  Base measurements: {}", store.base.len());
    println!("  Overlays: {}", store.overlays.len());

    Ok(())
}

fn rustc_version() -> &'static str {
    env!("CARGO_PKG_RUST_VERSION")
}

fn build_profile() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}
