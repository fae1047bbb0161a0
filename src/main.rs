//! Rushmore Pizzeria kiosk

use std::io;

use anyhow::{Context, Result};
use rand::{SeedableRng, rngs::StdRng};
use tracing::info;

use rushmore::{
    config::Config,
    discounts::DiscountPolicy,
    kiosk::Kiosk,
    logging,
    menu::Menu,
    recorder::JsonFileRecorder,
    session::Session,
};

/// Kiosk entry point
fn main() -> Result<()> {
    let config = Config::load().unwrap_or_else(|error| error.exit());

    logging::init_subscriber(&config.logging)?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let kiosk = Kiosk::open(Menu::rushmore()?, DiscountPolicy::default(), &mut rng)
        .context("failed to open kiosk")?;

    let recorder = JsonFileRecorder::new(&config.orders_file);

    info!(orders_file = %recorder.path().display(), "kiosk open");

    let stdin = io::stdin();
    let stdout = io::stdout();

    let orders_recorded = Session::new(&kiosk, stdin.lock(), stdout.lock(), recorder)
        .run()
        .context("kiosk session failed")?;

    info!(orders_recorded, "kiosk closed");

    Ok(())
}
