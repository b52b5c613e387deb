use std::rc::Rc;
use anyhow::{Context, Result};
use clap::Parser;
use raylib::prelude::*;

mod carousel;
mod catalog;
mod config;
mod constants;
mod detail;
mod error;
mod input;
mod listing;
mod screen;
mod slide;
mod stage;
mod state;
mod texture_loader;
mod viewer;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::constants::*;
use crate::detail::DetailScreen;
use crate::input::{Key, KeyboardHub};
use crate::listing::ListingScreen;
use crate::screen::{Route, Screen};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();
    let catalog = Catalog::load(&config.catalog)
        .with_context(|| format!("Error loading catalog '{}'", config.catalog.display()))?;
    let catalog = Rc::new(catalog);
    let viewer = config.viewer_options();

    let (mut rl, thread) = raylib::init()
        .size(config.width, config.height)
        .title("Storefront")
        .vsync()
        .resizable()
        .build();
    rl.set_target_fps(FPS);
    rl.set_trace_log(TraceLogLevel::LOG_ERROR);
    // Escape navigates back instead of closing the window
    rl.set_exit_key(None);

    // Window-wide key listeners; the product page's carousel subscribes while it is shown
    let hub = KeyboardHub::new();

    let mut listing = ListingScreen::new(&catalog);
    let mut detail = config
        .slug
        .as_deref()
        .map(|slug| DetailScreen::new(Rc::clone(&catalog), &hub, viewer.clone(), &config.site_url, slug));

    // --- Main Loop ---
    while !rl.window_should_close() {
        let mut keys = Vec::new();
        while let Some(key) = rl.get_key_pressed() {
            let key = Key::from(key);
            hub.dispatch(key);
            keys.push(key);
        }

        // --- Update Logic ---
        let route = match detail.as_mut() {
            Some(screen) => screen.update(&mut rl, &thread, &keys),
            None => listing.update(&mut rl, &thread, &keys),
        };

        match route {
            Some(Route::Listing) => {
                // Dropping the page unmounts its carousel
                detail = None;
            }
            Some(Route::Detail(slug)) => match detail.as_mut() {
                Some(screen) => screen.show(&slug),
                None => {
                    detail = Some(DetailScreen::new(Rc::clone(&catalog), &hub, viewer.clone(), &config.site_url, &slug));
                }
            },
            None => {}
        }

        // --- Render ---
        let mut d = rl.begin_drawing(&thread);
        match detail.as_ref() {
            Some(screen) => screen.draw(&mut d),
            None => listing.draw(&mut d),
        }
    }

    log::debug!("{} key listeners left at exit", hub.listener_count());
    Ok(())
}
