use std::sync::mpsc;

use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

use crate::mpris::{self, ControlCmd};

mod event_loop;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris_handle = mpris::spawn_mpris(control_tx.clone());

    let mut services = startup::build(&settings, mpris_handle.clone());
    startup::restore_last_station(&mut services);

    // Optional argument: a direct stream URL or a directory search term.
    if let Some(target) = std::env::args().nth(1) {
        startup::play_target(&mut services, &target);
    }

    enable_raw_mode()?;
    let run_result = event_loop::run(&mut services, &mpris_handle, &control_tx, &control_rx);
    disable_raw_mode()?;
    // Leave the shell prompt on its own line after the status line.
    println!();

    run_result
}
