use std::io::stdout;
use std::sync::mpsc::{Receiver, Sender};
use std::time::Duration;

use crossterm::cursor::MoveToColumn;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use tracing::warn;

use crate::directory::Station;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::session::{PlaybackStatus, SessionPhase};

use super::startup::Services;

/// Main terminal loop: drains MPRIS commands and session status updates,
/// handles key input and keeps one status line current. Returns `Ok(())`
/// when shutdown is requested.
pub fn run(
    services: &mut Services,
    mpris: &MprisHandle,
    control_tx: &Sender<ControlCmd>,
    control_rx: &Receiver<ControlCmd>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut last_status = services.session.status();
    let mut last_phase = services.session.phase();
    let mut dirty = true;

    loop {
        // Commands can come from media keys as well as our own key handler;
        // both go through the same channel so there is one handling path.
        while let Ok(cmd) = control_rx.try_recv() {
            match cmd {
                ControlCmd::Quit => return Ok(()),
                ControlCmd::Play => services.session.resume(),
                ControlCmd::Pause => services.session.pause(),
                ControlCmd::PlayPause => {
                    if services.session.phase() == SessionPhase::Playing {
                        services.session.pause();
                    } else {
                        services.session.resume();
                    }
                }
                ControlCmd::Stop => services.session.stop(),
            }
            dirty = true;
        }

        while let Ok(status) = services.status_rx.try_recv() {
            last_status = status;
            dirty = true;
        }

        // The phase can move on its own (stream finished), so sync MPRIS from
        // the session rather than from the commands we handled.
        let phase = services.session.phase();
        if phase != last_phase {
            mpris.set_playback(phase);
            last_phase = phase;
            dirty = true;
        }

        if dirty {
            draw_status(services, &last_status)?;
            dirty = false;
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Char(' ') | KeyCode::Char('p') => {
                        let _ = control_tx.send(ControlCmd::PlayPause);
                    }
                    KeyCode::Char('s') => {
                        let _ = control_tx.send(ControlCmd::Stop);
                    }
                    KeyCode::Char('f') => {
                        toggle_favourite(services)?;
                        dirty = true;
                    }
                    KeyCode::Char('c') => {
                        services.session.clear_persisted();
                        dirty = true;
                    }
                    _ => {}
                }
            }
        }
    }
}

/// The current track's station back-reference, if it carries one.
fn current_station(services: &Services) -> Option<Station> {
    services
        .session
        .current_track()
        .and_then(|t| t.station.clone())
        .and_then(|v| serde_json::from_value(v).ok())
}

/// Flip the current station in and out of the favourites list. Needs the
/// station back-reference; bare URL tracks have nothing to favourite.
fn toggle_favourite(services: &Services) -> std::io::Result<()> {
    let Some(station) = current_station(services) else {
        return print_line("no station to favourite");
    };

    match services.favourites.toggle(&station) {
        Ok(list) => {
            let kept = list.iter().any(|s| s.stationuuid == station.stationuuid);
            let verb = if kept { "added to" } else { "removed from" };
            print_line(&format!("{} {verb} favourites", station.name))
        }
        Err(e) => {
            warn!("could not update favourites: {e}");
            print_line("could not update favourites")
        }
    }
}

fn print_line(message: &str) -> std::io::Result<()> {
    execute!(
        stdout(),
        MoveToColumn(0),
        Clear(ClearType::CurrentLine),
        Print(format!("onda: {message}\r\n"))
    )
}

fn draw_status(services: &Services, status: &PlaybackStatus) -> std::io::Result<()> {
    let name = services
        .session
        .current_track()
        .map(|t| t.title.clone().unwrap_or_else(|| t.uri.clone()))
        .unwrap_or_else(|| "no station".to_string());

    let favourite = current_station(services)
        .map(|s| services.favourites.contains(&s))
        .unwrap_or(false);
    let marker = if favourite { "*" } else { "" };

    let state = if status.buffering {
        "buffering"
    } else {
        match services.session.phase() {
            SessionPhase::Playing => "playing",
            SessionPhase::Paused => "paused",
            SessionPhase::Loaded => "ready",
            SessionPhase::Idle => "idle",
        }
    };

    let line = match services.session.last_error() {
        Some(err) => format!("[{state}] {name}{marker} ({err})"),
        None => format!("[{state}] {name}{marker} {}", format_elapsed(status.position)),
    };

    execute!(
        stdout(),
        MoveToColumn(0),
        Clear(ClearType::CurrentLine),
        Print(line)
    )
}

fn format_elapsed(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::format_elapsed;
    use std::time::Duration;

    #[test]
    fn elapsed_formats_minutes_and_seconds() {
        assert_eq!(format_elapsed(Duration::ZERO), "0:00");
        assert_eq!(format_elapsed(Duration::from_secs(59)), "0:59");
        assert_eq!(format_elapsed(Duration::from_secs(61)), "1:01");
        assert_eq!(format_elapsed(Duration::from_secs(3600)), "60:00");
    }
}
