//! The desk loop: one-second clock ticks, keyboard commands, weather results
//! and the periodic refresh timers, multiplexed with `tokio::select!`.

use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use zenclock_core::{AppError, Config};
use zenclock_weather::{get_current_location, Coordinates, WeatherError};

use crate::command::Command;
use crate::desk::DeskClock;
use crate::render::{render_alarms, render_frame, CLEAR};
use crate::weather_service::{WeatherService, WeatherServiceMessage};

/// What the loop should do after a command
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    RefreshWeather,
    /// Text to show below the next frame
    Notice(String),
    Quit,
}

/// Apply one keyboard command to the desk. Every command, even an unknown
/// one, counts as interaction.
pub fn apply_command(desk: &mut DeskClock, line: &str, at: std::time::Instant) -> Outcome {
    desk.interact(at);

    let command = match line.parse::<Command>() {
        Ok(command) => command,
        Err(message) => return Outcome::Notice(message),
    };

    match command {
        Command::Wake => Outcome::Continue,
        Command::Dismiss => {
            desk.dismiss();
            Outcome::Continue
        }
        Command::ToggleFullscreen => {
            desk.toggle_fullscreen();
            Outcome::Continue
        }
        Command::RefreshBackground => {
            desk.refresh_background(Local::now().timestamp_millis());
            Outcome::Continue
        }
        Command::RefreshWeather => Outcome::RefreshWeather,
        Command::ListAlarms => Outcome::Notice(render_alarms(desk.alarms())),
        Command::AddAlarm { time, label } => match desk.add_alarm(&time, label) {
            Ok(alarm) => Outcome::Notice(format!("Added alarm {}", alarm.time)),
            Err(e) => Outcome::Notice(failure_notice(&e)),
        },
        Command::ToggleAlarm(id) => match desk.toggle_alarm(&id) {
            Ok(true) => Outcome::Continue,
            Ok(false) => Outcome::Notice(format!("No alarm '{}'", id)),
            Err(e) => Outcome::Notice(failure_notice(&e)),
        },
        Command::DeleteAlarm(id) => match desk.delete_alarm(&id) {
            Ok(true) => Outcome::Continue,
            Ok(false) => Outcome::Notice(format!("No alarm '{}'", id)),
            Err(e) => Outcome::Notice(failure_notice(&e)),
        },
        Command::Quit => Outcome::Quit,
    }
}

/// Known failures show their short message; anything else shows the error chain.
fn failure_notice(err: &anyhow::Error) -> String {
    match err.downcast_ref::<AppError>() {
        Some(app) => app.user_message().to_string(),
        None => format!("{:#}", err),
    }
}

fn minutes_interval(minutes: u32) -> Option<Interval> {
    if minutes == 0 {
        return None;
    }
    let period = Duration::from_secs(u64::from(minutes) * 60);
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    Some(interval)
}

async fn maybe_tick(interval: &mut Option<Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

fn request_weather(desk: &mut DeskClock, service: &WeatherService, coords: Option<Coordinates>) {
    if let Some(coords) = coords {
        desk.weather_mut().begin_loading();
        service.request_fetch(coords);
    }
}

/// Run the desk on the real terminal until `q` or Ctrl-C.
pub async fn run(
    desk: DeskClock,
    service: WeatherService,
    rx: mpsc::UnboundedReceiver<WeatherServiceMessage>,
    config: &Config,
) -> Result<DeskClock> {
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    run_with_io(desk, service, rx, config, stdin, &mut stdout).await
}

/// Loop body with the terminal swapped out for any line source and writer.
/// The desk is shut down on every exit and handed back on success.
pub async fn run_with_io<R, W>(
    mut desk: DeskClock,
    service: WeatherService,
    mut rx: mpsc::UnboundedReceiver<WeatherServiceMessage>,
    config: &Config,
    input: R,
    output: &mut W,
) -> Result<DeskClock>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let coords = match get_current_location(&config.location) {
        Ok(coords) => Some(coords),
        Err(e) => {
            tracing::warn!("No location for weather: {}", e);
            desk.weather_mut()
                .apply(Err(AppError::from(WeatherError::from(e))));
            None
        }
    };

    desk.refresh_background(Local::now().timestamp_millis());
    request_weather(&mut desk, &service, coords);

    let result = drive(&mut desk, &service, &mut rx, config, coords, input, output).await;
    desk.shutdown();
    result.map(|()| desk)
}

/// Read one line, replacing bytes that are not UTF-8. `Ok(None)` at end of input.
/// `buf` keeps partial reads if the call is cancelled, so a line is never split.
async fn read_line_lossy<R>(input: &mut R, buf: &mut Vec<u8>) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    if input.read_until(b'\n', buf).await? == 0 {
        return Ok(None);
    }
    let line = String::from_utf8_lossy(buf)
        .trim_end_matches(['\r', '\n'])
        .to_string();
    buf.clear();
    Ok(Some(line))
}

async fn drive<R, W>(
    desk: &mut DeskClock,
    service: &WeatherService,
    rx: &mut mpsc::UnboundedReceiver<WeatherServiceMessage>,
    config: &Config,
    coords: Option<Coordinates>,
    mut input: R,
    output: &mut W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut line_buf = Vec::new();
    let mut input_open = true;
    let mut notice: Option<String> = None;

    let mut clock = time::interval(Duration::from_secs(1));
    clock.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut weather_refresh = minutes_interval(config.weather.refresh_minutes);
    let mut background_refresh = minutes_interval(config.display.background_refresh_minutes);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    tracing::info!("Desk clock running");

    loop {
        tokio::select! {
            _ = clock.tick() => {
                let now = Local::now().naive_local();
                desk.tick(&now, std::time::Instant::now());

                let mut frame = String::from(CLEAR);
                frame.push_str(&render_frame(desk, &now));
                if let Some(text) = &notice {
                    frame.push('\n');
                    frame.push_str(text);
                }
                output.write_all(frame.as_bytes())?;
                output.flush()?;
            }
            line = read_line_lossy(&mut input, &mut line_buf), if input_open => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        tracing::debug!("Input closed");
                        input_open = false;
                        continue;
                    }
                    Err(e) => {
                        tracing::warn!("Keyboard input failed, ignoring further input: {}", e);
                        input_open = false;
                        continue;
                    }
                };
                match apply_command(desk, &line, std::time::Instant::now()) {
                    Outcome::Continue => notice = None,
                    Outcome::Notice(text) => notice = Some(text),
                    Outcome::RefreshWeather => {
                        notice = None;
                        request_weather(desk, service, coords);
                    }
                    Outcome::Quit => break,
                }
            }
            Some(message) = rx.recv() => {
                match message {
                    WeatherServiceMessage::FetchDone(result) => desk.weather_mut().apply(result),
                }
            }
            _ = maybe_tick(&mut weather_refresh) => {
                tracing::debug!("Periodic weather refresh");
                request_weather(desk, service, coords);
            }
            _ = maybe_tick(&mut background_refresh) => {
                desk.refresh_background(Local::now().timestamp_millis());
            }
            _ = &mut ctrl_c => {
                tracing::info!("Interrupted");
                break;
            }
        }
    }

    Ok(())
}
