//! One-line keyboard commands accepted while the clock is running.

use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Any input that is not a command still counts as interaction
    Wake,
    Dismiss,
    ToggleFullscreen,
    RefreshBackground,
    RefreshWeather,
    ListAlarms,
    AddAlarm { time: String, label: Option<String> },
    ToggleAlarm(String),
    DeleteAlarm(String),
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let Some(head) = parts.next() else {
            return Ok(Command::Wake);
        };
        let rest: Vec<&str> = parts.collect();

        let arg = |name: &str| {
            rest.first()
                .map(|s| s.to_string())
                .ok_or_else(|| format!("usage: {} <id>", name))
        };

        match head {
            "d" | "dismiss" => Ok(Command::Dismiss),
            "f" | "fullscreen" => Ok(Command::ToggleFullscreen),
            "b" | "background" => Ok(Command::RefreshBackground),
            "w" | "weather" => Ok(Command::RefreshWeather),
            "l" | "list" => Ok(Command::ListAlarms),
            "a" | "add" => {
                let time = rest
                    .first()
                    .map(|s| s.to_string())
                    .ok_or_else(|| "usage: a HH:MM [label]".to_string())?;
                let label = (rest.len() > 1).then(|| rest[1..].join(" "));
                Ok(Command::AddAlarm { time, label })
            }
            "t" | "toggle" => Ok(Command::ToggleAlarm(arg("t")?)),
            "x" | "delete" => Ok(Command::DeleteAlarm(arg("x")?)),
            "q" | "quit" => Ok(Command::Quit),
            other => Err(format!("unknown command '{}'", other)),
        }
    }
}
