//! Presentation side channel. The engine pushes human-readable event
//! lines here; the sink never affects control flow and is muted entirely
//! when the battle carries no log.

use serde_json::json;

#[derive(Clone, Debug, Default)]
pub struct BattleLog {
    lines: Vec<String>,
    echo: bool,
}

impl BattleLog {
    /// Collects lines silently.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects lines and prints each one as it arrives.
    pub fn echoing() -> Self {
        Self { lines: Vec::new(), echo: true }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        let line = line.into();
        if self.echo {
            println!("{line}");
        }
        self.lines.push(line);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({ "lines": self.lines })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_lines_in_order() {
        let mut log = BattleLog::new();
        log.push("first");
        log.push(String::from("second"));
        assert_eq!(log.lines(), ["first", "second"]);
    }

    #[test]
    fn json_dump_carries_every_line() {
        let mut log = BattleLog::new();
        log.push("a");
        let value = log.to_json();
        assert_eq!(value["lines"][0], "a");
    }
}
