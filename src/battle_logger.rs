use serde_json::json;

/// Records the narrative of a battle turn by turn, in a Showdown-like line log.
#[derive(Clone, Debug, Default)]
pub struct BattleLogger {
    formatid: String,
    players: [String; 2],
    seed: Option<u64>,
    log: Vec<String>,
    last_turn: Option<u32>,
}

impl BattleLogger {
    pub fn new(formatid: impl Into<String>, player_a: &str, player_b: &str) -> Self {
        Self {
            formatid: formatid.into(),
            players: [player_a.to_string(), player_b.to_string()],
            seed: None,
            log: Vec::new(),
            last_turn: None,
        }
    }

    pub fn set_seed(&mut self, seed: u64) {
        self.seed = Some(seed);
    }

    pub fn log_turn(&mut self, turn: u32) {
        self.log.push(format!("|turn|{turn}"));
        self.last_turn = Some(turn);
    }

    /// Splits a narrative block into lines, opening a new turn header when needed.
    pub fn log_narrative(&mut self, turn: u32, narrative: &str) {
        if self.last_turn != Some(turn) {
            self.log_turn(turn);
        }
        self.log.extend(
            narrative
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(|line| format!("|msg|{line}")),
        );
    }

    pub fn log_win(&mut self, winner: &str) {
        self.log.push(format!("|win|{winner}"));
    }

    pub fn log_tie(&mut self) {
        self.log.push("|tie|".to_string());
    }

    pub fn log_lines(&self) -> &[String] {
        &self.log
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "formatid": self.formatid,
            "p1": self.players[0],
            "p2": self.players[1],
            "seed": self.seed,
            "log": self.log,
        })
    }
}
