use peppa_core::model::deck::shuffled;
use rand::Rng;

pub const HUMAN_NAME: &str = "Charlie Bartom";

/// Computer opponents. Three are drawn per game without replacement.
pub const AI_NAMES: [&str; 12] = [
    "Andrew Martin",
    "Bomb #20",
    "HAL 9000",
    "Joshua WOPR",
    "MU\u{2011}TH\u{2011}UR 6000",
    "Neuromancer",
    "Nexus\u{2011}7",
    "R. Daneel Olivaw",
    "Robbie",
    "SAM 104",
    "T\u{2011}800",
    "Roy Batty",
];

pub fn pick_bot_names<R: Rng + ?Sized>(rng: &mut R) -> [String; 3] {
    let drawn = shuffled(&AI_NAMES, rng);
    [drawn[0], drawn[1], drawn[2]].map(String::from)
}

/// Seat-indexed names: the human at South, drawn bots clockwise after.
pub fn table_names<R: Rng + ?Sized>(human: &str, rng: &mut R) -> [String; 4] {
    let [west, north, east] = pick_bot_names(rng);
    [human.to_string(), west, north, east]
}
