//! Well-known SGF property codes.
//!
//! The parser treats every property name the same way; this catalog exists
//! for callers that want to label properties for display.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Black move.
pub const BLACK: &str = "B";
/// White move.
pub const WHITE: &str = "W";

pub const BLACK_PLAYER_NAME: &str = "PB";
pub const BLACK_PLAYER_RANK: &str = "BR";
pub const BLACK_PLAYER_TEAM: &str = "BT";
pub const WHITE_PLAYER_NAME: &str = "PW";
pub const WHITE_PLAYER_RANK: &str = "WR";
pub const WHITE_PLAYER_TEAM: &str = "WT";
pub const ANNOTATOR: &str = "AN";
pub const COPYRIGHT: &str = "CP";
pub const DATE: &str = "DT";
pub const EVENT: &str = "EV";
pub const GAME_COMMENT: &str = "GC";
pub const COMMENT: &str = "C";
pub const GAME_NAME: &str = "GN";
pub const HANDICAP: &str = "HA";
pub const OPENING: &str = "ON";
pub const OVERTIME: &str = "OT";
pub const PLACE: &str = "PC";
pub const RESULT: &str = "RE";
pub const ROUND: &str = "RO";
pub const RULES: &str = "RU";
pub const SOURCE: &str = "SO";
pub const TIME_LIMITS: &str = "TM";
pub const USER: &str = "US";
pub const CHARSET: &str = "CA";
pub const BOARD_SIZE: &str = "SZ";
pub const KOMI: &str = "KM";

/// Code and human-readable name of every catalogued property.
pub const KNOWN: &[(&str, &str)] = &[
    (BLACK, "Black move"),
    (WHITE, "White move"),
    (BLACK_PLAYER_NAME, "Black player name"),
    (BLACK_PLAYER_RANK, "Black player rank"),
    (BLACK_PLAYER_TEAM, "Black player team"),
    (WHITE_PLAYER_NAME, "White player name"),
    (WHITE_PLAYER_RANK, "White player rank"),
    (WHITE_PLAYER_TEAM, "White player team"),
    (ANNOTATOR, "Annotator"),
    (COPYRIGHT, "Copyright"),
    (DATE, "Date"),
    (EVENT, "Event"),
    (GAME_COMMENT, "Game comment"),
    (COMMENT, "Comment"),
    (GAME_NAME, "Game name"),
    (HANDICAP, "Handicap"),
    (OPENING, "Opening"),
    (OVERTIME, "Overtime"),
    (PLACE, "Place"),
    (RESULT, "Result"),
    (ROUND, "Round"),
    (RULES, "Rules"),
    (SOURCE, "Source"),
    (TIME_LIMITS, "Time limits"),
    (USER, "User"),
    (CHARSET, "Charset"),
    (BOARD_SIZE, "Board size"),
    (KOMI, "Komi"),
];

static DESCRIPTIONS: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| KNOWN.iter().copied().collect());

/// Human-readable name for a property code, ignoring case.
pub fn describe(code: &str) -> Option<&'static str> {
    DESCRIPTIONS.get(code.to_uppercase().as_str()).copied()
}

/// Whether `name` is one of the two move properties.
pub fn is_move(name: &str) -> bool {
    name == BLACK || name == WHITE
}
