// Game constants

// Board dimensions. The server does not advertise them yet, so they are fixed.
pub const ROWS: usize = 50;
pub const COLS: usize = 100;

// Percentage chance of leaving a direction that is still safe
pub const LIKES_TO_MOVE_MIN: u32 = 0;
pub const LIKES_TO_MOVE_MAX: u32 = 30;

// Length in cells of the rays that check for collisions
pub const COLLISION_CHECK_RANGE_MIN: u32 = 3;
pub const COLLISION_CHECK_RANGE_MAX: u32 = 5;

// Upper bound (inclusive) of the roll compared against the turn propensity
pub const TURN_ROLL_MAX: u32 = 100;

// Bot identifiers are decimal strings drawn from [0, BOT_ID_MAX]
pub const BOT_ID_MAX: u32 = 1_000_000_000;
