pub mod clock;
pub mod random;

pub use clock::{Clock, FixedClock, ScriptedClock, SystemClock};
pub use random::{RandomSource, ScriptedRandom, SeededRandom, ThreadRandom};
