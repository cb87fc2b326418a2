//! Skill check resolution for a success-counting dice-pool system.
//!
//! A check is a pool of same-sized dice. Every face at or above the die's
//! success threshold is a success, every face showing the botch face is a
//! botch, and a roll with no successes and at least one botch is a fumble.
//! Successes are compared against a difficulty class (DC) and the margin is
//! sorted into outcome tiers.
//!
//! On top of single checks the crate resolves contests between two actors,
//! cooperative checks by several participants, and tracks extended and
//! chained procedures that span several rolls. Resolution is pure: every
//! rolling function takes its random source as an argument, and
//! [`CheckSession`] is the optional host layer that owns one.
//!
//! ```
//! use tally_mechanics::{CheckRequest, CheckSession, DieSize, Modifier, ModifierCategory};
//!
//! let mut session = CheckSession::locked(42);
//! let request = CheckRequest::new(5, DieSize::D10, 3)
//!     .with_modifier(Modifier::dice(ModifierCategory::Equipment, 2));
//! let result = session.check(&request);
//! println!("{result}");
//! ```

pub mod check;
pub mod config;
pub mod dice;
pub mod error;
pub mod modifier;
pub mod procedure;
pub mod resolution;
pub mod session;
pub mod testing;

pub use check::{
    CheckRecord, CheckRequest, ResolvedPool, RngContext, aggregate, resolve_check,
    resolve_check_traced,
};
pub use config::{ResolutionConfig, SessionConfig, SuccessThresholds};
pub use dice::{AdvantageState, DicePool, DieFace, DieSize, DieSource, RollResult};
pub use error::{MechError, MechResult};
pub use modifier::{Modifier, ModifierCategory, ModifierDuration};
pub use procedure::{ChainStep, ChainedCheck, ChainedStatus, ExtendedCheck, ExtendedStatus, RetryPolicy};
pub use resolution::{
    CheckOutcome, CheckResult, ContestedOutcome, ContestedResult, CooperationMode, MarginBands,
    classify, classify_with, resolve_contested, resolve_cooperative,
};
pub use session::{CheckSession, LogEntry};
