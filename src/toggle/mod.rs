mod reconciler;
mod settle;

pub use reconciler::{ToggleAction, ToggleOutcome, ToggleReconciler};
pub use settle::{PollSettings, SettleStrategy};
