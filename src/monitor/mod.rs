pub mod scheduler;
pub mod target;

pub use scheduler::{RunContext, Scheduler};
pub use target::{Target, ThrottlePolicy};

/// Pad or truncate a host so log lines line up.
pub fn to_fixed_width(input: &str, width: usize) -> String {
    use unicode_truncate::UnicodeTruncateStr;

    let (truncated, _) = input.unicode_truncate(width);
    format!("{:<width$}", truncated, width = width)
}
