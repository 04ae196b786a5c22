use crate::history::Turn;

/// The last `size` turns, oldest first. Older turns are dropped, never summarized.
pub fn recent_turns(history: &[Turn], size: usize) -> &[Turn] {
    let start = history.len().saturating_sub(size);
    &history[start..]
}
