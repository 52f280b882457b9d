//! Deterministic plurality vote

use crate::models::signal::Action;

/// Most frequent action in `votes`.
///
/// Ties go to the action whose first occurrence comes earliest, so the
/// result depends only on the order of the input. `None` for no votes.
pub fn plurality(votes: &[Action]) -> Option<Action> {
    let mut tally: Vec<(Action, usize)> = Vec::with_capacity(3);
    for &vote in votes {
        match tally.iter_mut().find(|(action, _)| *action == vote) {
            Some((_, count)) => *count += 1,
            None => tally.push((vote, 1)),
        }
    }

    // `max_by_key` keeps the last maximum, so fold by hand to keep the first.
    tally
        .into_iter()
        .fold(None, |best: Option<(Action, usize)>, (action, count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((action, count)),
        })
        .map(|(action, _)| action)
}
