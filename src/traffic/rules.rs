//! Right-of-way rules at a four-way intersection with a single light.

use super::{
    action::Action,
    percept::{Light, Percept},
};

/// Whether `action` is legal given what the cab senses.
///
/// - forward needs a green light
/// - left needs a green light and oncoming traffic that is absent or also
///   turning left
/// - right is allowed on green, or on red unless a car from the left is
///   going straight through
/// - waiting is always legal
pub fn is_legal(percept: &Percept, action: Action) -> bool {
    let green = percept.light == Light::Green;
    match action {
        Action::Forward => green,
        Action::Left => green && matches!(percept.oncoming, None | Some(Action::Left)),
        Action::Right => green || percept.left != Some(Action::Forward),
        Action::None => true,
    }
}

/// All legal actions in table order.
pub fn legal_actions(percept: &Percept) -> Vec<Action> {
    Action::ALL
        .into_iter()
        .filter(|&action| is_legal(percept, action))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_red_light_allows_only_right_and_wait() {
        let percept = Percept::clear(Light::Red);
        assert_eq!(legal_actions(&percept), vec![Action::Right, Action::None]);
    }

    #[test]
    fn test_right_on_red_blocked_by_cross_traffic() {
        let percept = Percept::clear(Light::Red).with_left(Action::Forward);
        assert!(!is_legal(&percept, Action::Right));
        let percept = Percept::clear(Light::Red).with_left(Action::Right);
        assert!(is_legal(&percept, Action::Right));
    }

    #[test]
    fn test_left_yields_to_oncoming() {
        let base = Percept::clear(Light::Green);
        assert!(is_legal(&base, Action::Left));
        assert!(is_legal(&base.with_oncoming(Action::Left), Action::Left));
        assert!(!is_legal(&base.with_oncoming(Action::Forward), Action::Left));
        assert!(!is_legal(&base.with_oncoming(Action::Right), Action::Left));
    }

    #[test]
    fn test_green_allows_every_move_without_traffic() {
        assert_eq!(
            legal_actions(&Percept::clear(Light::Green)),
            Action::ALL.to_vec()
        );
    }
}
