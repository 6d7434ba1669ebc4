//! Follow edge model and the checks guarding edge creation and removal.

use super::UserId;

/// Message reported when the target username does not resolve.
pub const TARGET_MISSING_MESSAGE: &str = "You cannot follow a user that does not exist.";
/// Message reported when an actor targets itself.
pub const SELF_FOLLOW_MESSAGE: &str = "You cannot follow yourself.";

/// Directed relationship: `follower` follows `following`.
///
/// ## Invariants
/// - `follower != following`.
/// - At most one edge exists per ordered pair; storage enforces this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FollowEdge {
    /// The actor doing the following.
    pub follower: UserId,
    /// The user being followed.
    pub following: UserId,
}

impl FollowEdge {
    /// Build an edge between two users.
    pub fn new(follower: UserId, following: UserId) -> Self {
        Self {
            follower,
            following,
        }
    }

    /// True when both ends name the same user.
    pub fn is_self_edge(&self) -> bool {
        self.follower == self.following
    }
}

/// Edge mutation requested by an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowAction {
    /// Create an edge; it must not exist yet.
    Follow,
    /// Remove an edge; it must already exist.
    Unfollow,
}

impl FollowAction {
    /// Message reported when the edge is in the wrong state for this action.
    pub fn edge_state_message(self) -> &'static str {
        match self {
            Self::Follow => "You already follow this user.",
            Self::Unfollow => "You cannot stop following a user that you do not already follow.",
        }
    }

    /// True when an edge in state `exists` blocks this action.
    fn is_blocked_by(self, exists: bool) -> bool {
        match self {
            Self::Follow => exists,
            Self::Unfollow => !exists,
        }
    }

    /// Collect every violated rule for this action.
    ///
    /// `target` is the resolved target id, `None` when the username does not
    /// exist. `edge_exists` is only consulted when the target resolved.
    ///
    /// # Examples
    /// ```
    /// use postapp::domain::{FollowAction, UserId};
    ///
    /// let me = UserId::random();
    /// let errors = FollowAction::Follow.violations(me, Some(me), false);
    /// assert_eq!(errors, ["You cannot follow yourself."]);
    /// ```
    pub fn violations(self, actor: UserId, target: Option<UserId>, edge_exists: bool) -> Vec<String> {
        let mut errors = Vec::new();
        let Some(target) = target else {
            errors.push(TARGET_MISSING_MESSAGE.to_owned());
            return errors;
        };
        if self.is_blocked_by(edge_exists) {
            errors.push(self.edge_state_message().to_owned());
        }
        if FollowEdge::new(actor, target).is_self_edge() {
            errors.push(SELF_FOLLOW_MESSAGE.to_owned());
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn missing_target_reports_only_existence() {
        let me = UserId::random();
        assert_eq!(
            FollowAction::Follow.violations(me, None, true),
            vec![TARGET_MISSING_MESSAGE]
        );
        assert_eq!(
            FollowAction::Unfollow.violations(me, None, false),
            vec![TARGET_MISSING_MESSAGE]
        );
    }

    #[rstest]
    #[case(FollowAction::Follow, true, vec!["You already follow this user."])]
    #[case(FollowAction::Follow, false, vec![])]
    #[case(FollowAction::Unfollow, false, vec!["You cannot stop following a user that you do not already follow."])]
    #[case(FollowAction::Unfollow, true, vec![])]
    fn edge_state_is_checked_per_action(
        #[case] action: FollowAction,
        #[case] edge_exists: bool,
        #[case] expected: Vec<&str>,
    ) {
        let errors = action.violations(UserId::random(), Some(UserId::random()), edge_exists);
        assert_eq!(errors, expected);
    }

    #[rstest]
    #[case(FollowAction::Follow)]
    #[case(FollowAction::Unfollow)]
    fn self_target_always_fails(#[case] action: FollowAction) {
        let me = UserId::random();
        let errors = action.violations(me, Some(me), false);
        assert!(errors.iter().any(|message| message == SELF_FOLLOW_MESSAGE));
    }

    #[rstest]
    fn violations_accumulate_in_order() {
        let me = UserId::random();
        assert_eq!(
            FollowAction::Unfollow.violations(me, Some(me), false),
            vec![
                "You cannot stop following a user that you do not already follow.",
                SELF_FOLLOW_MESSAGE,
            ]
        );
    }
}
