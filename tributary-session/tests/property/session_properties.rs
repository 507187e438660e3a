use chrono::Duration;
use proptest::prelude::*;

use tributary_core::models::{ConversationTurn, Role};
use tributary_session::SessionMemory;

fn arb_role() -> impl Strategy<Value = Role> {
    prop_oneof![Just(Role::User), Just(Role::Assistant), Just(Role::System)]
}

// ── Turns come back per session, in append order ─────────────────────────

proptest! {
    #[test]
    fn history_matches_recorded_sequence(
        ops in prop::collection::vec((0usize..4, arb_role(), "[a-z ]{0,12}"), 0..60),
    ) {
        let memory = SessionMemory::new(Duration::hours(1));
        let sessions = ["s0", "s1", "s2", "s3"];
        for (s, role, content) in &ops {
            memory.record(sessions[*s], *role, content.clone());
        }

        for (idx, id) in sessions.iter().enumerate() {
            let expected: Vec<ConversationTurn> = ops
                .iter()
                .filter(|(s, _, _)| *s == idx)
                .map(|(_, role, content)| ConversationTurn::new(*role, content.clone()))
                .collect();
            prop_assert_eq!(memory.get(id), expected);
        }
    }
}
