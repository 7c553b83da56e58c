//! Property-based tests for the conversation log
//!
//! - Reads return appends in call order, and the count matches
//! - A snapshot restores role, content and order exactly

use super::*;
use proptest::prelude::*;

fn arb_role() -> impl Strategy<Value = Role> {
    prop_oneof![Just(Role::User), Just(Role::Assistant)]
}

/// Content with the characters most likely to break an SQL script:
/// quotes, semicolons, newlines, comment markers and non-ASCII text
fn arb_content() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 ,.!?¿¡áéíóúñ]{0,40}",
        "[';\\-\\n*()\\[\\]a-z]{0,40}",
        any::<String>(),
    ]
}

fn arb_turns() -> impl Strategy<Value = Vec<(Role, String)>> {
    prop::collection::vec((arb_role(), arb_content()), 0..20)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_read_all_returns_appends_in_order(turns in arb_turns()) {
        let db = Database::open_in_memory().unwrap();
        for (role, content) in &turns {
            db.append(*role, content).unwrap();
        }

        let messages = db.read_all().unwrap();
        prop_assert_eq!(messages.len(), turns.len());
        for (msg, (role, content)) in messages.iter().zip(&turns) {
            prop_assert_eq!(msg.role, *role);
            prop_assert_eq!(&msg.content, content);
        }
        prop_assert!(messages.windows(2).all(|w| w[0].sequence < w[1].sequence));
    }

    #[test]
    fn prop_count_resets_after_clear(before in arb_turns(), after in arb_turns()) {
        let db = Database::open_in_memory().unwrap();
        for (role, content) in &before {
            db.append(*role, content).unwrap();
        }
        db.clear().unwrap();
        for (role, content) in &after {
            db.append(*role, content).unwrap();
        }
        prop_assert_eq!(db.message_count().unwrap(), after.len());
    }

    #[test]
    fn prop_snapshot_restores_log_exactly(turns in arb_turns()) {
        let db = Database::open_in_memory().unwrap();
        for (role, content) in &turns {
            db.append(*role, content).unwrap();
        }
        let before = db.read_all().unwrap();

        let bytes = db.export().unwrap();
        let target = Database::open_in_memory().unwrap();
        target.append(Role::User, "será reemplazado").unwrap();
        target.import(&bytes).unwrap();

        prop_assert_eq!(target.read_all().unwrap(), before);
    }
}
