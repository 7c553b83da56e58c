//! Property-based tests for history translation
//!
//! - Dialogue turns keep their order and text
//! - System notices never reach the provider
//! - Roles map one-to-one

use super::*;
use crate::persona::DEMO_NOTICE;
use chrono::Utc;
use proptest::prelude::*;

fn arb_message() -> impl Strategy<Value = (Role, String, bool)> {
    (
        prop_oneof![Just(Role::User), Just(Role::Assistant)],
        "[a-zA-Z0-9 ¿?¡!áéíóúñ*]{0,40}",
        prop::bool::weighted(0.2),
    )
}

fn build(entries: &[(Role, String, bool)]) -> Vec<Message> {
    entries
        .iter()
        .enumerate()
        .map(|(i, (role, text, notice))| Message {
            sequence: i as i64 + 1,
            role: *role,
            content: if *notice && *role == Role::Assistant {
                format!("{text}{DEMO_NOTICE}")
            } else {
                text.clone()
            },
            created_at: Utc::now(),
        })
        .collect()
}

proptest! {
    #[test]
    fn prop_translation_preserves_dialogue_order(entries in prop::collection::vec(arb_message(), 0..20)) {
        let messages = build(&entries);
        let turns = translate_history(&messages);

        let expected: Vec<ProviderTurn> = messages
            .iter()
            .filter(|m| !is_system_notice(&m.content))
            .map(|m| match m.role {
                Role::User => ProviderTurn::user(m.content.clone()),
                Role::Assistant => ProviderTurn::model(m.content.clone()),
            })
            .collect();
        prop_assert_eq!(turns, expected);
    }

    #[test]
    fn prop_no_notice_reaches_provider(entries in prop::collection::vec(arb_message(), 0..20)) {
        let turns = translate_history(&build(&entries));
        prop_assert!(turns.iter().all(|t| !is_system_notice(&t.text)));
    }

    #[test]
    fn prop_translation_never_grows(entries in prop::collection::vec(arb_message(), 0..20)) {
        let messages = build(&entries);
        let turns = translate_history(&messages);
        prop_assert!(turns.len() <= messages.len());

        let users_in = messages.iter().filter(|m| m.is_user()).count();
        let users_out = turns.iter().filter(|t| t.role == ProviderRole::User).count();
        prop_assert_eq!(users_in, users_out);
    }
}
