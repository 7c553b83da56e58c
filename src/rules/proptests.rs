//! Property-based tests for the rule engine
//!
//! - Totality: any input yields a non-empty reply and never panics
//! - Marked actions always land in the action set
//! - A reply always belongs to the set of the category the input matched

use super::*;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn arb_action_text() -> impl Strategy<Value = String> {
    ("[a-zA-Z ]{0,10}", "[a-zA-Záéíóú]{1,20}", "[a-zA-Z ]{0,10}", 0usize..3).prop_map(
        |(before, inner, after, style)| {
            let (open, close) = [('*', '*'), ('[', ']'), ('(', ')')][style];
            format!("{before}{open}{inner}{close}{after}")
        },
    )
}

proptest! {
    #[test]
    fn prop_classify_is_total(input in any::<String>(), seed in any::<u64>()) {
        let engine = RuleEngine::default();
        let reply = engine.classify(&input, &mut StdRng::seed_from_u64(seed));
        prop_assert!(!reply.trim().is_empty());
    }

    #[test]
    fn prop_marked_actions_get_action_replies(input in arb_action_text(), seed in any::<u64>()) {
        let engine = RuleEngine::default();
        prop_assert_eq!(engine.category_of(&input), CategoryName::Action);

        let reply = engine.classify(&input, &mut StdRng::seed_from_u64(seed));
        prop_assert!(engine.responses(CategoryName::Action).contains(&reply.as_str()));
    }

    #[test]
    fn prop_reply_comes_from_matched_category(input in "[a-zA-Z ,.!?¿¡]{0,30}", seed in any::<u64>()) {
        let engine = RuleEngine::default();
        let name = engine.category_of(&input);
        let reply = engine.classify(&input, &mut StdRng::seed_from_u64(seed));

        let candidates: Vec<String> = engine
            .responses(name)
            .iter()
            .map(|template| template.replace(INPUT_PLACEHOLDER, input.trim()))
            .collect();
        prop_assert!(candidates.contains(&reply), "{:?} -> {:?}", name, reply);
    }
}
