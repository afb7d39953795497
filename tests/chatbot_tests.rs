use medchat_backend::services::fallback::{
    DISCLAIMER, ResponseKind, answer, classify, generate_response,
};
use medchat_backend::services::formatter::FULL_DISCLAIMER;
use medchat_backend::services::knowledge::{KNOWLEDGE_BASE, entries, lookup};

#[test]
fn test_headache_example() {
    let reply = generate_response("I have a headache");

    assert!(reply.contains("Headache"));
    assert!(reply.contains("Common Symptoms:\n• Pain in the head or face"));
    assert!(reply.ends_with(FULL_DISCLAIMER));
}

#[test]
fn test_every_key_answers_with_its_condition() {
    for (key, info) in KNOWLEDGE_BASE {
        let reply = generate_response(key);
        assert!(
            reply.contains(info.condition),
            "reply for '{key}' lacks '{}'",
            info.condition
        );
        assert!(reply.ends_with(FULL_DISCLAIMER));

        let padded = generate_response(&format!("tell me about {key} please"));
        assert!(padded.contains(info.condition));
    }
}

#[test]
fn test_default_response() {
    let (kind, reply) = answer("what should I do");
    assert_eq!(kind, ResponseKind::Default);
    assert!(reply.starts_with("I don't have specific information"));
    assert!(reply.ends_with(DISCLAIMER));
}

#[test]
fn test_generic_categories() {
    let reply = generate_response("What are the warning signs?");
    assert!(reply.starts_with("About symptoms in general:"));

    let reply = generate_response("Which medicine works best?");
    assert!(reply.starts_with("About treatments in general:"));

    let reply = generate_response("How can I prevent getting sick?");
    assert!(reply.starts_with("About prevention in general:"));
    assert!(reply.contains("• Adequate sleep"));
}

#[test]
fn test_no_reply_omits_the_disclaimer() {
    let queries = [
        "",
        "   ",
        "hello",
        "FLU",
        "I feel generally feeling unwell",
        "symptom",
        "cure",
        "avoid",
        "random text",
    ];
    for q in queries {
        let reply = generate_response(q);
        assert!(!reply.is_empty());
        assert!(
            reply.trim_end().ends_with(DISCLAIMER) || reply.ends_with(FULL_DISCLAIMER),
            "missing disclaimer for {q:?}"
        );
        assert!(reply.contains("\n---\nDISCLAIMER: "));
    }
}

#[test]
fn test_symptom_match_routes_to_condition() {
    assert_eq!(classify("I have extreme hunger"), ResponseKind::Knowledge("diabetes"));
    assert_eq!(lookup("nosebleeds").unwrap().condition, "Hypertension (High Blood Pressure)");
}

#[test]
fn test_table_order_is_fixed() {
    let conditions: Vec<_> = entries().map(|e| e.condition).collect();
    assert_eq!(
        conditions,
        [
            "Headache",
            "Common Cold",
            "Influenza (Flu)",
            "Diabetes",
            "Hypertension (High Blood Pressure)"
        ]
    );
}
