// src/services/fallback.rs
use super::formatter::{SEPARATOR, format_medical_response};
use super::knowledge::lookup_with_key;

/// Disclaimer closing the generic answers. The knowledge-base answers use the
/// longer [`FULL_DISCLAIMER`](super::formatter::FULL_DISCLAIMER), which starts
/// with this sentence.
pub const DISCLAIMER: &str = "DISCLAIMER: This information is for educational purposes only and is not a substitute for professional medical advice.";

const SYMPTOMS_ANSWER: &str = "About symptoms in general:\n\nSymptoms can vary widely depending on the condition. It's important to consult with a healthcare provider for proper diagnosis. Can you tell me more about the specific symptoms you're concerned about?";

const TREATMENT_ANSWER: &str = "About treatments in general:\n\nTreatment options depend on the specific condition, its severity, and individual factors. It's best to consult with a healthcare provider for personalized treatment recommendations.";

const PREVENTION_ANSWER: &str = "About prevention in general:\n\nGeneral preventive measures for many health conditions include:\n• Maintaining a healthy diet\n• Regular physical activity\n• Adequate sleep\n• Stress management\n• Avoiding tobacco\n• Limiting alcohol\n\nFor specific conditions, please consult with a healthcare provider.";

const DEFAULT_ANSWER: &str = "I don't have specific information about that in my knowledge base. For accurate medical advice, please consult with a healthcare professional.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    Knowledge(&'static str),
    Symptoms,
    Treatment,
    Prevention,
    Default,
}

impl ResponseKind {
    pub fn label(&self) -> &'static str {
        match self {
            ResponseKind::Knowledge(_) => "knowledge",
            ResponseKind::Symptoms => "symptoms",
            ResponseKind::Treatment => "treatment",
            ResponseKind::Prevention => "prevention",
            ResponseKind::Default => "default",
        }
    }
}

pub fn classify(query: &str) -> ResponseKind {
    if let Some((key, _)) = lookup_with_key(query) {
        return ResponseKind::Knowledge(key);
    }

    let q = query.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| q.contains(w));

    if has(&["symptom", "sign"]) {
        ResponseKind::Symptoms
    } else if has(&["treatment", "cure", "medicine"]) {
        ResponseKind::Treatment
    } else if has(&["prevent", "avoid"]) {
        ResponseKind::Prevention
    } else {
        ResponseKind::Default
    }
}

/// Answer a query from the local knowledge table, reporting which branch answered.
pub fn answer(query: &str) -> (ResponseKind, String) {
    let kind = classify(query);

    let text = match kind {
        ResponseKind::Knowledge(key) => match lookup_with_key(key) {
            Some((_, info)) => format_medical_response(info),
            None => with_disclaimer(DEFAULT_ANSWER),
        },
        ResponseKind::Symptoms => with_disclaimer(SYMPTOMS_ANSWER),
        ResponseKind::Treatment => with_disclaimer(TREATMENT_ANSWER),
        ResponseKind::Prevention => with_disclaimer(PREVENTION_ANSWER),
        ResponseKind::Default => with_disclaimer(DEFAULT_ANSWER),
    };

    (kind, text)
}

/// Never empty, and always closed by a disclaimer.
pub fn generate_response(query: &str) -> String {
    answer(query).1
}

pub fn with_disclaimer(body: &str) -> String {
    format!("{body}\n\n{SEPARATOR}\n{DISCLAIMER}")
}

pub fn has_disclaimer(text: &str) -> bool {
    text.contains(DISCLAIMER)
}

/// Append the disclaimer unless the text already carries it.
pub fn ensure_disclaimer(text: String) -> String {
    if has_disclaimer(&text) {
        text
    } else {
        with_disclaimer(&text)
    }
}

/// Words that mark a message as a health question.
pub const MEDICAL_KEYWORDS: &[&str] = &[
    "symptom", "disease", "condition", "treatment", "medicine", "diagnosis",
    "health", "medical", "doctor", "hospital", "clinic", "prescription",
    "pain", "fever", "cough", "headache", "allergy", "infection",
    "diabetes", "cancer", "heart", "blood", "pressure", "cholesterol",
    "vaccine", "prevention", "diet", "exercise", "nutrition",
];

pub fn is_medical_query(message: &str) -> bool {
    let lower = message.to_lowercase();
    if MEDICAL_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return true;
    }
    lower.contains("what is") && (lower.contains("health") || lower.contains("medical"))
}
