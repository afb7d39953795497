// src/services/knowledge.rs
//! Static medical knowledge table used by the fallback responder.
//!
//! Entries are stored in a fixed order. When a query could match more than
//! one entry, the earlier entry in [`KNOWLEDGE_BASE`] wins.

#[derive(Debug, PartialEq, Eq)]
pub struct MedicalInfo {
    pub condition: &'static str,
    pub description: &'static str,
    pub symptoms: &'static [&'static str],
    pub preventive_measures: &'static [&'static str],
    pub when_to_see_doctor: &'static str,
}

/// Lowercase keyword -> entry, in match priority order.
pub static KNOWLEDGE_BASE: &[(&str, MedicalInfo)] = &[
    (
        "headache",
        MedicalInfo {
            condition: "Headache",
            description: "Headaches are pain in any region of the head. They may occur on one or both sides of the head, be isolated to a certain location, radiate across the head, or have a viselike quality.",
            symptoms: &[
                "Pain in the head or face",
                "Throbbing or constant pain",
                "Pain on one or both sides",
                "Sensitivity to light or sound",
                "Nausea or vomiting (in severe cases)",
            ],
            preventive_measures: &[
                "Stay hydrated",
                "Get adequate sleep",
                "Manage stress",
                "Maintain regular physical activity",
                "Avoid known triggers (certain foods, alcohol, etc.)",
            ],
            when_to_see_doctor: "See a doctor if you have severe headaches, headaches that wake you from sleep, headaches with fever, stiff neck, confusion, or headaches after a head injury.",
        },
    ),
    (
        "cold",
        MedicalInfo {
            condition: "Common Cold",
            description: "The common cold is a viral infection of your nose and throat (upper respiratory tract). It's usually harmless, although it might not feel that way.",
            symptoms: &[
                "Runny or stuffy nose",
                "Sore throat",
                "Cough",
                "Congestion",
                "Slight body aches or a mild headache",
                "Sneezing",
                "Low-grade fever",
                "Generally feeling unwell",
            ],
            preventive_measures: &[
                "Wash your hands frequently",
                "Avoid close contact with anyone who has a cold",
                "Keep your hands away from your eyes, nose and mouth",
                "Clean and disinfect surfaces",
                "Strengthen your immune system with a healthy diet and regular exercise",
            ],
            when_to_see_doctor: "See a doctor if symptoms last more than 10 days, you have a high fever, or symptoms are severe or unusual.",
        },
    ),
    (
        "flu",
        MedicalInfo {
            condition: "Influenza (Flu)",
            description: "Influenza is a viral infection that attacks your respiratory system — your nose, throat and lungs. Influenza is commonly called the flu.",
            symptoms: &[
                "Fever over 100.4°F (38°C)",
                "Aching muscles",
                "Chills and sweats",
                "Headache",
                "Dry, persistent cough",
                "Shortness of breath",
                "Tiredness and weakness",
                "Runny or stuffy nose",
                "Sore throat",
                "Eye pain",
                "Vomiting and diarrhea (more common in children)",
            ],
            preventive_measures: &[
                "Get a flu vaccine every year",
                "Wash your hands",
                "Contain your coughs and sneezes",
                "Avoid crowds during flu season",
                "Strengthen your immune system with healthy habits",
            ],
            when_to_see_doctor: "Seek medical attention if you have difficulty breathing, persistent chest pain, ongoing dizziness, seizures, severe weakness, or worsening of existing medical conditions.",
        },
    ),
    (
        "diabetes",
        MedicalInfo {
            condition: "Diabetes",
            description: "Diabetes is a disease that occurs when your blood glucose, also called blood sugar, is too high. Blood glucose is your main source of energy and comes from the food you eat.",
            symptoms: &[
                "Increased thirst",
                "Frequent urination",
                "Extreme hunger",
                "Unexplained weight loss",
                "Fatigue",
                "Irritability",
                "Blurred vision",
                "Slow-healing sores",
                "Frequent infections",
            ],
            preventive_measures: &[
                "Maintain a healthy weight",
                "Be physically active",
                "Eat a balanced diet with plenty of fiber",
                "Avoid sugary foods and refined carbohydrates",
                "Quit smoking",
                "Limit alcohol consumption",
            ],
            when_to_see_doctor: "See a doctor if you notice any of the symptoms of diabetes. Early diagnosis and treatment can prevent complications.",
        },
    ),
    (
        "hypertension",
        MedicalInfo {
            condition: "Hypertension (High Blood Pressure)",
            description: "Hypertension is a common condition in which the long-term force of the blood against your artery walls is high enough that it may eventually cause health problems, such as heart disease.",
            symptoms: &[
                "Most people have no symptoms, even if blood pressure readings reach dangerously high levels",
                "Some people may have headaches",
                "Shortness of breath",
                "Nosebleeds",
            ],
            preventive_measures: &[
                "Eat a healthy diet with less salt",
                "Maintain a healthy weight",
                "Be physically active",
                "Limit alcohol consumption",
                "Don't smoke",
                "Manage stress",
                "Monitor your blood pressure regularly",
            ],
            when_to_see_doctor: "Have your blood pressure checked at least every two years if it's normal, or more frequently if it's elevated or if you have other risk factors for heart disease.",
        },
    ),
];

pub fn entries() -> impl Iterator<Item = &'static MedicalInfo> {
    KNOWLEDGE_BASE.iter().map(|(_, info)| info)
}

pub fn keywords() -> impl Iterator<Item = &'static str> {
    KNOWLEDGE_BASE.iter().map(|(key, _)| *key)
}

/// Find the best entry for a free-text query, returning its keyword too.
pub fn lookup_with_key(query: &str) -> Option<(&'static str, &'static MedicalInfo)> {
    let query = query.trim().to_lowercase();

    // 1. exact keyword
    if let Some((key, info)) = KNOWLEDGE_BASE.iter().find(|(key, _)| *key == query) {
        return Some((*key, info));
    }

    // 2. keyword anywhere in the query
    if let Some((key, info)) = KNOWLEDGE_BASE.iter().find(|(key, _)| query.contains(*key)) {
        return Some((*key, info));
    }

    // 3. display name
    if let Some((key, info)) = KNOWLEDGE_BASE
        .iter()
        .find(|(_, info)| query.contains(&info.condition.to_lowercase()))
    {
        return Some((*key, info));
    }

    // 4. any listed symptom
    KNOWLEDGE_BASE
        .iter()
        .find(|(_, info)| {
            info.symptoms
                .iter()
                .any(|symptom| query.contains(&symptom.to_lowercase()))
        })
        .map(|(key, info)| (*key, info))
}

pub fn lookup(query: &str) -> Option<&'static MedicalInfo> {
    lookup_with_key(query).map(|(_, info)| info)
}
