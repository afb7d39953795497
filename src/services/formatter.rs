use std::fmt::Write;

use super::knowledge::MedicalInfo;

/// Sentence that closes every knowledge-base answer.
pub const FULL_DISCLAIMER: &str = "DISCLAIMER: This information is for educational purposes only and is not a substitute for professional medical advice. Always consult with a qualified healthcare provider for medical advice, diagnosis, or treatment.";

pub const SEPARATOR: &str = "---";

/// Render a knowledge entry as a chat-friendly text block.
pub fn format_medical_response(info: &MedicalInfo) -> String {
    let mut out = String::new();

    // Writing into a String never fails.
    let _ = writeln!(out, "Here's information about {}:\n", info.condition);
    let _ = writeln!(out, "{}\n", info.description);

    out.push_str("Common Symptoms:\n");
    for symptom in info.symptoms {
        let _ = writeln!(out, "• {symptom}");
    }

    out.push_str("\nPreventive Measures:\n");
    for measure in info.preventive_measures {
        let _ = writeln!(out, "• {measure}");
    }

    let _ = writeln!(out, "\nWhen to See a Doctor:\n{}\n", info.when_to_see_doctor);

    out.push_str(SEPARATOR);
    out.push('\n');
    out.push_str(FULL_DISCLAIMER);

    tracing::debug!(condition = info.condition, len = out.len(), "formatted medical response");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::knowledge::lookup;

    #[test]
    fn sections_appear_in_order() {
        let text = format_medical_response(lookup("cold").unwrap());

        let intro = text.find("Here's information about Common Cold:").unwrap();
        let symptoms = text.find("Common Symptoms:\n• Runny or stuffy nose").unwrap();
        let prevent = text.find("Preventive Measures:\n• Wash your hands frequently").unwrap();
        let doctor = text.find("When to See a Doctor:\n").unwrap();
        let sep = text.rfind("\n---\n").unwrap();

        assert!(intro < symptoms && symptoms < prevent && prevent < doctor && doctor < sep);
        assert!(text.ends_with(FULL_DISCLAIMER));
    }
}
