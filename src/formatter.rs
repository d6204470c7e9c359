//! SMS text composition for consultation content.
//!
//! Every message is one heading line, the content, and a fixed closing line.
//! The translated variant only differs by naming the language in the heading.

use tracing::warn;

/// Placeholder the frontend sends for fields the doctor left empty.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Hard ceiling on a composed SMS body, in characters.
pub const MAX_SMS_CHARS: usize = 1600;

pub const NUTRITION_PREVIEW_CHARS: usize = 150;
pub const SUMMARY_NUTRITION_PREVIEW_CHARS: usize = 100;

pub const DIAGNOSIS_SUFFIX: &str = "Please consult your doctor for any concerns.";
pub const MEDICINES_SUFFIX: &str = "Take as directed by doctor.";
pub const TRANSLATED_MEDICINES_SUFFIX: &str = "Take as directed by your doctor.";
pub const NUTRITION_SUFFIX: &str = "Follow this dietary advice for better recovery.";
pub const NOTES_SUFFIX: &str = "Please follow these instructions carefully.";
pub const SUMMARY_SUFFIX: &str = "Follow medical advice and consult your doctor for concerns.";

const ELLIPSIS: &str = "...";

/// Which part of the consultation a message carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Diagnosis,
    Medicines,
    Nutrition,
    Notes,
    All,
    Unknown,
}

impl MessageKind {
    /// Parse the `message_type` request field. Anything unrecognised maps to
    /// `Unknown`, which formats as a generic notice instead of failing.
    pub fn parse(value: &str) -> Self {
        match value {
            "diagnosis" => Self::Diagnosis,
            "medicines" => Self::Medicines,
            "nutrition" => Self::Nutrition,
            "notes" => Self::Notes,
            "all" => Self::All,
            _ => Self::Unknown,
        }
    }
}

/// The four free-text sections of a consultation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsultationContent {
    pub diagnosis: String,
    pub medicines: String,
    pub nutrition: String,
    pub notes: String,
}

impl ConsultationContent {
    /// Sections that carry real content, in message order.
    fn present_sections(&self) -> Vec<(&'static str, String)> {
        let mut sections = Vec::new();
        if is_present(&self.diagnosis) {
            sections.push(("Diagnosis", self.diagnosis.clone()));
        }
        if is_present(&self.medicines) {
            sections.push(("Medicines", self.medicines.clone()));
        }
        if is_present(&self.nutrition) {
            sections.push((
                "Nutrition",
                truncate_chars(&self.nutrition, SUMMARY_NUTRITION_PREVIEW_CHARS),
            ));
        }
        if is_present(&self.notes) {
            sections.push(("Notes", self.notes.clone()));
        }
        sections
    }
}

fn is_present(field: &str) -> bool {
    !field.is_empty() && field != NOT_SPECIFIED
}

/// Heading text, with the language in parentheses for translated content.
fn heading(label: &str, language_name: Option<&str>) -> String {
    match language_name {
        Some(name) => format!("{} ({})", label, name),
        None => label.to_string(),
    }
}

/// Format a message body for one kind of content.
///
/// Pass `language_name` when the content has already been translated so the
/// recipient can see which language they are reading.
pub fn format_message(
    kind: MessageKind,
    content: &ConsultationContent,
    language_name: Option<&str>,
) -> String {
    let single = |label: &str, body: &str, suffix: &str| {
        format!("{}: {}\n{}", heading(label, language_name), body, suffix)
    };

    match kind {
        MessageKind::Diagnosis => single("Medical Diagnosis", &content.diagnosis, DIAGNOSIS_SUFFIX),
        MessageKind::Medicines => {
            let suffix = match language_name {
                Some(_) => TRANSLATED_MEDICINES_SUFFIX,
                None => MEDICINES_SUFFIX,
            };
            single("Prescribed Medicines", &content.medicines, suffix)
        }
        MessageKind::Nutrition => single(
            "Nutrition Plan",
            &truncate_chars(&content.nutrition, NUTRITION_PREVIEW_CHARS),
            NUTRITION_SUFFIX,
        ),
        MessageKind::Notes => single("Important Notes", &content.notes, NOTES_SUFFIX),
        MessageKind::All => {
            let mut lines = vec![format!(
                "{}:",
                heading("Medical Consultation Summary", language_name)
            )];
            lines.extend(
                content
                    .present_sections()
                    .into_iter()
                    .map(|(label, text)| format!("{}: {}", label, text)),
            );
            lines.push(SUMMARY_SUFFIX.to_string());
            lines.join("\n")
        }
        MessageKind::Unknown => format!(
            "{}.",
            heading("Medical consultation information", language_name)
        ),
    }
}

/// Format a message and clamp it to the SMS length ceiling.
pub fn format_sms_body(
    kind: MessageKind,
    content: &ConsultationContent,
    language_name: Option<&str>,
) -> String {
    fit_sms_body(format_message(kind, content, language_name))
}

/// Clamp a body to `MAX_SMS_CHARS`, ending in an ellipsis when cut.
pub fn fit_sms_body(body: String) -> String {
    let length = body.chars().count();
    if length <= MAX_SMS_CHARS {
        return body;
    }

    warn!("Long SMS message detected: {} characters, truncating", length);
    let mut truncated: String = body.chars().take(MAX_SMS_CHARS - ELLIPSIS.len()).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}

/// Keep the first `max` characters, appending an ellipsis if anything was cut.
///
/// Counts characters rather than bytes; translated text is mostly
/// multi-byte Indic script.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
        None => text.to_string(),
    }
}
