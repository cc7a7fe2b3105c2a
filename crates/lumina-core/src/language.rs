//! Supported answer languages and their system prompts.
//!
//! This is the one place a language code is turned into a prompt. The
//! dispatcher, the HTTP routes and the CLI all go through
//! [`system_prompt_for`].

use serde::Serialize;

// ─────────────────────────────────────────────
// Language
// ─────────────────────────────────────────────

/// A language Lumina can answer in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Language {
    En,
    Hi,
    Ta,
    Te,
}

/// All supported languages, in display order.
pub const LANGUAGES: &[Language] = &[Language::En, Language::Hi, Language::Ta, Language::Te];

impl Language {
    /// Look up a language by its short code (`"en"`, `"hi"`, …).
    ///
    /// Matching is case-insensitive and ignores a region suffix, so
    /// `"hi-IN"` resolves to Hindi.
    pub fn parse(code: &str) -> Option<Self> {
        let base = code.trim().split(['-', '_']).next().unwrap_or_default();
        LANGUAGES
            .iter()
            .copied()
            .find(|lang| lang.code().eq_ignore_ascii_case(base))
    }

    /// Like [`Language::parse`], but unknown codes fall back to English.
    pub fn from_code(code: &str) -> Self {
        Self::parse(code).unwrap_or(Language::En)
    }

    /// Short code used on the wire.
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
            Language::Ta => "ta",
            Language::Te => "te",
        }
    }

    /// English name of the language.
    pub fn name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Hi => "Hindi",
            Language::Ta => "Tamil",
            Language::Te => "Telugu",
        }
    }

    /// Name of the language written in itself.
    pub fn local_name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Hi => "हिंदी",
            Language::Ta => "தமிழ்",
            Language::Te => "తెలుగు",
        }
    }

    /// BCP-47 locale the browser speech APIs expect.
    pub fn speech_locale(self) -> &'static str {
        match self {
            Language::En => "en-US",
            Language::Hi => "hi-IN",
            Language::Ta => "ta-IN",
            Language::Te => "te-IN",
        }
    }

    /// The assistant persona prompt, written in this language.
    pub fn system_prompt(self) -> &'static str {
        match self {
            Language::En => "You are Lumina, a friendly and helpful assistant for college teachers. Answer concisely and clearly in English. Focus on educational content, teaching strategies, and academic guidance.",
            Language::Hi => "आप लुमिना हैं, कॉलेज के शिक्षकों के लिए एक मित्रवत और सहायक सहायक। हिंदी में संक्षेप में और स्पष्ट रूप से उत्तर दें। शैक्षणिक सामग्री, शिक्षण रणनीतियों और शैक्षणिक मार्गदर्शन पर ध्यान दें।",
            Language::Ta => "நீங்கள் லுமினா, கல்லூரி ஆசிரியர்களுக்கான நட்பு மற்றும் உதவிகரமான உதவியாளர். தமிழில் சுருக்கமாகவும் தெளிவாகவும் பதிலளிக்கவும். கல்வி உள்ளடக்கம், கற்பித்தல் உத்திகள் மற்றும் கல்வி வழிகாட்டுதலில் கவனம் செலுத்துங்கள்.",
            Language::Te => "మీరు లుమినా, కాలేజీ ఉపాధ్యాయులకు స్నేహపూర్వక మరియు సహాయక సహాయకుడు. తెలుగులో సంక్షిప్తంగా మరియు స్పష్టంగా సమాధానం ఇవ్వండి. విద్యా కంటెంట్, బోధనా వ్యూహాలు మరియు విద్యా మార్గదర్శకత్వంపై దృష్టి సారించండి.",
        }
    }

    /// Flag emoji shown next to the language in pickers.
    pub fn flag(self) -> &'static str {
        match self {
            Language::En => "🇺🇸",
            Language::Hi | Language::Ta | Language::Te => "🇮🇳",
        }
    }

    /// Serializable summary for the languages endpoint.
    pub fn info(self) -> LanguageInfo {
        LanguageInfo {
            code: self.code(),
            name: self.name(),
            flag: self.flag(),
            local_name: self.local_name(),
            speech_locale: self.speech_locale(),
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::En
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Wire representation of a [`Language`].
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LanguageInfo {
    pub code: &'static str,
    pub name: &'static str,
    pub flag: &'static str,
    pub local_name: &'static str,
    pub speech_locale: &'static str,
}

/// Resolve the system prompt for a language code, falling back to English.
pub fn system_prompt_for(code: &str) -> &'static str {
    Language::from_code(code).system_prompt()
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
