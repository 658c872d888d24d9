//! Supported conversation languages.
//!
//! Each language carries everything the chat assistant needs to localize a
//! session: the speech-recognition locale, the input placeholder, the
//! greeting that opens a transcript, the fallback reply used when the
//! generation service fails, and a short list of quick questions.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// A language the assistant can converse in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "hi")]
    Hindi,
    #[serde(rename = "or")]
    Odia,
}

impl Language {
    /// Every supported language, in menu order.
    pub const ALL: [Language; 3] = [Language::English, Language::Hindi, Language::Odia];

    /// Short ISO 639-1 code (`en`, `hi`, `or`).
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
            Language::Odia => "or",
        }
    }

    /// English name, used in the generation instruction.
    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
            Language::Odia => "Odia",
        }
    }

    /// Name of the language written in its own script.
    pub fn native_name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "हिन्दी",
            Language::Odia => "ଓଡ଼ିଆ",
        }
    }

    /// BCP 47 tag handed to the speech recognizer.
    pub fn speech_locale(&self) -> &'static str {
        match self {
            Language::English => "en-IN",
            Language::Hindi => "hi-IN",
            Language::Odia => "or-IN",
        }
    }

    /// Placeholder shown in the empty input field.
    pub fn placeholder(&self) -> &'static str {
        match self {
            Language::English => "Type your health question...",
            Language::Hindi => "अपना स्वास्थ्य प्रश्न लिखें...",
            Language::Odia => "ଆପଣଙ୍କ ସ୍ୱାସ୍ଥ୍ୟ ପ୍ରଶ୍ନ ଲେଖନ୍ତୁ...",
        }
    }

    /// Greeting that opens every transcript in this language.
    pub fn greeting(&self) -> &'static str {
        match self {
            Language::English => {
                "Namaste! I am your AI health assistant. How can I help you today? \
                 You can ask me about symptoms, find nearby healthcare facilities, \
                 or get guidance on government health schemes."
            }
            Language::Hindi => {
                "नमस्ते! मैं आपका AI स्वास्थ्य सहायक हूं। आज मैं आपकी क्या मदद कर सकता हूं? \
                 आप मुझसे लक्षणों के बारे में पूछ सकते हैं, नजदीकी स्वास्थ्य सुविधाएं खोज सकते हैं, \
                 या सरकारी स्वास्थ्य योजनाओं पर मार्गदर्शन पा सकते हैं।"
            }
            Language::Odia => {
                "ନମସ୍କାର! ମୁଁ ଆପଣଙ୍କର AI ସ୍ୱାସ୍ଥ୍ୟ ସହାୟକ। ଆଜି ମୁଁ ଆପଣଙ୍କୁ କିପରି ସାହାଯ୍ୟ କରିପାରିବି? \
                 ଆପଣ ମୋତେ ଲକ୍ଷଣ ବିଷୟରେ ପଚାରିପାରିବେ, ନିକଟସ୍ଥ ସ୍ୱାସ୍ଥ୍ୟ କେନ୍ଦ୍ର ଖୋଜିପାରିବେ, \
                 କିମ୍ବା ସରକାରୀ ସ୍ୱାସ୍ଥ୍ୟ ଯୋଜନା ବିଷୟରେ ମାର୍ଗଦର୍ଶନ ପାଇପାରିବେ।"
            }
        }
    }

    /// Reply appended when the generation service cannot answer.
    pub fn fallback_reply(&self) -> &'static str {
        match self {
            Language::English => {
                "I understand your concern. Please consult with your local ASHA worker \
                 or visit the nearest healthcare facility for proper medical advice."
            }
            Language::Hindi => {
                "मैं आपकी चिंता समझता हूं। उचित चिकित्सा सलाह के लिए कृपया अपने स्थानीय ASHA \
                 कार्यकर्ता से परामर्श करें या निकटतम स्वास्थ्य सुविधा में जाएं।"
            }
            Language::Odia => {
                "ମୁଁ ଆପଣଙ୍କ ଚିନ୍ତା ବୁଝୁଛି। ଉପଯୁକ୍ତ ଚିକିତ୍ସା ପରାମର୍ଶ ପାଇଁ ଦୟାକରି ଆପଣଙ୍କ ସ୍ଥାନୀୟ \
                 ASHA କର୍ମୀଙ୍କ ସହ ପରାମର୍ଶ କରନ୍ତୁ କିମ୍ବା ନିକଟତମ ସ୍ୱାସ୍ଥ୍ୟ କେନ୍ଦ୍ରକୁ ଯାଆନ୍ତୁ।"
            }
        }
    }

    /// Suggested prompts offered below the transcript.
    pub fn quick_questions(&self) -> &'static [&'static str] {
        match self {
            Language::English => &[
                "I have fever and headache",
                "My child is not eating well",
                "Where is the nearest hospital?",
                "How to apply for BSKY?",
                "What is ABHA number?",
            ],
            Language::Hindi => &[
                "मुझे बुखार और सिरदर्द है",
                "मेरा बच्चा ठीक से नहीं खा रहा है",
                "नजदीकी अस्पताल कहाँ है?",
                "BSKY के लिए आवेदन कैसे करें?",
                "ABHA नंबर क्या है?",
            ],
            Language::Odia => &[
                "ମୋର ଜ୍ୱର ଓ ମୁଣ୍ଡବିନ୍ଧା ହେଉଛି",
                "ମୋ ପିଲା ଠିକ୍ ଭାବରେ ଖାଉନାହିଁ",
                "ନିକଟତମ ଡାକ୍ତରଖାନା କେଉଁଠି?",
                "BSKY ପାଇଁ କିପରି ଆବେଦନ କରିବି?",
                "ABHA ନମ୍ବର କ'ଣ?",
            ],
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    /// Accepts the short code, the speech locale or the English name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Language::ALL
            .into_iter()
            .find(|lang| {
                wanted == lang.code()
                    || wanted == lang.speech_locale().to_lowercase()
                    || wanted == lang.name().to_lowercase()
            })
            .ok_or_else(|| format!("unsupported language: '{s}'"))
    }
}
