//! Intent router — free-text chat input to a canned reply and optional page.
//!
//! DESIGN
//! ======
//! An ordered, hand-authored rule list evaluated first-match-wins. Each rule
//! carries a keyword set, a response, and an optional destination page. The
//! order encodes priority ("admission" beats greeting keywords) and must not
//! be sorted. No scoring, no memory between calls: `resolve` is a pure
//! function of the lower-cased input.
//!
//! MATCHING
//! ========
//! `MatchMode::Substring` is plain containment and reproduces the legacy
//! widget exactly, including false positives such as "ma" inside "email".
//! `MatchMode::Word` anchors keywords at word starts and only tolerates a
//! plural suffix, or a free inflection for keywords of five or more letters.
//! One- and two-letter keywords must match a whole word.

use serde::Serialize;

/// Minimum keyword length that may be followed by an arbitrary inflection in
/// word mode ("enroll" → "enrollment"). Shorter keywords only take "s"/"es".
const INFLECTION_MIN_LEN: usize = 5;

/// Minimum keyword length that may take a plural suffix ("hi" must not match "his").
const PLURAL_MIN_LEN: usize = 3;

// =============================================================================
// DESTINATIONS
// =============================================================================

/// Closed set of site pages the router can send a visitor to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Destination {
    Application,
    Programs,
    Contact,
    Scholarships,
    Campus,
    News,
    Faculties,
    Leadership,
    Login,
    About,
    Results,
    Research,
    Achievements,
    Calendar,
    Requirements,
    AdmissionProcess,
    AdmissionsFaq,
}

impl Destination {
    pub const ALL: [Self; 17] = [
        Self::Application,
        Self::Programs,
        Self::Contact,
        Self::Scholarships,
        Self::Campus,
        Self::News,
        Self::Faculties,
        Self::Leadership,
        Self::Login,
        Self::About,
        Self::Results,
        Self::Research,
        Self::Achievements,
        Self::Calendar,
        Self::Requirements,
        Self::AdmissionProcess,
        Self::AdmissionsFaq,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Application => "application",
            Self::Programs => "programs",
            Self::Contact => "contact",
            Self::Scholarships => "scholarships",
            Self::Campus => "campus",
            Self::News => "news",
            Self::Faculties => "faculties",
            Self::Leadership => "leadership",
            Self::Login => "login",
            Self::About => "about",
            Self::Results => "results",
            Self::Research => "research",
            Self::Achievements => "achievements",
            Self::Calendar => "calendar",
            Self::Requirements => "requirements",
            Self::AdmissionProcess => "admission-process",
            Self::AdmissionsFaq => "admissions-faq",
        }
    }

    /// Site path for client-side navigation.
    #[must_use]
    pub fn path(self) -> String {
        format!("/{}", self.as_str())
    }

    /// Human-readable page title.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Application => "Application",
            Self::Programs => "Programs",
            Self::Contact => "Contact",
            Self::Scholarships => "Scholarships",
            Self::Campus => "Campus",
            Self::News => "News & Events",
            Self::Faculties => "Faculties",
            Self::Leadership => "Leadership",
            Self::Login => "Login",
            Self::About => "About",
            Self::Results => "Results",
            Self::Research => "Research",
            Self::Achievements => "Achievements",
            Self::Calendar => "Academic Calendar",
            Self::Requirements => "Admission Requirements",
            Self::AdmissionProcess => "Admission Process",
            Self::AdmissionsFaq => "Admissions FAQ",
        }
    }

    #[cfg(test)]
    #[must_use]
    pub fn from_str(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_str() == raw)
    }
}

// =============================================================================
// RULES
// =============================================================================

/// One (keywords, response, destination) entry of the routing table.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub keywords: &'static [&'static str],
    pub response: &'static str,
    pub destination: Option<Destination>,
}

pub const FALLBACK_RESPONSE: &str = "I'm not sure I understand your query. Could you please rephrase your question? You can ask about admissions, courses, scholarships, campus facilities, contact information, and more.";

/// Routing table in priority order. First match wins.
pub const RULES: &[Rule] = &[
    Rule {
        keywords: &["admission", "apply", "application", "enroll", "register", "join"],
        response: "You can apply for admission through our online application form. I can take you to our Application page.",
        destination: Some(Destination::Application),
    },
    Rule {
        keywords: &[
            "course", "program", "degree", "bca", "bcom", "bba", "bsc", "msc", "ma", "bachelor", "master",
        ],
        response: "We offer various undergraduate and postgraduate programs including BCA, BBA, BCOM, BSc IT, BSc CS, BSc Physics, BA in multiple subjects, and Masters programs. Let me take you to our Programs page where you can explore all available courses.",
        destination: Some(Destination::Programs),
    },
    Rule {
        keywords: &["contact", "reach", "talk to", "phone", "email", "address"],
        response: "You can contact us via our dedicated Contact page. Let me take you there.",
        destination: Some(Destination::Contact),
    },
    Rule {
        keywords: &[
            "scholarship",
            "financial aid",
            "fee concession",
            "discount",
            "waiver",
            "financial support",
        ],
        response: "We offer merit-based and need-based scholarships for various courses. Let me direct you to our Scholarships page.",
        destination: Some(Destination::Scholarships),
    },
    Rule {
        keywords: &["campus", "facility", "infrastructure", "hostel", "library", "lab"],
        response: "Our campus offers state-of-the-art facilities for students including modern classrooms, labs, library, and sports facilities. Let me show you our Campus page.",
        destination: Some(Destination::Campus),
    },
    Rule {
        keywords: &["news", "event", "happening", "update", "recent", "announcement"],
        response: "You can check out all our latest news and events on our News page. I can take you there.",
        destination: Some(Destination::News),
    },
    Rule {
        keywords: &["faculty", "professor", "teacher", "staff", "lecturer"],
        response: "We have excellent faculty members across all departments. Let me show you our Faculties page where you can learn about our professors and teaching staff.",
        destination: Some(Destination::Faculties),
    },
    Rule {
        keywords: &["principal", "director", "dean", "leadership", "management", "head"],
        response: "You can learn about our college leadership including the Principal, Directors, and Deans on the Leadership page. I can take you there.",
        destination: Some(Destination::Leadership),
    },
    Rule {
        keywords: &["login", "sign in", "account", "portal", "student login"],
        response: "You can access your student account through our login page. Let me take you there.",
        destination: Some(Destination::Login),
    },
    Rule {
        keywords: &["about", "history", "college info", "background", "establishment"],
        response: "You can learn more about our institution, its history, vision, and mission on our About page. Let me take you there.",
        destination: Some(Destination::About),
    },
    Rule {
        keywords: &["result", "grade", "mark", "score", "exam", "performance"],
        response: "You can check your examination results on our Results page. Let me direct you there.",
        destination: Some(Destination::Results),
    },
    Rule {
        keywords: &["research", "project", "publication", "paper", "journal", "innovation"],
        response: "You can explore our research activities, ongoing projects, and publications on our Research page. Let me take you there.",
        destination: Some(Destination::Research),
    },
    Rule {
        keywords: &["achievement", "award", "recognition", "honor", "accomplishment"],
        response: "You can see our college achievements, awards, and recognitions on the Achievements page. Let me show you.",
        destination: Some(Destination::Achievements),
    },
    Rule {
        keywords: &["calendar", "schedule", "timetable", "date", "academic calendar"],
        response: "You can view our academic calendar with important dates, events, and holidays on our Calendar page. Let me take you there.",
        destination: Some(Destination::Calendar),
    },
    Rule {
        keywords: &["requirement", "eligibility", "criteria", "qualification", "document"],
        response: "You can find detailed information about admission requirements and eligibility criteria on our Requirements page. Let me direct you there.",
        destination: Some(Destination::Requirements),
    },
    Rule {
        keywords: &["process", "procedure", "step", "how to apply", "admission guide"],
        response: "You can learn about our admission process and application steps on our Admission Process page. Let me take you there.",
        destination: Some(Destination::AdmissionProcess),
    },
    Rule {
        keywords: &[
            "hello",
            "hi",
            "hey",
            "greetings",
            "good morning",
            "good afternoon",
            "good evening",
        ],
        response: "Hello! How can I assist you today? You can ask me about admissions, programs, scholarships, campus facilities, or any other information about our college.",
        destination: None,
    },
    Rule {
        keywords: &["fee", "tuition", "cost", "price", "payment", "expense"],
        response: "Our fee structure varies by course. Please visit the Admission Process page for specific details about fees for different programs. Would you like me to take you there?",
        destination: Some(Destination::AdmissionProcess),
    },
    Rule {
        keywords: &["faq", "frequently asked", "common question"],
        response: "You can find answers to frequently asked questions on our Admissions FAQ page. Let me take you there.",
        destination: Some(Destination::AdmissionsFaq),
    },
    Rule {
        keywords: &["thank", "thanks", "appreciate"],
        response: "You're welcome! I'm glad I could help. Is there anything else you would like to know about our college?",
        destination: None,
    },
    Rule {
        keywords: &["help", "assist", "guide"],
        response: "I'd be happy to help! You can ask me about programs, admission process, scholarships, campus facilities, faculty, or any other aspect of our college. What information are you looking for today?",
        destination: None,
    },
];

// =============================================================================
// ROUTER
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Unanchored containment; legacy behavior.
    Substring,
    /// Word-anchored keywords with limited inflection.
    #[default]
    Word,
}

impl MatchMode {
    #[must_use]
    pub fn from_str(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "substring" => Some(Self::Substring),
            "word" => Some(Self::Word),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Substring => "substring",
            Self::Word => "word",
        }
    }
}

/// Outcome of routing one utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub response: &'static str,
    pub destination: Option<Destination>,
}

#[derive(Debug, Clone, Copy)]
pub struct IntentRouter {
    rules: &'static [Rule],
    mode: MatchMode,
}

impl IntentRouter {
    #[must_use]
    pub fn new(mode: MatchMode) -> Self {
        Self { rules: RULES, mode }
    }

    #[must_use]
    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Select the response for `input`. Never fails: no match yields the fallback.
    #[must_use]
    pub fn resolve(&self, input: &str) -> Resolution {
        let haystack = match self.mode {
            MatchMode::Substring => input.to_lowercase(),
            MatchMode::Word => normalize_words(input),
        };

        self.rules
            .iter()
            .find(|rule| rule.keywords.iter().any(|kw| self.matches(&haystack, kw)))
            .map_or(Resolution { response: FALLBACK_RESPONSE, destination: None }, |rule| Resolution {
                response: rule.response,
                destination: rule.destination,
            })
    }

    fn matches(&self, haystack: &str, keyword: &str) -> bool {
        match self.mode {
            MatchMode::Substring => haystack.contains(keyword),
            MatchMode::Word => contains_word(haystack, keyword),
        }
    }
}

impl Default for IntentRouter {
    fn default() -> Self {
        Self::new(MatchMode::default())
    }
}

// =============================================================================
// WORD MATCHING
// =============================================================================

/// Lower-case, collapse every run of non-alphanumerics into one space, and pad
/// with a leading space so each word start is preceded by `' '`.
pub(crate) fn normalize_words(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 2);
    out.push(' ');
    for ch in input.chars().flat_map(char::to_lowercase) {
        if ch.is_alphanumeric() {
            out.push(ch);
        } else if !out.ends_with(' ') {
            out.push(' ');
        }
    }
    if !out.ends_with(' ') {
        out.push(' ');
    }
    out
}

/// `haystack` must come from `normalize_words`.
pub(crate) fn contains_word(haystack: &str, keyword: &str) -> bool {
    if keyword.is_empty() {
        return false;
    }

    let mut from = 0;
    while let Some(offset) = haystack[from..].find(keyword) {
        let start = from + offset;
        let end = start + keyword.len();
        from = start + 1;

        if !haystack[..start].ends_with(' ') {
            continue;
        }

        let rest = &haystack[end..];
        let tail = rest.split(' ').next().unwrap_or_default();
        if tail_is_acceptable(keyword, tail) {
            return true;
        }
    }
    false
}

fn tail_is_acceptable(keyword: &str, tail: &str) -> bool {
    if tail.is_empty() {
        return true;
    }
    let len = keyword.chars().count();
    if len < PLURAL_MIN_LEN {
        return false;
    }
    if tail == "s" || tail == "es" {
        return true;
    }
    len >= INFLECTION_MIN_LEN && tail.chars().all(char::is_alphabetic)
}

#[cfg(test)]
#[path = "intent_test.rs"]
mod tests;
