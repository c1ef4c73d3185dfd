//! The companion's canned conversational repertoire.
//!
//! Rules are matched top to bottom and the first hit wins, so mood keywords
//! sit above topic keywords: "I feel depressed" deserves comfort, not a
//! definition of postpartum depression.

/// One keyword rule. Single-word keywords match whole words; keywords with a
/// space match as phrases anywhere in the message.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub replies: &'static [&'static str],
}

/// Opening message shown on a fresh conversation.
pub const GREETING: &str = "Hi sweet mama. How are you feeling today?";

pub const FALLBACK_REPLIES: &[&str] = &[
    "I'm listening. Tell me more.",
    "Thank you for opening up. You're doing better than you think.",
    "Would a gentle affirmation help right now?",
];

pub fn standard_rules() -> &'static [Rule] {
    STANDARD_RULES
}

const STANDARD_RULES: &[Rule] = &[
    Rule {
        name: "low_mood",
        keywords: &[
            "sad",
            "tired",
            "lonely",
            "anxious",
            "depressed",
            "overwhelmed",
            "crying",
        ],
        replies: &[
            "I'm sorry you're feeling this way. You're not alone. Take a slow, deep breath with me.",
            "These feelings are valid, and I'm here to walk with you.",
            "Would you like a calming video or a small breathing exercise?",
        ],
    },
    Rule {
        name: "positive_mood",
        keywords: &["happy", "better", "relaxed", "good"],
        replies: &[
            "That's beautiful to hear! Keep shining.",
            "So glad to hear that. Would you like a gentle journal prompt to celebrate this mood?",
        ],
    },
    Rule {
        name: "calm_seeking",
        keywords: &["calm", "relax", "breathe", "breathing"],
        replies: &[
            "Taking a few deep breaths can help. You could also try listening to calming music or going for a short walk. What usually helps you relax?",
        ],
    },
    Rule {
        name: "activity",
        keywords: &["activity", "activities", "journal", "journaling"],
        replies: &[
            "How about a five-minute doodle or a short walk? Or maybe journaling how you feel today?",
        ],
    },
    Rule {
        name: "video",
        keywords: &["video"],
        replies: &[
            "Here's a calming video for you: https://www.youtube.com/watch?v=2OEL4P1Rz04",
        ],
    },
    Rule {
        name: "crisis",
        keywords: &["help", "emergency", "urgent", "crisis"],
        replies: &[
            "If you need urgent support, please call a trusted person or a helpline right away. You matter.",
        ],
    },
    Rule {
        name: "about_ppd",
        keywords: &["what is ppd", "postpartum depression", "ppd"],
        replies: &[
            "Postpartum depression (PPD) is a mood disorder associated with childbirth. It's different from the baby blues and deserves proper attention. Would you like to know more?",
        ],
    },
    Rule {
        name: "screening",
        keywords: &["predict", "screen", "screening", "risk", "questionnaire"],
        replies: &[
            "To check your risk level, start a screening and answer the ten short questions. I'll be right here afterwards.",
        ],
    },
    Rule {
        name: "resources",
        keywords: &["resource", "resources", "support", "helpline"],
        replies: &[
            "Have a look at the resources list for helplines and international support organisations. Reach out, you're not alone.",
        ],
    },
    Rule {
        name: "greeting",
        keywords: &["hello", "hi", "hey"],
        replies: &[
            "Hi there! How can I support you today?",
            "Hello mama, I'm here with you. How has your day been?",
        ],
    },
    Rule {
        name: "farewell",
        keywords: &["bye", "goodbye"],
        replies: &[
            "Take care! If you have any concerns, always consult a medical professional.",
        ],
    },
];
