use std::sync::atomic::{AtomicUsize, Ordering};

use super::rules::{standard_rules, Rule, FALLBACK_REPLIES, GREETING};

/// Keyword-driven reply engine. Stateless per message; the only mutable
/// state is one rotation counter per rule so repeated questions cycle
/// through the canned replies instead of repeating the first one.
pub struct CompanionEngine {
    rules: &'static [Rule],
    cursors: Vec<AtomicUsize>,
    fallback_cursor: AtomicUsize,
}

impl CompanionEngine {
    pub fn standard() -> Self {
        let rules = standard_rules();
        Self {
            rules,
            cursors: rules.iter().map(|_| AtomicUsize::new(0)).collect(),
            fallback_cursor: AtomicUsize::new(0),
        }
    }

    /// Opening line for a fresh conversation.
    pub fn greeting(&self) -> &'static str {
        GREETING
    }

    /// Reply to one message. Matching is case-insensitive; replies depend
    /// only on the current message, never on history.
    pub fn reply(&self, message: &str) -> String {
        let text = message.to_lowercase();
        for (rule, cursor) in self.rules.iter().zip(&self.cursors) {
            if rule.keywords.iter().any(|keyword| matches(&text, keyword)) {
                return rotate(rule.replies, cursor).to_owned();
            }
        }
        rotate(FALLBACK_REPLIES, &self.fallback_cursor).to_owned()
    }
}

impl Default for CompanionEngine {
    fn default() -> Self {
        Self::standard()
    }
}

fn rotate<'a>(replies: &'a [&'a str], cursor: &AtomicUsize) -> &'a str {
    let index = cursor.fetch_add(1, Ordering::Relaxed) % replies.len();
    replies[index]
}

/// Whole-word match for single keywords, substring match for phrases.
fn matches(text: &str, keyword: &str) -> bool {
    if keyword.contains(' ') {
        text.contains(keyword)
    } else {
        text.split(|c: char| !c.is_alphanumeric())
            .any(|word| word == keyword)
    }
}
