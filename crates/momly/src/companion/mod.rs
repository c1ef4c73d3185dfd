//! Rule-based chat companion. Keeps no conversation state server-side and
//! never touches screening data; it exists to keep a respondent company, not
//! to assess her.

pub mod engine;
pub mod router;
pub mod rules;

pub use engine::CompanionEngine;
pub use router::{companion_router, MessageRequest, ReplyBody};
pub use rules::{standard_rules, Rule, FALLBACK_REPLIES, GREETING};
