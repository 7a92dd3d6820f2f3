//! Token budgeter (spec §4.6): model-aware context limits and a
//! per-character token estimate, gating expansion.

pub const WARN_TOKENS: usize = 50_000;
const DEFAULT_CONTEXT_LIMIT: usize = 100_000;

/// Model identifiers matched case-insensitively by substring, in priority
/// order (first match wins).
const MODEL_LIMITS: &[(&str, usize)] = &[
    ("opus", 200_000),
    ("gpt-4", 128_000),
    ("gemini", 1_000_000),
];

/// Looks up the effective context limit for `model`, falling back to the
/// default when no known substring matches. `config_override` (from the
/// cascaded config, if present) supersedes both.
pub fn context_limit(model: Option<&str>, config_override: Option<usize>) -> usize {
    if let Some(limit) = config_override {
        return limit;
    }
    let Some(model) = model else {
        return DEFAULT_CONTEXT_LIMIT;
    };
    let lower = model.to_ascii_lowercase();
    MODEL_LIMITS
        .iter()
        .find(|(needle, _)| lower.contains(needle))
        .map(|(_, limit)| *limit)
        .unwrap_or(DEFAULT_CONTEXT_LIMIT)
}

/// A straightforward per-character estimate (~4 bytes/token), sufficient
/// per spec for threshold gating.
pub fn estimate_tokens(text: &str) -> usize {
    (text.len() as f64 / 4.0).ceil() as usize
}

pub enum BudgetCheck {
    Ok,
    Warn { tokens: usize, limit: usize },
    Overflow { tokens: usize, limit: usize },
}

/// `MA_FORCE_CONTEXT=1` disables the hard limit check (spec §6).
pub fn force_context_override() -> bool {
    std::env::var("MA_FORCE_CONTEXT").as_deref() == Ok("1")
}

pub fn check_budget(text: &str, model: Option<&str>, config_override: Option<usize>) -> BudgetCheck {
    let tokens = estimate_tokens(text);
    let limit = context_limit(model, config_override);
    if tokens > limit {
        if force_context_override() {
            return BudgetCheck::Warn { tokens, limit };
        }
        return BudgetCheck::Overflow { tokens, limit };
    }
    if tokens > WARN_TOKENS {
        return BudgetCheck::Warn { tokens, limit };
    }
    BudgetCheck::Ok
}
