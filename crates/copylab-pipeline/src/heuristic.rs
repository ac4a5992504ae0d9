//! Rule-based fallback scorer.
//!
//! Used whenever the AI scoring path fails. Deterministic and infallible:
//! the same copy and platform always produce the same [`Assessment`].

use copylab_core::{AdContent, Assessment, PlatformProfile, QualityScore, ScoreSource};

/// Emotion-carrying words and their weights.
///
/// Keys are lowercase single words. Each match adds its weight to the
/// emotion score's base.
pub(crate) const EMOTION_LEXICON: &[(&str, f64)] = &[
    ("love", 12.0),
    ("amazing", 10.0),
    ("discover", 8.0),
    ("exclusive", 10.0),
    ("free", 10.0),
    ("save", 8.0),
    ("proven", 8.0),
    ("transform", 10.0),
    ("imagine", 10.0),
    ("finally", 8.0),
    ("happy", 8.0),
    ("joy", 10.0),
    ("dream", 10.0),
    ("secret", 8.0),
    ("trusted", 8.0),
    ("effortless", 8.0),
    ("delight", 10.0),
    ("fear", 8.0),
    ("struggle", 8.0),
    ("tired", 6.0),
    ("stress", 6.0),
    ("worry", 6.0),
    ("limited", 6.0),
    ("new", 5.0),
    ("you", 4.0),
    ("your", 4.0),
];

/// Verbs that make a strong call to action.
pub(crate) const ACTION_VERBS: &[&str] = &[
    "shop", "buy", "get", "start", "try", "join", "claim", "discover", "learn", "book", "order",
    "download", "sign", "subscribe", "save", "grab", "unlock", "explore", "call", "register",
    "apply", "request", "watch", "see",
];

/// Words that add urgency.
pub(crate) const URGENCY_WORDS: &[&str] = &[
    "now", "today", "limited", "hurry", "tonight", "ends", "last", "instantly", "fast",
    "immediately",
];

/// Common misspellings penalized by the grammar rule.
const MISSPELLINGS: &[&str] = &[
    "teh", "recieve", "seperate", "definately", "occured", "untill", "wich", "alot", "thier",
    "accomodate", "goverment", "tommorow", "begining", "beleive", "freind", "guarentee",
];

const MAX_ISSUES: usize = 3;

/// Score `content` against `profile` without any external call.
#[must_use]
pub fn assess(content: &AdContent, profile: &PlatformProfile) -> Assessment {
    let mut issues = Vec::new();

    let grammar = grammar_score(content, &mut issues);
    let clarity = clarity_score(content, &mut issues);
    let emotion = emotion_score(content, &mut issues);
    let cta_strength = cta_score(content, profile, &mut issues);
    let platform_fit = platform_fit_score(content, profile, &mut issues);

    issues.truncate(MAX_ISSUES);
    Assessment {
        score: QualityScore::new(grammar, clarity, emotion, cta_strength, platform_fit),
        key_issues: issues,
        source: ScoreSource::Heuristic,
    }
}

/// Lowercase words with surrounding punctuation stripped.
fn words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric() && c != '%')
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect()
}

fn starts_uppercase(text: &str) -> bool {
    text.trim_start()
        .chars()
        .find(|c| c.is_alphabetic())
        .is_none_or(char::is_uppercase)
}

fn grammar_score(content: &AdContent, issues: &mut Vec<String>) -> f64 {
    let mut score = 100.0;

    if !starts_uppercase(&content.headline) {
        score -= 10.0;
        issues.push("Headline should start with a capital letter".to_string());
    }
    if !starts_uppercase(&content.body) {
        score -= 10.0;
    }
    if !content.body.trim_end().ends_with(['.', '!', '?']) {
        score -= 10.0;
        issues.push("Body copy lacks terminal punctuation".to_string());
    }

    let all_text = format!("{} {} {}", content.headline, content.body, content.cta);
    let all_words = words(&all_text);

    let repeated = all_words.windows(2).filter(|pair| pair[0] == pair[1]).count();
    if repeated > 0 {
        score -= (10.0 * count_f64(repeated)).min(30.0);
        issues.push("Repeated words".to_string());
    }

    let chars: Vec<char> = all_text.chars().collect();
    let doubled_punct = chars
        .windows(2)
        .filter(|pair| pair[0] == pair[1] && "!?,;".contains(pair[0]))
        .count();
    let doubled_space = chars
        .windows(2)
        .filter(|pair| pair[0] == ' ' && pair[1] == ' ')
        .count();
    if doubled_punct + doubled_space > 0 {
        score -= (5.0 * count_f64(doubled_punct + doubled_space)).min(15.0);
    }

    let misspelled = all_words
        .iter()
        .filter(|w| MISSPELLINGS.contains(&w.as_str()))
        .count();
    if misspelled > 0 {
        score -= (10.0 * count_f64(misspelled)).min(30.0);
        issues.push(format!("{misspelled} likely misspelling(s)"));
    }

    score
}

fn clarity_score(content: &AdContent, issues: &mut Vec<String>) -> f64 {
    let text = format!("{}. {}", content.headline, content.body);
    let sentences: Vec<usize> = text
        .split(['.', '!', '?'])
        .map(|s| words(s).len())
        .filter(|&n| n > 0)
        .collect();
    let all_words = words(&text);
    if sentences.is_empty() || all_words.is_empty() {
        return 0.0;
    }

    let mut score = 100.0;

    let avg_sentence = count_f64(all_words.len()) / count_f64(sentences.len());
    if avg_sentence > 20.0 {
        score -= ((avg_sentence - 20.0) * 2.0).min(40.0);
        issues.push("Sentences are too long to skim".to_string());
    }

    let letters: usize = all_words.iter().map(|w| w.chars().count()).sum();
    let avg_word = count_f64(letters) / count_f64(all_words.len());
    if avg_word > 6.0 {
        score -= ((avg_word - 6.0) * 10.0).min(30.0);
        issues.push("Wording is dense; prefer shorter words".to_string());
    }

    score
}

fn emotion_score(content: &AdContent, issues: &mut Vec<String>) -> f64 {
    let text = format!("{} {} {}", content.headline, content.body, content.cta);
    let mut score = 30.0;
    for word in words(&text) {
        if let Some(&(_, weight)) = EMOTION_LEXICON.iter().find(|(w, _)| *w == word) {
            score += weight;
        }
    }
    if text.contains('!') {
        score += 5.0;
    }
    if score < 50.0 {
        issues.push("Copy lacks emotional pull".to_string());
    }
    score.min(100.0)
}

fn cta_score(content: &AdContent, profile: &PlatformProfile, issues: &mut Vec<String>) -> f64 {
    let cta_words = words(&content.cta);
    let mut score = match cta_words.first() {
        Some(first) if ACTION_VERBS.contains(&first.as_str()) => 70.0,
        _ if cta_words.iter().any(|w| ACTION_VERBS.contains(&w.as_str())) => 55.0,
        _ => {
            issues.push("Call to action does not lead with an action verb".to_string());
            35.0
        }
    };

    let has_urgency = |ws: &[String]| ws.iter().any(|w| URGENCY_WORDS.contains(&w.as_str()));
    if has_urgency(&cta_words) {
        score += 15.0;
    } else if has_urgency(&words(&format!("{} {}", content.headline, content.body))) {
        score += 8.0;
    }

    if cta_words.len() > 5 {
        score -= 15.0;
        issues.push("Call to action is too long".to_string());
    }
    if content.cta.chars().count() > profile.cta_limit {
        score -= 10.0;
    }

    score
}

fn platform_fit_score(
    content: &AdContent,
    profile: &PlatformProfile,
    issues: &mut Vec<String>,
) -> f64 {
    let parts = [
        ("headline", &content.headline, profile.headline_limit, 0.4),
        ("body", &content.body, profile.body_limit, 0.4),
        ("call to action", &content.cta, profile.cta_limit, 0.2),
    ];

    let mut score = 0.0;
    for (label, text, limit, weight) in parts {
        let len = text.chars().count();
        let fit = if len <= limit {
            100.0
        } else {
            issues.push(format!(
                "{label} exceeds the {} limit ({len}/{limit} chars)",
                profile.name
            ));
            100.0 * count_f64(limit) / count_f64(len)
        };
        score += fit * weight;
    }
    score
}

#[allow(clippy::cast_precision_loss)]
fn count_f64(n: usize) -> f64 {
    n as f64
}
