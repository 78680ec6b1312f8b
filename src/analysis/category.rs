use crate::model::{CategoryCount, MessageCategory};
use regex::Regex;
use std::sync::LazyLock;

static RULES: LazyLock<Vec<(MessageCategory, Regex)>> = LazyLock::new(|| {
    [
        (MessageCategory::Fix, r"\b(fix|bug|error|issue|crash|fail)\b"),
        (MessageCategory::Feature, r"\b(add|feature|implement|support|new)\b"),
        (MessageCategory::Refactor, r"\b(refactor|clean|improve|optimize|reorg)\b"),
        (MessageCategory::Docs, r"\b(doc|readme|comment|typo)\b"),
        (MessageCategory::Test, r"\b(test|coverage|spec|assert)\b"),
        (MessageCategory::Perf, r"\b(perf|performance|speed|optimize)\b"),
        (MessageCategory::Chore, r"\b(chore|ci|build|deps|release)\b"),
    ]
    .into_iter()
    .map(|(category, pattern)| (category, Regex::new(pattern).expect("valid category regex")))
    .collect()
});

/// First matching rule wins; messages matching nothing are `Other`.
pub fn classify(message: &str) -> MessageCategory {
    let lower = message.to_lowercase();
    RULES
        .iter()
        .find(|(_, re)| re.is_match(&lower))
        .map(|(category, _)| *category)
        .unwrap_or(MessageCategory::Other)
}

pub fn count_categories<'a, I>(messages: I) -> Vec<CategoryCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts = [0u64; MessageCategory::ALL.len()];
    for message in messages {
        let category = classify(message);
        if let Some(slot) = MessageCategory::ALL.iter().position(|c| *c == category) {
            counts[slot] += 1;
        }
    }
    MessageCategory::ALL
        .iter()
        .zip(counts)
        .map(|(category, commits)| CategoryCount {
            category: *category,
            commits,
        })
        .collect()
}
