//! Trigger detection: is the cursor inside a `/query` the menu should answer?

use crate::config::SuggestionConfig;
use crate::model::document::TextRange;

/// An active trigger match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionMatch {
    /// Trigger character through cursor
    pub range: TextRange,
    /// Text typed after the trigger character
    pub query: String,
    /// Trigger character plus query
    pub text: String,
}

/// Look for a trigger match ending at the cursor
///
/// `text_before_cursor` is the content of the cursor's block up to the cursor,
/// `block_start` the document position of the block's first char.
pub fn find_match(
    config: &SuggestionConfig,
    text_before_cursor: &str,
    block_start: usize,
) -> Option<SuggestionMatch> {
    let chars: Vec<char> = text_before_cursor.chars().collect();

    let mut trigger_at = None;
    for (index, &c) in chars.iter().enumerate().rev() {
        if c == config.trigger_char {
            trigger_at = Some(index);
            break;
        }
        if c.is_whitespace() && !config.allow_spaces {
            return None;
        }
        // A line break always ends a query, even when spaces are allowed
        if c == '\n' {
            return None;
        }
    }
    let index = trigger_at?;

    if config.start_of_line && index != 0 {
        return None;
    }
    if index > 0 {
        if let Some(prefixes) = &config.allowed_prefixes {
            if !prefixes.contains(&chars[index - 1]) {
                return None;
            }
        }
    }

    let query: String = chars[index + 1..].iter().collect();
    let text: String = chars[index..].iter().collect();
    Some(SuggestionMatch {
        range: TextRange::new(block_start + index, block_start + chars.len()),
        query,
        text,
    })
}
