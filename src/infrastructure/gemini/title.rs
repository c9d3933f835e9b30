// SPDX-License-Identifier: MPL-2.0
//! Title suggestion for result files.
//!
//! The model is asked for a JSON object so the answer is machine
//! readable, but smaller models sometimes reply with fenced code blocks
//! or plain text. Extraction degrades gracefully through those shapes.

use serde::Deserialize;

/// The analysis text is clipped before being embedded in the title
/// prompt so the request stays small.
const EXCERPT_LIMIT: usize = 4000;

/// Titles longer than this are cut at a character boundary.
const TITLE_LIMIT: usize = 50;

#[derive(Deserialize)]
struct TitleReply {
    title: String,
}

/// Builds the prompt that asks for a short file title.
pub fn title_prompt(analysis: &str) -> String {
    let excerpt = clip(analysis, EXCERPT_LIMIT);
    format!(
        "Based on the following video analysis, suggest a short descriptive \
         title suitable for a file name (at most {TITLE_LIMIT} characters, \
         no file extension). Respond with a JSON object of the form \
         {{\"title\": \"...\"}} and nothing else.\n\n{excerpt}"
    )
}

/// Pulls a usable title out of the model reply, or `None` if nothing
/// title-shaped is found.
pub fn extract_title(reply: &str) -> Option<String> {
    let trimmed = reply.trim();
    if trimmed.is_empty() {
        return None;
    }

    let candidate = strip_fences(trimmed);

    let title = match serde_json::from_str::<TitleReply>(candidate) {
        Ok(parsed) => parsed.title,
        Err(_) => quoted_title(candidate)
            // Last resort: the first non-empty line.
            .or_else(|| {
                candidate
                    .lines()
                    .find(|line| !line.trim().is_empty())
                    .map(str::to_string)
            })?,
    };

    let title = title.trim().trim_matches('"').trim();
    if title.is_empty() {
        return None;
    }
    Some(clip(title, TITLE_LIMIT).to_string())
}

/// Pulls the first short double-quoted phrase out of a prose reply such
/// as `Here is a title: "Sprint Review"`.
fn quoted_title(text: &str) -> Option<String> {
    // In JSON-ish text (possibly truncated) the value after a "title"
    // key wins; elsewhere the first quoted phrase does.
    let search_from = match text.find("\"title\"") {
        Some(index) => index + "\"title\"".len(),
        None if text.trim_start().starts_with('{') => return None,
        None => 0,
    };
    let rest = &text[search_from..];
    let start = rest.find('"')?;
    let rest = &rest[start + 1..];
    let end = rest.find('"')?;
    let inner = rest[..end].trim();
    if inner.is_empty() || inner.chars().count() > 100 || inner.contains('\n') {
        return None;
    }
    Some(inner.to_string())
}

/// Strips a surrounding markdown code fence, with or without a
/// language tag.
fn strip_fences(text: &str) -> &str {
    let Some(inner) = text.strip_prefix("```") else {
        return text;
    };
    let Some(inner) = inner.strip_suffix("```") else {
        return text;
    };
    // Drop the language tag line, e.g. "json".
    match inner.find('\n') {
        Some(newline) => inner[newline + 1..].trim(),
        None => inner.trim(),
    }
}

fn clip(text: &str, limit: usize) -> &str {
    if text.chars().count() <= limit {
        return text;
    }
    match text.char_indices().nth(limit) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_from_json() {
        assert_eq!(
            extract_title(r#"{"title": "Sprint Planning Notes"}"#),
            Some("Sprint Planning Notes".to_string())
        );
    }

    #[test]
    fn extracts_from_fenced_json() {
        let reply = "```json\n{\"title\": \"Demo Walkthrough\"}\n```";
        assert_eq!(extract_title(reply), Some("Demo Walkthrough".to_string()));
    }

    #[test]
    fn falls_back_to_first_line() {
        assert_eq!(
            extract_title("Quarterly Review\nSome extra text"),
            Some("Quarterly Review".to_string())
        );
    }

    #[test]
    fn finds_quoted_title_in_prose() {
        assert_eq!(
            extract_title("Here is a suitable title: \"Sprint Review\". Hope that helps."),
            Some("Sprint Review".to_string())
        );
    }

    #[test]
    fn recovers_title_from_truncated_json() {
        assert_eq!(
            extract_title(r#"{"title": "Demo Session""#),
            Some("Demo Session".to_string())
        );
    }

    #[test]
    fn strips_surrounding_quotes() {
        assert_eq!(extract_title("\"Team Standup\""), Some("Team Standup".to_string()));
    }

    #[test]
    fn empty_reply_yields_none() {
        assert_eq!(extract_title(""), None);
        assert_eq!(extract_title("   \n  "), None);
    }

    #[test]
    fn long_titles_are_clipped() {
        let long = "x".repeat(80);
        let reply = format!("{{\"title\": \"{long}\"}}");
        assert_eq!(extract_title(&reply).unwrap().chars().count(), TITLE_LIMIT);
    }

    #[test]
    fn clip_respects_multibyte_boundaries() {
        let text = "あ".repeat(60);
        assert_eq!(clip(&text, TITLE_LIMIT).chars().count(), TITLE_LIMIT);
    }

    #[test]
    fn prompt_embeds_excerpt() {
        let prompt = title_prompt("meeting about roadmap");
        assert!(prompt.contains("meeting about roadmap"));
        assert!(prompt.contains("JSON"));
    }
}
