//! Prompt builder: short system message + "stuffed" context block.

use rag_base::structs::rag_store::SearchHit;

/// Default system instructions.
pub const DEFAULT_SYSTEM: &str = r#"
You are a helpful assistant that answers questions using the provided documents.
Use the context as ground truth. If it does not contain the answer, say that you don't know.
"#;

/// User prompt plus the number of leading hits that made it into the context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StuffedPrompt {
    pub text: String,
    /// `hits[..used]` were shown to the model, the last one possibly truncated.
    pub used: usize,
}

/// Build the user prompt: the question followed by the retrieved document
/// bodies, concatenated in ranking order and cut at `max_chars`.
///
/// # Example
/// ```
/// # use contextor::prompt::build_user_prompt;
/// let prompt = build_user_prompt("How to X?", &[], 2000);
/// assert!(prompt.text.contains("Question:"));
/// assert_eq!(prompt.used, 0);
/// ```
pub fn build_user_prompt(question: &str, hits: &[SearchHit], max_chars: usize) -> StuffedPrompt {
    let mut used = 0;
    let mut out = String::new();
    out.push_str("Question:\n");
    out.push_str(question.trim());
    out.push_str("\n\n");

    if hits.is_empty() {
        out.push_str("No context documents were found.\n");
        return StuffedPrompt { text: out, used };
    }

    out.push_str("Context:\n");
    let mut budget = max_chars;

    for (i, h) in hits.iter().enumerate() {
        let header = format!("==[{}]== {} :: {}\n", i + 1, h.title, h.source);
        let text = h.body.trim();

        if header.len() >= budget {
            break;
        }
        out.push_str(&header);
        budget -= header.len();
        used += 1;

        let take = budget.saturating_sub(2);
        if text.len() > take {
            out.push_str(safe_truncate(text, take));
            out.push_str("\n...\n");
            break;
        }
        out.push_str(text);
        out.push('\n');
        budget -= text.len() + 1;
    }
    out.push('\n');
    out.push_str("Answer using only the context above when possible.\n");

    StuffedPrompt { text: out, used }
}

fn safe_truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        s
    } else {
        let mut end = max;
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        &s[..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(title: &str, body: &str) -> SearchHit {
        SearchHit {
            id: "0".into(),
            score: 0.9,
            title: title.into(),
            source: format!("http://{title}"),
            body: body.into(),
        }
    }

    #[test]
    fn stuffs_every_body_in_order() {
        let prompt = build_user_prompt(
            "  why?  ",
            &[hit("a", "first body"), hit("b", "second body")],
            4000,
        );
        assert_eq!(prompt.used, 2);
        let p = prompt.text;
        assert!(p.starts_with("Question:\nwhy?\n"));
        let first = p.find("first body").unwrap();
        let second = p.find("second body").unwrap();
        assert!(first < second);
        assert!(p.contains("==[2]== b :: http://b"));
    }

    #[test]
    fn respects_budget_on_char_boundaries() {
        let body = "ß".repeat(500);
        let prompt = build_user_prompt("q", &[hit("a", &body), hit("b", "never shown")], 120);
        assert_eq!(prompt.used, 1);
        let p = prompt.text;
        assert!(p.contains("..."));
        assert!(!p.contains("never shown"));
        let context = &p[p.find("Context:").unwrap()..];
        assert!(context.len() < 220);
    }

    #[test]
    fn notes_missing_context() {
        let p = build_user_prompt("q", &[], 100);
        assert!(p.text.contains("No context documents"));
        assert_eq!(p.used, 0);
    }

    #[test]
    fn hit_whose_header_does_not_fit_is_not_used() {
        let prompt = build_user_prompt(
            "q",
            &[hit("a", "short"), hit(&"t".repeat(80), "body")],
            60,
        );
        assert_eq!(prompt.used, 1);
        assert!(!prompt.text.contains("==[2]=="));
    }
}
