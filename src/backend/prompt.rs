// * Prompt construction for the summarization collaborator

use crate::backend::ContentPayload;

const INSTRUCTIONS: &str = r#"Analyze the following text and answer with a single JSON object:
{
  "summary": "one or two sentence summary",
  "keyPoints": ["key point", "..."],
  "keywords": ["important term or phrase", "..."],
  "sections": [{"text": "verbatim sentence from the text", "importance": 0.0, "type": "key_point"}]
}
"type" is one of key_point, data_point, quote, action_item and "importance" is between 0 and 1.
Copy section text verbatim so it can be located in the page.
If JSON is not possible, use this format instead:
Summary: [one sentence summary]
Key Points:
- [key point 1]
- [key point 2]
- [key point 3]"#;

/// Builds the single prompt string sent to the summarizer
pub fn build_prompt(payload: &ContentPayload) -> String {
    let mut prompt = String::from(INSTRUCTIONS);
    prompt.push_str("\n\n");

    if let ContentPayload::Page(page) = payload {
        if !page.title.is_empty() {
            prompt.push_str("Title: ");
            prompt.push_str(&page.title);
            prompt.push('\n');
        }
    }

    prompt.push_str("Text to analyze:\n");
    prompt.push_str(payload.text());
    prompt
}
