//! Removal of tokenizer control markup from decoded replies.

// Llama/Mistral style special tokens that some servers leave in decoded text.
const CONTROL_TOKENS: &[&str] = &[
    "<s>", "</s>", "<unk>", "<pad>", "[INST]", "[/INST]", "<<SYS>>", "<</SYS>>",
];

/// Strips control markup from a decoded reply.
///
/// Removes the fixed special tokens above plus any `<|...|>` token
/// (ChatML, Llama 3, Phi), then trims surrounding whitespace.
pub fn strip_control_markup(text: &str) -> String {
    let mut cleaned = strip_pipe_tokens(text);
    for token in CONTROL_TOKENS {
        if cleaned.contains(token) {
            cleaned = cleaned.replace(token, "");
        }
    }
    cleaned.trim().to_string()
}

fn strip_pipe_tokens(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("<|") {
        let Some(len) = rest[start + 2..].find("|>") else {
            break;
        };
        out.push_str(&rest[..start]);
        rest = &rest[start + 2 + len + 2..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(
            strip_control_markup("OSPF is a link-state protocol."),
            "OSPF is a link-state protocol."
        );
    }

    #[test]
    fn test_strips_llama_tokens() {
        assert_eq!(
            strip_control_markup("<s>[INST] hi [/INST] Hello there!</s>"),
            "hi  Hello there!"
        );
    }

    #[test]
    fn test_strips_system_block_markers() {
        assert_eq!(
            strip_control_markup("<<SYS>>be brief<</SYS>>ok"),
            "be briefok"
        );
    }

    #[test]
    fn test_strips_pipe_tokens() {
        assert_eq!(
            strip_control_markup("<|im_start|>assistant\nHi!<|im_end|>"),
            "assistant\nHi!"
        );
        assert_eq!(strip_control_markup("Done.<|eot_id|>"), "Done.");
    }

    #[test]
    fn test_unterminated_pipe_token_kept() {
        assert_eq!(strip_control_markup("a <| b"), "a <| b");
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(strip_control_markup("  \n reply \n"), "reply");
    }

    #[test]
    fn test_only_markup_yields_empty() {
        assert_eq!(strip_control_markup("<s></s>"), "");
        assert_eq!(strip_control_markup(""), "");
    }
}
