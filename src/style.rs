/// Art-style descriptor shared by every image prompt.
pub const STYLE_CONTEXT: &str = "Studio Ghibli art style, watercolor painting, soft pastel tones, \
cinematic lighting, highly detailed, masterpiece, consistent perspective, \
natural integration between characters and environment";

/// The style context applied to all three refinements.
pub fn style_context() -> &'static str {
    STYLE_CONTEXT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_context_is_single_line() {
        assert!(!style_context().contains('\n'));
        assert!(style_context().starts_with("Studio Ghibli art style"));
        assert!(style_context().ends_with("between characters and environment"));
    }
}
