use crate::gen::client::{Content, Part};

/// Editing constraints sent with every image-conditioned request. The model
/// must treat the sketch as fixed content and only add what the user asked
/// for, in the sketch's own visual language.
pub const DEFAULT_INSTRUCTION_TEMPLATE: &str = "\
On top of this drawing, ADD only the following (do not alter the existing drawing): {prompt}.

Rules:
- Do not touch the existing lines; keep them exactly as they are.
- Add only the newly requested elements.
- Preserve the overall structure and style of the drawing.
- New elements must:
  - use the same line weight as the existing drawing.
  - match the existing style, technique and level of detail.
  - match the existing color palette, lighting and shading.
  - match the existing scale, placement and perspective.
  - fit the existing composition, balance and cohesion.
  - fit the existing atmosphere, mood, theme and narrative.
- Do no harm to the original drawing; make only the requested additions.";

/// The instruction text wrapped around the user's prompt. Swappable: a
/// settings override replaces the built-in template, as long as it keeps the
/// `{prompt}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    template: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            template: DEFAULT_INSTRUCTION_TEMPLATE.to_string(),
        }
    }
}

impl PromptTemplate {
    pub fn new(override_template: Option<String>) -> Self {
        match override_template {
            Some(template) if !template.trim().is_empty() => Self { template },
            _ => Self::default(),
        }
    }

    pub fn render(&self, prompt: &str) -> String {
        self.template.replace("{prompt}", prompt)
    }
}

/// Assemble the request body: with a snapshot, the sketch as an inline image
/// part followed by the templated instructions; without one, the raw prompt
/// as a single text part.
pub fn build_contents(
    prompt: &str,
    snapshot_base64: Option<String>,
    template: &PromptTemplate,
) -> Vec<Content> {
    match snapshot_base64 {
        Some(snapshot) => vec![
            Content::user(vec![Part::inline_png(snapshot)]),
            Content::user(vec![Part::text(template.render(prompt))]),
        ],
        None => vec![Content::user(vec![Part::text(prompt)])],
    }
}

#[cfg(test)]
mod tests {
    use super::{build_contents, PromptTemplate, DEFAULT_INSTRUCTION_TEMPLATE};

    #[test]
    fn render_substitutes_the_placeholder() {
        let template = PromptTemplate::default();
        let rendered = template.render("add three bees");
        assert!(rendered.contains("add three bees"));
        assert!(!rendered.contains("{prompt}"));
        assert!(rendered.contains("Do not touch the existing lines"));
    }

    #[test]
    fn override_replaces_the_default_template() {
        let template = PromptTemplate::new(Some("Sketch: {prompt}. Keep the style.".to_string()));
        assert_eq!(
            template.render("a cat"),
            "Sketch: a cat. Keep the style."
        );
    }

    #[test]
    fn blank_override_falls_back_to_default() {
        let template = PromptTemplate::new(Some("   ".to_string()));
        assert_eq!(template.render(""), DEFAULT_INSTRUCTION_TEMPLATE.replace("{prompt}", ""));
    }

    #[test]
    fn with_snapshot_builds_image_then_instruction_parts() {
        let contents = build_contents(
            "add a sun",
            Some("QUJD".to_string()),
            &PromptTemplate::default(),
        );

        assert_eq!(contents.len(), 2);
        let image_part = &contents[0].parts[0];
        assert_eq!(
            image_part.inline_data.as_ref().map(|d| d.data.as_str()),
            Some("QUJD")
        );
        let text_part = &contents[1].parts[0];
        let text = text_part.text.as_deref().expect("instruction text");
        assert!(text.contains("add a sun"));
        assert!(text.contains("Rules:"));
    }

    #[test]
    fn without_snapshot_builds_a_single_raw_text_part() {
        let contents = build_contents("a castle", None, &PromptTemplate::default());

        assert_eq!(contents.len(), 1);
        assert_eq!(contents[0].parts.len(), 1);
        assert_eq!(contents[0].parts[0].text.as_deref(), Some("a castle"));
    }
}
