//! Prompt Template Rendering
//!
//! Templates use brace placeholders: `{name}` is replaced by the value bound
//! to `name`, `{{` and `}}` produce literal braces. Placeholders without a
//! binding are an error so a typo in the prompt document fails loudly
//! instead of reaching the model.

use std::collections::HashMap;

use crate::types::{DocError, Result};

/// Named values substituted into a template
#[derive(Debug, Clone, Default)]
pub struct PromptVars<'a> {
    vars: HashMap<&'static str, &'a str>,
}

impl<'a> PromptVars<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `value`
    pub fn set(mut self, name: &'static str, value: &'a str) -> Self {
        self.vars.insert(name, value);
        self
    }

    fn get(&self, name: &str) -> Option<&'a str> {
        self.vars.get(name).copied()
    }
}

/// Render `template` (identified by `template_name` in errors)
pub fn render(template_name: &str, template: &str, vars: &PromptVars<'_>) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((start, ch)) = chars.next() {
        match ch {
            '{' if matches!(chars.peek(), Some((_, '{'))) => {
                chars.next();
                out.push('{');
            }
            '}' if matches!(chars.peek(), Some((_, '}'))) => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let rest = &template[start + 1..];
                let end = rest.find('}').ok_or_else(|| {
                    DocError::template(template_name, format!("unclosed '{{' at byte {}", start))
                })?;
                let name = &rest[..end];
                let value = vars.get(name).ok_or_else(|| {
                    DocError::template(template_name, format!("unknown placeholder '{}'", name))
                })?;
                out.push_str(value);
                // skip the name and the closing brace
                for _ in 0..name.chars().count() + 1 {
                    chars.next();
                }
            }
            '}' => {
                return Err(DocError::template(
                    template_name,
                    format!("single '}}' at byte {}", start),
                ));
            }
            _ => out.push(ch),
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitutes_placeholders() {
        let vars = PromptVars::new().set("target", "DOCS").set("code", "fn main() {}");
        let rendered = render("t", "Target {target}:\n{code}", &vars).unwrap();
        assert_eq!(rendered, "Target DOCS:\nfn main() {}");
    }

    #[test]
    fn test_values_are_not_reinterpreted() {
        // braces inside substituted code must survive untouched
        let vars = PromptVars::new().set("code", "{name} {{x}}");
        let rendered = render("t", "<{code}>", &vars).unwrap();
        assert_eq!(rendered, "<{name} {{x}}>");
    }

    #[test]
    fn test_escaped_braces() {
        let vars = PromptVars::new();
        let rendered = render("t", r#"{{"NEXTSTEP": "TERMINATE"}}"#, &vars).unwrap();
        assert_eq!(rendered, r#"{"NEXTSTEP": "TERMINATE"}"#);
    }

    #[test]
    fn test_unknown_placeholder_is_error() {
        let vars = PromptVars::new().set("code", "x");
        let err = render("core_coder_agent", "{code} {missing}", &vars).unwrap_err();
        assert!(err.to_string().contains("core_coder_agent"));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_unbalanced_braces_are_errors() {
        let vars = PromptVars::new();
        assert!(render("t", "open {never", &vars).is_err());
        assert!(render("t", "close } alone", &vars).is_err());
    }

    #[test]
    fn test_multibyte_names_and_text() {
        let vars = PromptVars::new().set("filename", "módulo.py");
        let rendered = render("t", "résumé de {filename} ✓", &vars).unwrap();
        assert_eq!(rendered, "résumé de módulo.py ✓");
    }
}
