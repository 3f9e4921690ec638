// Shared prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it;
// this file holds the cross-cutting template renderer they all use.

/// Renders `{key}` placeholders in a prompt template in a single pass.
///
/// Substituted values are never re-scanned, so candidate-supplied text that
/// happens to contain `{...}` is sent verbatim. Unknown placeholders are left
/// untouched.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let key = &after[..close];
                match vars.iter().find(|(k, _)| *k == key) {
                    Some((_, value)) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(key);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_known_keys() {
        let out = render("Role: {role}, years: {years}", &[("role", "SRE"), ("years", "4")]);
        assert_eq!(out, "Role: SRE, years: 4");
    }

    #[test]
    fn test_render_does_not_rescan_values() {
        let out = render("{a} and {b}", &[("a", "{b}"), ("b", "x")]);
        assert_eq!(out, "{b} and x");
    }

    #[test]
    fn test_render_keeps_unknown_and_unclosed_braces() {
        assert_eq!(render("{missing} ok", &[]), "{missing} ok");
        assert_eq!(render("tail {open", &[("open", "x")]), "tail {open");
    }
}
