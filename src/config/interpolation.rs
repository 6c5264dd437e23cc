//! Variable interpolation for descriptor root templates.
//!
//! Root templates support a home-directory marker and `${variable}` syntax:
//!
//! - `~` - replaced with the user's home directory
//! - `${VARIABLE}` - replaced with the variable's value
//! - `$${escaped}` - produces literal `${escaped}` in output
//!
//! # Example
//!
//! ```yaml
//! sdkman:
//!   root: "${SDKMAN_DIR}/candidates/java"
//! intellij:
//!   root: "~/.jdks"
//! ```

use crate::error::{LookoutError, Result};
use std::collections::HashMap;
use std::path::PathBuf;

/// A segment of an interpolated template.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Literal text
    Literal(String),
    /// Variable reference: ${name}
    Variable(String),
}

/// Parse a template containing ${var} interpolations.
///
/// Supports:
/// - `${variable_name}` - variable interpolation
/// - `$${escaped}` - literal `${escaped}` in output
pub fn parse_interpolation(input: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut chars = input.chars().peekable();
    let mut current_literal = String::new();

    while let Some(c) = chars.next() {
        if c == '$' {
            match chars.peek() {
                Some('$') => {
                    // Escaped: $$ becomes $
                    chars.next();
                    if chars.peek() == Some(&'{') {
                        // $${...} -> literal ${...}
                        chars.next(); // consume {
                        current_literal.push('$');
                        current_literal.push('{');
                        while let Some(&c) = chars.peek() {
                            chars.next();
                            current_literal.push(c);
                            if c == '}' {
                                break;
                            }
                        }
                    } else {
                        current_literal.push('$');
                    }
                }
                Some('{') => {
                    // Start of variable
                    chars.next(); // consume {

                    if !current_literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut current_literal)));
                    }

                    let mut var_name = String::new();
                    while let Some(&c) = chars.peek() {
                        if c == '}' {
                            chars.next();
                            break;
                        }
                        var_name.push(c);
                        chars.next();
                    }

                    segments.push(Segment::Variable(var_name));
                }
                _ => {
                    current_literal.push(c);
                }
            }
        } else {
            current_literal.push(c);
        }
    }

    if !current_literal.is_empty() {
        segments.push(Segment::Literal(current_literal));
    }

    segments
}

/// Context for variable resolution in root templates.
///
/// Variables are resolved from explicit overrides first, then from the
/// captured environment. The home marker resolves against `home`.
#[derive(Debug, Default)]
pub struct SubstitutionContext {
    /// Explicit variable values (highest priority).
    pub vars: HashMap<String, String>,

    /// Environment variables.
    pub env: HashMap<String, String>,

    /// The user's home directory, substituted for `~`.
    pub home: Option<PathBuf>,
}

impl SubstitutionContext {
    /// Build a context from the current process environment.
    pub fn from_env() -> Self {
        Self {
            vars: HashMap::new(),
            env: std::env::vars().collect(),
            home: home_dir(),
        }
    }

    /// Resolve a variable name to its value.
    pub fn resolve(&self, name: &str) -> Option<String> {
        self.vars.get(name).or_else(|| self.env.get(name)).cloned()
    }
}

/// Best-effort home directory lookup.
fn home_dir() -> Option<PathBuf> {
    #[cfg(windows)]
    let var = std::env::var_os("USERPROFILE");
    #[cfg(not(windows))]
    let var = std::env::var_os("HOME");
    var.map(PathBuf::from)
}

/// Resolve a descriptor root template against a substitution context.
///
/// The home marker is substituted first, then `${VAR}` references.
///
/// # Errors
///
/// Returns `UnresolvedVariable` if a referenced variable has no value, or if
/// the template uses `~` and no home directory is known.
pub fn resolve_template(input: &str, context: &SubstitutionContext) -> Result<String> {
    let input = if input.contains('~') {
        let home = context
            .home
            .as_ref()
            .ok_or_else(|| LookoutError::UnresolvedVariable {
                name: "HOME".to_string(),
            })?;
        input.replace('~', &home.display().to_string())
    } else {
        input.to_string()
    };

    let mut result = String::new();
    for segment in parse_interpolation(&input) {
        match segment {
            Segment::Literal(text) => result.push_str(&text),
            Segment::Variable(name) => {
                let value = context
                    .resolve(&name)
                    .ok_or(LookoutError::UnresolvedVariable { name })?;
                result.push_str(&value);
            }
        }
    }

    Ok(result)
}

/// Normalize path separators to the platform convention.
pub fn normalize_separators(path: &str) -> String {
    let sep = std::path::MAIN_SEPARATOR;
    path.replace(['\\', '/'], &sep.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> SubstitutionContext {
        let mut ctx = SubstitutionContext {
            home: Some(PathBuf::from("/home/dev")),
            ..Default::default()
        };
        ctx.vars
            .insert("SDKMAN_DIR".to_string(), "/opt/sdkman".to_string());
        ctx
    }

    #[test]
    fn parse_literal_only() {
        let result = parse_interpolation("/usr/lib/jvm");
        assert_eq!(result, vec![Segment::Literal("/usr/lib/jvm".to_string())]);
    }

    #[test]
    fn parse_single_variable() {
        let result = parse_interpolation("${SDKMAN_DIR}");
        assert_eq!(result, vec![Segment::Variable("SDKMAN_DIR".to_string())]);
    }

    #[test]
    fn parse_variable_with_surrounding_text() {
        let result = parse_interpolation("${SDKMAN_DIR}/candidates/java");
        assert_eq!(
            result,
            vec![
                Segment::Variable("SDKMAN_DIR".to_string()),
                Segment::Literal("/candidates/java".to_string()),
            ]
        );
    }

    #[test]
    fn parse_escaped_dollar_brace() {
        let result = parse_interpolation("$${NOT_INTERPOLATED}");
        assert_eq!(
            result,
            vec![Segment::Literal("${NOT_INTERPOLATED}".to_string())]
        );
    }

    #[test]
    fn parse_dollar_without_brace() {
        let result = parse_interpolation("price is $100");
        assert_eq!(result, vec![Segment::Literal("price is $100".to_string())]);
    }

    #[test]
    fn parse_empty_string() {
        assert!(parse_interpolation("").is_empty());
    }

    #[test]
    fn resolve_template_replaces_variables() {
        let result = resolve_template("${SDKMAN_DIR}/candidates/java", &context()).unwrap();
        assert_eq!(result, "/opt/sdkman/candidates/java");
    }

    #[test]
    fn resolve_template_replaces_home_marker() {
        let result = resolve_template("~/.jdks", &context()).unwrap();
        assert_eq!(result, "/home/dev/.jdks");
    }

    #[test]
    fn resolve_template_fails_on_missing_variable() {
        let result = resolve_template("${MISSING_VAR}/java", &context());
        assert!(matches!(
            result,
            Err(LookoutError::UnresolvedVariable { name }) if name == "MISSING_VAR"
        ));
    }

    #[test]
    fn resolve_template_fails_on_home_marker_without_home() {
        let ctx = SubstitutionContext::default();
        let result = resolve_template("~/.jdks", &ctx);
        assert!(matches!(
            result,
            Err(LookoutError::UnresolvedVariable { name }) if name == "HOME"
        ));
    }

    #[test]
    fn resolve_template_prefers_explicit_vars_over_env() {
        let mut ctx = context();
        ctx.env
            .insert("SDKMAN_DIR".to_string(), "/ignored".to_string());
        let result = resolve_template("${SDKMAN_DIR}", &ctx).unwrap();
        assert_eq!(result, "/opt/sdkman");
    }

    #[test]
    fn resolve_template_preserves_escaped() {
        let result = resolve_template("$${LITERAL}", &context()).unwrap();
        assert_eq!(result, "${LITERAL}");
    }

    #[cfg(unix)]
    #[test]
    fn normalize_separators_converts_backslashes() {
        assert_eq!(normalize_separators("a\\b/c"), "a/b/c");
    }

    #[test]
    fn from_env_captures_home() {
        // Only meaningful where HOME/USERPROFILE is set, which CI always has.
        let ctx = SubstitutionContext::from_env();
        assert!(ctx.home.is_some());
    }
}
