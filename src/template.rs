//! Placeholder templates for page layout.
//!
//! A template is plain text with `$NAME` or `${NAME}` placeholders. Names start
//! with a letter or underscore and continue with letters, digits, or
//! underscores. `$$` is a literal dollar sign; a `$` that does not start a
//! valid name is kept as-is.
//!
//! ```text
//! <h1>$TITLE</h1>
//! <p>${YEAR}s, $LOCATION</p>
//! ```
//!
//! # Scopes and escaping
//!
//! Values come from a [`Scope`], a flat name → [`ScopeValue`] table built fresh
//! for every page. Each value says how it goes into the output:
//!
//! - [`ScopeValue::Text`]: free text (titles, descriptions, labels). Escaped
//!   on expansion: `&`, `<`, `>`, `"` and `'` become entities.
//! - [`ScopeValue::Html`]: markup that was built safely upstream (navigation,
//!   tag lists, gallery items). Inserted verbatim.
//!
//! Names missing from the scope expand to the empty string.
//!
//! Expansion is a single left-to-right pass over the template. Substituted
//! values are never scanned again, so a description containing `$TITLE` comes
//! out as the literal text `$TITLE`.
//!
//! # Layouts
//!
//! A page template renders to a fragment that is then placed into the base
//! layout as `MAIN_CONTENT` (see [`Template::render_in`]). The layout sees the
//! same scope, and the fragment is nested as finished HTML.

use std::collections::HashMap;

/// Scope name the page fragment is bound to when rendering the layout.
pub const MAIN_CONTENT: &str = "MAIN_CONTENT";

/// A value bound in a [`Scope`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeValue {
    /// Escaped on expansion.
    Text(String),
    /// Inserted verbatim.
    Html(String),
}

impl ScopeValue {
    fn write_to(&self, out: &mut String) {
        match self {
            ScopeValue::Text(text) => push_escaped(out, text),
            ScopeValue::Html(html) => out.push_str(html),
        }
    }
}

/// Name → value table for one render.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    values: HashMap<String, ScopeValue>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to free text.
    pub fn text(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
        self.values
            .insert(name.to_string(), ScopeValue::Text(value.into()));
        self
    }

    /// Bind `name` to trusted markup.
    pub fn html(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
        self.values
            .insert(name.to_string(), ScopeValue::Html(value.into()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&ScopeValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl Template {
    /// Parse template text. Never fails: anything that is not a placeholder
    /// is literal text.
    pub fn parse(source: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = source;

        while let Some(pos) = rest.find('$') {
            literal.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];

            if let Some(tail) = after.strip_prefix('$') {
                literal.push('$');
                rest = tail;
                continue;
            }

            let (name, consumed) = if let Some(braced) = after.strip_prefix('{') {
                match braced.find('}') {
                    Some(end)
                        if end > 0
                            && braced[..end].starts_with(is_name_start)
                            && braced[..end].chars().all(is_name_char) =>
                    {
                        (&braced[..end], end + 2)
                    }
                    _ => ("", 0),
                }
            } else if after.starts_with(is_name_start) {
                let end = after.find(|c| !is_name_char(c)).unwrap_or(after.len());
                (&after[..end], end)
            } else {
                ("", 0)
            };

            if name.is_empty() {
                literal.push('$');
                rest = after;
                continue;
            }

            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Placeholder(name.to_string()));
            rest = &after[consumed..];
        }

        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Self { segments }
    }

    /// Expand every placeholder from `scope`.
    pub fn render(&self, scope: &Scope) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(name) => {
                    if let Some(value) = scope.get(name) {
                        value.write_to(&mut out);
                    }
                }
            }
        }
        out
    }

    /// Render this page template, then `layout` with the result bound as
    /// [`MAIN_CONTENT`].
    pub fn render_in(&self, layout: &Template, scope: &Scope) -> String {
        let mut outer = scope.clone();
        outer.html(MAIN_CONTENT, self.render(scope));
        layout.render(&outer)
    }

    /// Placeholder names in order of appearance, repeats included.
    #[cfg(test)]
    fn placeholders(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Placeholder(name) => Some(name.as_str()),
                Segment::Literal(_) => None,
            })
            .collect()
    }
}

fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}
