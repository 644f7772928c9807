//! Prompt templates with `{name}` placeholders.
//!
//! `{{` and `}}` render as literal braces. Construction checks that the
//! declared input variables and the placeholders agree, so a miswired stage
//! fails when the chain is built rather than halfway through a run.

use std::collections::HashSet;

use cove_types::error::TemplateError;

use super::Variables;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Variable(String),
}

#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
    input_variables: Vec<String>,
    segments: Vec<Segment>,
}

impl PromptTemplate {
    /// Parse `template` and check it against the declared `input_variables`.
    ///
    /// # Errors
    ///
    /// - [`TemplateError::UnbalancedBrace`] for a stray `{` or `}`
    /// - [`TemplateError::UndeclaredVariable`] for a placeholder not declared
    /// - [`TemplateError::UnusedVariable`] for a declared variable never used
    pub fn new(template: &str, input_variables: &[&str]) -> Result<Self, TemplateError> {
        let segments = parse(template)?;
        let used = placeholders(&segments);

        let declared: HashSet<&str> = input_variables.iter().copied().collect();
        if let Some(undeclared) = used.iter().find(|v| !declared.contains(v.as_str())) {
            return Err(TemplateError::UndeclaredVariable(undeclared.clone()));
        }
        if let Some(unused) = input_variables.iter().find(|v| !used.iter().any(|u| u == *v)) {
            return Err(TemplateError::UnusedVariable((*unused).to_string()));
        }

        Ok(Self {
            template: template.to_string(),
            input_variables: input_variables.iter().map(|v| v.to_string()).collect(),
            segments,
        })
    }

    /// Parse `template`, declaring its placeholders in order of appearance.
    pub fn from_template(template: &str) -> Result<Self, TemplateError> {
        let segments = parse(template)?;
        let input_variables = placeholders(&segments);
        Ok(Self {
            template: template.to_string(),
            input_variables,
            segments,
        })
    }

    pub fn input_variables(&self) -> &[String] {
        &self.input_variables
    }

    /// Substitute every placeholder from `variables`.
    pub fn format(&self, variables: &Variables) -> Result<String, TemplateError> {
        let mut rendered = String::with_capacity(self.template.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => rendered.push_str(text),
                Segment::Variable(name) => {
                    let value = variables
                        .get(name)
                        .ok_or_else(|| TemplateError::MissingVariable(name.clone()))?;
                    rendered.push_str(value);
                }
            }
        }
        Ok(rendered)
    }
}

/// Distinct placeholder names in order of first appearance.
fn placeholders(segments: &[Segment]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for segment in segments {
        if let Segment::Variable(name) = segment {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
    }
    names
}

fn parse(template: &str) -> Result<Vec<Segment>, TemplateError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = template.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '{' if chars.peek().is_some_and(|&(_, next)| next == '{') => {
                chars.next();
                literal.push('{');
            }
            '}' if chars.peek().is_some_and(|&(_, next)| next == '}') => {
                chars.next();
                literal.push('}');
            }
            '{' => {
                let mut name = String::new();
                let mut closed = false;
                for (_, c) in chars.by_ref() {
                    match c {
                        '}' => {
                            closed = true;
                            break;
                        }
                        '{' => return Err(TemplateError::UnbalancedBrace(pos)),
                        c => name.push(c),
                    }
                }
                let name = name.trim();
                if !closed || name.is_empty() {
                    return Err(TemplateError::UnbalancedBrace(pos));
                }
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Variable(name.to_string()));
            }
            '}' => return Err(TemplateError::UnbalancedBrace(pos)),
            c => literal.push(c),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}
