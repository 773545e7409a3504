//! Template expansion.
//!
//! Expansion runs in two passes:
//!
//! 1. `$name` and `${name}` are replaced from the variable set. Unknown names
//!    expand to the empty string, like a shell would.
//! 2. `{{ ... }}` actions are parsed and then evaluated. An action is a
//!    pipeline: an operand (`.Field`, `.Env.NAME` or a `"quoted"` literal)
//!    optionally followed by `| func` stages. `{{-` and `-}}` trim the
//!    whitespace next to the action.
//!
//! Parsing finishes before anything is evaluated, so a malformed template is
//! reported even when the variables it names are missing.
//!
//! [`render`] runs the second pass alone. Signer stdin goes through it so a
//! literal `$` in a passphrase reaches the signer untouched.

use tracing::trace;

use crate::core::types::{Env, Fields};
use crate::error::{TemplateError, TemplateReason};

/// Variables visible to a single expansion.
#[derive(Debug, Clone, Copy)]
pub struct Vars<'a> {
    /// `$NAME` and `{{ .Env.NAME }}` lookups.
    pub env: &'a Env,
    /// Top-level `{{ .Field }}` lookups.
    pub fields: &'a Fields,
}

impl<'a> Vars<'a> {
    pub fn new(env: &'a Env, fields: &'a Fields) -> Self {
        Self { env, fields }
    }
}

/// Expand `template` against `vars`.
///
/// # Errors
///
/// Returns [`TemplateError`] when an action is malformed, names an unknown
/// field or function, or reads a missing `.Env` key.
pub fn expand(template: &str, vars: &Vars<'_>) -> Result<String, TemplateError> {
    let substituted = expand_env(template, vars.env);
    let rendered = Template::parse(&substituted)?.render(vars)?;
    trace!(template, rendered = %rendered, "expanded template");
    Ok(rendered)
}

/// Render only the `{{ }}` actions of `template`; `$` is left alone.
///
/// # Errors
///
/// Same as [`expand`].
pub fn render(template: &str, vars: &Vars<'_>) -> Result<String, TemplateError> {
    Template::parse(template)?.render(vars)
}

/// Replace `$name` and `${name}` placeholders from `env`.
///
/// A `$` not followed by a valid name is kept literally.
pub fn expand_env(input: &str, env: &Env) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        match variable_name(after) {
            Some((name, consumed)) => {
                if let Some(value) = env.get(name) {
                    out.push_str(value);
                }
                rest = &after[consumed..];
            }
            None => {
                out.push('$');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Name following a `$`, and how many bytes it spans.
fn variable_name(s: &str) -> Option<(&str, usize)> {
    if let Some(braced) = s.strip_prefix('{') {
        let end = braced.find('}')?;
        let name = &braced[..end];
        if name.is_empty() || !name.chars().all(is_name_char) {
            return None;
        }
        return Some((name, end + 2));
    }

    let len = s.find(|c: char| !is_name_char(c)).unwrap_or(s.len());
    (len > 0).then(|| (&s[..len], len))
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// A parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Text(String),
    Action { line: usize, pipeline: Vec<Stage> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Stage {
    Value(Operand),
    Call { func: Func, arg: Option<Operand> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Operand {
    Field(Vec<String>),
    Literal(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Func {
    ToLower,
    ToUpper,
    Trim,
}

impl Func {
    fn lookup(name: &str) -> Option<Self> {
        match name {
            "tolower" => Some(Self::ToLower),
            "toupper" => Some(Self::ToUpper),
            "trim" => Some(Self::Trim),
            _ => None,
        }
    }

    fn apply(self, value: &str) -> String {
        match self {
            Self::ToLower => value.to_lowercase(),
            Self::ToUpper => value.to_uppercase(),
            Self::Trim => value.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Field(Vec<String>),
    Str(String),
    Ident(String),
    Pipe,
}

impl Template {
    /// Parse `src` into text and action nodes.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] for unclosed or malformed actions.
    pub fn parse(src: &str) -> Result<Self, TemplateError> {
        let mut nodes = Vec::new();
        let mut rest = src;
        let mut offset = 0;

        while let Some(open) = rest.find("{{") {
            let line = line_at(src, offset + open);
            let mut text = &rest[..open];
            let mut body_start = open + 2;

            if trim_marker(&rest[body_start..]) {
                text = text.trim_end();
                body_start += 1;
            }
            if !text.is_empty() {
                nodes.push(Node::Text(text.to_string()));
            }

            let close = find_close(&rest[body_start..]).ok_or(TemplateError {
                line,
                reason: TemplateReason::UnclosedAction,
            })?;
            let mut body = &rest[body_start..body_start + close];
            let trim_after = body.ends_with('-')
                && body[..body.len() - 1].ends_with(char::is_whitespace);
            if trim_after {
                body = &body[..body.len() - 1];
            }

            let pipeline = parse_pipeline(body).map_err(|reason| TemplateError { line, reason })?;
            nodes.push(Node::Action { line, pipeline });

            let next = body_start + close + 2;
            offset += next;
            rest = &rest[next..];
            if trim_after {
                let trimmed = rest.trim_start();
                offset += rest.len() - trimmed.len();
                rest = trimmed;
            }
        }

        if !rest.is_empty() {
            nodes.push(Node::Text(rest.to_string()));
        }

        Ok(Self { nodes })
    }

    /// Evaluate the template against `vars`.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] for unknown fields and missing `.Env` keys.
    pub fn render(&self, vars: &Vars<'_>) -> Result<String, TemplateError> {
        let mut out = String::new();
        for node in &self.nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Action { line, pipeline } => {
                    let value = eval_pipeline(pipeline, vars).map_err(|reason| TemplateError {
                        line: *line,
                        reason,
                    })?;
                    out.push_str(&value);
                }
            }
        }
        Ok(out)
    }
}

fn line_at(src: &str, offset: usize) -> usize {
    src[..offset].matches('\n').count() + 1
}

/// Offset of the `}}` ending an action. Braces inside a quoted string don't
/// count.
fn find_close(body: &str) -> Option<usize> {
    let bytes = body.as_bytes();
    let mut in_string = false;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if in_string => i += 1,
            b'"' => in_string = !in_string,
            b'}' if !in_string && bytes.get(i + 1) == Some(&b'}') => return Some(i),
            _ => {}
        }
        i += 1;
    }
    None
}

/// `{{-` only trims when the dash is followed by whitespace.
fn trim_marker(body: &str) -> bool {
    body.strip_prefix('-')
        .is_some_and(|after| after.starts_with(char::is_whitespace))
}

fn parse_pipeline(body: &str) -> Result<Vec<Stage>, TemplateReason> {
    let tokens = tokenize(body)?;
    let mut stages = Vec::new();

    for (index, command) in tokens.split(|t| *t == Token::Pipe).enumerate() {
        let stage = match command {
            [] => return Err(TemplateReason::EmptyAction),
            [Token::Ident(name)] => {
                let func = Func::lookup(name)
                    .ok_or_else(|| TemplateReason::UnknownFunction(name.clone()))?;
                if index == 0 {
                    return Err(TemplateReason::WrongArgs(name.clone()));
                }
                Stage::Call { func, arg: None }
            }
            [Token::Ident(name), arg] => {
                let func = Func::lookup(name)
                    .ok_or_else(|| TemplateReason::UnknownFunction(name.clone()))?;
                // Piped stages already receive the previous value.
                if index > 0 {
                    return Err(TemplateReason::WrongArgs(name.clone()));
                }
                Stage::Call {
                    func,
                    arg: Some(operand(arg)?),
                }
            }
            [Token::Ident(name), ..] => return Err(TemplateReason::WrongArgs(name.clone())),
            [single] => {
                if index > 0 {
                    return Err(TemplateReason::NotAFunction(describe(single)));
                }
                Stage::Value(operand(single)?)
            }
            [first, ..] => return Err(TemplateReason::NotAFunction(describe(first))),
        };
        stages.push(stage);
    }

    Ok(stages)
}

fn operand(token: &Token) -> Result<Operand, TemplateReason> {
    match token {
        Token::Field(path) => Ok(Operand::Field(path.clone())),
        Token::Str(value) => Ok(Operand::Literal(value.clone())),
        Token::Ident(name) => Err(TemplateReason::NotAFunction(name.clone())),
        Token::Pipe => Err(TemplateReason::UnexpectedChar('|')),
    }
}

fn describe(token: &Token) -> String {
    match token {
        Token::Field(path) => format!(".{}", path.join(".")),
        Token::Str(value) => format!("{:?}", value),
        Token::Ident(name) => name.clone(),
        Token::Pipe => "|".to_string(),
    }
}

fn tokenize(body: &str) -> Result<Vec<Token>, TemplateReason> {
    let mut tokens = Vec::new();
    let mut chars = body.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '|' => {
                chars.next();
                tokens.push(Token::Pipe);
            }
            '.' => {
                let mut path = Vec::new();
                while chars.next_if_eq(&'.').is_some() {
                    let mut segment = String::new();
                    while let Some(c) = chars.next_if(|c| is_name_char(*c)) {
                        segment.push(c);
                    }
                    if segment.is_empty() {
                        break;
                    }
                    path.push(segment);
                }
                tokens.push(Token::Field(path));
            }
            '"' => {
                chars.next();
                let mut value = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some('n') => value.push('\n'),
                            Some('t') => value.push('\t'),
                            Some(other) => value.push(other),
                            None => return Err(TemplateReason::UnterminatedString),
                        },
                        Some(other) => value.push(other),
                        None => return Err(TemplateReason::UnterminatedString),
                    }
                }
                tokens.push(Token::Str(value));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut name = String::new();
                while let Some(c) = chars.next_if(|c| is_name_char(*c)) {
                    name.push(c);
                }
                tokens.push(Token::Ident(name));
            }
            other => return Err(TemplateReason::UnexpectedChar(other)),
        }
    }

    Ok(tokens)
}

fn eval_pipeline(pipeline: &[Stage], vars: &Vars<'_>) -> Result<String, TemplateReason> {
    let mut value = String::new();
    for stage in pipeline {
        value = match stage {
            Stage::Value(op) => eval_operand(op, vars)?,
            Stage::Call { func, arg: Some(op) } => func.apply(&eval_operand(op, vars)?),
            Stage::Call { func, arg: None } => func.apply(&value),
        };
    }
    Ok(value)
}

fn eval_operand(op: &Operand, vars: &Vars<'_>) -> Result<String, TemplateReason> {
    match op {
        Operand::Literal(value) => Ok(value.clone()),
        Operand::Field(path) => match path.as_slice() {
            [env, key] if env == "Env" => vars
                .env
                .get(key)
                .cloned()
                .ok_or_else(|| TemplateReason::MissingKey(key.clone())),
            [name] => vars
                .fields
                .get(name)
                .cloned()
                .ok_or_else(|| TemplateReason::UnknownField(name.clone())),
            _ => Err(TemplateReason::UnknownField(format!(".{}", path.join(".")))),
        },
    }
}
