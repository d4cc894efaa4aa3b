//! # JSONPath Extraction
//!
//! A compiled subset of JSONPath, following Jayway conventions:
//!
//! | Syntax | Meaning |
//! |--------|---------|
//! | `$` | root |
//! | `.name`, `['name']`, `["name"]` | object member |
//! | `.*`, `[*]` | every member or element |
//! | `[n]` | array element, negative counts from the end |
//! | `[a:b]` | array slice, either bound optional |
//! | `..name`, `..*` | recursive descent |
//! | `[0,2]`, `['a','b']` | union |
//! | `[?(<predicate>)]` | filter |
//! | `.length()`, `.sum()`, ... | function on the preceding result, last step only |
//!
//! Filter predicates compare operands with `==`, `!=`, `<`, `<=`, `>`,
//! `>=`, `in` and `nin`, combine them with `&&`, `||`, `!` and parentheses,
//! and test existence with a bare operand (`[?(@.value)]`). Operands are
//! `@`-relative paths, `$`-rooted paths, numbers, quoted strings, `true`,
//! `false`, `null` and array literals. Numbers compare numerically and
//! strings lexicographically; a comparison with a missing member is false.
//! Regular-expression matching (`=~`) is not supported. A filter keeps the
//! matching elements of an array; applied to an object it keeps the
//! object itself when it matches. Under recursive descent (`..[?(...)]`)
//! a filter tests the members of every object as well as the elements of
//! every array.
//!
//! Functions: `length()`/`size()` (array, object or string), `first()`,
//! `last()`, `keys()`, and the numeric aggregates `min()`, `max()`,
//! `sum()`, `avg()` and `stddev()`, which skip non-numeric entries and
//! return floating-point numbers.
//!
//! A path made only of member and index steps is *definite*: it yields
//! the one matched value, and a miss is an error. A function call also
//! makes the path definite. Any other path yields an array of every match
//! (possibly empty).
//!
//! A path without a leading `$` is read relative to the root
//! (`items[0]` is `$.items[0]`).

use std::cmp::Ordering;

use serde_json::{Number, Value};

use super::errors::ExtractionError;

/// One selector inside a step.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Selector {
    Name(String),
    Index(i64),
    Slice { start: Option<i64>, end: Option<i64> },
    Wildcard,
    Filter(Box<Predicate>),
}

/// One step of a path.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Apply selectors to the current nodes.
    Child(Vec<Selector>),
    /// Apply selectors to the current nodes and all their descendants.
    Descendant(Vec<Selector>),
}

impl Segment {
    fn is_definite(&self) -> bool {
        match self {
            Segment::Child(selectors) => {
                selectors.len() == 1
                    && matches!(selectors[0], Selector::Name(_) | Selector::Index(_))
            }
            Segment::Descendant(_) => false,
        }
    }
}

fn all_definite(segments: &[Segment]) -> bool {
    segments.iter().all(Segment::is_definite)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Operand {
    /// Path relative to the element under test (`@`).
    Current(Vec<Segment>),
    /// Path from the document root (`$`).
    Root(Vec<Segment>),
    Literal(Value),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    In,
    Nin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Predicate {
    Exists(Operand),
    Compare {
        left: Operand,
        op: CompareOp,
        right: Operand,
    },
    Not(Box<Predicate>),
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
}

impl Predicate {
    fn test(&self, current: &Value, root: &Value) -> bool {
        match self {
            Predicate::Exists(operand) => operand.exists(current, root),
            Predicate::Compare { left, op, right } => {
                match (left.resolve(current, root), right.resolve(current, root)) {
                    (Some(a), Some(b)) => compare(*op, &a, &b),
                    _ => false,
                }
            }
            Predicate::Not(inner) => !inner.test(current, root),
            Predicate::And(a, b) => a.test(current, root) && b.test(current, root),
            Predicate::Or(a, b) => a.test(current, root) || b.test(current, root),
        }
    }
}

impl Operand {
    fn exists(&self, current: &Value, root: &Value) -> bool {
        match self {
            Operand::Current(segments) => !walk(segments, current, root).is_empty(),
            Operand::Root(segments) => !walk(segments, root, root).is_empty(),
            Operand::Literal(value) => !matches!(value, Value::Null | Value::Bool(false)),
        }
    }

    fn resolve(&self, current: &Value, root: &Value) -> Option<Value> {
        match self {
            Operand::Current(segments) => resolve_path(segments, current, root),
            Operand::Root(segments) => resolve_path(segments, root, root),
            Operand::Literal(value) => Some(value.clone()),
        }
    }
}

/// Definite paths resolve to their one value, others to an array.
fn resolve_path(segments: &[Segment], start: &Value, root: &Value) -> Option<Value> {
    let matches = walk(segments, start, root);
    if all_definite(segments) {
        matches.first().map(|v| (*v).clone())
    } else {
        Some(Value::Array(matches.into_iter().cloned().collect()))
    }
}

fn compare(op: CompareOp, a: &Value, b: &Value) -> bool {
    match op {
        CompareOp::Eq => json_eq(a, b),
        CompareOp::Ne => !json_eq(a, b),
        CompareOp::Lt => json_cmp(a, b) == Some(Ordering::Less),
        CompareOp::Le => matches!(json_cmp(a, b), Some(Ordering::Less | Ordering::Equal)),
        CompareOp::Gt => json_cmp(a, b) == Some(Ordering::Greater),
        CompareOp::Ge => matches!(json_cmp(a, b), Some(Ordering::Greater | Ordering::Equal)),
        CompareOp::In => b.as_array().is_some_and(|items| items.iter().any(|i| json_eq(a, i))),
        CompareOp::Nin => b.as_array().is_some_and(|items| !items.iter().any(|i| json_eq(a, i))),
    }
}

/// `1 == 1.0` holds; everything else is structural equality.
fn json_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

fn json_cmp(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Trailing function call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Function {
    Length,
    First,
    Last,
    Keys,
    Min,
    Max,
    Sum,
    Avg,
    Stddev,
}

impl Function {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "length" | "size" => Self::Length,
            "first" => Self::First,
            "last" => Self::Last,
            "keys" => Self::Keys,
            "min" => Self::Min,
            "max" => Self::Max,
            "sum" => Self::Sum,
            "avg" => Self::Avg,
            "stddev" => Self::Stddev,
            _ => return None,
        })
    }

    /// `None` when the input has the wrong shape or nothing to aggregate.
    fn apply(self, input: &Value) -> Option<Value> {
        match self {
            Self::Length => {
                let len = match input {
                    Value::Array(items) => items.len(),
                    Value::Object(map) => map.len(),
                    Value::String(text) => text.chars().count(),
                    _ => return None,
                };
                Some(Value::from(len as u64))
            }
            Self::First => input.as_array()?.first().cloned(),
            Self::Last => input.as_array()?.last().cloned(),
            Self::Keys => Some(Value::Array(
                input.as_object()?.keys().cloned().map(Value::String).collect(),
            )),
            Self::Min | Self::Max | Self::Sum | Self::Avg | Self::Stddev => {
                let numbers: Vec<f64> = match input {
                    Value::Array(items) => items.iter().filter_map(Value::as_f64).collect(),
                    Value::Number(n) => vec![n.as_f64()?],
                    _ => return None,
                };
                if numbers.is_empty() {
                    return None;
                }
                let count = numbers.len() as f64;
                let sum: f64 = numbers.iter().sum();
                let result = match self {
                    Self::Min => numbers.iter().copied().fold(f64::INFINITY, f64::min),
                    Self::Max => numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                    Self::Sum => sum,
                    Self::Avg => sum / count,
                    _ => {
                        let mean = sum / count;
                        let squares: f64 = numbers.iter().map(|n| n * n).sum();
                        (squares / count - mean * mean).max(0.0).sqrt()
                    }
                };
                Number::from_f64(result).map(Value::Number)
            }
        }
    }
}

/// A compiled extraction path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPath {
    source: String,
    segments: Vec<Segment>,
    function: Option<Function>,
}

impl JsonPath {
    /// Compile a path expression.
    pub fn parse(path: &str) -> Result<Self, ExtractionError> {
        let trimmed = path.trim();
        if trimmed.is_empty() {
            return Err(invalid(path, "path is empty"));
        }

        let normalized = if trimmed.starts_with('$') {
            trimmed.to_string()
        } else if trimmed.starts_with('[') {
            format!("${trimmed}")
        } else {
            format!("$.{trimmed}")
        };

        let (segments, function) = Parser::new(path, &normalized).parse()?;
        Ok(Self {
            source: path.to_string(),
            segments,
            function,
        })
    }

    /// The expression this path was compiled from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether this path yields a single value rather than a list.
    pub fn is_definite(&self) -> bool {
        self.function.is_some() || all_definite(&self.segments)
    }

    /// Every value the path's steps match, in document order.
    ///
    /// A trailing function is not applied here.
    pub fn select<'a>(&self, root: &'a Value) -> Vec<&'a Value> {
        walk(&self.segments, root, root)
    }

    /// Apply the path to `root`.
    ///
    /// Definite paths return the matched value or `NoMatch`; indefinite
    /// paths return an array of matches. A function that has nothing to
    /// work on is a `NoMatch`.
    pub fn extract(&self, root: &Value) -> Result<Value, ExtractionError> {
        let matches = self.select(root);
        let no_match = || ExtractionError::NoMatch {
            path: self.source.clone(),
        };

        let value = if all_definite(&self.segments) {
            matches.first().map(|v| (*v).clone()).ok_or_else(no_match)?
        } else {
            Value::Array(matches.into_iter().cloned().collect())
        };

        match self.function {
            Some(function) => function.apply(&value).ok_or_else(no_match),
            None => Ok(value),
        }
    }
}

/// Compile `path` and apply it to `root`.
pub fn extract(root: &Value, path: &str) -> Result<Value, ExtractionError> {
    JsonPath::parse(path)?.extract(root)
}

fn walk<'a>(segments: &[Segment], start: &'a Value, root: &'a Value) -> Vec<&'a Value> {
    let mut nodes = vec![start];

    for segment in segments {
        let mut next = Vec::new();
        match segment {
            Segment::Child(selectors) => {
                for node in &nodes {
                    apply_selectors(node, selectors, root, false, &mut next);
                }
            }
            Segment::Descendant(selectors) => {
                for node in &nodes {
                    descend(node, selectors, root, &mut next);
                }
            }
        }
        nodes = next;
    }

    nodes
}

fn apply_selectors<'a>(
    node: &'a Value,
    selectors: &[Selector],
    root: &'a Value,
    descending: bool,
    out: &mut Vec<&'a Value>,
) {
    for selector in selectors {
        match (selector, node) {
            (Selector::Name(name), Value::Object(map)) => out.extend(map.get(name)),
            (Selector::Index(index), Value::Array(items)) => {
                if let Some(i) = resolve_index(*index, items.len()) {
                    out.push(&items[i]);
                }
            }
            (Selector::Slice { start, end }, Value::Array(items)) => {
                let len = items.len();
                let from = start.map_or(0, |s| clamp_bound(s, len));
                let to = end.map_or(len, |e| clamp_bound(e, len));
                if from < to {
                    out.extend(&items[from..to]);
                }
            }
            (Selector::Wildcard, Value::Array(items)) => out.extend(items.iter()),
            (Selector::Wildcard, Value::Object(map)) => out.extend(map.values()),
            (Selector::Filter(predicate), Value::Array(items)) => {
                out.extend(items.iter().filter(|item| predicate.test(item, root)));
            }
            (Selector::Filter(predicate), Value::Object(map)) if descending => {
                out.extend(map.values().filter(|member| predicate.test(member, root)));
            }
            (Selector::Filter(predicate), Value::Object(_)) if predicate.test(node, root) => {
                out.push(node);
            }
            _ => {}
        }
    }
}

fn descend<'a>(node: &'a Value, selectors: &[Selector], root: &'a Value, out: &mut Vec<&'a Value>) {
    apply_selectors(node, selectors, root, true, out);
    match node {
        Value::Array(items) => items.iter().for_each(|child| descend(child, selectors, root, out)),
        Value::Object(map) => map.values().for_each(|child| descend(child, selectors, root, out)),
        _ => {}
    }
}

fn resolve_index(index: i64, len: usize) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let resolved = if index < 0 { len + index } else { index };
    (0..len).contains(&resolved).then(|| resolved as usize)
}

fn clamp_bound(bound: i64, len: usize) -> usize {
    let len_i = i64::try_from(len).unwrap_or(i64::MAX);
    let resolved = if bound < 0 { len_i + bound } else { bound };
    resolved.clamp(0, len_i) as usize
}

fn invalid(path: &str, reason: impl Into<String>) -> ExtractionError {
    ExtractionError::InvalidPath {
        path: path.to_string(),
        reason: reason.into(),
    }
}

// =============================================================================
// PARSER
// =============================================================================

struct Parser<'a> {
    /// Original text, for error messages.
    path: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(path: &'a str, normalized: &str) -> Self {
        Self {
            path,
            chars: normalized.chars().collect(),
            // Skip the leading `$`.
            pos: 1,
        }
    }

    fn parse(mut self) -> Result<(Vec<Segment>, Option<Function>), ExtractionError> {
        let segments = self.parse_segments(false)?;

        let function = match self.peek() {
            None => None,
            Some('.') => {
                self.pos += 1;
                Some(self.parse_function()?)
            }
            Some(other) => return Err(self.error(format!("unexpected '{other}'"))),
        };

        if let Some(other) = self.peek() {
            return Err(self.error(format!("unexpected '{other}' after function call")));
        }
        Ok((segments, function))
    }

    /// Steps up to the end of the path, a trailing function call, or (in
    /// a filter) the first character that cannot continue a path.
    fn parse_segments(&mut self, in_filter: bool) -> Result<Vec<Segment>, ExtractionError> {
        let mut segments = Vec::new();

        loop {
            let segment = match self.peek() {
                Some('.') if self.peek_at(1) == Some('.') => {
                    self.pos += 2;
                    Segment::Descendant(self.parse_step(in_filter)?)
                }
                Some('.') if !in_filter && self.function_ahead() => break,
                Some('.') => {
                    self.pos += 1;
                    Segment::Child(self.parse_step(in_filter)?)
                }
                Some('[') => Segment::Child(self.parse_bracket()?),
                _ => break,
            };
            segments.push(segment);
        }

        Ok(segments)
    }

    /// The step after `.` or `..`: a name, `*`, or a bracket.
    fn parse_step(&mut self, in_filter: bool) -> Result<Vec<Selector>, ExtractionError> {
        match self.peek() {
            Some('*') => {
                self.pos += 1;
                Ok(vec![Selector::Wildcard])
            }
            Some('[') => self.parse_bracket(),
            Some(_) => Ok(vec![Selector::Name(self.parse_name(in_filter)?)]),
            None => Err(self.error("path ends after '.'")),
        }
    }

    fn parse_name(&mut self, in_filter: bool) -> Result<String, ExtractionError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            let ends_name = c == '.'
                || c == '['
                || (in_filter && (c.is_whitespace() || "()],=!<>&|".contains(c)));
            if ends_name {
                break;
            }
            self.pos += 1;
        }

        let name: String = self.chars[start..self.pos].iter().collect();
        if name.trim().is_empty() {
            return Err(self.error("empty member name"));
        }
        Ok(name)
    }

    /// Whether the `.` at the cursor starts `name(`.
    fn function_ahead(&self) -> bool {
        let mut offset = 1;
        while self
            .peek_at(offset)
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            offset += 1;
        }
        offset > 1 && self.peek_at(offset) == Some('(')
    }

    /// `name()` with the cursor after the `.`.
    fn parse_function(&mut self) -> Result<Function, ExtractionError> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
            self.pos += 1;
        }
        let name: String = self.chars[start..self.pos].iter().collect();

        self.expect('(')?;
        self.skip_whitespace();
        self.expect(')')?;

        Function::from_name(&name).ok_or_else(|| self.error(format!("unknown function '{name}()'")))
    }

    fn parse_bracket(&mut self) -> Result<Vec<Selector>, ExtractionError> {
        // Consume `[`.
        self.pos += 1;
        let mut selectors = Vec::new();

        loop {
            self.skip_whitespace();
            let selector = match self.peek() {
                Some('*') => {
                    self.pos += 1;
                    Selector::Wildcard
                }
                Some('?') => {
                    self.pos += 1;
                    Selector::Filter(Box::new(self.parse_or()?))
                }
                Some(quote @ ('\'' | '"')) => Selector::Name(self.parse_quoted(quote)?),
                Some(_) => self.parse_numeric()?,
                None => return Err(self.error("unterminated '['")),
            };
            selectors.push(selector);

            self.skip_whitespace();
            match self.peek() {
                Some(',') => self.pos += 1,
                Some(']') => {
                    self.pos += 1;
                    return Ok(selectors);
                }
                Some(other) => return Err(self.error(format!("unexpected '{other}' in brackets"))),
                None => return Err(self.error("unterminated '['")),
            }
        }
    }

    fn parse_quoted(&mut self, quote: char) -> Result<String, ExtractionError> {
        // Consume opening quote.
        self.pos += 1;
        let mut name = String::new();

        while let Some(c) = self.peek() {
            self.pos += 1;
            match c {
                '\\' => match self.peek() {
                    Some(escaped) => {
                        name.push(escaped);
                        self.pos += 1;
                    }
                    None => break,
                },
                c if c == quote => return Ok(name),
                c => name.push(c),
            }
        }

        Err(self.error("unterminated quoted name"))
    }

    /// An index or a slice, up to the next `,` or `]`.
    fn parse_numeric(&mut self) -> Result<Selector, ExtractionError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == ',' || c == ']' {
                break;
            }
            self.pos += 1;
        }
        let token: String = self.chars[start..self.pos].iter().collect();
        let token = token.trim();

        if let Some((from, to)) = token.split_once(':') {
            if to.contains(':') {
                return Err(self.error("slice steps are not supported"));
            }
            return Ok(Selector::Slice {
                start: self.parse_bound(from)?,
                end: self.parse_bound(to)?,
            });
        }

        token
            .parse::<i64>()
            .map(Selector::Index)
            .map_err(|_| self.error(format!("invalid index '{token}'")))
    }

    fn parse_bound(&self, text: &str) -> Result<Option<i64>, ExtractionError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        text.parse::<i64>()
            .map(Some)
            .map_err(|_| self.error(format!("invalid slice bound '{text}'")))
    }

    // -------------------------------------------------------------------------
    // Filter predicates
    // -------------------------------------------------------------------------

    fn parse_or(&mut self) -> Result<Predicate, ExtractionError> {
        let mut left = self.parse_and()?;
        loop {
            self.skip_whitespace();
            if !self.eat("||") {
                return Ok(left);
            }
            let right = self.parse_and()?;
            left = Predicate::Or(Box::new(left), Box::new(right));
        }
    }

    fn parse_and(&mut self) -> Result<Predicate, ExtractionError> {
        let mut left = self.parse_unary()?;
        loop {
            self.skip_whitespace();
            if !self.eat("&&") {
                return Ok(left);
            }
            let right = self.parse_unary()?;
            left = Predicate::And(Box::new(left), Box::new(right));
        }
    }

    fn parse_unary(&mut self) -> Result<Predicate, ExtractionError> {
        self.skip_whitespace();
        match self.peek() {
            Some('!') if self.peek_at(1) != Some('=') => {
                self.pos += 1;
                Ok(Predicate::Not(Box::new(self.parse_unary()?)))
            }
            Some('(') => {
                self.pos += 1;
                let inner = self.parse_or()?;
                self.skip_whitespace();
                self.expect(')')?;
                Ok(inner)
            }
            _ => self.parse_comparison(),
        }
    }

    fn parse_comparison(&mut self) -> Result<Predicate, ExtractionError> {
        let left = self.parse_operand()?;
        self.skip_whitespace();

        let Some(op) = self.parse_operator()? else {
            return Ok(Predicate::Exists(left));
        };
        let right = self.parse_operand()?;
        Ok(Predicate::Compare { left, op, right })
    }

    fn parse_operator(&mut self) -> Result<Option<CompareOp>, ExtractionError> {
        if self.eat("=~") {
            return Err(self.error("regular expression filters are not supported"));
        }
        let op = if self.eat("==") {
            CompareOp::Eq
        } else if self.eat("!=") {
            CompareOp::Ne
        } else if self.eat("<=") {
            CompareOp::Le
        } else if self.eat(">=") {
            CompareOp::Ge
        } else if self.eat("<") {
            CompareOp::Lt
        } else if self.eat(">") {
            CompareOp::Gt
        } else if self.eat_word("nin") {
            CompareOp::Nin
        } else if self.eat_word("in") {
            CompareOp::In
        } else {
            return Ok(None);
        };
        Ok(Some(op))
    }

    fn parse_operand(&mut self) -> Result<Operand, ExtractionError> {
        self.skip_whitespace();
        match self.peek() {
            Some('@') => {
                self.pos += 1;
                Ok(Operand::Current(self.parse_segments(true)?))
            }
            Some('$') => {
                self.pos += 1;
                Ok(Operand::Root(self.parse_segments(true)?))
            }
            Some(_) => Ok(Operand::Literal(self.parse_literal()?)),
            None => Err(self.error("filter ends before an operand")),
        }
    }

    fn parse_literal(&mut self) -> Result<Value, ExtractionError> {
        match self.peek() {
            Some(quote @ ('\'' | '"')) => Ok(Value::String(self.parse_quoted(quote)?)),
            Some('[') => {
                self.pos += 1;
                let mut items = Vec::new();
                loop {
                    self.skip_whitespace();
                    if self.peek() == Some(']') && items.is_empty() {
                        self.pos += 1;
                        return Ok(Value::Array(items));
                    }
                    items.push(self.parse_literal()?);
                    self.skip_whitespace();
                    match self.peek() {
                        Some(',') => self.pos += 1,
                        Some(']') => {
                            self.pos += 1;
                            return Ok(Value::Array(items));
                        }
                        _ => return Err(self.error("unterminated array literal")),
                    }
                }
            }
            Some(c) if c == '-' || c.is_ascii_digit() => self.parse_number(),
            Some(_) if self.eat_word("true") => Ok(Value::Bool(true)),
            Some(_) if self.eat_word("false") => Ok(Value::Bool(false)),
            Some(_) if self.eat_word("null") => Ok(Value::Null),
            Some(other) => Err(self.error(format!("unexpected '{other}' in filter"))),
            None => Err(self.error("filter ends before an operand")),
        }
    }

    fn parse_number(&mut self) -> Result<Value, ExtractionError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_digit() || "+-.eE".contains(c))
        {
            self.pos += 1;
        }
        let token: String = self.chars[start..self.pos].iter().collect();

        if let Ok(int) = token.parse::<i64>() {
            return Ok(Value::from(int));
        }
        token
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| self.error(format!("invalid number '{token}'")))
    }

    // -------------------------------------------------------------------------
    // Cursor helpers
    // -------------------------------------------------------------------------

    /// Consume `token` if the input continues with it.
    fn eat(&mut self, token: &str) -> bool {
        let matches = token
            .chars()
            .enumerate()
            .all(|(i, c)| self.peek_at(i) == Some(c));
        if matches {
            self.pos += token.chars().count();
        }
        matches
    }

    /// Like `eat`, but the keyword must not run into an identifier.
    fn eat_word(&mut self, word: &str) -> bool {
        let len = word.chars().count();
        let boundary = !self
            .peek_at(len)
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_');
        boundary && self.eat(word)
    }

    fn expect(&mut self, c: char) -> Result<(), ExtractionError> {
        if self.peek() == Some(c) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(format!("expected '{c}'")))
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn error(&self, reason: impl Into<String>) -> ExtractionError {
        invalid(self.path, reason)
    }
}
