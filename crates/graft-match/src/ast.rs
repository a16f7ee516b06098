//! AST for match expressions.

use std::fmt;

/// A parsed match expression.
///
/// Obtained from [`parse`](crate::parse); apply it to a document with
/// [`Expr::evaluate`](crate::Expr::evaluate).
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub(crate) segments: Vec<Segment>,
}

impl Expr {
    pub(crate) fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.segments.iter().enumerate() {
            // Attributes at the start and right after `..` are written
            // bare: `foo.bar` and `store..price`, not `.foo` or `...price`.
            let bare =
                i == 0 || matches!(self.segments.get(i - 1), Some(Segment::Recursive));
            match seg {
                Segment::Attribute(name) if bare => write!(f, "{}", name)?,
                _ => write!(f, "{}", seg)?,
            }
        }
        Ok(())
    }
}

/// One step of an expression.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Segment {
    /// Member access: `.name`
    Attribute(String),
    /// All elements or members: `.*`
    Wildcard,
    /// The location and all its descendants: `..`
    Recursive,
    /// Bracketed selector union: `[0]`, `[1:3, 9]`, `[wage > 100]`
    Bracket(Vec<Selector>),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Attribute(name) => write!(f, ".{}", name),
            Segment::Wildcard => write!(f, ".*"),
            Segment::Recursive => write!(f, ".."),
            Segment::Bracket(selectors) => {
                write!(f, "[")?;
                for (i, sel) in selectors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", sel)?;
                }
                write!(f, "]")
            }
        }
    }
}

/// A single selector inside a bracket.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Selector {
    /// Member by name: `[first]` or `['first name']`
    Attribute(String),
    /// Element by index; negative values count positions back from the end.
    Index(i64),
    /// Range of elements, end-exclusive: `[1:3]`, `[2:]`, `[:3]`
    Slice { start: Option<i64>, end: Option<i64> },
    /// Every element or member: `[*]`
    Wildcard,
    /// Existence filter: `[bonus?]`
    Exists(FieldPath),
    /// Comparison filter: `[wage > 50000]`
    Compare {
        path: FieldPath,
        op: CompareOp,
        literal: Literal,
    },
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Attribute(name) => write!(f, "{}", name),
            Selector::Index(i) => write!(f, "{}", i),
            Selector::Slice { start, end } => {
                if let Some(s) = start {
                    write!(f, "{}", s)?;
                }
                write!(f, ":")?;
                if let Some(e) = end {
                    write!(f, "{}", e)?;
                }
                Ok(())
            }
            Selector::Wildcard => write!(f, "*"),
            Selector::Exists(path) => write!(f, "{}?", path),
            Selector::Compare { path, op, literal } => {
                write!(f, "{} {} {}", path, op, literal)
            }
        }
    }
}

/// Dotted field path used inside filters: `name.first`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FieldPath {
    pub(crate) fields: Vec<String>,
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", field)?;
        }
        Ok(())
    }
}

/// Comparison operator in a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        };
        write!(f, "{}", s)
    }
}

/// Literal operand of a comparison filter.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => write!(f, "null"),
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Int(i) => write!(f, "{}", i),
            Literal::Float(v) => write!(f, "{}", v),
            Literal::String(s) => write!(f, "\"{}\"", s),
        }
    }
}
