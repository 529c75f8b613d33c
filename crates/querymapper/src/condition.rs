//! Comparison-token canonicalisation and condition shape.

use crate::value::Value;

/// Map a logical comparison token to its canonical SQL operator.
///
/// `<>` canonicalises to `!=`. Any unrecognised token deliberately falls
/// back to `=`; this permissive default is part of the builder's contract,
/// not an error path.
pub fn comparison_operator(token: &str) -> &'static str {
    match token {
        "=" => "=",
        "!=" | "<>" => "!=",
        ">" => ">",
        ">=" => ">=",
        "<" => "<",
        "<=" => "<=",
        _ => "=",
    }
}

/// One caller-supplied where condition.
///
/// A condition is an ordered list of parts that must be exactly
/// `[field, operator, value]` by the time the clause is appended. The shape
/// is checked at call time by the builder (not at construction), which
/// raises [`MapperError::MalformedCondition`](crate::MapperError) on
/// violation — a recoverable input error.
///
/// The [`cond!`](crate::cond) macro builds one from heterogeneous literals:
///
/// ```
/// use querymapper::cond;
///
/// let condition = cond!("age", ">", 21);
/// assert_eq!(condition.parts().len(), 3);
/// ```
#[derive(Clone, Debug)]
pub struct Condition(Vec<Value>);

impl Condition {
    pub fn new(parts: impl IntoIterator<Item = Value>) -> Self {
        Self(parts.into_iter().collect())
    }

    pub fn parts(&self) -> &[Value] {
        &self.0
    }
}

impl<F, O, V> From<(F, O, V)> for Condition
where
    F: Into<String>,
    O: Into<String>,
    V: Into<Value>,
{
    fn from((field, operator, value): (F, O, V)) -> Self {
        Self(vec![
            Value::Text(field.into()),
            Value::Text(operator.into()),
            value.into(),
        ])
    }
}

/// Build a [`Condition`] from heterogeneous parts.
#[macro_export]
macro_rules! cond {
    ($($part:expr),+ $(,)?) => {
        $crate::Condition::new([$($crate::Value::from($part)),+])
    };
}
