use enum_tag::EnumTag;

/// The only runtime type of the language.
pub type Value = f64;

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Operator {
    Add = b'+',
    Subtract = b'-',
    Multiply = b'*',
    Divide = b'/',
}

impl Operator {
    pub fn apply(self, lhs: Value, rhs: Value) -> Value {
        use Operator::*;

        match self {
            Add => lhs + rhs,
            Subtract => lhs - rhs,
            Multiply => lhs * rhs,
            // IEEE-754 all the way down, 1/0 is inf and 0/0 is NaN
            Divide => lhs / rhs,
        }
    }

    pub fn symbol(self) -> char {
        self as u8 as char
    }
}

impl TryFrom<u8> for Operator {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            b'+' => Ok(Self::Add),
            b'-' => Ok(Self::Subtract),
            b'*' => Ok(Self::Multiply),
            b'/' => Ok(Self::Divide),
            _ => Err(()),
        }
    }
}

/// Evaluates `lhs <op> rhs`. Evaluation never fails: an operator symbol
/// outside of `+ - * /` evaluates to `0.0`.
pub fn evaluate_binary(lhs: Value, rhs: Value, op: u8) -> Value {
    match Operator::try_from(op) {
        Ok(operator) => operator.apply(lhs, rhs),
        Err(()) => 0.0,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Value),
    Identifier(String),
    Binary {
        op: Operator,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// Invoking a function for its return value.
    Call(String),
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Identifier(name.into())
    }

    pub fn call(name: impl Into<String>) -> Self {
        Expr::Call(name.into())
    }

    /// Builds `lhs <op> rhs` from an operator symbol. Like [`evaluate_binary`],
    /// an unknown symbol degrades to the literal `0.0`.
    pub fn binary(lhs: impl Into<Expr>, op: u8, rhs: impl Into<Expr>) -> Self {
        match Operator::try_from(op) {
            Ok(op) => Expr::Binary {
                op,
                lhs: Box::new(lhs.into()),
                rhs: Box::new(rhs.into()),
            },
            Err(()) => Expr::Literal(0.0),
        }
    }

    /// Evaluates the tree bottom-up against `env`, which decides what an
    /// identifier or a call means.
    pub fn evaluate<E: Environment + ?Sized>(&self, env: &mut E) -> Value {
        match self {
            Expr::Literal(value) => *value,
            Expr::Identifier(name) => env.resolve_identifier(name),
            Expr::Binary { op, lhs, rhs } => {
                let lhs = lhs.evaluate(env);
                let rhs = rhs.evaluate(env);
                op.apply(lhs, rhs)
            }
            Expr::Call(name) => env.resolve_call(name),
        }
    }

    /// Visits the name of every function this expression calls.
    pub fn for_each_call(&self, f: &mut impl FnMut(&str)) {
        match self {
            Expr::Literal(_) | Expr::Identifier(_) => {}
            Expr::Binary { lhs, rhs, .. } => {
                lhs.for_each_call(f);
                rhs.for_each_call(f);
            }
            Expr::Call(name) => f(name),
        }
    }
}

/// Whatever gives meaning to the leaves of an [`Expr`].
pub trait Environment {
    fn resolve_identifier(&mut self, name: &str) -> Value;

    fn resolve_call(&mut self, name: &str) -> Value;
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Expr::Literal(value)
    }
}

impl From<&str> for Expr {
    fn from(name: &str) -> Self {
        Expr::Identifier(name.to_owned())
    }
}

/// One unit of work, consumed the same way by every backend.
#[derive(EnumTag, Debug, Clone, PartialEq)]
pub enum Statement {
    Assign { name: String, value: Expr },
    PrintText(String),
    PrintNumber(Expr),
    Return(Expr),
    Call(String),
}

impl Statement {
    pub fn kind(&self) -> &'static str {
        use Statement::*;

        match self {
            Assign { .. } => "assign",
            PrintText(_) => "print-text",
            PrintNumber(_) => "print-number",
            Return(_) => "return",
            Call(_) => "call",
        }
    }

    pub fn for_each_call(&self, f: &mut impl FnMut(&str)) {
        match self {
            Statement::Assign { value, .. } => value.for_each_call(f),
            Statement::PrintNumber(value) | Statement::Return(value) => value.for_each_call(f),
            Statement::PrintText(_) => {}
            Statement::Call(name) => f(name),
        }
    }

    /// True for the statements that only make sense inside a function body.
    pub fn is_function_only(&self) -> bool {
        // Return is the only kind tied to a function
        self.tag() == Statement::Return(Expr::Literal(0.0)).tag()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed;

    impl Environment for Fixed {
        fn resolve_identifier(&mut self, name: &str) -> Value {
            if name == "x" {
                10.0
            } else {
                0.0
            }
        }

        fn resolve_call(&mut self, name: &str) -> Value {
            if name == "f" {
                4.0
            } else {
                0.0
            }
        }
    }

    #[test]
    fn arithmetic_over_operator_symbols() {
        assert_eq!(evaluate_binary(2.0, 3.0, b'+'), 5.0);
        assert_eq!(evaluate_binary(2.0, 3.0, b'-'), -1.0);
        assert_eq!(evaluate_binary(2.0, 3.0, b'*'), 6.0);
        assert_eq!(evaluate_binary(3.0, 2.0, b'/'), 1.5);
    }

    #[test]
    fn division_follows_ieee_754() {
        assert_eq!(evaluate_binary(1.0, 0.0, b'/'), f64::INFINITY);
        assert_eq!(evaluate_binary(-1.0, 0.0, b'/'), f64::NEG_INFINITY);
        assert!(evaluate_binary(0.0, 0.0, b'/').is_nan());
    }

    #[test]
    fn unknown_operator_defaults_to_zero() {
        assert_eq!(evaluate_binary(2.0, 3.0, b'%'), 0.0);
        assert_eq!(evaluate_binary(2.0, 3.0, b'^'), 0.0);
        assert_eq!(Expr::binary(2.0, b'%', 3.0), Expr::Literal(0.0));
    }

    #[test]
    fn nested_expression_evaluates_bottom_up() {
        // 3 + 3 * 4
        let expr = Expr::binary(3.0, b'+', Expr::binary(3.0, b'*', 4.0));

        assert_eq!(expr.evaluate(&mut Fixed), 15.0);
    }

    #[test]
    fn leaves_resolve_through_environment() {
        let expr = Expr::binary("x", b'-', Expr::call("f"));

        assert_eq!(expr.evaluate(&mut Fixed), 6.0);
        assert_eq!(Expr::ident("unknown").evaluate(&mut Fixed), 0.0);
    }

    #[test]
    fn calls_are_found_anywhere_in_a_statement() {
        let statement = Statement::Assign {
            name: "x".into(),
            value: Expr::binary(Expr::call("a"), b'+', Expr::binary(1.0, b'*', Expr::call("b"))),
        };
        let mut seen = Vec::new();
        statement.for_each_call(&mut |name| seen.push(name.to_owned()));
        Statement::Call("c".into()).for_each_call(&mut |name| seen.push(name.to_owned()));

        assert_eq!(seen, ["a", "b", "c"]);
    }

    #[test]
    fn only_return_is_function_only() {
        assert!(Statement::Return(Expr::Literal(1.0)).is_function_only());
        assert!(!Statement::Call("f".into()).is_function_only());
        assert!(!Statement::PrintText("hi".into()).is_function_only());
    }
}
