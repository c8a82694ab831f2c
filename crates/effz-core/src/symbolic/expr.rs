use super::rational::Rational;
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

/// Immutable symbolic expression tree.
///
/// Constructors canonicalize: sums and products flatten, like terms and
/// like-factor powers collect, exact numerics fold, and square factors are
/// extracted from roots. Floats are carried as opaque atoms — they collect
/// structurally (identical bit patterns cancel through power bookkeeping)
/// but are never folded arithmetically, so substituting a float-bearing
/// subexpression back out reproduces the original tree exactly.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Integer(i128),
    Rational(Rational),
    Float(f64),
    Symbol(String),
    Pi,
    Add(Vec<Expr>),
    Mul(Vec<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    Exp(Box<Expr>),
    Sin(Box<Expr>),
    Cos(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error("no numeric binding for symbol '{name}'")]
    UnknownSymbol { name: String },
}

impl Expr {
    pub fn integer(value: i128) -> Self {
        Self::Integer(value)
    }

    pub fn rational(numerator: i128, denominator: i128) -> Self {
        Self::from_rational(Rational::new(numerator, denominator))
    }

    pub fn from_rational(value: Rational) -> Self {
        if value.is_integer() {
            Self::Integer(value.numerator())
        } else {
            Self::Rational(value)
        }
    }

    pub fn float(value: f64) -> Self {
        Self::Float(value)
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Symbol(name.into())
    }

    pub fn zero() -> Self {
        Self::Integer(0)
    }

    pub fn one() -> Self {
        Self::Integer(1)
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Self::Integer(0))
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Self::Integer(1))
    }

    pub fn as_rational(&self) -> Option<Rational> {
        match self {
            Self::Integer(value) => Some(Rational::from_integer(*value)),
            Self::Rational(value) => Some(*value),
            _ => None,
        }
    }

    pub fn add(terms: Vec<Expr>) -> Self {
        let mut flat = Vec::new();
        for term in terms {
            flatten_add(term, &mut flat);
        }

        let mut constant = Rational::zero();
        let mut collected: Vec<(Expr, Rational)> = Vec::new();
        for term in flat {
            if let Some(value) = term.as_rational() {
                constant += value;
                continue;
            }
            let (coefficient, core) = split_coefficient(term);
            match collected.iter_mut().find(|(known, _)| *known == core) {
                Some((_, total)) => *total += coefficient,
                None => collected.push((core, coefficient)),
            }
        }

        let mut terms: Vec<Expr> = Vec::new();
        for (core, coefficient) in collected {
            if coefficient.is_zero() {
                continue;
            }
            if coefficient.is_one() {
                terms.push(core);
            } else {
                terms.push(Expr::mul(vec![Expr::from_rational(coefficient), core]));
            }
        }
        terms.sort_by(compare);
        if !constant.is_zero() {
            terms.push(Expr::from_rational(constant));
        }

        match terms.len() {
            0 => Expr::zero(),
            1 => terms.pop().expect("nonempty"),
            _ => Expr::Add(terms),
        }
    }

    pub fn mul(factors: Vec<Expr>) -> Self {
        let mut flat = Vec::new();
        for factor in factors {
            flatten_mul(factor, &mut flat);
        }

        let mut coefficient = Rational::one();
        let mut entries: Vec<(Expr, Expr)> = Vec::new();
        for factor in flat {
            if let Some(value) = factor.as_rational() {
                if value.is_zero() {
                    return Expr::zero();
                }
                coefficient *= value;
                continue;
            }
            let (base, exponent) = match factor {
                Expr::Pow(base, exponent) => (*base, *exponent),
                other => (other, Expr::one()),
            };
            match entries.iter_mut().find(|(known, _)| *known == base) {
                Some((_, total)) => {
                    *total = Expr::add(vec![total.clone(), exponent]);
                }
                None => entries.push((base, exponent)),
            }
        }

        let mut parts: Vec<Expr> = Vec::new();
        for (base, exponent) in entries {
            if exponent.is_zero() {
                continue;
            }
            let resolved = Expr::pow(base, exponent);
            if let Some(value) = resolved.as_rational() {
                if value.is_zero() {
                    return Expr::zero();
                }
                coefficient *= value;
            } else if let Expr::Mul(inner) = resolved {
                for piece in inner {
                    if let Some(value) = piece.as_rational() {
                        coefficient *= value;
                    } else {
                        parts.push(piece);
                    }
                }
            } else {
                parts.push(resolved);
            }
        }

        if coefficient.is_zero() {
            return Expr::zero();
        }
        parts.sort_by(compare);
        if parts.is_empty() {
            return Expr::from_rational(coefficient);
        }
        if !coefficient.is_one() {
            parts.insert(0, Expr::from_rational(coefficient));
        }
        if parts.len() == 1 {
            return parts.pop().expect("nonempty");
        }
        Expr::Mul(parts)
    }

    pub fn pow(base: Expr, exponent: Expr) -> Self {
        if exponent.is_zero() {
            return Expr::one();
        }
        if exponent.is_one() {
            return base;
        }

        if let (Some(base_value), Some(exponent_value)) =
            (base.as_rational(), exponent.as_rational())
        {
            if exponent_value.is_integer() {
                let power = exponent_value.numerator();
                if base_value.is_zero() && power < 0 {
                    // leave 0^(-k) unevaluated rather than panic
                    return Expr::Pow(Box::new(base), Box::new(exponent));
                }
                if let Ok(power) = i32::try_from(power) {
                    return Expr::from_rational(base_value.pow(power));
                }
            } else if exponent_value.denominator() == 2 && !base_value.is_negative() {
                return pow_rational_half(base_value, exponent_value.numerator());
            }
            return Expr::Pow(Box::new(base), Box::new(exponent));
        }

        match base {
            Expr::Mul(factors) => Expr::mul(
                factors
                    .into_iter()
                    .map(|factor| Expr::pow(factor, exponent.clone()))
                    .collect(),
            ),
            Expr::Pow(inner_base, inner_exponent) => Expr::pow(
                *inner_base,
                Expr::mul(vec![*inner_exponent, exponent]),
            ),
            other => Expr::Pow(Box::new(other), Box::new(exponent)),
        }
    }

    pub fn powi(base: Expr, exponent: i128) -> Self {
        Expr::pow(base, Expr::integer(exponent))
    }

    pub fn sqrt(value: Expr) -> Self {
        Expr::pow(value, Expr::rational(1, 2))
    }

    pub fn exp(argument: Expr) -> Self {
        if argument.is_zero() {
            return Expr::one();
        }
        Expr::Exp(Box::new(argument))
    }

    pub fn sin(argument: Expr) -> Self {
        if argument.is_zero() {
            return Expr::zero();
        }
        Expr::Sin(Box::new(argument))
    }

    pub fn cos(argument: Expr) -> Self {
        if argument.is_zero() {
            return Expr::one();
        }
        Expr::Cos(Box::new(argument))
    }

    pub fn neg(self) -> Self {
        Expr::mul(vec![Expr::integer(-1), self])
    }

    pub fn sub(minuend: Expr, subtrahend: Expr) -> Self {
        Expr::add(vec![minuend, subtrahend.neg()])
    }

    /// Structural substitution: every subtree equal to `target` is replaced
    /// and the result is re-canonicalized bottom-up.
    pub fn substitute(&self, target: &Expr, replacement: &Expr) -> Expr {
        if self == target {
            return replacement.clone();
        }
        match self {
            Expr::Add(terms) => Expr::add(
                terms
                    .iter()
                    .map(|term| term.substitute(target, replacement))
                    .collect(),
            ),
            Expr::Mul(factors) => Expr::mul(
                factors
                    .iter()
                    .map(|factor| factor.substitute(target, replacement))
                    .collect(),
            ),
            Expr::Pow(base, exponent) => Expr::pow(
                base.substitute(target, replacement),
                exponent.substitute(target, replacement),
            ),
            Expr::Exp(argument) => Expr::exp(argument.substitute(target, replacement)),
            Expr::Sin(argument) => Expr::sin(argument.substitute(target, replacement)),
            Expr::Cos(argument) => Expr::cos(argument.substitute(target, replacement)),
            atom => atom.clone(),
        }
    }

    pub fn eval(&self, bindings: &[(&str, f64)]) -> Result<f64, EvalError> {
        match self {
            Expr::Integer(value) => Ok(*value as f64),
            Expr::Rational(value) => Ok(value.to_f64()),
            Expr::Float(value) => Ok(*value),
            Expr::Pi => Ok(std::f64::consts::PI),
            Expr::Symbol(name) => bindings
                .iter()
                .find(|(known, _)| *known == name.as_str())
                .map(|(_, value)| *value)
                .ok_or_else(|| EvalError::UnknownSymbol { name: name.clone() }),
            Expr::Add(terms) => terms.iter().try_fold(0.0, |total, term| {
                Ok(total + term.eval(bindings)?)
            }),
            Expr::Mul(factors) => factors.iter().try_fold(1.0, |total, factor| {
                Ok(total * factor.eval(bindings)?)
            }),
            Expr::Pow(base, exponent) => {
                Ok(base.eval(bindings)?.powf(exponent.eval(bindings)?))
            }
            Expr::Exp(argument) => Ok(argument.eval(bindings)?.exp()),
            Expr::Sin(argument) => Ok(argument.eval(bindings)?.sin()),
            Expr::Cos(argument) => Ok(argument.eval(bindings)?.cos()),
        }
    }

    pub fn latex(&self) -> String {
        latex_of(self)
    }
}

fn flatten_add(term: Expr, out: &mut Vec<Expr>) {
    match term {
        Expr::Add(inner) => {
            for part in inner {
                flatten_add(part, out);
            }
        }
        other => out.push(other),
    }
}

fn flatten_mul(factor: Expr, out: &mut Vec<Expr>) {
    match factor {
        Expr::Mul(inner) => {
            for part in inner {
                flatten_mul(part, out);
            }
        }
        other => out.push(other),
    }
}

fn split_coefficient(term: Expr) -> (Rational, Expr) {
    if let Expr::Mul(factors) = &term {
        if let Some(coefficient) = factors[0].as_rational() {
            let rest = factors[1..].to_vec();
            let core = if rest.len() == 1 {
                rest.into_iter().next().expect("nonempty")
            } else {
                Expr::Mul(rest)
            };
            return (coefficient, core);
        }
    }
    (Rational::one(), term)
}

/// `r^(p/2)` for a nonnegative rational `r` and odd `p`: the integer part is
/// folded exactly and the remaining square root has its square factors
/// extracted, so e.g. `2^(3/2)` becomes `2*sqrt(2)` and `sqrt(1/2)` becomes
/// `sqrt(2)/2`.
fn pow_rational_half(base: Rational, numerator: i128) -> Expr {
    if base.is_zero() {
        return Expr::zero();
    }
    let integer_exponent = i32::try_from((numerator - 1) / 2).expect("small exponent");
    let integer_part = base.pow(integer_exponent);

    let radicand = base.numerator() * base.denominator();
    let (square, rest) = extract_square(radicand);
    let root_scale = Rational::new(square, base.denominator());
    let scale = integer_part * root_scale;
    if rest == 1 {
        return Expr::from_rational(scale);
    }
    let root = Expr::Pow(
        Box::new(Expr::Integer(rest)),
        Box::new(Expr::Rational(Rational::new(1, 2))),
    );
    if scale.is_one() {
        root
    } else {
        Expr::mul(vec![Expr::from_rational(scale), root])
    }
}

/// Splits `value = square^2 * rest` with `rest` squarefree, by trial
/// division. Every radicand in this crate is factorial-smooth, so the loop
/// terminates quickly.
fn extract_square(value: i128) -> (i128, i128) {
    assert!(value > 0, "square extraction expects a positive radicand");
    let mut remaining = value;
    let mut square = 1;
    let mut rest = 1;
    let mut divisor = 2;
    while divisor * divisor <= remaining {
        let mut count: u32 = 0;
        while remaining % divisor == 0 {
            remaining /= divisor;
            count += 1;
        }
        square *= divisor.pow(count / 2);
        if count % 2 == 1 {
            rest *= divisor;
        }
        divisor += 1;
    }
    rest *= remaining;
    (square, rest)
}

fn numeric_value(expr: &Expr) -> f64 {
    match expr {
        Expr::Integer(value) => *value as f64,
        Expr::Rational(value) => value.to_f64(),
        Expr::Float(value) => *value,
        _ => f64::NAN,
    }
}

fn rank(expr: &Expr) -> u8 {
    match expr {
        Expr::Integer(_) | Expr::Rational(_) | Expr::Float(_) => 0,
        Expr::Pi => 1,
        Expr::Symbol(_) => 2,
        Expr::Pow(_, _) => 3,
        Expr::Exp(_) => 4,
        Expr::Sin(_) => 5,
        Expr::Cos(_) => 6,
        Expr::Mul(_) => 7,
        Expr::Add(_) => 8,
    }
}

fn compare(a: &Expr, b: &Expr) -> Ordering {
    let by_rank = rank(a).cmp(&rank(b));
    if by_rank != Ordering::Equal {
        return by_rank;
    }
    match (a, b) {
        (Expr::Integer(_), _) | (Expr::Rational(_), _) | (Expr::Float(_), _) => {
            numeric_value(a).total_cmp(&numeric_value(b))
        }
        (Expr::Pi, Expr::Pi) => Ordering::Equal,
        (Expr::Symbol(left), Expr::Symbol(right)) => left.cmp(right),
        (Expr::Pow(lb, le), Expr::Pow(rb, re)) => {
            compare(lb, rb).then_with(|| compare(le, re))
        }
        (Expr::Exp(left), Expr::Exp(right))
        | (Expr::Sin(left), Expr::Sin(right))
        | (Expr::Cos(left), Expr::Cos(right)) => compare(left, right),
        (Expr::Mul(left), Expr::Mul(right)) | (Expr::Add(left), Expr::Add(right)) => {
            for (l, r) in left.iter().zip(right.iter()) {
                let ordering = compare(l, r);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            left.len().cmp(&right.len())
        }
        _ => Ordering::Equal,
    }
}

// ---------------------------------------------------------------------------
// rendering

struct ProductParts {
    numerator: Vec<Expr>,
    denominator: Vec<Expr>,
    numerator_value: i128,
    denominator_value: i128,
    negative: bool,
}

fn split_product(factors: &[Expr]) -> ProductParts {
    let mut parts = ProductParts {
        numerator: Vec::new(),
        denominator: Vec::new(),
        numerator_value: 1,
        denominator_value: 1,
        negative: false,
    };
    for factor in factors {
        match factor {
            Expr::Integer(value) => {
                parts.negative ^= *value < 0;
                parts.numerator_value *= value.abs();
            }
            Expr::Rational(value) => {
                parts.negative ^= value.is_negative();
                parts.numerator_value *= value.numerator().abs();
                parts.denominator_value *= value.denominator();
            }
            Expr::Pow(base, exponent) => match exponent.as_rational() {
                Some(power) if power.is_negative() => {
                    parts.denominator.push(Expr::pow(
                        (**base).clone(),
                        Expr::from_rational(-power),
                    ));
                }
                _ => parts.numerator.push(factor.clone()),
            },
            other => parts.numerator.push(other.clone()),
        }
    }
    parts
}

fn display_of(expr: &Expr) -> String {
    match expr {
        Expr::Integer(value) => value.to_string(),
        Expr::Rational(value) => value.to_string(),
        Expr::Float(value) => format!("{value}"),
        Expr::Symbol(name) => name.clone(),
        Expr::Pi => "pi".to_string(),
        Expr::Add(terms) => {
            let mut rendered = String::new();
            for (index, term) in terms.iter().enumerate() {
                let (negative, body) = term_sign(term);
                if index == 0 {
                    if negative {
                        rendered.push('-');
                    }
                } else if negative {
                    rendered.push_str(" - ");
                } else {
                    rendered.push_str(" + ");
                }
                rendered.push_str(&display_of(&body));
            }
            rendered
        }
        Expr::Mul(factors) => display_product(factors),
        Expr::Pow(base, exponent) => display_power(base, exponent),
        Expr::Exp(argument) => format!("exp({})", display_of(argument)),
        Expr::Sin(argument) => format!("sin({})", display_of(argument)),
        Expr::Cos(argument) => format!("cos({})", display_of(argument)),
    }
}

fn term_sign(term: &Expr) -> (bool, Expr) {
    match term {
        Expr::Integer(value) if *value < 0 => (true, Expr::Integer(-value)),
        Expr::Rational(value) if value.is_negative() => {
            (true, Expr::Rational(-*value))
        }
        Expr::Mul(factors) => match factors[0].as_rational() {
            Some(coefficient) if coefficient.is_negative() => {
                let mut rest: Vec<Expr> = factors[1..].to_vec();
                let positive = -coefficient;
                if !positive.is_one() {
                    rest.insert(0, Expr::from_rational(positive));
                }
                let body = if rest.len() == 1 {
                    rest.into_iter().next().expect("nonempty")
                } else {
                    Expr::Mul(rest)
                };
                (true, body)
            }
            _ => (false, term.clone()),
        },
        _ => (false, term.clone()),
    }
}

fn display_product(factors: &[Expr]) -> String {
    let parts = split_product(factors);
    let mut numerator_pieces: Vec<String> = Vec::new();
    if parts.numerator_value != 1 || parts.numerator.is_empty() {
        numerator_pieces.push(parts.numerator_value.to_string());
    }
    for factor in &parts.numerator {
        numerator_pieces.push(display_factor(factor));
    }
    let mut rendered = String::new();
    if parts.negative {
        rendered.push('-');
    }
    rendered.push_str(&numerator_pieces.join("*"));

    let mut denominator_pieces: Vec<String> = Vec::new();
    if parts.denominator_value != 1 {
        denominator_pieces.push(parts.denominator_value.to_string());
    }
    for factor in &parts.denominator {
        denominator_pieces.push(display_factor(factor));
    }
    if !denominator_pieces.is_empty() {
        rendered.push('/');
        if denominator_pieces.len() == 1 {
            rendered.push_str(&denominator_pieces[0]);
        } else {
            rendered.push('(');
            rendered.push_str(&denominator_pieces.join("*"));
            rendered.push(')');
        }
    }
    rendered
}

fn display_factor(factor: &Expr) -> String {
    match factor {
        Expr::Add(_) => format!("({})", display_of(factor)),
        _ => display_of(factor),
    }
}

fn display_power(base: &Expr, exponent: &Expr) -> String {
    if let Some(power) = exponent.as_rational() {
        if power == Rational::new(1, 2) {
            return format!("sqrt({})", display_of(base));
        }
    }
    let base_rendered = match base {
        Expr::Add(_) | Expr::Mul(_) | Expr::Rational(_) => {
            format!("({})", display_of(base))
        }
        Expr::Integer(value) if *value < 0 => format!("({value})"),
        _ => display_of(base),
    };
    let exponent_rendered = match exponent {
        Expr::Integer(value) if *value >= 0 => value.to_string(),
        _ => format!("({})", display_of(exponent)),
    };
    format!("{base_rendered}^{exponent_rendered}")
}

const GREEK_SYMBOLS: [&str; 16] = [
    "alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta", "kappa", "lambda",
    "mu", "nu", "rho", "sigma", "phi", "omega",
];

fn latex_of(expr: &Expr) -> String {
    match expr {
        Expr::Integer(value) => value.to_string(),
        Expr::Rational(value) => format!(
            "\\frac{{{}}}{{{}}}",
            value.numerator(),
            value.denominator()
        ),
        Expr::Float(value) => format!("{value}"),
        Expr::Symbol(name) => {
            if GREEK_SYMBOLS.contains(&name.as_str()) {
                format!("\\{name}")
            } else {
                name.clone()
            }
        }
        Expr::Pi => "\\pi".to_string(),
        Expr::Add(terms) => {
            let mut rendered = String::new();
            for (index, term) in terms.iter().enumerate() {
                let (negative, body) = term_sign(term);
                if index == 0 {
                    if negative {
                        rendered.push('-');
                    }
                } else if negative {
                    rendered.push_str(" - ");
                } else {
                    rendered.push_str(" + ");
                }
                rendered.push_str(&latex_of(&body));
            }
            rendered
        }
        Expr::Mul(factors) => latex_product(factors),
        Expr::Pow(base, exponent) => latex_power(base, exponent),
        Expr::Exp(argument) => format!("e^{{{}}}", latex_of(argument)),
        Expr::Sin(argument) => format!("\\sin({})", latex_of(argument)),
        Expr::Cos(argument) => format!("\\cos({})", latex_of(argument)),
    }
}

fn latex_product(factors: &[Expr]) -> String {
    let parts = split_product(factors);
    let mut numerator_pieces: Vec<String> = Vec::new();
    if parts.numerator_value != 1 || (parts.numerator.is_empty() && parts.denominator.is_empty())
    {
        numerator_pieces.push(parts.numerator_value.to_string());
    }
    for factor in &parts.numerator {
        numerator_pieces.push(latex_factor(factor));
    }
    if numerator_pieces.is_empty() {
        numerator_pieces.push("1".to_string());
    }
    let numerator = numerator_pieces.join(" ");

    let mut denominator_pieces: Vec<String> = Vec::new();
    if parts.denominator_value != 1 {
        denominator_pieces.push(parts.denominator_value.to_string());
    }
    for factor in &parts.denominator {
        denominator_pieces.push(latex_factor(factor));
    }

    let sign = if parts.negative { "-" } else { "" };
    if denominator_pieces.is_empty() {
        format!("{sign}{numerator}")
    } else {
        format!(
            "{sign}\\frac{{{numerator}}}{{{}}}",
            denominator_pieces.join(" ")
        )
    }
}

fn latex_factor(factor: &Expr) -> String {
    match factor {
        Expr::Add(_) => format!("\\left({}\\right)", latex_of(factor)),
        _ => latex_of(factor),
    }
}

fn latex_power(base: &Expr, exponent: &Expr) -> String {
    if let Some(power) = exponent.as_rational() {
        if power == Rational::new(1, 2) {
            return format!("\\sqrt{{{}}}", latex_of(base));
        }
    }
    if let (Expr::Cos(argument), Expr::Integer(power)) = (base, exponent) {
        if *power > 0 {
            return format!("\\cos^{{{power}}}({})", latex_of(argument));
        }
    }
    if let (Expr::Sin(argument), Expr::Integer(power)) = (base, exponent) {
        if *power > 0 {
            return format!("\\sin^{{{power}}}({})", latex_of(argument));
        }
    }
    let base_rendered = match base {
        Expr::Add(_) | Expr::Mul(_) | Expr::Rational(_) => {
            format!("\\left({}\\right)", latex_of(base))
        }
        Expr::Integer(value) if *value < 0 => format!("\\left({value}\\right)"),
        _ => latex_of(base),
    };
    format!("{base_rendered}^{{{}}}", latex_of(exponent))
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&display_of(self))
    }
}
