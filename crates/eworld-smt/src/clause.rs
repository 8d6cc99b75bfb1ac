use eworld_ir::variables::VarId;
use std::fmt;

/// A variable with a polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Lit {
    var: VarId,
    positive: bool,
}

impl Lit {
    pub fn pos(var: VarId) -> Self {
        debug_assert!(var >= 1, "variable ids start at 1");
        Lit {
            var,
            positive: true,
        }
    }

    pub fn neg(var: VarId) -> Self {
        debug_assert!(var >= 1, "variable ids start at 1");
        Lit {
            var,
            positive: false,
        }
    }

    pub fn var(self) -> VarId {
        self.var
    }

    pub fn is_positive(self) -> bool {
        self.positive
    }

    pub fn negate(self) -> Self {
        Lit {
            var: self.var,
            positive: !self.positive,
        }
    }

    /// DIMACS integer form: `var` or `-var`.
    pub fn to_dimacs(self) -> i64 {
        if self.positive {
            i64::from(self.var)
        } else {
            -i64::from(self.var)
        }
    }
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_dimacs())
    }
}

/// A disjunction of literals.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Clause(Vec<Lit>);

impl Clause {
    pub fn new(lits: Vec<Lit>) -> Self {
        Clause(lits)
    }

    pub fn unit(lit: Lit) -> Self {
        Clause(vec![lit])
    }

    /// `a \/ b`.
    pub fn binary(a: Lit, b: Lit) -> Self {
        Clause(vec![a, b])
    }

    pub fn lits(&self) -> &[Lit] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_unit(&self) -> bool {
        self.0.len() == 1
    }
}

impl FromIterator<Lit> for Clause {
    fn from_iter<I: IntoIterator<Item = Lit>>(iter: I) -> Self {
        Clause(iter.into_iter().collect())
    }
}

impl fmt::Display for Clause {
    /// DIMACS line, terminated by `0`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for lit in &self.0 {
            write!(f, "{lit} ")?;
        }
        f.write_str("0")
    }
}
