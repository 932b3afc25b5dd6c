//! Expressions, type expressions, and shape compatibility (spec.md §4.D.5,
//! §4.D.6).
//!
//! `Expr` models just enough of the target language's expression grammar
//! to compare array-length expressions (`n+1`, `pkg.N`) structurally;
//! `TypeExpr` models type syntax deeply enough to decide whether a
//! snippet's type is a structural subset of the source's.

/// A structurally-comparable expression. Field/variant names follow
/// go/ast's vocabulary, since that's the grammar this data model was
/// distilled from (see spec.md §9), but this is not a full expression
/// language -- only what §4.D.6 needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Ident(String),
    IntLit(String),
    StrLit(String),
    /// `left.Sel`
    Selector(Box<Expr>, String),
    /// Prefix unary operator, e.g. `*x`, `-x`, `^x`.
    Unary(String, Box<Expr>),
    /// `left op right`.
    Binary(String, Box<Expr>, Box<Expr>),
    /// `f(args...)`.
    Call(Box<Expr>, Vec<Expr>),
    Paren(Box<Expr>),
}

/// Structural equality over `Expr`, used to compare array length
/// expressions. `#[derive(PartialEq)]` already gives us this; the free
/// function exists so call sites can spell out the spec's own name for
/// the operation.
pub fn exprs_equal(a: &Expr, b: &Expr) -> bool {
    a == b
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    Bidirectional,
    SendOnly,
    RecvOnly,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    Ident(String),
    /// `pkg.Name`.
    Selector(String, String),
    Pointer(Box<TypeExpr>),
    Chan(ChanDir, Box<TypeExpr>),
    Map(Box<TypeExpr>, Box<TypeExpr>),
    Slice(Box<TypeExpr>),
    Array(Expr, Box<TypeExpr>),
    /// Parameter and result types, in order; names are not compared.
    Func(Vec<TypeExpr>, Vec<TypeExpr>),
    Struct(Vec<crate::ast::Field>),
    Interface(Vec<crate::ast::InterfaceMember>),
    /// `A | B | ~C` generic type-set union; each element is itself a
    /// term (possibly `Tilde`).
    Union(Vec<TypeExpr>),
    Tilde(Box<TypeExpr>),
    Paren(Box<TypeExpr>),
}

impl TypeExpr {
    /// The printable form used for embedded-field identifier keys (spec.md
    /// §3): `*pkg.T`, `~int`, `A|B`.
    pub fn printed(&self) -> String {
        match self {
            TypeExpr::Ident(name) => name.clone(),
            TypeExpr::Selector(pkg, name) => format!("{pkg}.{name}"),
            TypeExpr::Pointer(inner) => format!("*{}", inner.printed()),
            TypeExpr::Chan(ChanDir::Bidirectional, inner) => format!("chan {}", inner.printed()),
            TypeExpr::Chan(ChanDir::SendOnly, inner) => format!("chan<- {}", inner.printed()),
            TypeExpr::Chan(ChanDir::RecvOnly, inner) => format!("<-chan {}", inner.printed()),
            TypeExpr::Map(k, v) => format!("map[{}]{}", k.printed(), v.printed()),
            TypeExpr::Slice(inner) => format!("[]{}", inner.printed()),
            TypeExpr::Array(len, inner) => format!("[{len:?}]{}", inner.printed()),
            TypeExpr::Func(params, results) => {
                let p: Vec<_> = params.iter().map(TypeExpr::printed).collect();
                let r: Vec<_> = results.iter().map(TypeExpr::printed).collect();
                format!("func({}) ({})", p.join(", "), r.join(", "))
            }
            TypeExpr::Struct(_) => "struct{...}".to_string(),
            TypeExpr::Interface(_) => "interface{...}".to_string(),
            TypeExpr::Union(terms) => terms
                .iter()
                .map(TypeExpr::printed)
                .collect::<Vec<_>>()
                .join("|"),
            TypeExpr::Tilde(inner) => format!("~{}", inner.printed()),
            TypeExpr::Paren(inner) => format!("({})", inner.printed()),
        }
    }
}

/// spec.md §4.D.5: is `snippet` a structural subset of `source`?
///
/// Identical idents/selectors match by name; composite shapes recurse;
/// structs/interfaces allow the source to carry *extra* fields/methods
/// beyond what the snippet mentions.
pub fn types_same_shape(source: &TypeExpr, snippet: &TypeExpr) -> bool {
    use TypeExpr::*;
    match (source, snippet) {
        (Ident(a), Ident(b)) => a == b,
        (Selector(pa, na), Selector(pb, nb)) => pa == pb && na == nb,
        (Pointer(a), Pointer(b)) => types_same_shape(a, b),
        (Chan(da, a), Chan(db, b)) => da == db && types_same_shape(a, b),
        (Map(ka, va), Map(kb, vb)) => types_same_shape(ka, kb) && types_same_shape(va, vb),
        (Slice(a), Slice(b)) => types_same_shape(a, b),
        (Array(la, a), Array(lb, b)) => exprs_equal(la, lb) && types_same_shape(a, b),
        (Func(pa, ra), Func(pb, rb)) => {
            pa.len() == pb.len()
                && ra.len() == rb.len()
                && pa.iter().zip(pb).all(|(x, y)| types_same_shape(x, y))
                && ra.iter().zip(rb).all(|(x, y)| types_same_shape(x, y))
        }
        (Struct(source_fields), Struct(snippet_fields)) => snippet_fields.iter().all(|sf| {
            source_fields
                .iter()
                .find(|f| f.field_key() == sf.field_key())
                .is_some_and(|f| types_same_shape(&f.ty, &sf.ty))
        }),
        (Interface(source_members), Interface(snippet_members)) => {
            snippet_members.iter().all(|sm| {
                source_members
                    .iter()
                    .find(|m| m.key() == sm.key())
                    .is_some_and(|m| m.signature_matches(sm))
            })
        }
        (Union(a), Union(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| types_same_shape(x, y))
        }
        (Tilde(a), Tilde(b)) => types_same_shape(a, b),
        (Paren(a), Paren(b)) => types_same_shape(a, b),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_idents_match() {
        assert!(types_same_shape(
            &TypeExpr::Ident("int".into()),
            &TypeExpr::Ident("int".into())
        ));
        assert!(!types_same_shape(
            &TypeExpr::Ident("int".into()),
            &TypeExpr::Ident("string".into())
        ));
    }

    #[test]
    fn pointer_and_selector_recurse() {
        let source = TypeExpr::Pointer(Box::new(TypeExpr::Selector(
            "pkg".into(),
            "T".into(),
        )));
        let snippet = TypeExpr::Pointer(Box::new(TypeExpr::Selector(
            "pkg".into(),
            "T".into(),
        )));
        assert!(types_same_shape(&source, &snippet));
    }

    #[test]
    fn array_length_expr_must_match() {
        let len_a = Expr::Binary(
            "+".into(),
            Box::new(Expr::Ident("n".into())),
            Box::new(Expr::IntLit("1".into())),
        );
        let len_b = Expr::Binary(
            "+".into(),
            Box::new(Expr::Ident("n".into())),
            Box::new(Expr::IntLit("2".into())),
        );
        let elem = Box::new(TypeExpr::Ident("byte".into()));
        assert!(!types_same_shape(
            &TypeExpr::Array(len_a.clone(), elem.clone()),
            &TypeExpr::Array(len_b, elem.clone())
        ));
        assert!(types_same_shape(
            &TypeExpr::Array(len_a.clone(), elem.clone()),
            &TypeExpr::Array(len_a, elem)
        ));
    }

    #[test]
    fn printed_form_matches_spec_examples() {
        let t = TypeExpr::Pointer(Box::new(TypeExpr::Selector("pkg".into(), "T".into())));
        assert_eq!(t.printed(), "*pkg.T");
        let t2 = TypeExpr::Tilde(Box::new(TypeExpr::Ident("int".into())));
        assert_eq!(t2.printed(), "~int");
        let t3 = TypeExpr::Union(vec![TypeExpr::Ident("A".into()), TypeExpr::Ident("B".into())]);
        assert_eq!(t3.printed(), "A|B");
    }
}
