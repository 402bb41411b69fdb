//! Surface-syntax pattern parser: translates the Rust-native concrete
//! grammar into [`maranget_core::Pattern`].
//!
//! Disambiguation peeks the leading token(s) and dispatches, trying the
//! more specific forms first.

use std::collections::BTreeSet;

use quote::quote;
use syn::parse::ParseStream;
use syn::{Ident, Token};

use maranget_core::pattern::{Lit, Pattern, PatternKind, VectorKind};

fn ident_is_constructor(ident: &Ident) -> bool {
    ident
        .to_string()
        .chars()
        .next()
        .is_some_and(|c| c.is_uppercase())
}

/// One alternative of an `Or` pattern, or a whole pattern when there's no
/// trailing `|`.
fn parse_atom(input: ParseStream) -> syn::Result<Pattern> {
    // `^expr`: pin a local value, compared by equality rather than bound.
    if input.peek(Token![^]) {
        input.parse::<Token![^]>()?;
        let expr: syn::Expr = input.parse()?;
        let lit = Lit::Path(quote! { #expr }.to_string());
        return Ok(Pattern::new(PatternKind::Literal { lit, is_local: true, expr }));
    }

    // `name @ pattern`: bind `name` while testing `pattern`.
    if input.peek(Ident) && input.peek2(Token![@]) {
        let name: Ident = input.parse()?;
        input.parse::<Token![@]>()?;
        let inner = parse_atom(input)?;
        return Ok(inner.with_as(name));
    }

    if input.peek(Token![_]) {
        input.parse::<Token![_]>()?;
        return Ok(Pattern::new(PatternKind::Wildcard { bind: None }));
    }

    if input.peek(syn::token::Paren) {
        return parse_paren_form(input);
    }

    // An optional vector-kind path directly before `[`, e.g. `VecDeque[a, b]`.
    if input.peek(Ident) && input.peek2(syn::token::Bracket) {
        let kind_name: Ident = input.fork().parse()?;
        let kind = match kind_name.to_string().as_str() {
            "Array" => Some(VectorKind::Array),
            "VecDeque" => Some(VectorKind::VecDeque),
            "Slice" => Some(VectorKind::Slice),
            _ => None,
        };
        if let Some(kind) = kind {
            input.parse::<Ident>()?;
            return parse_bracket_form(input, kind);
        }
    }
    if input.peek(syn::token::Bracket) {
        return parse_bracket_form(input, VectorKind::Slice);
    }

    if input.peek(syn::token::Brace) {
        return parse_map_form(input);
    }

    if input.peek(syn::LitBool) {
        let lit: syn::LitBool = input.parse()?;
        let value = lit.value;
        return Ok(Pattern::new(PatternKind::Literal {
            lit: Lit::Bool(value),
            is_local: false,
            expr: syn::parse_quote!(#lit),
        }));
    }
    if input.peek(syn::LitInt) {
        let lit: syn::LitInt = input.parse()?;
        let value: i128 = lit.base10_parse()?;
        return Ok(Pattern::new(PatternKind::Literal {
            lit: Lit::Int(value),
            is_local: false,
            expr: syn::parse_quote!(#lit),
        }));
    }
    if input.peek(syn::LitFloat) {
        let lit: syn::LitFloat = input.parse()?;
        let text = lit.base10_digits().to_string();
        return Ok(Pattern::new(PatternKind::Literal {
            lit: Lit::Float(text),
            is_local: false,
            expr: syn::parse_quote!(#lit),
        }));
    }
    if input.peek(syn::LitStr) {
        let lit: syn::LitStr = input.parse()?;
        let value = lit.value();
        return Ok(Pattern::new(PatternKind::Literal {
            lit: Lit::Str(value),
            is_local: false,
            expr: syn::parse_quote!(#lit),
        }));
    }
    if input.peek(syn::LitChar) {
        let lit: syn::LitChar = input.parse()?;
        let value = lit.value();
        return Ok(Pattern::new(PatternKind::Literal {
            lit: Lit::Char(value),
            is_local: false,
            expr: syn::parse_quote!(#lit),
        }));
    }

    if input.peek(Ident) {
        let path: syn::Path = input.parse()?;
        if path.segments.len() > 1 || ident_is_constructor(&path.segments[0].ident) {
            let text = quote! { #path }.to_string();
            return Ok(Pattern::new(PatternKind::Literal {
                lit: Lit::Path(text),
                is_local: false,
                expr: syn::parse_quote!(#path),
            }));
        }
        let name = path.segments[0].ident.clone();
        return Ok(Pattern::new(PatternKind::Wildcard { bind: Some(name) }));
    }

    Err(input.error("expected a pattern"))
}

pub(crate) fn parse_pattern(input: ParseStream) -> syn::Result<Pattern> {
    let first = parse_atom(input)?;
    if input.peek(Token![|]) {
        let mut alts = vec![first];
        while input.peek(Token![|]) {
            input.parse::<Token![|]>()?;
            alts.push(parse_atom(input)?);
        }
        return Ok(Pattern::new(PatternKind::Or { alts }));
    }
    Ok(first)
}

fn parse_guard_preds(input: ParseStream) -> syn::Result<Vec<syn::Expr>> {
    if input.peek(syn::token::Bracket) {
        let content;
        syn::bracketed!(content in input);
        let exprs =
            syn::punctuated::Punctuated::<syn::Expr, Token![,]>::parse_terminated(&content)?;
        Ok(exprs.into_iter().collect())
    } else {
        Ok(vec![input.parse()?])
    }
}

/// `(p1, p2, .. tail)` (Seq) or `(pattern if expr)` / `(pattern if [e1, e2])`
/// (Guard); both start with a parenthesized pattern, disambiguated by
/// whether an `if` immediately follows it.
fn parse_paren_form(input: ParseStream) -> syn::Result<Pattern> {
    let content;
    syn::parenthesized!(content in input);
    if content.is_empty() {
        return Ok(Pattern::new(PatternKind::Literal {
            lit: Lit::Path("()".to_string()),
            is_local: false,
            expr: syn::parse_quote!(()),
        }));
    }

    let first = parse_pattern(&content)?;
    if content.peek(Token![if]) {
        content.parse::<Token![if]>()?;
        let preds = parse_guard_preds(&content)?;
        return Ok(Pattern::new(PatternKind::Guard { inner: Box::new(first), preds }));
    }

    let mut elems = vec![first];
    while content.peek(Token![,]) {
        content.parse::<Token![,]>()?;
        if content.is_empty() {
            break;
        }
        if content.peek(Token![..]) {
            content.parse::<Token![..]>()?;
            let rest_pat = if content.is_empty() { Pattern::wildcard() } else { parse_pattern(&content)? };
            elems.push(Pattern::new(PatternKind::Rest { inner: Box::new(rest_pat) }));
            break;
        }
        elems.push(parse_pattern(&content)?);
    }
    Ok(Pattern::new(PatternKind::Seq { elems }))
}

/// `[p1, p2, .. tail]` (Vector), given the kind tag already consumed by the
/// caller (defaults to `Slice` with no leading kind path).
fn parse_bracket_form(input: ParseStream, kind: VectorKind) -> syn::Result<Pattern> {
    let content;
    syn::bracketed!(content in input);

    let mut elems = Vec::new();
    let mut rest = false;
    while !content.is_empty() {
        if content.peek(Token![..]) {
            content.parse::<Token![..]>()?;
            rest = true;
            break;
        }
        elems.push(parse_pattern(&content)?);
        if content.peek(Token![,]) {
            content.parse::<Token![,]>()?;
        } else {
            break;
        }
    }
    let min_size = elems.len();
    Ok(Pattern::new(PatternKind::Vector { elems, kind, min_size, offset: 0, rest }))
}

fn parse_map_key(input: ParseStream) -> syn::Result<String> {
    if input.peek(syn::LitStr) {
        let lit: syn::LitStr = input.parse()?;
        Ok(lit.value())
    } else {
        let ident: Ident = input.parse()?;
        Ok(ident.to_string())
    }
}

/// `{ key: pat, .. }` (open) or `{ key: pat }` (closed, compiles to a
/// `MapCrash`-backed `:only` test over exactly these keys).
fn parse_map_form(input: ParseStream) -> syn::Result<Pattern> {
    let content;
    syn::braced!(content in input);

    let mut entries = Vec::new();
    let mut open = false;
    while !content.is_empty() {
        if content.peek(Token![..]) {
            content.parse::<Token![..]>()?;
            open = true;
            break;
        }
        let key = parse_map_key(&content)?;
        content.parse::<Token![:]>()?;
        let value = parse_pattern(&content)?;
        entries.push((key, value));
        if content.peek(Token![,]) {
            content.parse::<Token![,]>()?;
        } else {
            break;
        }
    }

    let only = if open {
        None
    } else {
        Some(entries.iter().map(|(k, _)| k.clone()).collect::<BTreeSet<_>>())
    };
    Ok(Pattern::new(PatternKind::Map { entries, only }))
}
