//! Top-level macro input: validates the occurrences/clauses shape and
//! assembles the initial [`maranget_core::PatternMatrix`].

use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{Ident, Token};

use maranget_core::occurrence::Occurrence;
use maranget_core::pattern::Pattern;
use maranget_core::{PatternMatrix, PatternRow};

use crate::pattern::parse_pattern;

/// A trailing `if expr` (or `if [e1, e2]`) after a whole row, Rust
/// match-arm-guard style; folded into a `Guard` wrapping the row's first
/// pattern, since `maranget_core`'s DAG only knows per-column guards.
fn maybe_row_guard(input: ParseStream, patterns: &mut [Pattern]) -> syn::Result<()> {
    if !input.peek(Token![if]) {
        return Ok(());
    }
    input.parse::<Token![if]>()?;
    let preds = if input.peek(syn::token::Bracket) {
        let content;
        syn::bracketed!(content in input);
        Punctuated::<syn::Expr, Token![,]>::parse_terminated(&content)?
            .into_iter()
            .collect()
    } else {
        vec![input.parse::<syn::Expr>()?]
    };
    let inner = patterns[0].clone();
    patterns[0] = maranget_core::Pattern::new(maranget_core::PatternKind::Guard {
        inner: Box::new(inner),
        preds,
    });
    Ok(())
}

pub(crate) struct RowInput {
    pub patterns: Vec<Pattern>,
    pub action: syn::Expr,
}

pub(crate) struct MatchInput {
    pub occurrences: Vec<syn::Expr>,
    pub rows: Vec<RowInput>,
}

fn parse_bracketed_row(input: ParseStream, arity: usize, row_no: usize) -> syn::Result<Vec<Pattern>> {
    let content;
    syn::bracketed!(content in input);
    let mut patterns = Vec::new();
    while !content.is_empty() {
        patterns.push(parse_pattern(&content)?);
        if content.peek(Token![,]) {
            content.parse::<Token![,]>()?;
        } else {
            break;
        }
    }
    if patterns.len() != arity {
        return Err(syn::Error::new(
            content.span(),
            format!(
                "row {row_no} has {} pattern(s), expected {arity} (one per occurrence)",
                patterns.len()
            ),
        ));
    }
    Ok(patterns)
}

impl Parse for MatchInput {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let occ_content;
        syn::bracketed!(occ_content in input);
        let occurrences: Vec<syn::Expr> =
            Punctuated::<syn::Expr, Token![,]>::parse_terminated(&occ_content)?
                .into_iter()
                .collect();
        let arity = occurrences.len();
        input.parse::<Token![;]>()?;

        let rows = parse_rows(input, arity)?;
        Ok(MatchInput { occurrences, rows })
    }
}

fn parse_rows(input: ParseStream, arity: usize) -> syn::Result<Vec<RowInput>> {
    let mut rows = Vec::new();
    let mut row_no = 1;
    let mut saw_else = false;
    while !input.is_empty() {
        if saw_else {
            return Err(input.error("`_` (the :else row) must be the last row"));
        }
        let is_else = input.peek(Token![_]) && input.peek2(Token![=>]);
        let mut patterns = if is_else {
            input.parse::<Token![_]>()?;
            saw_else = true;
            (0..arity).map(|_| Pattern::wildcard()).collect()
        } else {
            parse_bracketed_row(input, arity, row_no)?
        };
        maybe_row_guard(input, &mut patterns)?;
        input.parse::<Token![=>]>()?;
        let action: syn::Expr = input.parse()?;
        rows.push(RowInput { patterns, action });
        row_no += 1;
        if input.peek(Token![,]) {
            input.parse::<Token![,]>()?;
        } else {
            break;
        }
    }
    Ok(rows)
}

/// `match1!`'s rows are bare patterns (no surrounding `[...]`; arity is
/// always 1).
pub(crate) struct Match1Input {
    pub occurrence: syn::Expr,
    pub rows: Vec<RowInput>,
}

impl Parse for Match1Input {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let occurrence: syn::Expr = input.parse()?;
        input.parse::<Token![;]>()?;

        let mut rows = Vec::new();
        let mut saw_else = false;
        while !input.is_empty() {
            if saw_else {
                return Err(input.error("`_` (the :else row) must be the last row"));
            }
            let is_else = input.peek(Token![_]) && input.peek2(Token![=>]);
            let pattern = if is_else {
                input.parse::<Token![_]>()?;
                saw_else = true;
                Pattern::wildcard()
            } else {
                parse_pattern(input)?
            };
            let mut patterns = vec![pattern];
            maybe_row_guard(input, &mut patterns)?;
            input.parse::<Token![=>]>()?;
            let action: syn::Expr = input.parse()?;
            rows.push(RowInput { patterns, action });
            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            } else {
                break;
            }
        }
        Ok(Match1Input { occurrence, rows })
    }
}

/// `matchv!` additionally takes a leading vector-kind path before the
/// occurrences, setting the per-call vector-kind tag.
pub(crate) struct MatchVInput {
    pub kind: maranget_core::VectorKind,
    pub inner: MatchInput,
}

impl Parse for MatchVInput {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let kind_ident: Ident = input.parse()?;
        let kind = match kind_ident.to_string().as_str() {
            "Array" => maranget_core::VectorKind::Array,
            "VecDeque" => maranget_core::VectorKind::VecDeque,
            "Slice" => maranget_core::VectorKind::Slice,
            other => {
                return Err(syn::Error::new(
                    kind_ident.span(),
                    format!("unknown vector kind `{other}`, expected one of: Slice, Array, VecDeque"),
                ));
            }
        };
        input.parse::<Token![;]>()?;
        let inner: MatchInput = input.parse()?;
        Ok(MatchVInput { kind, inner })
    }
}

/// Lifts each occurrence expression to a bare-name [`Occurrence`],
/// attaching `ocr_expr` metadata for anything that wasn't already a plain
/// identifier. The actual `let` binding is introduced once, at the right
/// scope, by the compiled DAG's `Bind` node, not here.
pub(crate) fn lift_occurrences(exprs: &[syn::Expr]) -> Vec<Occurrence> {
    exprs
        .iter()
        .map(|expr| {
            if let syn::Expr::Path(p) = expr {
                if let Some(ident) = p.path.get_ident() {
                    return Occurrence::plain(ident.clone());
                }
            }
            let name = maranget_core::fresh::fresh_ident("occ");
            Occurrence::plain(name).with_ocr_expr(expr.clone())
        })
        .collect()
}

/// Builds the initial [`PatternMatrix`] from parsed rows and occurrences.
pub(crate) fn build_matrix(rows: Vec<RowInput>, occurrences: Vec<Occurrence>) -> PatternMatrix {
    let rows = rows
        .into_iter()
        .map(|row| PatternRow::new(row.patterns, row.action))
        .collect();
    PatternMatrix::new(rows, occurrences)
}
