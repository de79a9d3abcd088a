//! The CTE compiler: statement snapshot in, WITH preamble out.

use crate::dialect::Dialect;
use crate::error::CteBuildError;
use crate::fragment::{count_placeholders, CompiledFragment};
use crate::statement::Statement;
use crate::value::Value;

/// How WITH-clause bindings fold into the final statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BindingStrategy {
    /// Keep `?` placeholders in subquery SQL; CTE bindings are contributed
    /// ahead of the base query's own, in declaration order, because the
    /// preamble textually precedes the base SELECT.
    #[default]
    PositionalMerge,
    /// Substitute each placeholder's binding as an escaped literal in the
    /// emitted fragment; contributes zero bindings. Sidesteps positional
    /// bugs for the WITH segment at the cost of careful escaping.
    LiteralInline,
}

/// Compile an ordered statement snapshot into the `WITH ...` preamble and
/// the bindings it contributes.
///
/// An empty snapshot compiles to an empty fragment: no `WITH` keyword, no
/// bindings. Statements are emitted strictly in declaration order, each
/// one as `alias AS (subquery)` with its deferred predicates applied
/// first.
pub fn compile_with<D: Dialect + ?Sized>(
    snapshot: &[Statement],
    dialect: &D,
    strategy: BindingStrategy,
) -> Result<CompiledFragment, CteBuildError> {
    if snapshot.is_empty() {
        return Ok(CompiledFragment::empty());
    }

    log::debug!(
        "compiling WITH clause: {} statement(s), strategy {:?}",
        snapshot.len(),
        strategy
    );

    let mut components = Vec::with_capacity(snapshot.len());
    let mut bindings: Vec<Value> = Vec::new();

    for statement in snapshot {
        let mut query = statement.fresh_query();
        if query.from.name.is_empty() {
            return Err(CteBuildError::EmptyFactoryResult(
                statement.alias().to_string(),
            ));
        }

        for predicate in statement.predicates() {
            query.filters.push(predicate.clone());
        }

        let compiled = dialect.compile(&query)?;
        compiled.verify_alignment()?;
        log::trace!(
            "cte '{}' compiled: {} ({} bindings)",
            statement.alias(),
            compiled.sql,
            compiled.bindings.len()
        );

        match strategy {
            BindingStrategy::PositionalMerge => {
                components.push(format!("{} AS ({})", statement.alias(), compiled.sql));
                bindings.extend(compiled.bindings);
            }
            BindingStrategy::LiteralInline => {
                let inlined = inline_bindings(&compiled.sql, &compiled.bindings)?;
                components.push(format!("{} AS ({})", statement.alias(), inlined));
            }
        }
    }

    Ok(CompiledFragment::new(
        format!("WITH {}", components.join(", ")),
        bindings,
    ))
}

/// Substitute each positional placeholder with its binding's literal form,
/// in encounter order: first `?` takes the first binding, never matched by
/// value. `?` inside single-quoted text is left alone.
pub fn inline_bindings(sql: &str, bindings: &[Value]) -> Result<String, CteBuildError> {
    let placeholders = count_placeholders(sql);
    if placeholders != bindings.len() {
        return Err(CteBuildError::BindingMismatch {
            placeholders,
            bindings: bindings.len(),
        });
    }

    let mut out = String::with_capacity(sql.len());
    let mut next = bindings.iter();
    let mut in_string = false;
    for ch in sql.chars() {
        match ch {
            '\'' => {
                in_string = !in_string;
                out.push(ch);
            }
            '?' if !in_string => {
                // Counts were verified above, so a binding is always here.
                match next.next() {
                    Some(value) => out.push_str(&value.to_inline_literal()?),
                    None => {
                        return Err(CteBuildError::BindingMismatch {
                            placeholders,
                            bindings: bindings.len(),
                        })
                    }
                }
            }
            _ => out.push(ch),
        }
    }
    Ok(out)
}
