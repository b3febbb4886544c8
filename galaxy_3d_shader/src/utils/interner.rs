/// Global keyword interner
///
/// Keyword names are interned once and carried around as compact `Symbol`s,
/// so keyword sets compare and copy without touching string memory.

use std::sync::LazyLock;
use lasso::{Spur, ThreadedRodeo};

static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::new);

/// Interned keyword handle
pub type Symbol = Spur;

/// Intern a string, returning the existing symbol if already known
#[inline]
pub fn intern(s: &str) -> Symbol {
    INTERNER.get_or_intern(s)
}

/// Symbol of an already-interned string (never allocates)
#[inline]
pub fn get(s: &str) -> Option<Symbol> {
    INTERNER.get(s)
}

/// Resolve a symbol back to its string
#[inline]
pub fn resolve(sym: Symbol) -> &'static str {
    INTERNER.resolve(&sym)
}

#[cfg(test)]
#[path = "interner_tests.rs"]
mod tests;
