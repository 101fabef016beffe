// Domain errors for the appeals ledger
// Anticipated user-input outcomes the caller must branch on; storage and other
// collaborator failures travel as anyhow::Error instead.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Non-blank raw input produced zero valid identifier tokens.
    #[error("input contained no valid identifiers")]
    NoValidIdentifiers,

    /// Hiding this category would leave no category visible.
    #[error("at least one category must remain visible")]
    CannotHideAll,
}
