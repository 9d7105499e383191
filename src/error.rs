//! Rich diagnostic error types for the kbp-reader pipeline.
//!
//! Each stage of the pipeline defines its own error type with miette
//! `#[diagnostic]` derives, so a failure carries an error code and help text
//! pointing at the offending triple, token or configuration value.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the reader.
///
/// Each variant wraps a stage-specific error, preserving the full diagnostic
/// chain through to the caller.
#[derive(Debug, Error, Diagnostic)]
pub enum KbpError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Triple(#[from] TripleError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Vocab(#[from] VocabError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Score(#[from] ScoreError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Loss(#[from] LossError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Triple errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum TripleError {
    #[error("malformed triple \"{text}\": expected 3 tokens, got {tokens}")]
    #[diagnostic(
        code(kbp::triple::malformed),
        help(
            "A question must be exactly `subject predicate object`, separated by \
             whitespace. Tokens themselves may not contain spaces."
        )
    )]
    Malformed { text: String, tokens: usize },
}

// ---------------------------------------------------------------------------
// Vocabulary errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum VocabError {
    #[error("unknown entity: \"{token}\"")]
    #[diagnostic(
        code(kbp::vocab::unknown_entity),
        help(
            "The vocabulary is frozen after it is built from the training set. \
             Only entities seen as a subject or object during setup can be scored."
        )
    )]
    UnknownEntity { token: String },

    #[error("unknown predicate: \"{token}\"")]
    #[diagnostic(
        code(kbp::vocab::unknown_predicate),
        help(
            "The vocabulary is frozen after it is built from the training set. \
             Only predicates seen during setup can be scored."
        )
    )]
    UnknownPredicate { token: String },

    #[error("cannot build a vocabulary from an empty training set")]
    #[diagnostic(
        code(kbp::vocab::empty),
        help("Provide at least one training triple before building the vocabulary.")
    )]
    EmptyVocabulary,

    #[error("token \"{token}\" appears more than once in a vocabulary table")]
    #[diagnostic(
        code(kbp::vocab::duplicate_token),
        help("An exported vocabulary must map every token to exactly one index.")
    )]
    DuplicateToken { token: String },

    #[error("failed to export vocabulary: {message}")]
    #[diagnostic(
        code(kbp::vocab::export),
        help("The vocabulary tables could not be serialized to JSON.")
    )]
    Export { message: String },
}

// ---------------------------------------------------------------------------
// Scoring errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ScoreError {
    #[error("scoring function \"{name}\" is not registered")]
    #[diagnostic(
        code(kbp::score::unregistered),
        help("Registered scoring functions: {available}. Names are case-sensitive.")
    )]
    UnregisteredScoringFunction { name: String, available: String },

    #[error("scoring function {name} cannot use dimension {dim}: {reason}")]
    #[diagnostic(
        code(kbp::score::incompatible_dim),
        help("Adjust `repr_dim` in the reader configuration.")
    )]
    IncompatibleDimension {
        name: String,
        dim: usize,
        reason: String,
    },

    #[error("{table} index {index} out of range for table with {rows} rows (batch row {row})")]
    #[diagnostic(
        code(kbp::score::index_out_of_range),
        help(
            "Indexed triples are only valid for the vocabulary the model was built \
             from. Re-run preprocessing against the same vocabulary."
        )
    )]
    IndexOutOfRange {
        table: &'static str,
        index: i64,
        rows: usize,
        row: usize,
    },

    #[error("question array must have 3 columns, got {columns}")]
    #[diagnostic(
        code(kbp::score::invalid_shape),
        help("Each batch row is (subject, predicate, object).")
    )]
    InvalidBatchShape { columns: usize },
}

// ---------------------------------------------------------------------------
// Loss errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum LossError {
    #[error("target/logit length mismatch: {targets} targets, {logits} logits")]
    #[diagnostic(
        code(kbp::loss::length_mismatch),
        help("Targets must be positionally aligned with the scored batch.")
    )]
    LengthMismatch { targets: usize, logits: usize },

    #[error("cannot compute a mean loss over an empty batch")]
    #[diagnostic(
        code(kbp::loss::empty_batch),
        help("Assemble the batch with at least one triple.")
    )]
    EmptyBatch,

    #[error("batch carries no target channel")]
    #[diagnostic(
        code(kbp::loss::missing_targets),
        help("Assemble training batches with `with_answers = true`.")
    )]
    MissingTargets,
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("invalid configuration: {message}")]
    #[diagnostic(
        code(kbp::config::invalid),
        help("Check the ReaderConfig fields. {message}")
    )]
    Invalid { message: String },

    #[error("failed to read reader config: {path}")]
    #[diagnostic(
        code(kbp::config::read),
        help("Ensure the config file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse reader config: {message}")]
    #[diagnostic(
        code(kbp::config::parse),
        help("Check the TOML syntax in the reader config file.")
    )]
    Parse { message: String },

    #[error("failed to write reader config: {path}")]
    #[diagnostic(
        code(kbp::config::write),
        help("Ensure the parent directory is writable.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias for functions returning kbp-reader results.
pub type KbpResult<T> = std::result::Result<T, KbpError>;
