//! Relay import protocol: wire models and the pure state interpretation step.

mod decision;
mod phrase;
mod state;

pub use decision::ImportDecision;
pub use phrase::{EncryptedPhrase, ExportedPhrase, WordListLanguage};
pub use state::{
    AcceptedImport, CompletedImport, GetImportDataApiResponse, ImportState, ImportStateError,
};
