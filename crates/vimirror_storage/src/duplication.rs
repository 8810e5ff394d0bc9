//! Name collision policy.

/// What to do when a file with the requested name already exists.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::EnumIter,
    derive_more::Display,
)]
pub enum DuplicationBehavior {
    /// Overwrite the existing file
    #[default]
    #[display("replace")]
    Replace,
    /// Store under the next free `{stem}_{n}.{ext}` name
    #[display("rename")]
    Rename,
    /// Refuse and report a collision
    #[display("cancel")]
    Cancel,
}
