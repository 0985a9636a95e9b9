//! Declaration kinds recognized in ambient declaration files.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of a parsed declaration.
///
/// # Examples
///
/// ```
/// use cg_core::DeclarationKind;
///
/// assert_eq!(DeclarationKind::Class.label(), "class");
/// assert!(DeclarationKind::Enum.is_standalone());
/// assert!(!DeclarationKind::Const.is_standalone());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    /// `export declare class`
    Class,
    /// `export interface`
    Interface,
    /// `export declare function`
    Function,
    /// `export declare const`
    Const,
    /// `export declare var`
    Var,
    /// `export declare enum`
    Enum,
    /// An entry of an `export { ... }` group.
    ReExport,
}

impl DeclarationKind {
    /// All kinds, in opener-table order followed by re-exports.
    pub const ALL: [Self; 7] = [
        Self::Interface,
        Self::Class,
        Self::Const,
        Self::Var,
        Self::Function,
        Self::Enum,
        Self::ReExport,
    ];

    /// Lowercase name used in completion detail text.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Function => "function",
            Self::Const => "const",
            Self::Var => "var",
            Self::Enum => "enum",
            Self::ReExport => "export",
        }
    }

    /// Returns `true` for kinds that own their whole emitted content block.
    ///
    /// Standalone declarations are keyed by namespace alone and render their
    /// file content without siblings.
    #[inline]
    #[must_use]
    pub const fn is_standalone(self) -> bool {
        matches!(self, Self::Class | Self::Interface | Self::Enum)
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
