//! Filter resolution for searchgrid.
//!
//! Turns an admin field into a fully specified [`FilterDescriptor`]: the
//! filter kind comes from a [`TypeGuesser`], type-derived default options are
//! folded underneath the caller's options, and a label is derived when none
//! was given.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                   searchgrid-filter                      │
//! ├──────────────────────────────────────────────────────────┤
//! │  FilterResolver                                          │
//! │  ├── TypeGuesser (MappingGuesser, ChainGuesser)          │
//! │  └── LabelTranslator (NativeLabels, UnderscoreLabels)    │
//! ├──────────────────────────────────────────────────────────┤
//! │  OptionBag (raw options, default merging)                │
//! │  FilterOptions (typed options per FilterKind)            │
//! │  FilterDescriptor (field + kind + options)               │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use searchgrid_filter::{
//!     Confidence, DeclaredType, FilterKind, FilterResolver, GuessContext, MappingGuesser,
//!     NativeLabels, OptionBag, TypeGuess,
//! };
//!
//! let guesser = MappingGuesser::new()
//!     .with_guess("createdAt", TypeGuess::new(FilterKind::Range, Confidence::High));
//! let resolver = FilterResolver::new(Arc::new(guesser), Arc::new(NativeLabels));
//!
//! let ctx = GuessContext::new("App\\Entity\\Post", "orm");
//! let descriptor = resolver
//!     .resolve(&ctx, &"createdAt".into(), DeclaredType::Unset, OptionBag::new())
//!     .unwrap();
//!
//! assert_eq!(descriptor.kind(), FilterKind::Range);
//! assert_eq!(descriptor.label(), Some("Created at"));
//! assert!(!descriptor.options().is_required());
//! ```

pub mod descriptor;
pub mod guesser;
pub mod kind;
pub mod label;
pub mod options;
pub mod resolver;

// Re-exports
pub use descriptor::FilterDescriptor;
pub use guesser::{ChainGuesser, Confidence, GuessContext, MappingGuesser, TypeGuess, TypeGuesser};
pub use kind::FilterKind;
pub use label::{LabelTranslator, NativeLabels, UnderscoreLabels};
pub use options::{Choice, FilterOptions, KindOptions, OptionBag, TextMode};
pub use resolver::{DeclaredType, FilterResolver};

pub use searchgrid_core::{Error, FieldId, Result};
