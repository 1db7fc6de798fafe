//! Window-property and protocol layer for an X11 desktop panel.
//!
//! Interns the atoms a panel needs, reads and writes window properties,
//! classifies windows for the task list, resolves their titles, detects the
//! monitor layout and sends requests to the window manager

#![deny(
    clippy::all,
    clippy::complexity,
    clippy::correctness,
    clippy::nursery,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    absolute_paths_not_starting_with_crate,
    anonymous_parameters,
    bad_style,
    ellipsis_inclusive_range_patterns,
    exported_private_dependencies,
    ill_formed_attribute_input,
    improper_ctypes,
    keyword_idents,
    macro_use_extern_crate,
    meta_variable_misuse,
    missing_abi,
    no_mangle_generic_items,
    non_shorthand_field_patterns,
    noop_method_call,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    pub_use_of_private_extern_crate,
    semicolon_in_expressions_from_macros,
    single_use_lifetimes,
    trivial_casts,
    trivial_numeric_casts,
    unconditional_recursion,
    unreachable_pub,
    unsafe_code,
    while_true
)]
#![allow(
    clippy::as_conversions,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::redundant_pub_crate,
    clippy::similar_names
)]
#![cfg_attr(
    any(test),
    allow(
        clippy::expect_used,
        clippy::panic,
        clippy::unwrap_used,
        clippy::wildcard_enum_match_arm,
    )
)]

pub mod error;
pub mod geometry;
pub mod monitor;
pub mod query;
pub mod x;

pub use error::{Error, Result};
pub use x::{
    atoms::{AtomTable, XAtom},
    message::MessageSender,
    name::{ResolvedName, WindowNameExt},
    property::{Property, PropertyReader},
    state::{TaskState, WindowStateExt},
    trap::{ErrorTrap, TrapGuard},
    xconnection::XConnection,
    XContext,
};
