//! Pan/zoom sketch editor core for annotated floor plans.
//!
//! The crate owns everything between normalized input events and a list of
//! elements to paint: the scene model and its undo history, the viewport
//! transform, selection, gesture disambiguation, inline text editing and
//! measurement labels. The host is responsible only for delivering events to
//! [`engine::Engine`], drawing [`engine::Engine::visible_elements`], and
//! reacting to the returned [`engine::Action`]s. Storage sits behind the
//! traits in [`storage`] and is reached only through [`session`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Interaction state machine and the [`engine::Action`]s it emits |
//! | [`scene`] | Element types and the immutable scene store |
//! | [`history`] | Bounded snapshot undo/redo |
//! | [`viewport`] | Pan/zoom transform and coordinate conversions |
//! | [`selection`] | Selected ids and contextual affordances |
//! | [`input`] | Tools, modifiers, the event stream, and gesture state |
//! | [`hit`] | Hit-testing of element bodies and resize handles |
//! | [`text_edit`] | Inline text editing session |
//! | [`measure`] | Measurement labels anchored to rectangle sides |
//! | [`storage`] | Sketch repository and draft store contracts |
//! | [`autosave`] | Debounced background draft writer |
//! | [`session`] | Save/load/draft glue around one engine |
//! | [`consts`] | Shared numeric and style constants |

pub mod autosave;
pub mod consts;
pub mod engine;
pub mod hit;
pub mod history;
pub mod input;
pub mod measure;
pub mod scene;
pub mod selection;
pub mod session;
pub mod storage;
pub mod text_edit;
pub mod viewport;
