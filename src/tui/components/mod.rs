//! # TUI Components
//!
//! ```text
//! components/
//! ├── mod.rs            (this file)
//! ├── title_bar.rs      (header line: title, endpoint, status)
//! ├── input_box/        (single-line user id field)
//! ├── go_button.rs      (clickable Go button)
//! └── response_view.rs  (loading / error / JSON display)
//! ```
//!
//! Stateless components (`TitleBar`, `GoButton`) take everything as props.
//! Stateful ones (`InputBox`, `ResponseViewState`) keep their presentation
//! state in `TuiState` between frames and implement `EventHandler`.
//!
//! Props are passed explicitly rather than read from the `App`, so each
//! component can be rendered alone against a `TestBackend`.

pub mod go_button;
pub mod input_box;
pub mod response_view;
pub mod title_bar;

pub use go_button::GoButton;
pub use input_box::{InputBox, InputEvent};
pub use response_view::{ResponseView, ResponseViewState};
pub use title_bar::TitleBar;
