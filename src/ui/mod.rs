// SPDX-License-Identifier: MPL-2.0
//! Screen components. Each screen exposes `State`, `Message`, `Event`,
//! an `update` function, and a `view` function; the application routes
//! messages in and folds events back into its own state.

pub mod main_screen;
pub mod settings_screen;
pub mod style;
