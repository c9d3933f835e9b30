// SPDX-License-Identifier: MPL-2.0
//! Screen dispatch.

use super::{App, Message, Screen};
use crate::ui::{main_screen, settings_screen};
use iced::Element;

pub fn view(app: &App) -> Element<'_, Message> {
    match app.screen {
        Screen::Main => main_screen::view(
            &app.main,
            main_screen::ViewContext {
                models: &app.models,
                selected_model: app.selected_model(),
                has_api_key: app.settings.resolve_api_key().is_some(),
            },
        )
        .map(Message::Main),
        Screen::Settings => match &app.settings_screen {
            Some(state) => settings_screen::view(
                state,
                settings_screen::ViewContext {
                    models: &app.models,
                },
            )
            .map(Message::SettingsScreen),
            // Settings screen without state should not happen; fall back.
            None => main_screen::view(
                &app.main,
                main_screen::ViewContext {
                    models: &app.models,
                    selected_model: app.selected_model(),
                    has_api_key: app.settings.resolve_api_key().is_some(),
                },
            )
            .map(Message::Main),
        },
    }
}
