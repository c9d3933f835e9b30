// SPDX-License-Identifier: MPL-2.0
//! Shared spacing, type scale, and widget styles.

use iced::widget::container;
use iced::{Border, Color, Theme};

pub mod spacing {
    pub const XS: f32 = 4.0;
    pub const SM: f32 = 8.0;
    pub const MD: f32 = 16.0;
    pub const LG: f32 = 24.0;
}

pub mod typography {
    pub const BODY_SM: f32 = 13.0;
    pub const BODY: f32 = 15.0;
    pub const BODY_LG: f32 = 17.0;
    pub const TITLE: f32 = 24.0;
}

pub fn muted_text_color() -> Color {
    Color::from_rgb(0.55, 0.55, 0.55)
}

pub fn error_text_color() -> Color {
    Color::from_rgb(0.85, 0.3, 0.3)
}

pub fn success_text_color() -> Color {
    Color::from_rgb(0.3, 0.7, 0.4)
}

/// The drop target area. The border brightens while a file hovers over
/// the window.
pub fn drop_zone(hovering: bool) -> impl Fn(&Theme) -> container::Style {
    move |theme: &Theme| {
        let palette = theme.extended_palette();
        let border_color = if hovering {
            palette.primary.strong.color
        } else {
            palette.background.strong.color
        };
        container::Style {
            background: Some(palette.background.weak.color.into()),
            border: Border {
                color: border_color,
                width: if hovering { 3.0 } else { 1.5 },
                radius: 8.0.into(),
            },
            ..container::Style::default()
        }
    }
}

/// Frame around the result text.
pub fn result_pane(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();
    container::Style {
        background: Some(palette.background.weak.color.into()),
        border: Border {
            color: palette.background.strong.color,
            width: 1.0,
            radius: 4.0.into(),
        },
        ..container::Style::default()
    }
}
