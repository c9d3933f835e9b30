// SPDX-License-Identifier: MPL-2.0
//! Native event routing.
//!
//! File drag and drop arrives as window events; they are surfaced on
//! every screen so a drop while the settings screen is open still lands
//! (the update logic decides what to do with it). Close requests go
//! through the app for a final settings save.

use super::Message;
use iced::{event, Subscription};

pub fn subscription() -> Subscription<Message> {
    event::listen_with(|event, _status, window_id| match event {
        event::Event::Window(iced::window::Event::FileDropped(path)) => {
            Some(Message::FileDropped(path))
        }
        event::Event::Window(iced::window::Event::FileHovered(_)) => Some(Message::FileHovered),
        event::Event::Window(iced::window::Event::FilesHoveredLeft) => {
            Some(Message::FilesHoveredLeft)
        }
        event::Event::Window(iced::window::Event::CloseRequested) => {
            Some(Message::WindowCloseRequested(window_id))
        }
        _ => None,
    })
}
