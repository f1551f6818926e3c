/// Views for each route, plus the thumbnail cache they share
use iced::widget::{container, image, text};
use iced::{Element, Length};

use crate::state::data::ImageId;
use crate::Message;

pub mod admin;
pub mod gallery;
pub mod login;
pub mod thumbnails;

use thumbnails::ThumbnailCache;

/// A square thumbnail, or a placeholder while it is loading
fn thumbnail<'a>(thumbnails: &ThumbnailCache, id: &ImageId, size: f32) -> Element<'a, Message> {
    match thumbnails.get(id) {
        Some(handle) => image(handle.clone())
            .width(Length::Fixed(size))
            .height(Length::Fixed(size))
            .into(),
        None => container(text("...").size(14))
            .center_x(Length::Fixed(size))
            .center_y(Length::Fixed(size))
            .style(container::rounded_box)
            .into(),
    }
}

/// Fill the available space and center `content` in it
fn centered<'a>(content: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}
