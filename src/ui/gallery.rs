use iced::widget::{button, column, container, horizontal_space, row, scrollable, text};
use iced::{Alignment, Element, Length};
use iced_aw::Wrap;

use super::thumbnails::ThumbnailCache;
use super::{centered, thumbnail};
use crate::state::collection::Presentation;
use crate::state::data::Image;
use crate::state::gallery::GalleryState;
use crate::state::session::Route;
use crate::Message;

/// Width of a gallery card
const CARD_SIZE: f32 = 220.0;

/// Public gallery: header plus a wrapping grid of cards
pub fn view<'a>(
    gallery: &'a GalleryState,
    thumbnails: &'a ThumbnailCache,
) -> Element<'a, Message> {
    let header = row![
        text("Image Gallery").size(32),
        horizontal_space(),
        button("Admin")
            .on_press(Message::Navigate(Route::Admin))
            .padding(10),
    ]
    .align_y(Alignment::Center);

    let body: Element<'a, Message> = match gallery.presentation() {
        Presentation::Loading => centered(text("Loading images...").size(18)),
        Presentation::Empty { retry } => {
            let mut content = column![text("No images yet").size(20)]
                .spacing(12)
                .align_x(Alignment::Center);
            if retry {
                content = content
                    .push(text("The gallery could not be loaded.").size(14))
                    .push(button("Retry").on_press(Message::GalleryRetry).padding(8));
            }
            centered(content)
        }
        Presentation::Images => {
            let cards: Vec<Element<'a, Message>> = gallery
                .images()
                .iter()
                .map(|image| card(image, thumbnails))
                .collect();

            scrollable(Wrap::with_elements(cards).spacing(16.0).line_spacing(16.0))
                .height(Length::Fill)
                .into()
        }
    };

    column![header, body].spacing(24).padding(30).into()
}

fn card<'a>(image: &'a Image, thumbnails: &ThumbnailCache) -> Element<'a, Message> {
    let content = column![
        thumbnail(thumbnails, &image.id, CARD_SIZE),
        text(image.title.as_str()).size(16),
    ]
    .spacing(8)
    .width(Length::Fixed(CARD_SIZE));

    container(content)
        .padding(10)
        .style(container::rounded_box)
        .into()
}
