use iced::widget::{
    button, column, container, horizontal_space, row, scrollable, text, text_input,
    vertical_space, Column,
};
use iced::{Alignment, Element, Length, Theme};

use super::thumbnail;
use super::thumbnails::ThumbnailCache;
use crate::state::admin::{AdminController, AdminEvent};
use crate::state::collection::Presentation;
use crate::state::data::Image;
use crate::state::notification::{Notification, NotificationKind};
use crate::Message;

const SIDEBAR_OPEN: f32 = 200.0;
const SIDEBAR_CLOSED: f32 = 56.0;
const ROW_THUMBNAIL: f32 = 64.0;

fn msg(event: AdminEvent) -> Message {
    Message::Admin(event)
}

/// Admin panel: collapsible sidebar next to the upload form and image table
pub fn view<'a>(
    admin: &'a AdminController,
    thumbnails: &'a ThumbnailCache,
) -> Element<'a, Message> {
    row![sidebar(admin), main_panel(admin, thumbnails)]
        .height(Length::Fill)
        .into()
}

fn sidebar(admin: &AdminController) -> Element<'_, Message> {
    let open = admin.sidebar_open();

    let toggle = button(text(if open { "«" } else { "»" }))
        .on_press(msg(AdminEvent::ToggleSidebar))
        .style(button::text);

    let mut content = column![toggle].spacing(12).padding(12);
    if open {
        content = content
            .push(text("Admin Panel").size(20))
            .push(text("Upload Images").size(14))
            .push(text("Manage Images").size(14));
    }

    content = content.push(vertical_space()).push(
        button(text(if open { "Logout" } else { "Out" }))
            .on_press(msg(AdminEvent::Logout))
            .style(button::danger),
    );

    container(content)
        .width(Length::Fixed(if open { SIDEBAR_OPEN } else { SIDEBAR_CLOSED }))
        .height(Length::Fill)
        .style(container::rounded_box)
        .into()
}

fn main_panel<'a>(
    admin: &'a AdminController,
    thumbnails: &'a ThumbnailCache,
) -> Element<'a, Message> {
    let header = row![
        text("Manage Images").size(28),
        horizontal_space(),
        text(format!("{} images", admin.collection().len())).size(16),
    ]
    .align_y(Alignment::Center);

    let mut content = column![header].spacing(20).padding(30);
    if let Some(notification) = admin.notification() {
        content = content.push(banner(notification));
    }

    content
        .push(form(admin))
        .push(image_list(admin, thumbnails))
        .width(Length::Fill)
        .into()
}

fn banner(notification: &Notification) -> Element<'_, Message> {
    let style: fn(&Theme) -> text::Style = match notification.kind {
        NotificationKind::Success => text::success,
        NotificationKind::Error => text::danger,
    };

    text(notification.text.as_str()).size(16).style(style).into()
}

fn form(admin: &AdminController) -> Element<'_, Message> {
    let draft = admin.draft();
    let editing = draft.is_editing();
    let pending = admin.pending_operation();

    let mut fields = column![
        text(if editing { "Edit Image" } else { "Upload New Image" }).size(20),
        text_input("Image title", &draft.title)
            .on_input(|title| msg(AdminEvent::TitleChanged(title)))
            .on_submit(msg(AdminEvent::Submit))
            .padding(10),
    ]
    .spacing(12);

    // The file of an existing image cannot be replaced, only its title
    if !editing {
        let picked = admin
            .selected_file()
            .map(|file| file.name.as_str())
            .unwrap_or("No file selected");
        fields = fields.push(
            row![
                button("Choose file")
                    .on_press(Message::PickFile)
                    .style(button::secondary),
                text(picked),
            ]
            .spacing(10)
            .align_y(Alignment::Center),
        );
    }

    let label = match (pending, editing) {
        (true, true) => "Updating...",
        (true, false) => "Uploading...",
        (false, true) => "Update Image",
        (false, false) => "Upload Image",
    };
    // Submitting waits for the collection to arrive
    let ready = !pending && !admin.is_loading();
    let mut actions = row![button(label)
        .padding(10)
        .on_press_maybe(ready.then(|| msg(AdminEvent::Submit)))]
    .spacing(10);

    if editing {
        actions = actions.push(
            button("Cancel")
                .padding(10)
                .style(button::secondary)
                .on_press(msg(AdminEvent::CancelEdit)),
        );
    }

    container(fields.push(actions))
        .padding(20)
        .width(Length::Fill)
        .style(container::rounded_box)
        .into()
}

fn image_list<'a>(
    admin: &'a AdminController,
    thumbnails: &'a ThumbnailCache,
) -> Element<'a, Message> {
    match admin.presentation() {
        Presentation::Loading => text("Loading images...").size(16).into(),
        Presentation::Empty { retry } => {
            let mut content = column![text("No images uploaded yet").size(16)].spacing(10);
            if retry {
                content = content
                    .push(text("The collection could not be loaded.").style(text::danger))
                    .push(button("Retry").on_press(msg(AdminEvent::Retry)));
            }
            content.into()
        }
        Presentation::Images => {
            let rows = admin
                .collection()
                .iter()
                .map(|image| image_row(image, thumbnails));

            scrollable(Column::with_children(rows).spacing(10))
                .height(Length::Fill)
                .into()
        }
    }
}

fn image_row<'a>(image: &'a Image, thumbnails: &ThumbnailCache) -> Element<'a, Message> {
    row![
        thumbnail(thumbnails, &image.id, ROW_THUMBNAIL),
        text(image.title.as_str()).size(16).width(Length::Fill),
        button("Edit")
            .on_press(msg(AdminEvent::BeginEdit(image.id.clone())))
            .style(button::secondary),
        button("Delete")
            .on_press(msg(AdminEvent::DeleteRequested(image.id.clone())))
            .style(button::danger),
    ]
    .spacing(12)
    .align_y(Alignment::Center)
    .into()
}
