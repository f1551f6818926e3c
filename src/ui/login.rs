use iced::widget::{button, column, row, text, text_input};
use iced::{Alignment, Element, Length};

use super::centered;
use crate::state::login::LoginForm;
use crate::state::session::Route;
use crate::Message;

pub fn view(form: &LoginForm) -> Element<'_, Message> {
    let mut content = column![
        text("Admin Login").size(32),
        text_input("Access token", &form.token)
            .secure(true)
            .on_input(Message::TokenChanged)
            .on_submit(Message::LoginSubmitted)
            .padding(10)
            .width(Length::Fixed(360.0)),
        row![
            button("Log in").on_press(Message::LoginSubmitted).padding(10),
            button("Back to gallery")
                .on_press(Message::Navigate(Route::Gallery))
                .padding(10)
                .style(button::secondary),
        ]
        .spacing(10),
    ]
    .spacing(20)
    .align_x(Alignment::Center);

    if let Some(error) = &form.error {
        content = content.push(text(error.as_str()).style(text::danger));
    }

    centered(content)
}
